//! Core policy engine for pmtrack
//!
//! This crate is the heart of pmtrack, containing:
//! - The PM session lifecycle (InProgress -> Recorded | Discarded)
//! - Repeat-inspection warning evaluation against the warning window
//! - Weekly retention enforcement
//! - Settings mutation with write-through persistence

mod engine;
mod events;
mod session;

pub use engine::*;
pub use events::*;
pub use session::*;
