//! Shared utilities for pmtrack
//!
//! This crate provides:
//! - ID types (SessionId, EquipmentTag)
//! - Time utilities (wall clock with mock support, week boundaries)
//! - Error types
//! - Default paths for config and data directories

mod error;
mod ids;
mod paths;
mod time;

pub use error::*;
pub use ids::*;
pub use paths::*;
pub use time::*;
