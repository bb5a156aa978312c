//! Interaction shell for pmtrack
//!
//! The binary wires configuration, store, catalog, and engine together and
//! then hands control to [`Shell::run`]. Everything here is synchronous and
//! line-oriented; the console abstraction exists so the menu flows can be
//! driven by scripted input in tests.

pub mod console;
pub mod report;
pub mod shell;

pub use console::{AlertKind, Console};
pub use shell::Shell;
