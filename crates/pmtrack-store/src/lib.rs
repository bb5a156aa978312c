//! Persistence layer for pmtrack
//!
//! Provides:
//! - The `Store` trait (record log + settings, full-overwrite semantics)
//! - A JSON-file implementation (`JsonStore`)
//! - Persisted wire shapes with skip-and-log recovery for malformed entries

mod json;
mod persisted;
mod traits;

pub use json::*;
pub use persisted::*;
pub use traits::*;

use thiserror::Error;

/// Store errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Serialization(e.to_string())
    }
}

pub type StoreResult<T> = Result<T, StoreError>;
