//! Error types for pmtrack

use thiserror::Error;

use crate::{EquipmentTag, SessionId};

/// Core error type for pmtrack operations
#[derive(Debug, Error)]
pub enum PmError {
    #[error("Equipment not found in zone {zone}: {tag}")]
    EquipmentNotFound { zone: String, tag: EquipmentTag },

    #[error("Stage results rejected: {0}")]
    ValidationFailed(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("No such active session: {0}")]
    SessionNotFound(SessionId),

    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl PmError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::ValidationFailed(msg.into())
    }

    pub fn invalid_parameter(msg: impl Into<String>) -> Self {
        Self::InvalidParameter(msg.into())
    }

    pub fn storage(msg: impl Into<String>) -> Self {
        Self::StorageUnavailable(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, PmError>;
