//! Strongly-typed identifiers for pmtrack

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Equipment TAG number, unique within a zone.
///
/// Comparison is case-insensitive because tags are entered by hand at the
/// terminal while catalog files carry them uppercase.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EquipmentTag(String);

impl EquipmentTag {
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl PartialEq for EquipmentTag {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }
}

impl Eq for EquipmentTag {}

impl std::hash::Hash for EquipmentTag {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.0.to_ascii_uppercase().hash(state);
    }
}

impl fmt::Display for EquipmentTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for EquipmentTag {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for EquipmentTag {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Unique identifier for an in-progress PM session.
///
/// Assigned at `begin_session` so completion and cancellation match exactly
/// one session even when a user has several open on the same equipment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
