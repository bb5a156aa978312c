//! Session status and views

use chrono::{DateTime, Local};
use pmtrack_util::{EquipmentTag, SessionId};
use serde::{Deserialize, Serialize};

use crate::Zone;

/// State of a PM session.
///
/// `InProgress` is the only non-terminal state; `Recorded` and `Discarded`
/// sessions are removed from the active set, never tombstoned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    InProgress,
    Recorded,
    Discarded,
}

/// View of an in-progress session for monitoring screens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionInfo {
    pub id: SessionId,
    pub user: String,
    pub zone: Zone,
    pub tag: EquipmentTag,
    pub description: String,
    pub started_at: DateTime<Local>,
    pub status: SessionStatus,
}
