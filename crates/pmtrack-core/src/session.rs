//! PM session lifecycle

use chrono::{DateTime, Local};
use pmtrack_types::{Equipment, SessionInfo, SessionStatus, Zone};
use pmtrack_util::{EquipmentTag, SessionId};

/// An inspection a user has started but not yet confirmed or discarded.
///
/// Carries a copy of the catalog row so a catalog reload mid-session cannot
/// change what the record will say.
#[derive(Debug, Clone)]
pub struct ActiveSession {
    pub id: SessionId,
    pub user: String,
    pub zone: Zone,
    pub tag: EquipmentTag,
    pub description: String,
    pub started_at: DateTime<Local>,
    pub status: SessionStatus,
}

impl ActiveSession {
    pub fn new(user: impl Into<String>, equipment: &Equipment, now: DateTime<Local>) -> Self {
        Self {
            id: SessionId::new(),
            user: user.into(),
            zone: equipment.zone,
            tag: equipment.tag.clone(),
            description: equipment.description.clone(),
            started_at: now,
            status: SessionStatus::InProgress,
        }
    }

    pub fn mark_recorded(&mut self) {
        self.status = SessionStatus::Recorded;
    }

    pub fn mark_discarded(&mut self) {
        self.status = SessionStatus::Discarded;
    }

    /// View for monitoring screens
    pub fn to_session_info(&self) -> SessionInfo {
        SessionInfo {
            id: self.id,
            user: self.user.clone(),
            zone: self.zone,
            tag: self.tag.clone(),
            description: self.description.clone(),
            started_at: self.started_at,
            status: self.status,
        }
    }
}
