//! Core events emitted by the engine

use chrono::{DateTime, Local, NaiveDate};
use pmtrack_types::RetentionPeriod;
use pmtrack_util::{EquipmentTag, SessionId};

/// Events emitted by the policy engine, kept for monitoring screens.
#[derive(Debug, Clone)]
pub enum CoreEvent {
    /// A user began inspecting a piece of equipment
    SessionStarted {
        session_id: SessionId,
        user: String,
        tag: EquipmentTag,
    },

    /// An inspection was confirmed and persisted
    RecordConfirmed {
        session_id: SessionId,
        user: String,
        tag: EquipmentTag,
        timestamp: DateTime<Local>,
    },

    /// An inspection was abandoned without a record
    SessionDiscarded {
        session_id: SessionId,
        tag: EquipmentTag,
    },

    /// Retention ran and dropped records older than the boundary
    RetentionApplied {
        boundary: NaiveDate,
        dropped: usize,
    },

    /// Settings were changed by an administrator
    SettingsChanged {
        retention: RetentionPeriod,
        warning_period_hours: u32,
    },
}
