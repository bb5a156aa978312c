//! PM records

use chrono::{DateTime, Local};
use pmtrack_util::EquipmentTag;
use serde::{Deserialize, Serialize};

use crate::{StageResults, Zone};

/// A completed, confirmed PM inspection.
///
/// Immutable once created; identity is the (`tag`, `user`, `timestamp`)
/// tuple. Dropped only by the retention policy or a store clear.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PmRecord {
    pub user: String,
    pub zone: Zone,
    pub tag: EquipmentTag,
    /// Catalog description at the time of recording
    pub description: String,
    pub timestamp: DateTime<Local>,
    pub results: StageResults,
}

impl PmRecord {
    /// Wall-clock elapsed time from this record to `now`.
    /// Negative if the record is somehow in the future.
    pub fn elapsed_since(&self, now: DateTime<Local>) -> chrono::Duration {
        now.signed_duration_since(self.timestamp)
    }
}
