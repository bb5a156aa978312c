//! Store trait definition

use pmtrack_types::{PmRecord, Settings};

use crate::StoreResult;

/// Durable storage for the PM record log and the settings singleton.
///
/// Both are full-overwrite: every save rewrites the complete document.
/// Write cost is O(total records) per mutation, which is acceptable at the
/// scale of a single-site weekly-reset log.
pub trait Store: Send + Sync {
    /// Load all persisted records. An absent or wholly corrupted document
    /// yields an empty set; individually malformed entries are skipped
    /// with a warning.
    fn load_records(&self) -> StoreResult<Vec<PmRecord>>;

    /// Overwrite the persisted record set
    fn save_records(&self, records: &[PmRecord]) -> StoreResult<()>;

    /// Load persisted settings. `None` when no settings document exists;
    /// missing keys within an existing document fall back to defaults.
    fn load_settings(&self) -> StoreResult<Option<Settings>>;

    /// Overwrite the persisted settings
    fn save_settings(&self, settings: &Settings) -> StoreResult<()>;

    /// Check if the store is usable
    fn is_healthy(&self) -> bool;
}
