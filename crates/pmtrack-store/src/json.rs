//! JSON-file persistence
//!
//! Records live in `pm_records.json` (a JSON array) and settings in
//! `settings.json`, both rewritten in full on every save. Loads are
//! tolerant: a corrupt file is reported and treated as empty rather than
//! taking the whole application down.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use pmtrack_types::{PmRecord, Settings};
use tracing::{debug, warn};

use crate::persisted::{PersistedRecord, PersistedSettings, decode_records};
use crate::traits::Store;
use crate::StoreResult;

pub const RECORDS_FILE: &str = "pm_records.json";
pub const SETTINGS_FILE: &str = "settings.json";

/// Store backed by flat JSON files under a data directory.
pub struct JsonStore {
    data_dir: PathBuf,
    records_path: PathBuf,
    settings_path: PathBuf,
}

impl JsonStore {
    /// Open a store rooted at `data_dir`, creating the directory if needed.
    pub fn open(data_dir: impl Into<PathBuf>) -> StoreResult<Self> {
        let data_dir = data_dir.into();
        fs::create_dir_all(&data_dir)?;
        debug!(path = %data_dir.display(), "Opened JSON store");

        Ok(Self {
            records_path: data_dir.join(RECORDS_FILE),
            settings_path: data_dir.join(SETTINGS_FILE),
            data_dir,
        })
    }

    pub fn records_path(&self) -> &Path {
        &self.records_path
    }

    pub fn settings_path(&self) -> &Path {
        &self.settings_path
    }

    fn write_file(&self, path: &Path, contents: &str) -> StoreResult<()> {
        let mut file = fs::File::create(path)?;
        file.write_all(contents.as_bytes())?;
        file.flush()?;
        Ok(())
    }
}

impl Store for JsonStore {
    fn load_records(&self) -> StoreResult<Vec<PmRecord>> {
        let raw = match fs::read_to_string(&self.records_path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No records file yet, starting empty");
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };

        let values: Vec<serde_json::Value> = match serde_json::from_str(&raw) {
            Ok(values) => values,
            Err(e) => {
                warn!(
                    path = %self.records_path.display(),
                    error = %e,
                    "Records file is unreadable, starting empty"
                );
                return Ok(Vec::new());
            }
        };

        let total = values.len();
        let records = decode_records(values);
        debug!(loaded = records.len(), total, "Loaded PM records");
        Ok(records)
    }

    fn save_records(&self, records: &[PmRecord]) -> StoreResult<()> {
        let persisted: Vec<PersistedRecord> =
            records.iter().map(PersistedRecord::from_record).collect();
        let json = serde_json::to_string_pretty(&persisted)?;
        self.write_file(&self.records_path, &json)?;
        debug!(count = records.len(), "Saved PM records");
        Ok(())
    }

    fn load_settings(&self) -> StoreResult<Option<Settings>> {
        let raw = match fs::read_to_string(&self.settings_path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        match serde_json::from_str::<PersistedSettings>(&raw) {
            Ok(persisted) => Ok(Some(persisted.into_settings())),
            Err(e) => {
                warn!(
                    path = %self.settings_path.display(),
                    error = %e,
                    "Settings file is unreadable, falling back to defaults"
                );
                Ok(None)
            }
        }
    }

    fn save_settings(&self, settings: &Settings) -> StoreResult<()> {
        let persisted = PersistedSettings::from_settings(settings);
        let json = serde_json::to_string_pretty(&persisted)?;
        self.write_file(&self.settings_path, &json)?;
        debug!(
            retention = settings.retention.as_str(),
            warning_hours = settings.warning_period_hours,
            "Saved settings"
        );
        Ok(())
    }

    fn is_healthy(&self) -> bool {
        self.data_dir.is_dir()
    }
}

impl std::fmt::Debug for JsonStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonStore")
            .field("data_dir", &self.data_dir)
            .finish()
    }
}
