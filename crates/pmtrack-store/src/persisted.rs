//! Persisted wire shapes
//!
//! The on-disk layout predates this implementation and is kept intact:
//! records carry their timestamp as an ISO-8601 string under `pm_data`'s
//! sibling fields, and settings encode the warning period as a string.

use chrono::{DateTime, Local, NaiveDateTime, TimeZone};
use pmtrack_types::{PmRecord, RetentionPeriod, Settings, StageResults, Zone};
use pmtrack_util::EquipmentTag;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// One record as stored on disk
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistedRecord {
    pub user: String,
    pub zone: Zone,
    pub tag: String,
    pub description: String,
    /// ISO-8601 instant, with or without a UTC offset
    pub timestamp: String,
    pub pm_data: StageResults,
}

impl PersistedRecord {
    pub fn from_record(record: &PmRecord) -> Self {
        Self {
            user: record.user.clone(),
            zone: record.zone,
            tag: record.tag.as_str().to_string(),
            description: record.description.clone(),
            timestamp: record.timestamp.to_rfc3339(),
            pm_data: record.results.clone(),
        }
    }

    /// Convert back to a domain record. Fails only on an unparseable
    /// timestamp; callers skip such entries rather than aborting the load.
    pub fn into_record(self) -> Result<PmRecord, String> {
        let timestamp = parse_instant(&self.timestamp)
            .ok_or_else(|| format!("Unparseable timestamp '{}'", self.timestamp))?;

        Ok(PmRecord {
            user: self.user,
            zone: self.zone,
            tag: EquipmentTag::new(self.tag),
            description: self.description,
            timestamp,
            results: self.pm_data,
        })
    }
}

/// Parse an ISO-8601 instant. Accepts RFC 3339 (what we write) and the
/// offset-less form older record files carry, interpreted as local time.
fn parse_instant(s: &str) -> Option<DateTime<Local>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Local));
    }

    let naive = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f").ok()?;
    Local.from_local_datetime(&naive).single()
}

/// Convert a persisted document to domain records, skipping malformed
/// entries with a warning.
pub fn decode_records(values: Vec<serde_json::Value>) -> Vec<PmRecord> {
    let mut records = Vec::with_capacity(values.len());

    for value in values {
        let persisted: PersistedRecord = match serde_json::from_value(value) {
            Ok(p) => p,
            Err(e) => {
                warn!(error = %e, "Skipping malformed persisted record");
                continue;
            }
        };
        match persisted.into_record() {
            Ok(record) => records.push(record),
            Err(e) => warn!(error = %e, "Skipping persisted record"),
        }
    }

    records
}

/// Settings as stored on disk
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistedSettings {
    #[serde(default = "default_retention")]
    pub retention_period: String,
    /// Hours, string-encoded in the historical format
    #[serde(default = "default_warning")]
    pub warning_period: String,
}

fn default_retention() -> String {
    Settings::default().retention.as_str().to_string()
}

fn default_warning() -> String {
    Settings::default().warning_period_hours.to_string()
}

impl PersistedSettings {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            retention_period: settings.retention.as_str().to_string(),
            warning_period: settings.warning_period_hours.to_string(),
        }
    }

    /// Convert to domain settings, substituting defaults for unreadable
    /// values.
    pub fn into_settings(self) -> Settings {
        let defaults = Settings::default();

        let retention = self
            .retention_period
            .parse::<RetentionPeriod>()
            .unwrap_or_else(|e| {
                warn!(error = %e, "Ignoring persisted retention period");
                defaults.retention
            });

        let warning_period_hours = match self.warning_period.parse::<u32>() {
            Ok(hours) if hours > 0 => hours,
            _ => {
                warn!(value = %self.warning_period, "Ignoring persisted warning period");
                defaults.warning_period_hours
            }
        };

        Settings { retention, warning_period_hours }
    }
}
