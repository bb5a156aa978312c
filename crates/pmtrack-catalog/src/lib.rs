//! Equipment catalog for pmtrack
//!
//! Equipment is sourced from per-zone CSV files carrying `TAG Number` and
//! `Equipment Description` columns. The catalog is read-only after startup.
//! A missing or malformed file yields an empty zone with a logged warning,
//! never a startup failure.

use pmtrack_config::CatalogConfig;
use pmtrack_types::{Equipment, Zone};
use pmtrack_util::EquipmentTag;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, warn};

const TAG_COLUMN: &str = "TAG Number";
const DESCRIPTION_COLUMN: &str = "Equipment Description";

/// Catalog loading errors. Surfaced by [`load_zone_csv`]; [`Catalog::load`]
/// recovers them by leaving the zone empty.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to read catalog file: {0}")]
    Read(#[from] csv::Error),

    #[error("Missing column '{column}' in {path}")]
    MissingColumn { column: &'static str, path: String },
}

/// The per-zone equipment catalog
#[derive(Debug, Default)]
pub struct Catalog {
    by_zone: HashMap<Zone, Vec<Equipment>>,
}

impl Catalog {
    /// Load all configured zone files. Zones without a configured file, or
    /// whose file cannot be read, start empty.
    pub fn load(config: &CatalogConfig) -> Self {
        let mut by_zone = HashMap::new();

        for zone in Zone::ALL {
            let equipment = match config.path_for(zone) {
                Some(path) => match load_zone_csv(path, zone) {
                    Ok(equipment) => {
                        debug!(zone = %zone, count = equipment.len(), "Catalog zone loaded");
                        equipment
                    }
                    Err(e) => {
                        warn!(zone = %zone, path = %path.display(), error = %e,
                              "Failed to load catalog file, zone starts empty");
                        Vec::new()
                    }
                },
                None => {
                    warn!(zone = %zone, "No catalog file configured, zone starts empty");
                    Vec::new()
                }
            };
            by_zone.insert(zone, equipment);
        }

        Self { by_zone }
    }

    /// Build a catalog directly from equipment lists (used by tests and fixtures)
    pub fn from_zones(zones: impl IntoIterator<Item = (Zone, Vec<Equipment>)>) -> Self {
        let mut by_zone: HashMap<Zone, Vec<Equipment>> = zones.into_iter().collect();
        for zone in Zone::ALL {
            by_zone.entry(zone).or_default();
        }
        Self { by_zone }
    }

    /// Equipment in a zone, in catalog file order
    pub fn list(&self, zone: Zone) -> &[Equipment] {
        self.by_zone.get(&zone).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of equipment entries in a zone
    pub fn count(&self, zone: Zone) -> usize {
        self.list(zone).len()
    }

    /// Look up equipment by tag within a zone. Tag comparison is
    /// case-insensitive.
    pub fn find(&self, zone: Zone, tag: &EquipmentTag) -> Option<&Equipment> {
        self.list(zone).iter().find(|eq| &eq.tag == tag)
    }
}

/// Read one zone's CSV file into equipment entries.
///
/// Rows with an empty tag are skipped with a warning rather than failing
/// the whole file.
pub fn load_zone_csv(path: impl AsRef<Path>, zone: Zone) -> Result<Vec<Equipment>, CatalogError> {
    let path = path.as_ref();
    let mut reader = csv::Reader::from_path(path)?;

    let headers = reader.headers()?.clone();
    let tag_idx = headers
        .iter()
        .position(|h| h == TAG_COLUMN)
        .ok_or_else(|| CatalogError::MissingColumn {
            column: TAG_COLUMN,
            path: path.display().to_string(),
        })?;
    let desc_idx = headers
        .iter()
        .position(|h| h == DESCRIPTION_COLUMN)
        .ok_or_else(|| CatalogError::MissingColumn {
            column: DESCRIPTION_COLUMN,
            path: path.display().to_string(),
        })?;

    let mut equipment = Vec::new();
    for result in reader.records() {
        let record = result?;
        let tag = record.get(tag_idx).unwrap_or("").trim();
        let description = record.get(desc_idx).unwrap_or("").trim();

        if tag.is_empty() {
            warn!(path = %path.display(), "Skipping catalog row with empty tag");
            continue;
        }

        equipment.push(Equipment {
            tag: EquipmentTag::new(tag),
            description: description.to_string(),
            zone,
        });
    }

    Ok(equipment)
}
