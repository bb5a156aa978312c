//! Factory zones

use pmtrack_util::EquipmentTag;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A physical area of the site grouping equipment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Zone {
    #[serde(rename = "HLP")]
    Hlp,
    #[serde(rename = "SCREEN")]
    Screen,
    #[serde(rename = "COMPACTION")]
    Compaction,
}

impl Zone {
    pub const ALL: [Zone; 3] = [Zone::Hlp, Zone::Screen, Zone::Compaction];

    pub fn as_str(&self) -> &'static str {
        match self {
            Zone::Hlp => "HLP",
            Zone::Screen => "SCREEN",
            Zone::Compaction => "COMPACTION",
        }
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Zone {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "HLP" => Ok(Zone::Hlp),
            "SCREEN" => Ok(Zone::Screen),
            "COMPACTION" => Ok(Zone::Compaction),
            other => Err(format!("Unknown zone: {}", other)),
        }
    }
}

/// A piece of equipment as supplied by the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Equipment {
    pub tag: EquipmentTag,
    pub description: String,
    pub zone: Zone,
}
