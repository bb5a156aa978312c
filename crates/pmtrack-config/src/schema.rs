//! Raw configuration schema (as parsed from TOML)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Raw configuration as parsed from TOML
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RawConfig {
    /// Config schema version
    pub config_version: u32,

    /// Site-level settings
    #[serde(default)]
    pub site: RawSiteConfig,

    /// Equipment catalog file paths
    #[serde(default)]
    pub catalog: RawCatalogConfig,

    /// Report export settings
    #[serde(default)]
    pub report: RawReportConfig,

    /// Defaults for the mutable policy settings
    #[serde(default)]
    pub settings: RawSettingsConfig,
}

/// Site-level settings
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawSiteConfig {
    /// Data directory for persisted records and settings
    pub data_dir: Option<PathBuf>,

    /// Password required for admin login
    pub admin_password: Option<String>,

    /// Operator accounts shown on the login screen
    pub operators: Option<Vec<String>>,
}

/// Catalog CSV locations, one file per zone.
///
/// Files carry `TAG Number` and `Equipment Description` columns. A missing
/// entry means the zone has no catalog file and starts empty.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawCatalogConfig {
    pub hlp: Option<PathBuf>,
    pub screen: Option<PathBuf>,
    pub compaction: Option<PathBuf>,
}

/// Report export settings
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawReportConfig {
    /// Directory reports are written to (default: data dir)
    pub output_dir: Option<PathBuf>,

    /// Address the weekly report is (simulated) emailed to
    pub email: Option<String>,
}

/// Defaults for the mutable policy settings
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawSettingsConfig {
    /// "hourly", "daily", "weekly", or "monthly"
    pub retention_period: Option<String>,

    /// Repeat-warning window in hours
    pub warning_period_hours: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_full_config() {
        let toml_str = r#"
            config_version = 1

            [site]
            data_dir = "/var/lib/pmtrack"
            admin_password = "Karak@2025"
            operators = ["User1", "User2"]

            [catalog]
            hlp = "HLP.csv"
            screen = "SCREEN.csv"
            compaction = "COMPACTION.csv"

            [report]
            email = "maintenance@example.com"

            [settings]
            retention_period = "weekly"
            warning_period_hours = 24
        "#;

        let config: RawConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.config_version, 1);
        assert_eq!(config.site.operators.as_ref().unwrap().len(), 2);
        assert_eq!(config.catalog.hlp, Some(PathBuf::from("HLP.csv")));
        assert_eq!(config.settings.warning_period_hours, Some(24));
    }

    #[test]
    fn sections_are_optional() {
        let config: RawConfig = toml::from_str("config_version = 1").unwrap();
        assert!(config.site.admin_password.is_none());
        assert!(config.catalog.hlp.is_none());
    }
}
