//! Validated application configuration

use crate::schema::RawConfig;
use pmtrack_types::{RetentionPeriod, Settings, Zone};
use pmtrack_util::data_dir_without_env;
use std::path::PathBuf;

/// Validated configuration ready for use at startup
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub site: SiteConfig,
    /// Operator accounts shown on the login screen
    pub operators: Vec<String>,
    pub catalog: CatalogConfig,
    pub report: ReportConfig,
    /// Defaults applied when no persisted settings exist yet
    pub settings_defaults: Settings,
}

impl AppConfig {
    /// Convert from raw config (after validation)
    pub fn from_raw(raw: RawConfig) -> Self {
        let data_dir = raw.site.data_dir.unwrap_or_else(data_dir_without_env);

        let report_output_dir = raw.report.output_dir.unwrap_or_else(|| data_dir.clone());

        let defaults = Settings::default();
        let settings_defaults = Settings {
            retention: raw
                .settings
                .retention_period
                .as_deref()
                .and_then(|p| p.parse::<RetentionPeriod>().ok())
                .unwrap_or(defaults.retention),
            warning_period_hours: raw
                .settings
                .warning_period_hours
                .unwrap_or(defaults.warning_period_hours),
        };

        Self {
            site: SiteConfig {
                data_dir,
                admin_password: raw.site.admin_password.unwrap_or_default(),
            },
            operators: raw.site.operators.unwrap_or_else(default_operators),
            catalog: CatalogConfig {
                hlp: raw.catalog.hlp,
                screen: raw.catalog.screen,
                compaction: raw.catalog.compaction,
            },
            report: ReportConfig {
                output_dir: report_output_dir,
                email: raw.report.email,
            },
            settings_defaults,
        }
    }
}

/// Site-level configuration
#[derive(Debug, Clone)]
pub struct SiteConfig {
    pub data_dir: PathBuf,
    /// Empty string disables admin login entirely
    pub admin_password: String,
}

/// Catalog CSV locations
#[derive(Debug, Clone, Default)]
pub struct CatalogConfig {
    pub hlp: Option<PathBuf>,
    pub screen: Option<PathBuf>,
    pub compaction: Option<PathBuf>,
}

impl CatalogConfig {
    /// The configured CSV path for a zone, if any
    pub fn path_for(&self, zone: Zone) -> Option<&PathBuf> {
        match zone {
            Zone::Hlp => self.hlp.as_ref(),
            Zone::Screen => self.screen.as_ref(),
            Zone::Compaction => self.compaction.as_ref(),
        }
    }
}

/// Report export configuration
#[derive(Debug, Clone)]
pub struct ReportConfig {
    pub output_dir: PathBuf,
    pub email: Option<String>,
}

fn default_operators() -> Vec<String> {
    // Historical fixed operator accounts
    vec!["User1".into(), "User2".into(), "User3".into(), "User4".into()]
}
