//! Default paths for pmtrack
//!
//! Paths are user-writable by default (no root required):
//! - Config: `$XDG_CONFIG_HOME/pmtrack/config.toml` or `~/.config/pmtrack/config.toml`
//! - Data: `$XDG_DATA_HOME/pmtrack` or `~/.local/share/pmtrack`

use std::path::PathBuf;

/// Application subdirectory name
const APP_DIR: &str = "pmtrack";

/// Get the default config file path.
///
/// Order of precedence:
/// 1. `$XDG_CONFIG_HOME/pmtrack/config.toml` (if XDG_CONFIG_HOME is set)
/// 2. `~/.config/pmtrack/config.toml` (fallback)
pub fn default_config_path() -> PathBuf {
    if let Ok(config_home) = std::env::var("XDG_CONFIG_HOME") {
        return PathBuf::from(config_home).join(APP_DIR).join("config.toml");
    }

    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home)
            .join(".config")
            .join(APP_DIR)
            .join("config.toml");
    }

    // Last resort
    PathBuf::from("/tmp").join(APP_DIR).join("config.toml")
}

/// Get the default data directory.
///
/// Order of precedence:
/// 1. `$XDG_DATA_HOME/pmtrack` (if XDG_DATA_HOME is set)
/// 2. `~/.local/share/pmtrack` (fallback)
///
/// The `PMTRACK_DATA_DIR` override is handled at the CLI layer.
pub fn data_dir_without_env() -> PathBuf {
    if let Ok(data_home) = std::env::var("XDG_DATA_HOME") {
        return PathBuf::from(data_home).join(APP_DIR);
    }

    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home)
            .join(".local")
            .join("share")
            .join(APP_DIR);
    }

    // Last resort
    PathBuf::from("/tmp").join(APP_DIR).join("data")
}
