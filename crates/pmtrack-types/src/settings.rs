//! Policy settings

use serde::{Deserialize, Serialize};
use std::fmt;

/// How often the record log resets.
///
/// All four periods can be chosen and persisted, but only `Weekly` is
/// enforced by the retention policy; the others are a known-incomplete
/// feature kept for forward compatibility with the historical settings
/// format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RetentionPeriod {
    Hourly,
    Daily,
    Weekly,
    Monthly,
}

impl RetentionPeriod {
    pub fn as_str(&self) -> &'static str {
        match self {
            RetentionPeriod::Hourly => "hourly",
            RetentionPeriod::Daily => "daily",
            RetentionPeriod::Weekly => "weekly",
            RetentionPeriod::Monthly => "monthly",
        }
    }
}

impl fmt::Display for RetentionPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RetentionPeriod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "hourly" => Ok(RetentionPeriod::Hourly),
            "daily" => Ok(RetentionPeriod::Daily),
            "weekly" => Ok(RetentionPeriod::Weekly),
            "monthly" => Ok(RetentionPeriod::Monthly),
            other => Err(format!("Unknown retention period: {}", other)),
        }
    }
}

/// Process-wide policy settings.
///
/// Loaded once at startup (falling back to defaults when absent) and
/// persisted after every mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    pub retention: RetentionPeriod,
    /// Repeat-warning window in hours. Always positive.
    pub warning_period_hours: u32,
}

impl Settings {
    /// The repeat-warning window as a duration
    pub fn warning_window(&self) -> chrono::Duration {
        chrono::Duration::hours(self.warning_period_hours as i64)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            retention: RetentionPeriod::Weekly,
            warning_period_hours: 24,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_weekly_24h() {
        let settings = Settings::default();
        assert_eq!(settings.retention, RetentionPeriod::Weekly);
        assert_eq!(settings.warning_period_hours, 24);
        assert_eq!(settings.warning_window(), chrono::Duration::hours(24));
    }

    #[test]
    fn retention_period_roundtrips() {
        for period in [
            RetentionPeriod::Hourly,
            RetentionPeriod::Daily,
            RetentionPeriod::Weekly,
            RetentionPeriod::Monthly,
        ] {
            assert_eq!(period.as_str().parse::<RetentionPeriod>().unwrap(), period);
        }
        assert!("fortnightly".parse::<RetentionPeriod>().is_err());
    }
}
