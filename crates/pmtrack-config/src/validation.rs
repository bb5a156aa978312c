//! Configuration validation

use crate::schema::RawConfig;
use std::collections::HashSet;
use thiserror::Error;

/// Validation error
#[derive(Debug, Clone, Error)]
pub enum ValidationError {
    #[error("Operator name cannot be empty")]
    EmptyOperatorName,

    #[error("Duplicate operator: {0}")]
    DuplicateOperator(String),

    #[error("Operator name is reserved: {0}")]
    ReservedOperatorName(String),

    #[error("Admin password cannot be empty")]
    EmptyAdminPassword,

    #[error("Invalid retention period '{0}': expected hourly, daily, weekly, or monthly")]
    InvalidRetentionPeriod(String),

    #[error("Warning period must be a positive number of hours")]
    NonPositiveWarningPeriod,

    #[error("Invalid report email: {0}")]
    InvalidReportEmail(String),
}

/// Validate a raw configuration
pub fn validate_config(config: &RawConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if let Some(operators) = &config.site.operators {
        let mut seen = HashSet::new();
        for name in operators {
            if name.trim().is_empty() {
                errors.push(ValidationError::EmptyOperatorName);
            } else if name.eq_ignore_ascii_case("admin") {
                // "Admin" is the identity the admin login uses
                errors.push(ValidationError::ReservedOperatorName(name.clone()));
            } else if !seen.insert(name.as_str()) {
                errors.push(ValidationError::DuplicateOperator(name.clone()));
            }
        }
    }

    if let Some(password) = &config.site.admin_password {
        if password.is_empty() {
            errors.push(ValidationError::EmptyAdminPassword);
        }
    }

    if let Some(period) = &config.settings.retention_period {
        if period.parse::<pmtrack_types::RetentionPeriod>().is_err() {
            errors.push(ValidationError::InvalidRetentionPeriod(period.clone()));
        }
    }

    if config.settings.warning_period_hours == Some(0) {
        errors.push(ValidationError::NonPositiveWarningPeriod);
    }

    if let Some(email) = &config.report.email {
        if !email.contains('@') {
            errors.push(ValidationError::InvalidReportEmail(email.clone()));
        }
    }

    errors
}
