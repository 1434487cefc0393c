//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check endpoint URLs parse
//! - Validate value ranges (timeouts > 0)
//! - Detect duplicate widget identifiers
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: DashboardConfig → Result<(), Vec<ValidationError>>

use std::collections::HashSet;

use thiserror::Error;

use crate::config::schema::DashboardConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid URL for {field} '{value}': {reason}")]
    InvalidUrl {
        field: &'static str,
        value: String,
        reason: String,
    },

    #[error("{0} must be greater than zero")]
    ZeroValue(&'static str),

    #[error("widget id must not be empty")]
    EmptyWidgetId,

    #[error("duplicate widget id '{0}'")]
    DuplicateWidgetId(String),
}

/// Validate a parsed configuration.
pub fn validate_config(config: &DashboardConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    for (field, value) in [
        ("api.base_url", &config.api.base_url),
        ("api.rpc_address", &config.api.rpc_address),
    ] {
        if let Err(e) = url::Url::parse(value) {
            errors.push(ValidationError::InvalidUrl {
                field,
                value: value.clone(),
                reason: e.to_string(),
            });
        }
    }

    if config.api.request_timeout_secs == 0 {
        errors.push(ValidationError::ZeroValue("api.request_timeout_secs"));
    }

    let mut seen = HashSet::new();
    for widget in &config.widgets {
        if widget.id.trim().is_empty() {
            errors.push(ValidationError::EmptyWidgetId);
        } else if !seen.insert(widget.id.as_str()) {
            errors.push(ValidationError::DuplicateWidgetId(widget.id.clone()));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
