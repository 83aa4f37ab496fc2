//! Configuration validation.
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: BinderConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use crate::config::schema::BinderConfig;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("project must not be empty")]
    EmptyProject,
    #[error("project {0:?} contains whitespace")]
    ProjectWhitespace(String),
    #[error("source.poll_interval_secs must be > 0")]
    ZeroPollInterval,
    #[error("observability.metrics_address {0:?} is not a socket address")]
    InvalidMetricsAddress(String),
}

/// Check a parsed configuration for semantic errors.
pub fn validate_config(config: &BinderConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.project.is_empty() {
        errors.push(ValidationError::EmptyProject);
    } else if config.project.chars().any(char::is_whitespace) {
        errors.push(ValidationError::ProjectWhitespace(config.project.clone()));
    }

    if config.source.poll_interval_secs == 0 {
        errors.push(ValidationError::ZeroPollInterval);
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidMetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
