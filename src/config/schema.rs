//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from the binder's
//! own TOML settings file. This is local process configuration, separate
//! from the remote values the binder serves.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Root configuration for the binder process.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BinderConfig {
    /// Project prefix combined with every short namespace.
    pub project: String,

    /// Local configuration source settings.
    pub source: SourceConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl Default for BinderConfig {
    fn default() -> Self {
        Self {
            project: "app".to_string(),
            source: SourceConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

/// Directory-backed source configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Directory holding one `<namespace>.toml` per namespace.
    pub dir: PathBuf,

    /// Watch the directory and push changes to bound fields.
    pub watch: bool,

    /// Poll interval for watchers that fall back to polling, in seconds.
    pub poll_interval_secs: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("config"),
            watch: true,
            poll_interval_secs: 2,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}
