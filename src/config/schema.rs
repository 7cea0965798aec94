//! Configuration schema definitions
//!
//! Defines the service configuration using serde so the same structure can be
//! read from a YAML file and overridden from the command line.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::duration::serde_duration;
use crate::models::WorkloadKind;

/// Configuration errors that prevent the service from starting
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("CRD-only mode requires preferCrd to be true")]
    CrdOnlyWithoutCrd,

    #[error("cacheTtl must be greater than zero")]
    ZeroCacheTtl,

    #[error("requestTimeout must be greater than zero")]
    ZeroRequestTimeout,
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    Text,
}

/// Root configuration structure
///
/// Immutable once the service has started.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Address the HTTP server binds to (":8080" binds all interfaces)
    #[serde(default = "default_listen")]
    pub listen: String,

    /// How long a snapshot is served before it is considered expired
    #[serde(default = "default_cache_ttl", with = "serde_duration")]
    pub cache_ttl: Duration,

    /// Comma-separated namespace names, empty for all namespaces
    ///
    /// Despite the name this is a literal list, not a label selector.
    #[serde(default)]
    pub namespace_selector: String,

    /// Discover apps from AppVersion objects
    #[serde(default = "default_true")]
    pub prefer_crd: bool,

    /// Discover apps from workload labels and images
    #[serde(default = "default_true")]
    pub fallback_workloads: bool,

    /// Ignore workloads entirely
    #[serde(default)]
    pub crd_only: bool,

    /// Workload kinds to scan, in order
    #[serde(default = "WorkloadKind::defaults")]
    pub workload_kinds: Vec<WorkloadKind>,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default = "default_log_format")]
    pub log_format: LogFormat,

    /// Serve `/metrics`
    #[serde(default)]
    pub metrics_enabled: bool,

    /// Upper bound for each individual cluster API call
    #[serde(default = "default_request_timeout", with = "serde_duration")]
    pub request_timeout: Duration,
}

// Default value functions
fn default_listen() -> String {
    ":8080".to_string()
}

fn default_cache_ttl() -> Duration {
    Duration::from_secs(10)
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> LogFormat {
    LogFormat::Json
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(10)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            cache_ttl: default_cache_ttl(),
            namespace_selector: String::new(),
            prefer_crd: default_true(),
            fallback_workloads: default_true(),
            crd_only: false,
            workload_kinds: WorkloadKind::defaults(),
            log_level: default_log_level(),
            log_format: default_log_format(),
            metrics_enabled: false,
            request_timeout: default_request_timeout(),
        }
    }
}

impl Config {
    /// Check invariants that must hold before discovery starts
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.crd_only && !self.prefer_crd {
            return Err(ConfigError::CrdOnlyWithoutCrd);
        }
        if self.cache_ttl.is_zero() {
            return Err(ConfigError::ZeroCacheTtl);
        }
        if self.request_timeout.is_zero() {
            return Err(ConfigError::ZeroRequestTimeout);
        }
        Ok(())
    }

    /// Log combinations that are legal but probably unintended
    pub fn warn_unusual(&self) {
        if self.crd_only && self.fallback_workloads {
            tracing::warn!(
                "CRD-only mode enabled but fallbackWorkloads is true - workloads will be ignored"
            );
        }
        if !self.prefer_crd && !self.fallback_workloads {
            tracing::warn!(
                "Both CRD and workload discovery are disabled - no apps will be reported"
            );
        }
        if self.workloads_enabled() && self.workload_kinds.is_empty() {
            tracing::warn!("Workload discovery enabled with an empty workloadKinds list");
        }
    }

    /// Whether the workload source runs during a refresh
    pub fn workloads_enabled(&self) -> bool {
        self.fallback_workloads && !self.crd_only
    }

    /// Period of the background refresh timer
    pub fn refresh_interval(&self) -> Duration {
        self.cache_ttl / 2
    }
}
