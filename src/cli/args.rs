//! Command-line arguments
//!
//! Every serve flag is optional so that unset flags leave the config file (or
//! built-in default) value in place. Each flag can also be set through a
//! `REFLECTOR_*` environment variable.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

use crate::config::{Config, LogFormat, parse_duration};
use crate::models::WorkloadKind;

/// Kubernetes cluster metadata and application version reflector
#[derive(Parser, Debug)]
#[command(name = "cluster-reflector", version)]
#[command(
    about = "Kubernetes cluster metadata and application version reflector",
    long_about = "cluster-reflector serves a periodically refreshed view of your Kubernetes \
cluster, including node metadata and application versions.

It serves HTTP endpoints:
  - GET /cluster-info: cluster nodes and application versions
  - GET /healthz: health check
  - GET /metrics: Prometheus metrics (if enabled)"
)]
pub struct Cli {
    #[command(flatten)]
    pub serve: ServeArgs,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Command {
    /// Check the health endpoint of a running server and exit
    Healthcheck {
        /// Address the server listens on
        #[arg(long, env = "REFLECTOR_LISTEN", default_value = ":8080")]
        listen: String,
    },
    /// Print version information
    Version,
}

#[derive(Args, Debug, Default, PartialEq)]
pub struct ServeArgs {
    /// YAML configuration file
    #[arg(long, env = "REFLECTOR_CONFIG")]
    pub config: Option<PathBuf>,

    /// Address to listen on [default: :8080]
    #[arg(long, env = "REFLECTOR_LISTEN")]
    pub listen: Option<String>,

    /// Cache TTL for cluster data, e.g. 10s [default: 10s]
    #[arg(long, env = "REFLECTOR_CACHE_TTL", value_parser = duration_arg)]
    pub cache_ttl: Option<Duration>,

    /// Comma-separated namespaces for app discovery (empty = all namespaces)
    #[arg(long, env = "REFLECTOR_NAMESPACE_SELECTOR")]
    pub namespace_selector: Option<String>,

    /// Discover apps from AppVersion CRDs [default: true]
    #[arg(long, env = "REFLECTOR_PREFER_CRD", num_args = 0..=1, default_missing_value = "true")]
    pub prefer_crd: Option<bool>,

    /// Discover apps from workload labels and images [default: true]
    #[arg(
        long,
        env = "REFLECTOR_FALLBACK_WORKLOADS",
        num_args = 0..=1,
        default_missing_value = "true"
    )]
    pub fallback_workloads: Option<bool>,

    /// Only discover from AppVersion CRDs, ignore workloads [default: false]
    #[arg(long, env = "REFLECTOR_CRD_ONLY", num_args = 0..=1, default_missing_value = "true")]
    pub crd_only: Option<bool>,

    /// Workload kinds to discover [default: Deployment,StatefulSet]
    #[arg(long, env = "REFLECTOR_WORKLOAD_KINDS", value_delimiter = ',')]
    pub workload_kinds: Option<Vec<WorkloadKind>>,

    /// Log level (debug, info, warn, error) [default: info]
    #[arg(long, env = "REFLECTOR_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Log output format [default: json]
    #[arg(long, env = "REFLECTOR_LOG_FORMAT", value_enum)]
    pub log_format: Option<LogFormat>,

    /// Enable the Prometheus metrics endpoint [default: false]
    #[arg(long, env = "REFLECTOR_METRICS", num_args = 0..=1, default_missing_value = "true")]
    pub metrics: Option<bool>,

    /// Timeout for each Kubernetes API request [default: 10s]
    #[arg(long, env = "REFLECTOR_REQUEST_TIMEOUT", value_parser = duration_arg)]
    pub request_timeout: Option<Duration>,
}

fn duration_arg(s: &str) -> Result<Duration, String> {
    parse_duration(s).map_err(|e| e.to_string())
}

impl ServeArgs {
    /// Overlay the flags that were given onto `config`
    pub fn apply(&self, config: &mut Config) {
        if let Some(listen) = &self.listen {
            config.listen = listen.clone();
        }
        if let Some(ttl) = self.cache_ttl {
            config.cache_ttl = ttl;
        }
        if let Some(selector) = &self.namespace_selector {
            config.namespace_selector = selector.clone();
        }
        if let Some(prefer_crd) = self.prefer_crd {
            config.prefer_crd = prefer_crd;
        }
        if let Some(fallback) = self.fallback_workloads {
            config.fallback_workloads = fallback;
        }
        if let Some(crd_only) = self.crd_only {
            config.crd_only = crd_only;
        }
        if let Some(kinds) = &self.workload_kinds {
            config.workload_kinds = kinds.clone();
        }
        if let Some(level) = &self.log_level {
            config.log_level = level.clone();
        }
        if let Some(format) = self.log_format {
            config.log_format = format;
        }
        if let Some(metrics) = self.metrics {
            config.metrics_enabled = metrics;
        }
        if let Some(timeout) = self.request_timeout {
            config.request_timeout = timeout;
        }
    }
}
