//! Refresh loop and read surface
//!
//! `Reflector` owns the snapshot cache. One background task drives
//! [`Reflector::start`], which refreshes immediately and then every half TTL;
//! any number of request handlers call [`Reflector::snapshot`] and
//! [`Reflector::health_check`] concurrently. Discovery runs without holding
//! the cache lock, only the final install takes the write lock.

use std::sync::Arc;
use std::time::Duration;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use super::cache::SnapshotCache;
use crate::config::{Config, ConfigError};
use crate::discovery::{discover_apps, discover_nodes};
use crate::kube::{ClusterSource, SourceError};
use crate::models::Snapshot;
use crate::telemetry;

/// Cache age, in TTLs, beyond which the service reports itself unhealthy
const STALE_TTL_MULTIPLE: u32 = 2;

/// A refresh cycle that produced nothing to install
#[derive(Debug, thiserror::Error)]
pub enum RefreshError {
    #[error("failed to discover nodes: {0}")]
    Nodes(#[source] SourceError),
}

/// Why the service is unhealthy
#[derive(Debug, thiserror::Error)]
pub enum HealthError {
    #[error("failed to connect to Kubernetes API: {0}")]
    Connectivity(String),

    #[error("cache is stale (age: {})", format_age(.age))]
    Stale { age: Option<Duration> },
}

impl HealthError {
    /// Machine-readable reason reported to HTTP clients
    pub fn reason(&self) -> &'static str {
        match self {
            HealthError::Connectivity(_) => "connectivity",
            HealthError::Stale { .. } => "stale",
        }
    }
}

fn format_age(age: &Option<Duration>) -> String {
    match age {
        Some(age) => format!("{:.1}s", age.as_secs_f64()),
        None => "never refreshed".to_string(),
    }
}

/// Discovery service: refresh loop plus snapshot and health queries
pub struct Reflector {
    config: Config,
    source: Arc<dyn ClusterSource>,
    cache: SnapshotCache,
    stop: CancellationToken,
}

impl Reflector {
    /// Build a reflector, rejecting invalid configuration
    pub fn new(config: Config, source: Arc<dyn ClusterSource>) -> Result<Self, ConfigError> {
        config.validate()?;
        config.warn_unusual();
        let cache = SnapshotCache::new(config.cache_ttl);
        Ok(Self {
            config,
            source,
            cache,
            stop: CancellationToken::new(),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run one discovery cycle and install the result
    ///
    /// Node discovery failure aborts the cycle and leaves the cache untouched.
    /// App source failures are logged inside discovery and never fail the cycle.
    pub async fn refresh(&self) -> Result<(), RefreshError> {
        tracing::debug!("Refreshing cache");

        let nodes = discover_nodes(self.source.as_ref())
            .await
            .map_err(RefreshError::Nodes)?;
        let apps = discover_apps(self.source.as_ref(), &self.config).await;

        let (node_count, app_count) = (nodes.len(), apps.len());
        let snapshot = Snapshot::new(nodes, apps);
        telemetry::record_snapshot(&snapshot);
        self.cache.install(snapshot).await;

        tracing::debug!(nodes = node_count, apps = app_count, "Cache refreshed");
        Ok(())
    }

    /// Refresh once, then keep refreshing every half TTL until cancelled
    ///
    /// A failed initial refresh is returned, since serving an empty cache
    /// would hide the problem. Later failures are logged and the previous
    /// snapshot stays in place. Cancellation is checked between cycles; an
    /// in-flight cycle is bounded by the per-request timeout.
    pub async fn start(&self, cancel: CancellationToken) -> Result<(), RefreshError> {
        if cancel.is_cancelled() || self.stop.is_cancelled() {
            tracing::info!("Discovery stopped before start");
            return Ok(());
        }

        tracing::info!(
            prefer_crd = self.config.prefer_crd,
            fallback_workloads = self.config.fallback_workloads,
            crd_only = self.config.crd_only,
            namespace_selector = %self.config.namespace_selector,
            workload_kinds = ?self.config.workload_kinds,
            "Starting cluster discovery"
        );

        self.refresh().await?;

        let period = self.config.refresh_interval();
        let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    tracing::info!("Stopping cluster discovery");
                    return Ok(());
                }
                _ = self.stop.cancelled() => {
                    tracing::info!("Discovery stopped");
                    return Ok(());
                }
                _ = ticker.tick() => {
                    if let Err(err) = self.refresh().await {
                        tracing::error!(error = %err, "Failed to refresh cache");
                    }
                }
            }
        }
    }

    /// Ask the refresh loop to exit; idempotent
    pub fn stop(&self) {
        self.stop.cancel();
    }

    /// Current snapshot with a fresh timestamp
    ///
    /// Never fails: an empty or expired cache yields an empty placeholder.
    pub async fn snapshot(&self) -> Snapshot {
        match self.cache.current().await {
            Some(snapshot) => snapshot.freshened(),
            None => {
                tracing::warn!("Cache is expired or empty");
                Snapshot::placeholder()
            }
        }
    }

    /// Check API connectivity and cache freshness
    ///
    /// The connectivity probe is bounded by `timeout`. The cache is stale
    /// once it is older than twice the TTL, or if it was never filled.
    pub async fn health_check(&self, timeout: Duration) -> Result<(), HealthError> {
        match tokio::time::timeout(timeout, self.source.probe()).await {
            Ok(Ok(())) => {}
            Ok(Err(err)) => return Err(HealthError::Connectivity(err.to_string())),
            Err(_) => {
                return Err(HealthError::Connectivity(format!(
                    "probe timed out after {:?}",
                    timeout
                )));
            }
        }

        if self.cache.is_stale(STALE_TTL_MULTIPLE).await {
            return Err(HealthError::Stale {
                age: self.cache.age().await,
            });
        }

        Ok(())
    }
}
