//! Prometheus metrics
//!
//! Snapshot counts are published as gauges through the `metrics` facade. The
//! process-wide recorder is installed once, and only when the metrics
//! endpoint is enabled; until then the gauge updates are no-ops.

use std::sync::OnceLock;

use anyhow::Result;
use metrics::{describe_gauge, gauge};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

use crate::models::Snapshot;

pub const NODES_TOTAL: &str = "cluster_reflector_nodes_total";
pub const APPS_TOTAL: &str = "cluster_reflector_apps_total";
pub const CONTROL_PLANE_NODES: &str = "cluster_reflector_control_plane_nodes";
pub const WORKER_NODES: &str = "cluster_reflector_worker_nodes";

static METRICS_HANDLE: OnceLock<Result<PrometheusHandle, String>> = OnceLock::new();

/// Install the global Prometheus recorder, or return the one already installed
pub fn init_metrics_recorder() -> Result<PrometheusHandle> {
    let installed = METRICS_HANDLE.get_or_init(|| {
        let handle = PrometheusBuilder::new()
            .install_recorder()
            .map_err(|e| e.to_string())?;
        describe_snapshot_gauges();
        Ok(handle)
    });

    installed
        .clone()
        .map_err(|e| anyhow::anyhow!("Failed to install metrics recorder: {}", e))
}

fn describe_snapshot_gauges() {
    describe_gauge!(NODES_TOTAL, "Total number of nodes in the cluster");
    describe_gauge!(APPS_TOTAL, "Total number of discovered applications");
    describe_gauge!(CONTROL_PLANE_NODES, "Total number of control plane nodes");
    describe_gauge!(WORKER_NODES, "Total number of worker nodes");
}

/// Publish the counts of `snapshot`
pub fn record_snapshot(snapshot: &Snapshot) {
    gauge!(NODES_TOTAL).set(snapshot.nodes.len() as f64);
    gauge!(APPS_TOTAL).set(snapshot.apps.len() as f64);
    gauge!(CONTROL_PLANE_NODES).set(snapshot.control_plane_count() as f64);
    gauge!(WORKER_NODES).set(snapshot.worker_count() as f64);
}
