//! Kubernetes access layer
//!
//! Discovery never talks to `kube::Api` directly. It goes through the
//! [`ClusterSource`] trait so refresh logic can be exercised against fakes,
//! and so every call can be bounded by a timeout in one place.

mod source;

pub use source::KubeClusterSource;

use anyhow::{Context, Result};
use async_trait::async_trait;
use k8s_openapi::api::core::v1::Node;
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use crate::models::WorkloadKind;

/// Initialize and return a Kubernetes client
///
/// Uses the default kubeconfig loading strategy:
/// 1. In-cluster config (if running in a pod)
/// 2. KUBECONFIG environment variable
/// 3. ~/.kube/config
pub async fn create_client() -> Result<kube::Client> {
    let config = kube::Config::infer()
        .await
        .context("Failed to infer Kubernetes configuration")?;
    tracing::debug!(cluster_url = %config.cluster_url, "Using Kubernetes API server");

    let client = kube::Client::try_from(config).context("Failed to create Kubernetes client")?;
    Ok(client)
}

/// Namespace scope of a list call
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Scope {
    /// One call across every namespace
    All,
    Namespace(String),
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::All => write!(f, "<all>"),
            Scope::Namespace(ns) => write!(f, "{}", ns),
        }
    }
}

/// The parts of a workload object that carry app identity
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkloadRecord {
    pub name: String,
    pub namespace: String,
    /// Labels on the workload object itself
    pub labels: BTreeMap<String, String>,
    /// Container images of the pod template, in declaration order
    pub images: Vec<String>,
}

/// Errors from a single cluster API call
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("Kubernetes API request failed: {0}")]
    Api(#[from] kube::Error),

    #[error("{operation} timed out after {timeout:?}")]
    Timeout {
        operation: &'static str,
        timeout: Duration,
    },
}

/// Read-only access to the cluster collections discovery consumes
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ClusterSource: Send + Sync {
    /// List every node in the cluster
    async fn list_nodes(&self) -> Result<Vec<Node>, SourceError>;

    /// List raw AppVersion objects
    async fn list_app_versions(&self, scope: Scope) -> Result<Vec<serde_json::Value>, SourceError>;

    /// List workloads of one kind
    async fn list_workloads(
        &self,
        kind: WorkloadKind,
        scope: Scope,
    ) -> Result<Vec<WorkloadRecord>, SourceError>;

    /// Minimal connectivity check
    async fn probe(&self) -> Result<(), SourceError>;
}
