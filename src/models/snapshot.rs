//! Snapshot payload types
//!
//! These types define the JSON document served at `/cluster-info`. Field
//! names are part of the public wire format and must not change.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Schema identifier stamped on every snapshot
pub const SCHEMA_VERSION: &str = "reflector.grid.sce.com/v1";

/// Role a node plays in the cluster
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NodeRole {
    ControlPlane,
    Worker,
}

impl NodeRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeRole::ControlPlane => "control-plane",
            NodeRole::Worker => "worker",
        }
    }
}

/// A cluster node as reported in a snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub name: String,
    /// First `InternalIP` address, empty when the node reports none
    #[serde(rename = "ip")]
    pub internal_ip: String,
    pub role: NodeRole,
    /// Kubelet version
    #[serde(rename = "version")]
    pub kubelet_version: String,
}

/// An application and every version observed for it during one refresh
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct App {
    pub name: String,
    #[serde(rename = "version")]
    pub primary_version: String,
    /// Distinct versions in first-seen order
    pub variants: Vec<String>,
}

/// One immutable, fully-formed cluster-info payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub api_version: String,
    #[serde(rename = "timestamp")]
    pub generated_at: DateTime<Utc>,
    pub nodes: Vec<Node>,
    /// Order is not stable across refreshes
    pub apps: Vec<App>,
}

impl Snapshot {
    pub fn new(nodes: Vec<Node>, apps: Vec<App>) -> Self {
        Self {
            api_version: SCHEMA_VERSION.to_string(),
            generated_at: Utc::now(),
            nodes,
            apps,
        }
    }

    /// Empty snapshot served while the cache holds nothing usable
    pub fn placeholder() -> Self {
        Self::new(Vec::new(), Vec::new())
    }

    /// Copy of this snapshot stamped with the current time
    pub fn freshened(&self) -> Self {
        Self {
            generated_at: Utc::now(),
            ..self.clone()
        }
    }

    pub fn control_plane_count(&self) -> usize {
        self.nodes
            .iter()
            .filter(|node| node.role == NodeRole::ControlPlane)
            .count()
    }

    pub fn worker_count(&self) -> usize {
        self.nodes
            .iter()
            .filter(|node| node.role == NodeRole::Worker)
            .count()
    }
}
