//! Workload kind definitions
//!
//! Centralizes the workload kinds scanned for application metadata so that
//! configuration parsing, logging and the Kubernetes API layer agree on one
//! spelling for each kind.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Workload kinds whose pod templates can be scanned for app versions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum WorkloadKind {
    Deployment,
    StatefulSet,
    DaemonSet,
}

impl WorkloadKind {
    /// Get the kind name as it appears in Kubernetes manifests
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkloadKind::Deployment => "Deployment",
            WorkloadKind::StatefulSet => "StatefulSet",
            WorkloadKind::DaemonSet => "DaemonSet",
        }
    }

    /// Kinds scanned when none are configured
    pub fn defaults() -> Vec<Self> {
        vec![WorkloadKind::Deployment, WorkloadKind::StatefulSet]
    }
}

impl fmt::Display for WorkloadKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<WorkloadKind> for String {
    fn from(kind: WorkloadKind) -> Self {
        kind.as_str().to_string()
    }
}

impl TryFrom<String> for WorkloadKind {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl FromStr for WorkloadKind {
    type Err = String;

    /// Case-insensitive, also accepting the plural and short forms kubectl understands
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "deployment" | "deployments" | "deploy" => Ok(WorkloadKind::Deployment),
            "statefulset" | "statefulsets" | "sts" => Ok(WorkloadKind::StatefulSet),
            "daemonset" | "daemonsets" | "ds" => Ok(WorkloadKind::DaemonSet),
            _ => Err(format!("Unknown workload kind: {}", s)),
        }
    }
}
