//! Cluster Reflector Library
//!
//! Discovers node metadata and application versions from a Kubernetes
//! cluster, keeps a periodically refreshed snapshot of them, and serves that
//! snapshot over HTTP. The binary is a thin wrapper around [`cli`].

pub mod cli;
pub mod config;
pub mod discovery;
pub mod kube;
pub mod models;
pub mod server;
pub mod services;
pub mod telemetry;

// Re-export commonly used types for convenience
pub use config::{Config, ConfigError, ConfigLoader, LogFormat};
pub use discovery::{discover_apps, discover_nodes, parse_image_reference};
pub use kube::{ClusterSource, KubeClusterSource, Scope, SourceError, WorkloadRecord};
pub use models::{App, Node, NodeRole, SCHEMA_VERSION, Snapshot, WorkloadKind};
pub use services::{HealthError, RefreshError, Reflector, SnapshotCache};
