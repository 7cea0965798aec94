//! Data model
//!
//! Structure:
//! - `snapshot.rs` - Snapshot payload served over HTTP
//! - `app_version.rs` - AppVersion custom resource fields
//! - `workload_kind.rs` - Workload kinds scanned for app metadata

pub mod app_version;
pub mod snapshot;
pub mod workload_kind;

pub use app_version::{AppVersionSpec, app_version_resource};
pub use snapshot::{App, Node, NodeRole, SCHEMA_VERSION, Snapshot};
pub use workload_kind::WorkloadKind;
