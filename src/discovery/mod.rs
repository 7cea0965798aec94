//! Discovery engine
//!
//! Produces the node list and the merged app list for one refresh. Apps come
//! from two sources folded into one [`AppCatalog`], in a fixed order:
//!
//! 1. AppVersion objects, when `preferCrd` is set
//! 2. Workload labels and images, when `fallbackWorkloads` is set and
//!    `crdOnly` is not
//!
//! Both sources run whenever they are enabled; the second one is not a
//! fallback for an empty first one. Source errors are logged here and never
//! reach the caller.

mod catalog;
mod crd;
mod image;
mod namespaces;
mod nodes;
mod workloads;

pub use catalog::{AppCatalog, PrimaryVersion};
pub use crd::discover_from_crds;
pub use image::{UNTAGGED_VERSION, parse_image_reference};
pub use namespaces::resolve_scopes;
pub use nodes::{discover_nodes, internal_ip, node_role, summarize_node};
pub use workloads::{
    NAME_LABEL, UNKNOWN_VERSION, VERSION_LABEL, discover_from_workloads, extract_app,
};

use crate::config::Config;
use crate::kube::ClusterSource;
use crate::models::App;

/// Run the enabled app sources and return the merged apps
///
/// The order of the returned apps is unspecified.
pub async fn discover_apps(source: &dyn ClusterSource, config: &Config) -> Vec<App> {
    let scopes = resolve_scopes(&config.namespace_selector);
    let mut catalog = AppCatalog::new();

    if config.prefer_crd {
        if let Err(err) = discover_from_crds(source, &scopes, &mut catalog).await {
            tracing::warn!(error = %err, "CRD discovery failed, continuing with other sources");
        }
    }

    if config.workloads_enabled() {
        discover_from_workloads(source, &config.workload_kinds, &scopes, &mut catalog).await;
    } else if config.crd_only {
        tracing::debug!("CRD-only mode enabled, skipping workload discovery");
    }

    let apps = catalog.into_apps();
    tracing::debug!(apps = apps.len(), "App discovery finished");
    apps
}
