//! App discovery from workload metadata
//!
//! A workload is identified by its `app.kubernetes.io/name` and
//! `app.kubernetes.io/version` labels. Unlabelled workloads fall back to the
//! first container's image reference.

use super::catalog::{AppCatalog, PrimaryVersion};
use super::image::parse_image_reference;
use crate::kube::{ClusterSource, Scope, WorkloadRecord};
use crate::models::WorkloadKind;

pub const NAME_LABEL: &str = "app.kubernetes.io/name";
pub const VERSION_LABEL: &str = "app.kubernetes.io/version";
pub const UNKNOWN_VERSION: &str = "unknown";

/// Fold workloads of every configured kind and scope into the catalog
///
/// A listing failure for one kind in one scope is logged and skipped.
/// Workloads never replace the primary version of an app that is already in
/// the catalog; they only contribute new variants.
pub async fn discover_from_workloads(
    source: &dyn ClusterSource,
    kinds: &[WorkloadKind],
    scopes: &[Scope],
    catalog: &mut AppCatalog,
) {
    for &kind in kinds {
        for scope in scopes {
            let records = match source.list_workloads(kind, scope.clone()).await {
                Ok(records) => records,
                Err(err) => {
                    tracing::warn!(
                        kind = %kind,
                        namespace = %scope,
                        error = %err,
                        "Failed to list workloads"
                    );
                    continue;
                }
            };

            let mut folded = 0usize;
            for record in &records {
                if let Some((name, version)) = extract_app(record) {
                    catalog.fold(&name, &version, PrimaryVersion::Keep);
                    folded += 1;
                }
            }

            tracing::debug!(
                kind = %kind,
                namespace = %scope,
                listed = records.len(),
                folded,
                "Processed workloads"
            );
        }
    }
}

/// App name and version for one workload, or `None` if it has no usable name
pub fn extract_app(record: &WorkloadRecord) -> Option<(String, String)> {
    let label = |key: &str| record.labels.get(key).filter(|v| !v.is_empty()).cloned();

    let (name, version) = match (label(NAME_LABEL), record.images.first()) {
        (Some(name), _) => (name, label(VERSION_LABEL).unwrap_or_default()),
        (None, Some(image)) => parse_image_reference(image),
        (None, None) => return None,
    };

    if name.is_empty() {
        return None;
    }
    let version = if version.is_empty() {
        UNKNOWN_VERSION.to_string()
    } else {
        version
    };
    Some((name, version))
}
