//! App discovery from AppVersion custom resources

use super::catalog::{AppCatalog, PrimaryVersion};
use crate::kube::{ClusterSource, Scope, SourceError};
use crate::models::AppVersionSpec;

/// Fold AppVersion objects from every scope into the catalog
///
/// For an all-namespaces scope a listing failure is returned to the caller
/// (typically the CRD is not installed). A failure in one named namespace is
/// logged and the remaining namespaces are still listed. Objects without a
/// string `spec.name` and `spec.version` are skipped.
///
/// Within this source the last object processed for a name sets its
/// primary version.
pub async fn discover_from_crds(
    source: &dyn ClusterSource,
    scopes: &[Scope],
    catalog: &mut AppCatalog,
) -> Result<(), SourceError> {
    for scope in scopes {
        let objects = match source.list_app_versions(scope.clone()).await {
            Ok(objects) => objects,
            Err(err) if *scope == Scope::All => return Err(err),
            Err(err) => {
                tracing::warn!(
                    namespace = %scope,
                    error = %err,
                    "Failed to list AppVersions in namespace"
                );
                continue;
            }
        };

        let mut skipped = 0usize;
        for obj in &objects {
            match AppVersionSpec::from_object(obj) {
                Some(spec) => catalog.fold(&spec.name, &spec.version, PrimaryVersion::Replace),
                None => skipped += 1,
            }
        }

        tracing::debug!(
            namespace = %scope,
            listed = objects.len(),
            skipped,
            "Processed AppVersion objects"
        );
    }

    Ok(())
}
