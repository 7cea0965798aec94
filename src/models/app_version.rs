//! AppVersion custom resource
//!
//! AppVersion objects are listed as dynamic objects, since the CRD may not be
//! installed in every cluster. Only `spec.name` and `spec.version` are read;
//! objects that do not carry both as strings are ignored.

use kube::core::{ApiResource, GroupVersionKind};
use serde::Deserialize;

pub const APP_VERSION_GROUP: &str = "cluster.grid.sce.com";
pub const APP_VERSION_VERSION: &str = "v1alpha1";
pub const APP_VERSION_KIND: &str = "AppVersion";
pub const APP_VERSION_PLURAL: &str = "appversions";

/// The two fields read from an AppVersion object
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AppVersionSpec {
    pub name: String,
    pub version: String,
}

#[derive(Deserialize)]
struct AppVersionBody {
    spec: AppVersionSpec,
}

impl AppVersionSpec {
    /// Extract the spec from a raw AppVersion object
    ///
    /// Returns `None` when `spec`, `spec.name` or `spec.version` is missing
    /// or not a string.
    pub fn from_object(obj: &serde_json::Value) -> Option<Self> {
        AppVersionBody::deserialize(obj).ok().map(|body| body.spec)
    }
}

/// API resource descriptor used for dynamic AppVersion listing
pub fn app_version_resource() -> ApiResource {
    let gvk = GroupVersionKind::gvk(APP_VERSION_GROUP, APP_VERSION_VERSION, APP_VERSION_KIND);
    ApiResource::from_gvk_with_plural(&gvk, APP_VERSION_PLURAL)
}
