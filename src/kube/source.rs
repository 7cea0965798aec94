//! `ClusterSource` backed by a live Kubernetes API server

use async_trait::async_trait;
use k8s_openapi::api::apps::v1::{DaemonSet, Deployment, StatefulSet};
use k8s_openapi::api::core::v1::{Node, PodTemplateSpec};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use kube::api::{DynamicObject, ListParams};
use kube::core::NamespaceResourceScope;
use kube::{Api, Client};
use serde::de::DeserializeOwned;
use std::fmt::Debug;
use std::future::Future;
use std::time::Duration;

use super::{ClusterSource, Scope, SourceError, WorkloadRecord};
use crate::models::{WorkloadKind, app_version_resource};

/// Lists cluster resources through kube-rs, bounding each call by a timeout
#[derive(Clone)]
pub struct KubeClusterSource {
    client: Client,
    request_timeout: Duration,
}

impl KubeClusterSource {
    pub fn new(client: Client, request_timeout: Duration) -> Self {
        Self {
            client,
            request_timeout,
        }
    }

    async fn bounded<T>(
        &self,
        operation: &'static str,
        request: impl Future<Output = Result<T, kube::Error>>,
    ) -> Result<T, SourceError> {
        bounded(self.request_timeout, operation, request).await
    }

    /// Uses Api::namespaced for a single namespace, Api::all otherwise
    fn scoped_api<K>(&self, scope: &Scope) -> Api<K>
    where
        K: kube::Resource<Scope = NamespaceResourceScope>,
        K::DynamicType: Default,
    {
        match scope {
            Scope::All => Api::all(self.client.clone()),
            Scope::Namespace(ns) => Api::namespaced(self.client.clone(), ns),
        }
    }

    async fn list_typed<K>(
        &self,
        operation: &'static str,
        scope: &Scope,
    ) -> Result<Vec<K>, SourceError>
    where
        K: kube::Resource<Scope = NamespaceResourceScope> + Clone + DeserializeOwned + Debug,
        K::DynamicType: Default,
    {
        let api = self.scoped_api::<K>(scope);
        let list = self
            .bounded(operation, api.list(&ListParams::default()))
            .await?;
        Ok(list.items)
    }
}

/// Run one API request, giving up after `timeout`
async fn bounded<T>(
    timeout: Duration,
    operation: &'static str,
    request: impl Future<Output = Result<T, kube::Error>>,
) -> Result<T, SourceError> {
    match tokio::time::timeout(timeout, request).await {
        Ok(result) => result.map_err(SourceError::from),
        Err(_) => Err(SourceError::Timeout { operation, timeout }),
    }
}

/// Build a record from workload metadata and its pod template
fn workload_record(meta: &ObjectMeta, template: Option<&PodTemplateSpec>) -> WorkloadRecord {
    let images = template
        .and_then(|t| t.spec.as_ref())
        .map(|spec| {
            spec.containers
                .iter()
                .map(|c| c.image.clone().unwrap_or_default())
                .collect()
        })
        .unwrap_or_default();

    WorkloadRecord {
        name: meta.name.clone().unwrap_or_default(),
        namespace: meta.namespace.clone().unwrap_or_default(),
        labels: meta.labels.clone().unwrap_or_default(),
        images,
    }
}

#[async_trait]
impl ClusterSource for KubeClusterSource {
    async fn list_nodes(&self) -> Result<Vec<Node>, SourceError> {
        let api: Api<Node> = Api::all(self.client.clone());
        let list = self
            .bounded("list nodes", api.list(&ListParams::default()))
            .await?;
        Ok(list.items)
    }

    async fn list_app_versions(&self, scope: Scope) -> Result<Vec<serde_json::Value>, SourceError> {
        let resource = app_version_resource();
        let api: Api<DynamicObject> = match &scope {
            Scope::All => Api::all_with(self.client.clone(), &resource),
            Scope::Namespace(ns) => Api::namespaced_with(self.client.clone(), ns, &resource),
        };
        let list = self
            .bounded("list AppVersions", api.list(&ListParams::default()))
            .await?;
        // `data` holds everything except type and object metadata, i.e. spec and status
        Ok(list.items.into_iter().map(|obj| obj.data).collect())
    }

    async fn list_workloads(
        &self,
        kind: WorkloadKind,
        scope: Scope,
    ) -> Result<Vec<WorkloadRecord>, SourceError> {
        let records: Vec<WorkloadRecord> = match kind {
            WorkloadKind::Deployment => self
                .list_typed::<Deployment>("list deployments", &scope)
                .await?
                .iter()
                .map(|d| workload_record(&d.metadata, d.spec.as_ref().map(|s| &s.template)))
                .collect(),
            WorkloadKind::StatefulSet => self
                .list_typed::<StatefulSet>("list statefulsets", &scope)
                .await?
                .iter()
                .map(|s| workload_record(&s.metadata, s.spec.as_ref().map(|s| &s.template)))
                .collect(),
            WorkloadKind::DaemonSet => self
                .list_typed::<DaemonSet>("list daemonsets", &scope)
                .await?
                .iter()
                .map(|d| workload_record(&d.metadata, d.spec.as_ref().map(|s| &s.template)))
                .collect(),
        };
        Ok(records)
    }

    async fn probe(&self) -> Result<(), SourceError> {
        let api: Api<Node> = Api::all(self.client.clone());
        self.bounded("probe nodes", api.list(&ListParams::default().limit(1)))
            .await?;
        Ok(())
    }
}
