//! In-memory `ClusterSource` shared by the integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use cluster_reflector::kube::{ClusterSource, Scope, SourceError, WorkloadRecord};
use cluster_reflector::models::WorkloadKind;
use k8s_openapi::api::core::v1::Node;
use serde_json::{Value, json};
use std::collections::BTreeMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

/// Cluster contents served from memory, with switchable failures
#[derive(Default)]
pub struct FakeCluster {
    nodes: Mutex<Vec<Node>>,
    app_versions: Mutex<Vec<Value>>,
    workloads: Mutex<Vec<(WorkloadKind, WorkloadRecord)>>,
    pub fail_nodes: AtomicBool,
    pub fail_probe: AtomicBool,
    pub node_lists: AtomicUsize,
    scopes_seen: Mutex<Vec<Scope>>,
}

impl FakeCluster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_node(self, node: Node) -> Self {
        self.nodes.lock().unwrap().push(node);
        self
    }

    pub fn with_app_version(self, namespace: &str, name: &str, version: &str) -> Self {
        self.app_versions
            .lock()
            .unwrap()
            .push(app_version(namespace, name, version));
        self
    }

    pub fn with_workload(self, kind: WorkloadKind, record: WorkloadRecord) -> Self {
        self.workloads.lock().unwrap().push((kind, record));
        self
    }

    /// Replace the node list served from now on
    pub fn set_nodes(&self, nodes: Vec<Node>) {
        *self.nodes.lock().unwrap() = nodes;
    }

    /// Scopes passed to `list_app_versions`, in call order
    pub fn app_version_scopes(&self) -> Vec<Scope> {
        self.scopes_seen.lock().unwrap().clone()
    }

    fn in_scope(scope: &Scope, namespace: &str) -> bool {
        match scope {
            Scope::All => true,
            Scope::Namespace(ns) => ns == namespace,
        }
    }
}

#[async_trait]
impl ClusterSource for FakeCluster {
    async fn list_nodes(&self) -> Result<Vec<Node>, SourceError> {
        self.node_lists.fetch_add(1, Ordering::SeqCst);
        if self.fail_nodes.load(Ordering::SeqCst) {
            return Err(timed_out("list nodes"));
        }
        Ok(self.nodes.lock().unwrap().clone())
    }

    async fn list_app_versions(&self, scope: Scope) -> Result<Vec<Value>, SourceError> {
        self.scopes_seen.lock().unwrap().push(scope.clone());
        let objects = self.app_versions.lock().unwrap();
        Ok(objects
            .iter()
            .filter(|obj| {
                let ns = obj["metadata"]["namespace"].as_str().unwrap_or_default();
                Self::in_scope(&scope, ns)
            })
            .cloned()
            .collect())
    }

    async fn list_workloads(
        &self,
        kind: WorkloadKind,
        scope: Scope,
    ) -> Result<Vec<WorkloadRecord>, SourceError> {
        let workloads = self.workloads.lock().unwrap();
        Ok(workloads
            .iter()
            .filter(|(k, record)| *k == kind && Self::in_scope(&scope, &record.namespace))
            .map(|(_, record)| record.clone())
            .collect())
    }

    async fn probe(&self) -> Result<(), SourceError> {
        if self.fail_probe.load(Ordering::SeqCst) {
            return Err(timed_out("probe nodes"));
        }
        Ok(())
    }
}

fn timed_out(operation: &'static str) -> SourceError {
    SourceError::Timeout {
        operation,
        timeout: Duration::from_secs(10),
    }
}

pub fn node(name: &str, ip: &str, version: &str, labels: &[(&str, &str)]) -> Node {
    let labels: BTreeMap<&str, &str> = labels.iter().copied().collect();
    serde_json::from_value(json!({
        "metadata": { "name": name, "labels": labels },
        "status": {
            "addresses": [
                { "type": "Hostname", "address": name },
                { "type": "InternalIP", "address": ip }
            ],
            "nodeInfo": {
                "kubeletVersion": version,
                "architecture": "amd64",
                "bootID": "",
                "containerRuntimeVersion": "containerd://1.7.0",
                "kernelVersion": "6.1.0",
                "kubeProxyVersion": version,
                "machineID": "",
                "operatingSystem": "linux",
                "osImage": "Debian GNU/Linux 12",
                "systemUUID": ""
            }
        }
    }))
    .unwrap()
}

pub fn app_version(namespace: &str, name: &str, version: &str) -> Value {
    json!({
        "apiVersion": "cluster.grid.sce.com/v1alpha1",
        "kind": "AppVersion",
        "metadata": { "name": name, "namespace": namespace },
        "spec": { "name": name, "version": version }
    })
}

pub fn labeled_workload(namespace: &str, app: &str, version: &str) -> WorkloadRecord {
    WorkloadRecord {
        name: app.to_string(),
        namespace: namespace.to_string(),
        labels: BTreeMap::from([
            ("app.kubernetes.io/name".to_string(), app.to_string()),
            ("app.kubernetes.io/version".to_string(), version.to_string()),
        ]),
        images: vec![format!("registry.io/{}:{}", app, version)],
    }
}

pub fn image_workload(namespace: &str, name: &str, image: &str) -> WorkloadRecord {
    WorkloadRecord {
        name: name.to_string(),
        namespace: namespace.to_string(),
        labels: BTreeMap::new(),
        images: vec![image.to_string()],
    }
}
