//! Node discovery and role classification
//!
//! Role detection is a best-effort heuristic: a node counts as control-plane
//! when it carries one of the well-known role labels, or a `NoSchedule`
//! taint whose key mentions `control-plane` or `master`. Clusters that mark
//! their control plane some other way will report those nodes as workers.

use k8s_openapi::api::core::v1::Node as KubeNode;

use crate::kube::{ClusterSource, SourceError};
use crate::models::{Node, NodeRole};

const CONTROL_PLANE_LABELS: &[&str] = &[
    "node-role.kubernetes.io/control-plane",
    "node-role.kubernetes.io/master",
];
const CONTROL_PLANE_TAINT_MARKERS: &[&str] = &["control-plane", "master"];
const NO_SCHEDULE: &str = "NoSchedule";
const INTERNAL_IP: &str = "InternalIP";

/// List cluster nodes and summarize each one
pub async fn discover_nodes(source: &dyn ClusterSource) -> Result<Vec<Node>, SourceError> {
    let nodes = source.list_nodes().await?;
    Ok(nodes.iter().map(summarize_node).collect())
}

pub fn summarize_node(node: &KubeNode) -> Node {
    Node {
        name: node.metadata.name.clone().unwrap_or_default(),
        internal_ip: internal_ip(node),
        role: node_role(node),
        kubelet_version: node
            .status
            .as_ref()
            .and_then(|s| s.node_info.as_ref())
            .map(|info| info.kubelet_version.clone())
            .unwrap_or_default(),
    }
}

/// First `InternalIP` address, or an empty string
pub fn internal_ip(node: &KubeNode) -> String {
    node.status
        .as_ref()
        .and_then(|s| s.addresses.as_ref())
        .and_then(|addrs| addrs.iter().find(|a| a.type_ == INTERNAL_IP))
        .map(|a| a.address.clone())
        .unwrap_or_default()
}

pub fn node_role(node: &KubeNode) -> NodeRole {
    let labelled = node
        .metadata
        .labels
        .as_ref()
        .is_some_and(|labels| CONTROL_PLANE_LABELS.iter().any(|l| labels.contains_key(*l)));
    if labelled {
        return NodeRole::ControlPlane;
    }

    let tainted = node
        .spec
        .as_ref()
        .and_then(|spec| spec.taints.as_ref())
        .is_some_and(|taints| {
            taints.iter().any(|taint| {
                taint.effect == NO_SCHEDULE
                    && CONTROL_PLANE_TAINT_MARKERS
                        .iter()
                        .any(|marker| taint.key.contains(marker))
            })
        });
    if tainted {
        NodeRole::ControlPlane
    } else {
        NodeRole::Worker
    }
}
