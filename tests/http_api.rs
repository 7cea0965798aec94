//! HTTP API tests
//!
//! Drive the router in-process with `tower::ServiceExt::oneshot`.

mod support;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use cluster_reflector::config::Config;
use cluster_reflector::models::WorkloadKind;
use cluster_reflector::server::router;
use cluster_reflector::services::Reflector;
use cluster_reflector::telemetry::init_metrics_recorder;
use serde_json::Value;
use std::sync::Arc;
use std::sync::atomic::Ordering;
use support::{FakeCluster, labeled_workload, node};
use tower::ServiceExt;

fn cluster() -> Arc<FakeCluster> {
    Arc::new(
        FakeCluster::new()
            .with_node(node(
                "cp-1",
                "10.0.1.100",
                "v1.28.4",
                &[("node-role.kubernetes.io/control-plane", "")],
            ))
            .with_node(node("worker-1", "10.0.1.101", "v1.28.4", &[]))
            .with_app_version("default", "my-app", "1.0.0")
            .with_workload(
                WorkloadKind::Deployment,
                labeled_workload("default", "my-app", "0.9.0"),
            ),
    )
}

async fn refreshed(config: Config, cluster: Arc<FakeCluster>) -> Arc<Reflector> {
    let reflector = Reflector::new(config, cluster).unwrap();
    reflector.refresh().await.unwrap();
    Arc::new(reflector)
}

async fn get(app: Router, uri: &str) -> (StatusCode, String) {
    let response = app
        .oneshot(Request::get(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(body.to_vec()).unwrap())
}

#[tokio::test]
async fn test_cluster_info_shape() {
    let reflector = refreshed(Config::default(), cluster()).await;

    let (status, body) = get(router(reflector, None), "/cluster-info").await;
    assert_eq!(status, StatusCode::OK);

    let json: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["apiVersion"], "reflector.grid.sce.com/v1");
    assert!(json["timestamp"].as_str().unwrap().contains('T'));

    let nodes = json["nodes"].as_array().unwrap();
    assert_eq!(nodes.len(), 2);
    let cp = nodes.iter().find(|n| n["name"] == "cp-1").unwrap();
    assert_eq!(cp["ip"], "10.0.1.100");
    assert_eq!(cp["role"], "control-plane");
    assert_eq!(cp["version"], "v1.28.4");
    let worker = nodes.iter().find(|n| n["name"] == "worker-1").unwrap();
    assert_eq!(worker["role"], "worker");

    let apps = json["apps"].as_array().unwrap();
    assert_eq!(apps.len(), 1);
    assert_eq!(apps[0]["name"], "my-app");
    assert_eq!(apps[0]["version"], "1.0.0");
    assert_eq!(apps[0]["variants"], serde_json::json!(["1.0.0", "0.9.0"]));
}

#[tokio::test]
async fn test_cluster_info_on_empty_cache() {
    let reflector = Arc::new(Reflector::new(Config::default(), cluster()).unwrap());

    let (status, body) = get(router(reflector, None), "/cluster-info").await;
    assert_eq!(status, StatusCode::OK);

    let json: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["nodes"], serde_json::json!([]));
    assert_eq!(json["apps"], serde_json::json!([]));
}

#[tokio::test]
async fn test_healthz_ok() {
    let reflector = refreshed(Config::default(), cluster()).await;

    let (status, body) = get(router(reflector, None), "/healthz").await;
    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["status"], "healthy");
}

#[tokio::test]
async fn test_healthz_connectivity_failure() {
    let cluster = cluster();
    let reflector = refreshed(Config::default(), cluster.clone()).await;
    cluster.fail_probe.store(true, Ordering::SeqCst);

    let (status, body) = get(router(reflector, None), "/healthz").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    let json: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["status"], "unhealthy");
    assert_eq!(json["reason"], "connectivity");
    assert!(json["error"].as_str().unwrap().contains("probe nodes timed out"));
}

#[tokio::test]
async fn test_healthz_stale_cache() {
    let reflector = Arc::new(Reflector::new(Config::default(), cluster()).unwrap());

    let (status, body) = get(router(reflector, None), "/healthz").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    let json: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["reason"], "stale");
}

#[tokio::test]
async fn test_metrics_not_routed_without_handle() {
    let reflector = refreshed(Config::default(), cluster()).await;

    let (status, _) = get(router(reflector, None), "/metrics").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_metrics_enabled() {
    let reflector = refreshed(Config::default(), cluster()).await;
    let handle = init_metrics_recorder().unwrap();

    let (status, body) = get(router(reflector, Some(handle)), "/metrics").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("# TYPE cluster_reflector_nodes_total gauge"));
    assert!(body.contains("cluster_reflector_nodes_total 2"));
    assert!(body.contains("cluster_reflector_apps_total 1"));
    assert!(body.contains("cluster_reflector_control_plane_nodes 1"));
    assert!(body.contains("cluster_reflector_worker_nodes 1"));
}

#[test]
fn test_metrics_recorder_installs_once() {
    assert!(init_metrics_recorder().is_ok());
    assert!(init_metrics_recorder().is_ok());
}

#[tokio::test]
async fn test_cors_preflight() {
    let reflector = refreshed(Config::default(), cluster()).await;

    let response = router(reflector, None)
        .oneshot(
            Request::options("/cluster-info")
                .header(header::ORIGIN, "https://dashboard.example.com")
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "GET")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "*"
    );
}
