//! Serve command: refresh loop plus HTTP server

use anyhow::{Context, Result};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use super::args::ServeArgs;
use super::logging::init_logging;
use super::version::build_info;
use crate::config::ConfigLoader;
use crate::kube::{KubeClusterSource, create_client};
use crate::server;
use crate::services::Reflector;
use crate::telemetry::init_metrics_recorder;

/// Run the service until a shutdown signal arrives or a component fails
pub async fn run_server(args: ServeArgs) -> Result<()> {
    let mut config = ConfigLoader::load(args.config.as_deref())?;
    args.apply(&mut config);

    init_logging(&config.log_level, config.log_format);
    config.validate().context("Invalid configuration")?;

    let (version, git_commit, build_date) = build_info();
    tracing::info!(version, git_commit, build_date, "Starting cluster-reflector");

    let metrics = if config.metrics_enabled {
        Some(init_metrics_recorder()?)
    } else {
        None
    };

    let client = create_client().await?;
    let source = Arc::new(KubeClusterSource::new(client, config.request_timeout));
    let reflector = Arc::new(
        Reflector::new(config, source).context("Failed to create discovery service")?,
    );

    let shutdown = CancellationToken::new();

    let discovery = {
        let reflector = reflector.clone();
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            let result = reflector.start(shutdown.clone()).await;
            if let Err(err) = &result {
                tracing::error!(error = %err, "Discovery service failed");
                shutdown.cancel();
            }
            result
        })
    };

    let http = {
        let reflector = reflector.clone();
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            let result = server::serve(reflector, metrics, shutdown.clone()).await;
            if let Err(err) = &result {
                tracing::error!(error = %err, "HTTP server failed");
                shutdown.cancel();
            }
            result
        })
    };

    tokio::select! {
        signal = shutdown_signal() => {
            signal?;
            tracing::info!("Received shutdown signal");
        }
        _ = shutdown.cancelled() => tracing::info!("Context cancelled"),
    }

    tracing::info!("Shutting down...");
    shutdown.cancel();
    reflector.stop();

    let discovery_result = discovery.await.context("Discovery task panicked")?;
    let http_result = http.await.context("HTTP server task panicked")?;
    tracing::info!("Shutdown complete");

    discovery_result.context("Failed initial cache refresh")?;
    http_result
}

/// Resolves on SIGINT, or SIGTERM on unix
async fn shutdown_signal() -> Result<()> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};
        let mut sigterm =
            signal(SignalKind::terminate()).context("Failed to install SIGTERM handler")?;
        tokio::select! {
            res = tokio::signal::ctrl_c() => res.context("Failed to listen for SIGINT")?,
            _ = sigterm.recv() => {}
        }
        Ok(())
    }

    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c()
            .await
            .context("Failed to listen for ctrl-c")
    }
}
