//! cluster-reflector - serves a cached view of Kubernetes nodes and app versions
//!
//! Refreshes node metadata and application versions from the cluster on a
//! TTL-driven schedule and exposes the result on `/cluster-info`.

use anyhow::Result;
use clap::Parser;
use cluster_reflector::cli::{Cli, Command, display_version, run_healthcheck, run_server};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Command::Version) => {
            display_version();
            Ok(())
        }
        Some(Command::Healthcheck { listen }) => run_healthcheck(&listen).await,
        None => run_server(cli.serve).await,
    }
}
