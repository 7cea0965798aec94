//! Healthcheck command
//!
//! Probes `/healthz` on a locally running server, for use as a container
//! health command.

use anyhow::{Context, Result};
use std::time::Duration;

const HEALTHCHECK_TIMEOUT: Duration = Duration::from_secs(10);

/// Turn a listen address into one a local client can connect to
pub fn local_address(listen: &str) -> String {
    if listen.starts_with(':') {
        format!("localhost{}", listen)
    } else if let Some(port) = listen.strip_prefix("0.0.0.0:") {
        format!("localhost:{}", port)
    } else {
        listen.to_string()
    }
}

pub async fn run_healthcheck(listen: &str) -> Result<()> {
    let url = format!("http://{}/healthz", local_address(listen));

    let client = reqwest::Client::builder()
        .timeout(HEALTHCHECK_TIMEOUT)
        .build()
        .context("Failed to create HTTP client")?;

    let resp = client
        .get(&url)
        .send()
        .await
        .with_context(|| format!("Health check failed: {}", url))?;

    if !resp.status().is_success() {
        anyhow::bail!("Health check failed: HTTP {}", resp.status().as_u16());
    }

    println!("Health check passed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_address() {
        assert_eq!(local_address(":8080"), "localhost:8080");
        assert_eq!(local_address("0.0.0.0:9000"), "localhost:9000");
        assert_eq!(local_address("10.0.0.5:8080"), "10.0.0.5:8080");
    }
}
