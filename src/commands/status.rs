//! Backend health check command handler

use crate::config::Config;
use crate::error::{Result, VizStreamError};
use colored::Colorize;
use std::time::Duration;

/// Probe the backend's health endpoint and print the result
///
/// # Arguments
///
/// * `config` - Global configuration (consumed)
///
/// # Errors
///
/// Returns an error if the backend is unreachable or responds with a
/// non-success status.
pub async fn run_status(config: Config) -> Result<()> {
    let client = reqwest::Client::builder()
        .connect_timeout(Duration::from_secs(config.backend.connect_timeout_seconds))
        .user_agent("vizstream/0.2.0")
        .build()
        .map_err(|e| VizStreamError::Config(format!("Failed to create HTTP client: {}", e)))?;

    let url = config
        .origin_url()?
        .join("/health")
        .map_err(|e| VizStreamError::Config(format!("Invalid endpoint: {}", e)))?;

    let response = client
        .get(url)
        .timeout(Duration::from_secs(config.backend.request_timeout_seconds))
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        return Err(VizStreamError::Request(format!("health returned HTTP {}", status)).into());
    }

    let body: serde_json::Value = response.json().await?;
    let reported = body
        .get("status")
        .and_then(|v| v.as_str())
        .unwrap_or("unknown");

    let colored_status = if reported == "healthy" {
        reported.green()
    } else {
        reported.yellow()
    };
    println!("Backend {} is {}", config.backend.origin, colored_status);

    if let Some(active) = body.get("active_streams").and_then(|v| v.as_u64()) {
        println!("Active streams: {}", active);
    }

    Ok(())
}
