//! Configuration management for VizStream
//!
//! This module handles loading, parsing, validating, and managing
//! configuration from files and CLI overrides.

use crate::cli::Cli;
use crate::error::{Result, VizStreamError};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure for VizStream
///
/// Holds everything the client needs: where the analysis backend lives,
/// request timing, and where received charts are written.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Backend connection configuration
    #[serde(default)]
    pub backend: BackendConfig,
    /// Output configuration for received charts and generated files
    #[serde(default)]
    pub output: OutputConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: BackendConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

/// Analysis backend configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Backend origin, e.g. `http://localhost:8000`
    #[serde(default = "default_origin")]
    pub origin: String,

    /// Connect timeout for every request (seconds)
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_seconds: u64,

    /// Total timeout for non-streaming requests (seconds)
    ///
    /// The streaming read loop deliberately carries no total timeout: a
    /// slow backend holds the session active until it completes or the
    /// user cancels.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
}

fn default_origin() -> String {
    "http://localhost:8000".to_string()
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_request_timeout() -> u64 {
    300
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            origin: default_origin(),
            connect_timeout_seconds: default_connect_timeout(),
            request_timeout_seconds: default_request_timeout(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory where received charts and downloaded images are written
    #[serde(default = "default_charts_dir")]
    pub charts_dir: String,
}

fn default_charts_dir() -> String {
    "./charts".to_string()
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            charts_dir: default_charts_dir(),
        }
    }
}

impl Config {
    /// Load configuration from a YAML file with CLI overrides applied
    ///
    /// A missing file at the default path falls back to built-in defaults;
    /// a missing file at an explicitly supplied path is an error.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration file
    /// * `cli` - Parsed CLI arguments whose overrides take precedence
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed,
    /// or if an explicitly supplied path does not exist.
    pub fn load(path: &str, cli: &Cli) -> Result<Self> {
        let explicit = cli.config.is_some();
        let mut config = if Path::new(path).exists() {
            let contents = std::fs::read_to_string(path)?;
            let config: Config = serde_yaml::from_str(&contents)?;
            tracing::debug!("Loaded configuration from {}", path);
            config
        } else if explicit {
            return Err(
                VizStreamError::Config(format!("Configuration file not found: {}", path)).into(),
            );
        } else {
            tracing::debug!("No configuration file at {}, using defaults", path);
            Config::default()
        };

        if let Some(origin) = &cli.backend {
            config.backend.origin = origin.clone();
        }
        if let Some(dir) = &cli.output_dir {
            config.output.charts_dir = dir.to_string_lossy().to_string();
        }

        Ok(config)
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns `VizStreamError::Config` if the backend origin is not a
    /// valid http(s) URL or a timeout is zero.
    pub fn validate(&self) -> Result<()> {
        let origin = url::Url::parse(&self.backend.origin)
            .map_err(|e| VizStreamError::Config(format!("Invalid backend origin: {}", e)))?;

        match origin.scheme() {
            "http" | "https" => {}
            other => {
                return Err(VizStreamError::Config(format!(
                    "Unsupported backend scheme: {}",
                    other
                ))
                .into());
            }
        }

        if self.backend.connect_timeout_seconds == 0 {
            return Err(
                VizStreamError::Config("connect_timeout_seconds must be non-zero".into()).into(),
            );
        }
        if self.backend.request_timeout_seconds == 0 {
            return Err(
                VizStreamError::Config("request_timeout_seconds must be non-zero".into()).into(),
            );
        }

        Ok(())
    }

    /// Parsed backend origin URL
    ///
    /// # Errors
    ///
    /// Returns `VizStreamError::Config` if the origin does not parse;
    /// `validate()` catches this earlier in normal operation.
    pub fn origin_url(&self) -> Result<url::Url> {
        url::Url::parse(&self.backend.origin)
            .map_err(|e| VizStreamError::Config(format!("Invalid backend origin: {}", e)).into())
    }
}
