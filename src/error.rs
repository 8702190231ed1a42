//! Error types for VizStream
//!
//! This module defines all error types used throughout the application,
//! using `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Main error type for VizStream operations
///
/// This enum encompasses all possible errors that can occur during
/// configuration loading, file payload preparation, analysis requests,
/// stream consumption, and chart materialization.
#[derive(Error, Debug)]
pub enum VizStreamError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Analysis request errors (request construction, non-success responses)
    #[error("Request error: {0}")]
    Request(String),

    /// Stream consumption errors (mid-stream read failures)
    #[error("Stream error: {0}")]
    Stream(String),

    /// File loading errors (read errors, oversize payloads)
    #[error("File load error: {0}")]
    FileLoad(String),

    /// Generated-file download errors
    #[error("Download error: {0}")]
    Download(String),

    /// Chart materialization errors (base64 decode, write failures)
    #[error("Chart error: {0}")]
    Chart(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Result type alias for VizStream operations
///
/// This is a convenience alias that uses `anyhow::Error` as the error type,
/// allowing for rich error context and easy error propagation.
pub type Result<T> = anyhow::Result<T>;
