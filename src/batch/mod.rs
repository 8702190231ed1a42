//! Batch visualization client
//!
//! The backend's non-streaming flow: one POST carrying the encoded file
//! and prompt, one JSON response listing generated files, and an
//! independent GET per generated image to materialize it on disk.
//!
//! Downloads go to the same `download_url` the response advertises,
//! resolved against the backend origin, without auth-header propagation;
//! this mirrors the backend's contract, which serves generated files
//! unauthenticated.

use crate::config::Config;
use crate::error::{Result, VizStreamError};
use crate::media::{self, FilePayload};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Batch visualization request body
#[derive(Debug, Serialize)]
pub struct VisualizeRequest {
    /// Visualization prompt
    pub prompt: String,
    /// Uploaded file name
    pub file_name: String,
    /// Base64-encoded file contents
    pub file_content: String,
    /// MIME type of the uploaded file
    pub file_type: String,
    /// Analysis depth: `basic`, `comprehensive`, or `custom`
    pub analysis_type: String,
    /// Client-generated session id
    pub session_id: String,
}

/// Batch visualization response body
#[derive(Debug, Deserialize)]
pub struct VisualizeResponse {
    /// Whether the backend completed the analysis
    pub success: bool,
    /// Server-side execution time in seconds
    #[serde(default)]
    pub execution_time: f64,
    /// Full analysis text
    #[serde(default)]
    pub response_text: String,
    /// Files generated during the analysis
    #[serde(default)]
    pub generated_files: Vec<GeneratedFile>,
}

/// One generated file advertised by the batch response
#[derive(Debug, Clone, Deserialize)]
pub struct GeneratedFile {
    /// Filename assigned by the backend
    pub name: String,
    /// Path to fetch the file from, relative to the backend origin
    pub download_url: String,
    /// Coarse kind: `image` entries are downloaded, others listed only
    pub file_type: String,
    /// Size in bytes as reported by the backend
    #[serde(default)]
    pub size_bytes: u64,
}

impl GeneratedFile {
    /// True for entries the client materializes locally
    pub fn is_image(&self) -> bool {
        self.file_type == "image"
    }
}

/// Client for the batch `/visualize` flow
#[derive(Debug)]
pub struct VisualizeClient {
    client: reqwest::Client,
    origin: url::Url,
    request_timeout: Duration,
}

impl VisualizeClient {
    /// Build a client against the configured backend
    ///
    /// # Errors
    ///
    /// Returns `VizStreamError::Config` if the HTTP client cannot be
    /// built or the origin is invalid.
    pub fn new(config: &Config) -> Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(config.backend.connect_timeout_seconds))
            .user_agent("vizstream/0.2.0")
            .build()
            .map_err(|e| {
                VizStreamError::Config(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            client,
            origin: config.origin_url()?,
            request_timeout: Duration::from_secs(config.backend.request_timeout_seconds),
        })
    }

    /// Run one batch visualization request
    ///
    /// Reads and encodes the file, then POSTs it with the prompt to
    /// `/visualize` and decodes the JSON response. Unlike the streaming
    /// flow there is no incremental state; the whole result arrives at
    /// once, bounded by the configured request timeout.
    ///
    /// # Errors
    ///
    /// Returns `VizStreamError::FileLoad` for unreadable or oversize
    /// files, `VizStreamError::Request` for non-success responses, and
    /// `VizStreamError::Http` for transport failures.
    pub async fn visualize(
        &self,
        file: &Path,
        prompt: &str,
        analysis_type: &str,
    ) -> Result<VisualizeResponse> {
        let payload = FilePayload::from_path(file).await?;

        let request = VisualizeRequest {
            prompt: prompt.to_string(),
            file_name: payload.file_name,
            file_content: payload.data,
            file_type: payload.mime_type,
            analysis_type: analysis_type.to_string(),
            session_id: uuid::Uuid::new_v4().to_string(),
        };

        let endpoint = self
            .origin
            .join("/visualize")
            .map_err(|e| VizStreamError::Config(format!("Invalid endpoint: {}", e)))?;

        tracing::info!(
            "Submitting {} for {} analysis",
            request.file_name,
            request.analysis_type
        );

        let response = self
            .client
            .post(endpoint)
            .timeout(self.request_timeout)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(
                VizStreamError::Request(format!("visualize returned HTTP {}", status)).into(),
            );
        }

        let response: VisualizeResponse = response.json().await?;
        tracing::info!(
            "Analysis finished in {:.2}s with {} generated files",
            response.execution_time,
            response.generated_files.len()
        );
        Ok(response)
    }

    /// Download every `image` entry to `dir`
    ///
    /// Each image is fetched independently; a failed download is logged
    /// and skipped so the remaining images still land. Returns the paths
    /// written, in response order.
    pub async fn download_images(
        &self,
        files: &[GeneratedFile],
        dir: &Path,
    ) -> Vec<PathBuf> {
        let mut saved = Vec::new();
        for file in files.iter().filter(|f| f.is_image()) {
            match self.download_one(file, dir).await {
                Ok(path) => saved.push(path),
                Err(e) => {
                    tracing::warn!("Skipping {}: {}", file.name, e);
                }
            }
        }
        saved
    }

    /// Fetch one generated file and write it under `dir`
    async fn download_one(&self, file: &GeneratedFile, dir: &Path) -> Result<PathBuf> {
        let url = self
            .origin
            .join(&file.download_url)
            .map_err(|e| VizStreamError::Download(format!("Bad download URL: {}", e)))?;

        let response = self
            .client
            .get(url)
            .timeout(self.request_timeout)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(VizStreamError::Download(format!(
                "{} returned HTTP {}",
                file.download_url, status
            ))
            .into());
        }

        let bytes = response.bytes().await?;
        media::write_binary(&file.name, &bytes, dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generated(file_type: &str) -> GeneratedFile {
        GeneratedFile {
            name: "chart_1.png".to_string(),
            download_url: "/files/chart_1.png".to_string(),
            file_type: file_type.to_string(),
            size_bytes: 1024,
        }
    }

    #[test]
    fn test_is_image_selects_only_images() {
        assert!(generated("image").is_image());
        assert!(!generated("data").is_image());
        assert!(!generated("document").is_image());
    }

    #[test]
    fn test_response_decodes_with_defaults() {
        let json = r#"{"success": true}"#;
        let response: VisualizeResponse = serde_json::from_str(json).unwrap();
        assert!(response.success);
        assert_eq!(response.execution_time, 0.0);
        assert!(response.response_text.is_empty());
        assert!(response.generated_files.is_empty());
    }

    #[test]
    fn test_response_decodes_generated_files() {
        let json = r#"{
            "success": true,
            "execution_time": 12.5,
            "response_text": "Here is your analysis.",
            "generated_files": [
                {"name": "a.png", "download_url": "/files/a.png", "file_type": "image", "size_bytes": 2048},
                {"name": "summary.csv", "download_url": "/files/summary.csv", "file_type": "data"}
            ]
        }"#;
        let response: VisualizeResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.generated_files.len(), 2);
        assert!(response.generated_files[0].is_image());
        assert_eq!(response.generated_files[1].size_bytes, 0);
    }

    #[test]
    fn test_request_serializes_expected_fields() {
        let request = VisualizeRequest {
            prompt: "trends".to_string(),
            file_name: "data.csv".to_string(),
            file_content: "YSxiCg==".to_string(),
            file_type: "text/csv".to_string(),
            analysis_type: "comprehensive".to_string(),
            session_id: "abc".to_string(),
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["file_name"], "data.csv");
        assert_eq!(json["file_content"], "YSxiCg==");
        assert_eq!(json["analysis_type"], "comprehensive");
        assert_eq!(json["session_id"], "abc");
    }
}
