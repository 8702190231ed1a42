//! Analysis request lifecycle
//!
//! [`AnalysisController`] owns one streaming analysis exchange at a time:
//! it encodes the input file, issues the POST, and drives the response
//! body through the [`FrameParser`] and the session dispatcher until the
//! stream ends, a terminal frame arrives, or the user cancels.
//!
//! # Cancellation
//!
//! A [`StopHandle`] can be cloned out of the controller and triggered
//! from anywhere (another task, a Ctrl-C handler). The read loop checks
//! the token between chunks and exits promptly; a chunk that resolves
//! after cancellation is discarded rather than applied. Stopping when no
//! stream is open is a harmless no-op.
//!
//! # Timeouts
//!
//! Only the connect phase is bounded. The streaming read itself carries
//! no timeout: an unresponsive backend holds the session active until
//! the user cancels.

use crate::config::Config;
use crate::error::{Result, VizStreamError};
use crate::media::FilePayload;
use crate::stream::event::AnalysisEvent;
use crate::stream::parser::FrameParser;
use crate::stream::session::AnalysisSession;
use futures::StreamExt;
use serde::Serialize;
use std::path::Path;
use std::sync::{Arc, RwLock};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Session error message for a request that never started streaming.
pub const REQUEST_FAILED_MESSAGE: &str = "Analysis request failed";

/// Session error message for a stream that died mid-read.
pub const CONNECTION_LOST_MESSAGE: &str = "Connection lost during analysis";

/// Streaming analysis request body
#[derive(Debug, Serialize)]
struct AnalyzeRequest<'a> {
    file_data: &'a str,
    file_name: &'a str,
    file_type: &'a str,
    prompt: &'a str,
}

/// Clonable handle that cancels the controller's active stream
///
/// Always points at the current session's token, including sessions
/// started after the handle was created.
#[derive(Debug, Clone)]
pub struct StopHandle {
    cancel: Arc<RwLock<CancellationToken>>,
}

impl StopHandle {
    /// Cancel the active stream, if any
    ///
    /// Idempotent; never panics, even when no stream is open.
    pub fn stop(&self) {
        if let Ok(token) = self.cancel.read() {
            token.cancel();
        }
    }
}

/// Owns one streaming analysis request/response exchange
///
/// At most one session is active per controller; starting a new analysis
/// first releases any stream left open by the previous one.
#[derive(Debug)]
pub struct AnalysisController {
    client: reqwest::Client,
    endpoint: url::Url,
    session: AnalysisSession,
    cancel: Arc<RwLock<CancellationToken>>,
}

impl AnalysisController {
    /// Build a controller against the configured backend
    ///
    /// No network I/O is performed at construction time.
    ///
    /// # Errors
    ///
    /// Returns `VizStreamError::Config` if the HTTP client cannot be
    /// built or the backend origin does not form a valid endpoint URL.
    pub fn new(config: &Config) -> Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(config.backend.connect_timeout_seconds))
            .user_agent("vizstream/0.2.0")
            .build()
            .map_err(|e| {
                VizStreamError::Config(format!("Failed to create HTTP client: {}", e))
            })?;

        let endpoint = config
            .origin_url()?
            .join("/analyze-file-stream")
            .map_err(|e| VizStreamError::Config(format!("Invalid endpoint: {}", e)))?;

        Ok(Self {
            client,
            endpoint,
            session: AnalysisSession::new(),
            cancel: Arc::new(RwLock::new(CancellationToken::new())),
        })
    }

    /// Current session state
    pub fn session(&self) -> &AnalysisSession {
        &self.session
    }

    /// Handle for cancelling the active stream from another task
    pub fn stop_handle(&self) -> StopHandle {
        StopHandle {
            cancel: Arc::clone(&self.cancel),
        }
    }

    /// Cancel the active stream, if any
    ///
    /// Equivalent to [`StopHandle::stop`]; see there for semantics.
    pub fn stop_analysis(&self) {
        self.stop_handle().stop();
    }

    /// Run one streaming analysis to completion, cancellation, or failure
    ///
    /// With no file this is a no-op. Otherwise the file is read and
    /// base64-encoded, the session resets to active, and one POST is
    /// issued; the response body is then consumed frame by frame, each
    /// applied frame reported through `on_event` for incremental
    /// rendering.
    ///
    /// Transport failures (request rejected, connection lost) are
    /// terminal for the session and recorded in its error field rather
    /// than returned; only file preparation failures produce an `Err`,
    /// before any session state is touched.
    ///
    /// # Arguments
    ///
    /// * `file` - Data file to upload, or `None` for a no-op
    /// * `prompt` - Analysis prompt sent with the file
    /// * `on_event` - Called once per event applied to the session
    ///
    /// # Errors
    ///
    /// Returns `VizStreamError::FileLoad` if the file cannot be read or
    /// exceeds the upload ceiling.
    pub async fn start_analysis<F>(
        &mut self,
        file: Option<&Path>,
        prompt: &str,
        mut on_event: F,
    ) -> Result<()>
    where
        F: FnMut(&AnalysisEvent),
    {
        let Some(path) = file else {
            tracing::warn!("No input file selected, nothing to analyze");
            return Ok(());
        };

        let payload = FilePayload::from_path(path).await?;

        // Release any stream still open from a previous session, then
        // install a fresh token for this one.
        let token = CancellationToken::new();
        if let Ok(mut guard) = self.cancel.write() {
            guard.cancel();
            *guard = token.clone();
        }

        self.session.activate();

        let request = AnalyzeRequest {
            file_data: &payload.data,
            file_name: &payload.file_name,
            file_type: &payload.mime_type,
            prompt,
        };

        tracing::info!(
            "Starting analysis of {} ({} bytes)",
            payload.file_name,
            payload.size_bytes
        );

        let response = match self
            .client
            .post(self.endpoint.clone())
            .json(&request)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                tracing::error!("Analysis request failed to send: {}", e);
                self.session.fail(REQUEST_FAILED_MESSAGE);
                return Ok(());
            }
        };

        let status = response.status();
        if !status.is_success() {
            tracing::error!("Analysis request returned HTTP {}", status);
            self.session.fail(REQUEST_FAILED_MESSAGE);
            return Ok(());
        }

        let body = response.bytes_stream();
        let mut parser = FrameParser::new();

        tokio::pin!(body);

        loop {
            let chunk = tokio::select! {
                biased;
                _ = token.cancelled() => {
                    tracing::info!("Analysis cancelled");
                    self.session.interrupt();
                    return Ok(());
                }
                chunk = body.next() => chunk,
            };

            let Some(chunk) = chunk else {
                // End of stream: flush any unterminated tail.
                for frame in parser.finish() {
                    if let Some(event) = self.session.apply(&frame) {
                        on_event(&event);
                    }
                }
                return Ok(());
            };

            let chunk = match chunk {
                Ok(chunk) => chunk,
                Err(e) => {
                    tracing::error!("Stream read failed: {}", e);
                    self.session.fail(CONNECTION_LOST_MESSAGE);
                    return Ok(());
                }
            };

            for frame in parser.push(&chunk) {
                if let Some(event) = self.session.apply(&frame) {
                    on_event(&event);
                }
            }

            if self.session.is_terminal() {
                // Terminal frame seen; drop the stream rather than read
                // it to exhaustion.
                return Ok(());
            }
        }
    }
}

impl Drop for AnalysisController {
    /// Release any still-open stream on teardown
    ///
    /// Best-effort: cancelling the token unblocks a read loop that may
    /// still hold the response body.
    fn drop(&mut self) {
        if let Ok(token) = self.cancel.read() {
            token.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stream::session::SessionPhase;

    fn controller() -> AnalysisController {
        AnalysisController::new(&Config::default()).unwrap()
    }

    /// Construction performs no I/O and starts idle.
    #[test]
    fn test_new_starts_idle() {
        let c = controller();
        assert_eq!(c.session().phase(), SessionPhase::Idle);
        assert_eq!(c.endpoint.path(), "/analyze-file-stream");
    }

    /// Stopping with no active session is a non-panicking no-op.
    #[test]
    fn test_stop_without_session_is_noop() {
        let c = controller();
        c.stop_analysis();
        c.stop_analysis();
        assert_eq!(c.session().phase(), SessionPhase::Idle);
    }

    /// The stop handle survives and stays harmless across repeated use.
    #[test]
    fn test_stop_handle_idempotent() {
        let c = controller();
        let handle = c.stop_handle();
        handle.stop();
        handle.stop();
        assert_eq!(c.session().phase(), SessionPhase::Idle);
    }

    /// start_analysis without a file is a no-op.
    #[tokio::test]
    async fn test_start_without_file_is_noop() {
        let mut c = controller();
        let result = c.start_analysis(None, "analyze this", |_| {}).await;
        assert!(result.is_ok());
        assert_eq!(c.session().phase(), SessionPhase::Idle);
    }

    /// An unreadable file errors before any session state is created.
    #[tokio::test]
    async fn test_start_with_missing_file_errors_before_session() {
        let mut c = controller();
        let result = c
            .start_analysis(Some(Path::new("/does/not/exist.csv")), "prompt", |_| {})
            .await;
        assert!(result.is_err());
        assert_eq!(c.session().phase(), SessionPhase::Idle);
    }
}
