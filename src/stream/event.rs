//! Event types decoded from the analysis stream
//!
//! A [`Frame`] is the transport-level unit: one `event:` tag paired with
//! one parsed `data:` JSON payload. [`AnalysisEvent`] is the typed view a
//! frame decodes into, with one variant per known tag.

use serde::{Deserialize, Serialize};

/// One `event:`/`data:` pair read off the stream
///
/// Transient: produced by the parser, consumed by the session, never
/// persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    /// Event-type tag from the `event:` line
    pub event: String,
    /// Parsed JSON payload from the `data:` line
    pub data: serde_json::Value,
}

/// A chart pushed by the backend during analysis
///
/// Appended to the session's chart sequence in arrival order; never
/// mutated or removed for the lifetime of the session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartRecord {
    /// Filename suggested by the backend
    pub filename: String,
    /// Base64-encoded chart bytes
    pub data: String,
    /// Declared MIME type
    #[serde(rename = "type")]
    pub mime_type: String,
    /// Decoded size in bytes, as reported by the backend
    #[serde(default)]
    pub size: u64,
}

/// Typed analysis event, one variant per known event tag
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisEvent {
    /// Incremental response text
    Text {
        /// Text to append to the session buffer
        content: String,
    },
    /// A generated chart
    Chart(ChartRecord),
    /// Progress update; replaces the previous status
    Status {
        /// Human-readable progress message
        message: String,
    },
    /// Terminal success
    Complete {
        /// Final status message
        message: String,
    },
    /// Terminal failure reported by the backend
    Error {
        /// Error description
        error: String,
    },
}

#[derive(Debug, Deserialize)]
struct TextPayload {
    content: String,
}

#[derive(Debug, Deserialize)]
struct StatusPayload {
    message: String,
}

#[derive(Debug, Deserialize)]
struct CompletePayload {
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
struct ErrorPayload {
    error: String,
}

impl AnalysisEvent {
    /// Decode a frame into a typed event
    ///
    /// Returns `None` for unrecognized tags and for payloads whose shape
    /// does not match their tag; both are dropped with the same leniency
    /// as malformed JSON. Extra payload fields (e.g. a `session_id` echo)
    /// are ignored.
    pub fn from_frame(frame: &Frame) -> Option<Self> {
        let decoded = match frame.event.as_str() {
            "text" => serde_json::from_value::<TextPayload>(frame.data.clone())
                .map(|p| AnalysisEvent::Text { content: p.content }),
            "chart" => serde_json::from_value::<ChartRecord>(frame.data.clone())
                .map(AnalysisEvent::Chart),
            "status" => serde_json::from_value::<StatusPayload>(frame.data.clone())
                .map(|p| AnalysisEvent::Status { message: p.message }),
            "complete" => serde_json::from_value::<CompletePayload>(frame.data.clone())
                .map(|p| AnalysisEvent::Complete { message: p.message }),
            "error" => serde_json::from_value::<ErrorPayload>(frame.data.clone())
                .map(|p| AnalysisEvent::Error { error: p.error }),
            other => {
                tracing::debug!("Ignoring frame with unrecognized event tag: {}", other);
                return None;
            }
        };

        match decoded {
            Ok(event) => Some(event),
            Err(e) => {
                tracing::debug!(
                    "Dropping {} frame with mismatched payload shape: {}",
                    frame.event,
                    e
                );
                None
            }
        }
    }
}
