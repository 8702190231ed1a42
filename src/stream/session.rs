//! Per-request analysis session state
//!
//! An [`AnalysisSession`] holds everything accumulated for one analysis
//! request: the text buffer, the chart sequence, the latest status, and a
//! terminal error if one occurred. It is mutated only by applying frames
//! from the read loop, one at a time.

use crate::stream::event::{AnalysisEvent, ChartRecord, Frame};

/// Lifecycle phase of an analysis session
///
/// Transitions: `Idle → Active → (Complete | Failed)`. Both `Complete`
/// and `Failed` are terminal: once reached, applying further frames has
/// no observable effect. User cancellation returns the session to `Idle`
/// without a terminal frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// No request in flight
    Idle,
    /// A request is in flight; frames are being applied
    Active,
    /// The backend reported completion
    Complete,
    /// The backend reported an error or the connection failed
    Failed,
}

/// State for one analysis request, from start to terminal outcome
///
/// # Examples
///
/// ```
/// use vizstream::stream::{AnalysisSession, Frame, SessionPhase};
/// use serde_json::json;
///
/// let mut session = AnalysisSession::new();
/// session.activate();
/// session.apply(&Frame {
///     event: "text".to_string(),
///     data: json!({"content": "Hello"}),
/// });
/// assert_eq!(session.text(), "Hello");
/// assert_eq!(session.phase(), SessionPhase::Active);
/// ```
#[derive(Debug, Default)]
pub struct AnalysisSession {
    phase: SessionPhase,
    text: String,
    charts: Vec<ChartRecord>,
    status: Option<String>,
    error: Option<String>,
}

impl Default for SessionPhase {
    fn default() -> Self {
        SessionPhase::Idle
    }
}

impl AnalysisSession {
    /// Create an idle session with no accumulated state
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset all accumulated fields and enter the active phase
    ///
    /// Called when a new analysis starts; any state from a previous
    /// session is discarded.
    pub fn activate(&mut self) {
        *self = Self::default();
        self.phase = SessionPhase::Active;
    }

    /// Force the session out of the active phase without a terminal frame
    ///
    /// Models user-initiated cancellation, which is distinct from
    /// server-reported completion or failure: accumulated text and charts
    /// are kept for display until the next [`activate`](Self::activate).
    /// A no-op unless the session is active.
    pub fn interrupt(&mut self) {
        if self.phase == SessionPhase::Active {
            self.phase = SessionPhase::Idle;
        }
    }

    /// Record a client-side failure (request rejected, connection lost)
    ///
    /// Terminal, equivalent to a backend `error` frame.
    pub fn fail(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
        self.phase = SessionPhase::Failed;
    }

    /// Apply one frame to the session
    ///
    /// Dispatches on the frame's event tag: `text` appends to the buffer,
    /// `chart` appends to the chart sequence, `status` replaces the
    /// status message, `complete` and `error` are terminal. Unrecognized
    /// tags and malformed payloads mutate nothing.
    ///
    /// Once the session has left the active phase, every frame is a
    /// no-op; this models the backend's end-of-stream contract where
    /// nothing after a terminal frame has observable effect.
    ///
    /// Returns the applied event so a caller can render it, or `None`
    /// when the frame had no effect.
    pub fn apply(&mut self, frame: &Frame) -> Option<AnalysisEvent> {
        if self.phase != SessionPhase::Active {
            return None;
        }

        let event = AnalysisEvent::from_frame(frame)?;
        match &event {
            AnalysisEvent::Text { content } => {
                self.text.push_str(content);
            }
            AnalysisEvent::Chart(record) => {
                self.charts.push(record.clone());
            }
            AnalysisEvent::Status { message } => {
                self.status = Some(message.clone());
            }
            AnalysisEvent::Complete { message } => {
                self.status = Some(message.clone());
                self.phase = SessionPhase::Complete;
            }
            AnalysisEvent::Error { error } => {
                self.error = Some(error.clone());
                self.phase = SessionPhase::Failed;
            }
        }
        Some(event)
    }

    /// Current lifecycle phase
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// True once the session reached `Complete` or `Failed`
    pub fn is_terminal(&self) -> bool {
        matches!(self.phase, SessionPhase::Complete | SessionPhase::Failed)
    }

    /// Accumulated response text, in arrival order
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Charts received so far, in arrival order
    pub fn charts(&self) -> &[ChartRecord] {
        &self.charts
    }

    /// Most recent status message
    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    /// Terminal error, if the session failed
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}
