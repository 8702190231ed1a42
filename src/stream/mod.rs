//! Streaming analysis pipeline
//!
//! This module contains the three pieces that turn an open HTTP response
//! body into rendered analysis state:
//!
//! - [`FrameParser`]: reassembles raw byte chunks into `event:`/`data:`
//!   frames
//! - [`AnalysisSession`]: per-request state mutated by applying frames
//! - [`AnalysisController`]: owns one request/response exchange, including
//!   cancellation

pub mod controller;
pub mod event;
pub mod parser;
pub mod session;

pub use controller::{AnalysisController, StopHandle};
pub use event::{AnalysisEvent, ChartRecord, Frame};
pub use parser::FrameParser;
pub use session::{AnalysisSession, SessionPhase};
