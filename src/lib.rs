//! VizStream - streaming client library for a data-visualization
//! analysis backend
//!
//! This library provides the core functionality for the `vizstream` CLI,
//! including the stream frame parser, the per-request session state, the
//! request controller, and the batch visualization client.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - `stream`: Frame parsing, session state, and the request controller
//! - `batch`: Non-streaming visualization flow with image downloads
//! - `media`: File payload encoding and chart materialization
//! - `config`: Configuration management and validation
//! - `error`: Error types and result aliases
//! - `cli`: Command-line interface definition
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use vizstream::{AnalysisController, Config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::default();
//!     config.validate()?;
//!
//!     let mut controller = AnalysisController::new(&config)?;
//!     controller
//!         .start_analysis(Some(Path::new("data.csv")), "Plot the trends", |event| {
//!             println!("{:?}", event);
//!         })
//!         .await?;
//!     Ok(())
//! }
//! ```

pub mod batch;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod media;
pub mod stream;

// Re-export commonly used types
pub use batch::{GeneratedFile, VisualizeClient, VisualizeResponse};
pub use config::Config;
pub use error::{Result, VizStreamError};
pub use stream::{
    AnalysisController, AnalysisEvent, AnalysisSession, ChartRecord, Frame, FrameParser,
    SessionPhase, StopHandle,
};
