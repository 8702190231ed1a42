//! Command-line interface definition for VizStream
//!
//! This module defines the CLI structure using clap's derive API,
//! providing commands for streaming analysis, batch visualization,
//! and backend health checks.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// VizStream - streaming client for a data-visualization analysis backend
///
/// Upload a data file with a prompt, watch the analysis stream in as it
/// is produced, and collect the generated charts.
#[derive(Parser, Debug, Clone)]
#[command(name = "vizstream")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Override the backend origin from config (e.g. http://localhost:8000)
    #[arg(short, long)]
    pub backend: Option<String>,

    /// Override the chart output directory from config
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for VizStream
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Stream an analysis: upload a file and render events as they arrive
    Analyze {
        /// Data file to analyze
        file: PathBuf,

        /// Analysis prompt sent with the file
        #[arg(short, long)]
        prompt: String,
    },

    /// Run a batch visualization and download the generated images
    Visualize {
        /// Data file to visualize
        file: PathBuf,

        /// Visualization prompt sent with the file
        #[arg(short, long)]
        prompt: String,

        /// Analysis depth: basic, comprehensive, or custom
        #[arg(short, long, default_value = "comprehensive")]
        analysis_type: String,
    },

    /// Check backend health
    Status,
}

impl Cli {
    /// Parse command line arguments
    ///
    /// # Returns
    ///
    /// Returns the parsed CLI structure
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
