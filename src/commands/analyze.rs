//! Streaming analysis command handler
//!
//! Uploads the file, then renders the stream as it arrives: response
//! text goes to stdout incrementally, status updates and chart saves are
//! reported on stderr, and Ctrl-C cancels the stream through the
//! controller's stop handle.

use crate::config::Config;
use crate::error::{Result, VizStreamError};
use crate::media;
use crate::stream::{AnalysisController, AnalysisEvent, SessionPhase};
use colored::Colorize;
use std::io::Write;
use std::path::PathBuf;

/// Run one streaming analysis from the CLI
///
/// # Arguments
///
/// * `config` - Global configuration (consumed)
/// * `file` - Data file to analyze
/// * `prompt` - Analysis prompt
///
/// # Errors
///
/// Returns an error if the file cannot be prepared or the session ends
/// in a failure state.
pub async fn run_analyze(config: Config, file: PathBuf, prompt: String) -> Result<()> {
    let charts_dir = PathBuf::from(&config.output.charts_dir);
    let mut controller = AnalysisController::new(&config)?;

    // Ctrl-C cancels the active stream instead of killing the process
    // mid-write.
    let stop = controller.stop_handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            stop.stop();
        }
    });

    let mut saved: Vec<PathBuf> = Vec::new();
    controller
        .start_analysis(Some(&file), &prompt, |event| match event {
            AnalysisEvent::Text { content } => {
                print!("{}", content);
                let _ = std::io::stdout().flush();
            }
            AnalysisEvent::Chart(record) => match media::write_chart(record, &charts_dir) {
                Ok(path) => {
                    eprintln!("{}", format!("Saved chart {}", path.display()).green());
                    saved.push(path);
                }
                Err(e) => {
                    eprintln!(
                        "{}",
                        format!("Failed to save {}: {}", record.filename, e).red()
                    );
                }
            },
            AnalysisEvent::Status { message } => {
                eprintln!("{}", format!("[{}]", message).cyan());
            }
            AnalysisEvent::Complete { message } => {
                println!();
                if !message.is_empty() {
                    eprintln!("{}", message.green());
                }
            }
            AnalysisEvent::Error { error } => {
                println!();
                eprintln!("{}", format!("Analysis failed: {}", error).red());
            }
        })
        .await?;

    match controller.session().phase() {
        SessionPhase::Complete => {
            if !saved.is_empty() {
                eprintln!(
                    "{}",
                    format!("{} charts saved to {}", saved.len(), charts_dir.display()).green()
                );
            }
            Ok(())
        }
        SessionPhase::Failed => {
            let message = controller
                .session()
                .error()
                .unwrap_or("analysis failed")
                .to_string();
            Err(VizStreamError::Stream(message).into())
        }
        SessionPhase::Idle => {
            eprintln!("{}", "Analysis cancelled".yellow());
            Ok(())
        }
        SessionPhase::Active => {
            eprintln!("{}", "Stream ended without completion".yellow());
            Ok(())
        }
    }
}
