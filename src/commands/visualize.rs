//! Batch visualization command handler
//!
//! Submits the file through the non-streaming flow, prints the analysis
//! text, lists the generated files, and downloads every image entry.

use crate::batch::VisualizeClient;
use crate::config::Config;
use crate::error::{Result, VizStreamError};
use colored::Colorize;
use prettytable::{format, Table};
use std::path::PathBuf;

/// Run one batch visualization from the CLI
///
/// # Arguments
///
/// * `config` - Global configuration (consumed)
/// * `file` - Data file to visualize
/// * `prompt` - Visualization prompt
/// * `analysis_type` - Analysis depth (basic, comprehensive, custom)
///
/// # Errors
///
/// Returns an error if the request fails or the backend reports an
/// unsuccessful analysis.
pub async fn run_visualize(
    config: Config,
    file: PathBuf,
    prompt: String,
    analysis_type: String,
) -> Result<()> {
    let client = VisualizeClient::new(&config)?;
    let response = client.visualize(&file, &prompt, &analysis_type).await?;

    if !response.success {
        // On failure the backend puts the error detail in response_text.
        if !response.response_text.is_empty() {
            eprintln!("{}", response.response_text.red());
        }
        return Err(VizStreamError::Request("visualization failed".into()).into());
    }

    println!("{}", response.response_text);

    if response.generated_files.is_empty() {
        eprintln!("{}", "No files were generated".yellow());
        return Ok(());
    }

    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_BORDERS_ONLY);
    table.add_row(prettytable::row![
        "Name".bold(),
        "Type".bold(),
        "Size".bold()
    ]);
    for file in &response.generated_files {
        table.add_row(prettytable::row![
            file.name,
            file.file_type,
            format!("{} bytes", file.size_bytes)
        ]);
    }
    table.printstd();

    let dir = PathBuf::from(&config.output.charts_dir);
    let saved = client.download_images(&response.generated_files, &dir).await;
    eprintln!(
        "{}",
        format!(
            "Downloaded {} images to {} ({:.2}s server time)",
            saved.len(),
            dir.display(),
            response.execution_time
        )
        .green()
    );
    Ok(())
}
