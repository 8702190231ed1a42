//! VizStream - streaming analysis CLI
//!
#![doc = "VizStream - streaming analysis CLI"]
#![doc = "Main entry point for the vizstream client application."]

use anyhow::Result;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use vizstream::cli::{Cli, Commands};
use vizstream::commands;
use vizstream::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse_args();

    // Initialize tracing
    init_tracing(cli.verbose);

    // Load configuration
    let config_path = cli.config.clone().unwrap_or_else(|| "config/config.yaml".to_string());
    let config = Config::load(&config_path, &cli)?;

    // Validate configuration
    config.validate()?;

    // Execute command
    match cli.command {
        Commands::Analyze { file, prompt } => {
            tracing::info!("Starting streaming analysis");
            commands::analyze::run_analyze(config, file, prompt).await?;
            Ok(())
        }
        Commands::Visualize {
            file,
            prompt,
            analysis_type,
        } => {
            tracing::info!("Starting batch visualization");
            commands::visualize::run_visualize(config, file, prompt, analysis_type).await?;
            Ok(())
        }
        Commands::Status => {
            tracing::debug!("Checking backend health");
            commands::status::run_status(config).await?;
            Ok(())
        }
    }
}

/// Initialize tracing subscriber with environment filter
fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "vizstream=debug"
    } else {
        "vizstream=info"
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
