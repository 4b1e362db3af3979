//! Training-set preparation CLI application.

mod cli;
mod pipeline;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use mlprep_config::load_config;
use mlprep_monitor::{setup_logging, LogFormat};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logging defaults come from the config file when it loads
    let logging = load_config(&cli.config)
        .map(|config| config.logging)
        .unwrap_or_default();
    let level = cli
        .log_level
        .map(|level| level.as_str().to_string())
        .unwrap_or(logging.level.clone());
    let format = if cli.json_logs || logging.is_json() {
        LogFormat::Json
    } else {
        LogFormat::Pretty
    };
    setup_logging(&level, format)?;

    match cli.command {
        Commands::Fetch(args) => cli::commands::fetch::run(args, &cli.config).await,
        Commands::Prepare(args) => cli::commands::prepare::run(args, &cli.config).await,
        Commands::Methods(args) => cli::commands::methods::run(args).await,
        Commands::ValidateConfig => cli::commands::validate::run(&cli.config).await,
    }
}
