//! CLI definitions.

pub mod commands;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "mlprep")]
#[command(author, version, about = "Training-set preparation and quote feed ingestion")]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config/default.toml", env = "MLPREP_CONFIG")]
    pub config: PathBuf,

    /// Log level, overriding the configured one
    #[arg(short, long)]
    pub log_level: Option<LogLevel>,

    /// Enable JSON log format
    #[arg(long)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch quotes for the configured group and export them as CSV
    Fetch(FetchArgs),
    /// Load, shuffle and rebalance the model data
    Prepare(PrepareArgs),
    /// List available sampling methods
    Methods(MethodsArgs),
    /// Validate configuration
    ValidateConfig,
}

#[derive(clap::Args)]
pub struct FetchArgs {
    /// Days of history, overriding the configured lookback
    #[arg(long)]
    pub lookback: Option<u32>,

    /// Directory for the exported tables
    #[arg(short, long, default_value = "data")]
    pub output: PathBuf,
}

#[derive(clap::Args)]
pub struct PrepareArgs {
    /// Directory for the prepared datasets [default: <model directory>/output]
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(clap::Args)]
pub struct MethodsArgs {
    /// Print as JSON
    #[arg(long)]
    pub json: bool,
}
