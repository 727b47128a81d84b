// SPDX-FileCopyrightText: 2026 Epigraph Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Epigraph - streaming analysis of ancient inscriptions.
//!
//! This is the binary entry point for the Epigraph command-line client.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod analyze;
mod health;
mod render;
mod signal;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgGroup, Args, Parser, Subcommand};
use epigraph_config::EpigraphConfig;
use epigraph_core::{EpigraphError, Locale};

/// Exit status when the user interrupts an analysis.
const EXIT_INTERRUPTED: u8 = 130;

/// Epigraph - streaming analysis of ancient inscriptions.
#[derive(Parser, Debug)]
#[command(name = "epigraph", version, about, long_about = None)]
struct Cli {
    /// Load configuration from this file instead of the XDG hierarchy.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Submit an inscription and stream its analysis.
    Analyze(AnalyzeArgs),
    /// Check that the analysis server is reachable and healthy.
    Health {
        /// Disable colored output.
        #[arg(long)]
        plain: bool,
    },
    /// Print the effective configuration as TOML.
    Config,
}

/// Arguments of `epigraph analyze`.
#[derive(Args, Debug)]
#[command(group(ArgGroup::new("source").required(true).args(["text", "file", "camera"])))]
pub struct AnalyzeArgs {
    /// Inscription text to analyze.
    #[arg(long)]
    pub text: Option<String>,

    /// File to read and submit.
    #[arg(long, value_name = "PATH")]
    pub file: Option<PathBuf>,

    /// Captured photo to submit.
    #[arg(long, value_name = "PATH")]
    pub camera: Option<PathBuf>,

    /// Output language (he, en). Defaults to `app.locale`.
    #[arg(long)]
    pub lang: Option<Locale>,

    /// Print the final result as JSON.
    #[arg(long)]
    pub json: bool,

    /// Disable colors and the progress bar.
    #[arg(long)]
    pub plain: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => epigraph_config::load_and_validate_path(path),
        None => epigraph_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            epigraph_config::render_errors(&errors);
            return ExitCode::FAILURE;
        }
    };

    init_tracing(&config.app.log_level);

    let result = match cli.command {
        Commands::Analyze(args) => analyze::run_analyze(&config, args).await,
        Commands::Health { plain } => health::run_health(&config, plain).await,
        Commands::Config => print_config(&config),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn print_config(config: &EpigraphConfig) -> Result<ExitCode, EpigraphError> {
    let rendered = toml::to_string_pretty(config)
        .map_err(|e| EpigraphError::Internal(format!("failed to render configuration: {e}")))?;
    print!("{rendered}");
    Ok(ExitCode::SUCCESS)
}

/// Logs go to stderr so `--json` output stays machine-readable.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "epigraph={log_level},epigraph_client={log_level},warn"
        ))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
