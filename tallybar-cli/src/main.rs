// Lint configuration for this crate
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! Tallybar CLI - AI coding assistant quota monitoring from the command line.
//!
//! # Examples
//!
//! ```bash
//! # Show usage for default providers
//! tallybar
//!
//! # Show usage for a specific provider
//! tallybar --provider codex
//!
//! # JSON output
//! tallybar --format json --pretty
//!
//! # List providers
//! tallybar providers
//!
//! # Check tool availability
//! tallybar check
//!
//! # Refresh every 5 minutes
//! tallybar watch --interval 5
//! ```

mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use commands::{check, providers, usage, watch};

// ============================================================================
// CLI Definition
// ============================================================================

/// Tallybar CLI - AI coding assistant quota monitoring.
#[derive(Parser)]
#[command(name = "tallybar")]
#[command(about = "AI coding assistant quota monitoring CLI")]
#[command(version)]
pub struct Cli {
    /// Subcommand to run. If none, runs 'usage' by default.
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output format (text or json).
    #[arg(long, short = 'f', default_value = "text", global = true)]
    pub format: OutputFormat,

    /// Pretty-print JSON output.
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Provider to query ("all" or comma-separated: "codex,claude").
    #[arg(long, short, global = true)]
    pub provider: Option<String>,

    /// Verbose output (show debug info).
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Disable colored output.
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Quiet mode (minimal output).
    #[arg(long, short, global = true)]
    pub quiet: bool,
}

/// CLI commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Fetch current usage (default if no command specified).
    #[command(visible_alias = "u")]
    Usage,

    /// List available providers.
    #[command(visible_alias = "p")]
    Providers,

    /// Check provider tool availability and stored sessions.
    Check,

    /// Refresh on an interval (like htop for quota).
    #[command(visible_alias = "w")]
    Watch(watch::WatchArgs),
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable text with colors.
    #[default]
    Text,
    /// JSON output for scripting.
    Json,
}

// ============================================================================
// Logging Setup
// ============================================================================

fn setup_logging(verbose: bool, quiet: bool) {
    if quiet {
        return;
    }

    let filter = if verbose {
        EnvFilter::new("tallybar=debug,info")
    } else {
        EnvFilter::new("tallybar=warn")
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let result = match &cli.command {
        Some(Commands::Providers) => providers::run(&cli),
        Some(Commands::Check) => check::run(&cli).await,
        Some(Commands::Watch(args)) => watch::run(args, &cli).await,
        Some(Commands::Usage) | None => usage::run(&cli).await,
    };

    if let Err(e) = result {
        if !cli.quiet {
            eprintln!("Error: {e}");
        }
        std::process::exit(1);
    }

    Ok(())
}
