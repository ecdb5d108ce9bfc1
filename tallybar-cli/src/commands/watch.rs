//! The `watch` command: periodic refresh loop.
//!
//! The refresh cadence normally comes from the settings collaborator;
//! here the `--interval` flag stands in for it.

use std::time::Duration;

use chrono::Local;
use tracing::debug;

use crate::output;
use crate::{Cli, OutputFormat};

/// Arguments for the watch command.
#[derive(clap::Args)]
pub struct WatchArgs {
    /// Refresh interval in minutes.
    #[arg(long, short, default_value_t = 5)]
    pub interval: u64,
}

/// Runs the watch command.
pub async fn run(args: &WatchArgs, cli: &Cli) -> anyhow::Result<()> {
    let manager = super::build_manager(cli.provider.as_deref())?;
    let interval = Duration::from_secs(args.interval.max(1) * 60);

    loop {
        manager.refresh_all().await;
        let usage = manager.get_latest_usage();

        if cli.format == OutputFormat::Json {
            output::json::print_usage(&usage, cli.pretty)?;
        } else {
            println!("--- {} ---", Local::now().format("%H:%M:%S"));
            output::text::print_usage(&usage, cli.no_color);
        }

        debug!(secs = interval.as_secs(), "Sleeping until next refresh");
        tokio::time::sleep(interval).await;
    }
}
