//! The `usage` command: refresh selected providers and render.

use crate::output;
use crate::{Cli, OutputFormat};

/// Runs the usage command.
pub async fn run(cli: &Cli) -> anyhow::Result<()> {
    let manager = super::build_manager(cli.provider.as_deref())?;

    manager.refresh_all().await;
    let usage = manager.get_latest_usage();

    match cli.format {
        OutputFormat::Json => output::json::print_usage(&usage, cli.pretty)?,
        OutputFormat::Text => output::text::print_usage(&usage, cli.no_color),
    }

    Ok(())
}
