//! The `providers` command: list the registry.

use tallybar_providers::ProviderRegistry;

use crate::{Cli, OutputFormat};

/// Runs the providers command.
pub fn run(cli: &Cli) -> anyhow::Result<()> {
    if cli.format == OutputFormat::Json {
        let entries: Vec<serde_json::Value> = ProviderRegistry::all()
            .iter()
            .map(|desc| {
                serde_json::json!({
                    "id": desc.id().id(),
                    "displayName": desc.display_name(),
                    "cli": desc.cli_name(),
                    "defaultEnabled": desc.metadata.default_enabled,
                })
            })
            .collect();

        let json = if cli.pretty {
            serde_json::to_string_pretty(&entries)?
        } else {
            serde_json::to_string(&entries)?
        };
        println!("{json}");
        return Ok(());
    }

    for desc in ProviderRegistry::all() {
        let default = if desc.metadata.default_enabled {
            "default"
        } else {
            "opt-in"
        };
        println!(
            "{:<10} cli: {:<8} [{}]",
            desc.display_name(),
            desc.cli_name(),
            default
        );
    }

    Ok(())
}
