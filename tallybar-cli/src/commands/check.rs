//! The `check` command: tool availability and stored sessions.

use crate::{Cli, OutputFormat};

/// Runs the check command.
pub async fn run(cli: &Cli) -> anyhow::Result<()> {
    let descriptors = super::resolve_descriptors(cli.provider.as_deref())?;

    for desc in descriptors {
        let provider = desc.build_provider();
        let available = provider.is_available().await;
        let has_session = provider.has_stored_session();

        if cli.format == OutputFormat::Json {
            println!(
                "{}",
                serde_json::json!({
                    "provider": desc.id().id(),
                    "available": available,
                    "storedSession": has_session,
                })
            );
            continue;
        }

        let status = match (available, cli.no_color) {
            (true, true) => "✓ available".to_string(),
            (true, false) => "\x1b[32m✓\x1b[0m available".to_string(),
            (false, true) => "✗ not installed".to_string(),
            (false, false) => "\x1b[31m✗\x1b[0m not installed".to_string(),
        };

        let session = if has_session { "session stored" } else { "no session" };

        println!("{:<10} {status} ({session})", desc.display_name());
    }

    Ok(())
}
