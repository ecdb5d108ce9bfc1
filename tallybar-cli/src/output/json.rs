//! JSON output rendering.

use std::collections::HashMap;

use tallybar_core::ProviderUsage;

/// Prints the usage map as JSON.
pub fn print_usage(usage: &HashMap<String, ProviderUsage>, pretty: bool) -> anyhow::Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(usage)?
    } else {
        serde_json::to_string(usage)?
    };
    println!("{json}");
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
