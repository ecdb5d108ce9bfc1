//! Codex provider descriptor.

use std::sync::Arc;

use tallybar_core::{ProviderKind, ProviderMetadata, UsageProvider};

use super::fetcher::CodexProvider;
use crate::descriptor::{CliConfig, ProviderDescriptor};

/// Creates the Codex provider descriptor.
pub fn codex_descriptor() -> ProviderDescriptor {
    ProviderDescriptor {
        metadata: codex_metadata(),
        cli: codex_cli_config(),
        build: || Arc::new(CodexProvider::new()) as Arc<dyn UsageProvider>,
    }
}

/// Codex metadata configuration.
pub(crate) fn codex_metadata() -> ProviderMetadata {
    ProviderMetadata {
        login_hint: "Install Codex CLI and run \"codex login\"".to_string(),
        dashboard_url: Some("https://platform.openai.com/usage".to_string()),
        status_page_url: Some("https://status.openai.com".to_string()),
        ..ProviderMetadata::new(ProviderKind::Codex)
    }
}

/// Codex CLI invocation surface.
pub(crate) fn codex_cli_config() -> CliConfig {
    CliConfig {
        aliases: vec!["openai".to_string()],
        rpc_args: Some(
            ["-s", "read-only", "-a", "untrusted", "app-server"]
                .iter()
                .map(ToString::to_string)
                .collect(),
        ),
        ..CliConfig::new("codex")
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptor_wiring() {
        let desc = codex_descriptor();
        assert_eq!(desc.id(), ProviderKind::Codex);
        assert_eq!(desc.cli_name(), "codex");
        assert_eq!(desc.cli.status_json_args, vec!["status", "--json"]);
        assert!(desc.cli.rpc_args.is_some());
        assert!(desc.metadata.login_hint.contains("codex login"));
    }
}
