//! Claude provider descriptor.

use std::sync::Arc;

use tallybar_core::{ProviderKind, ProviderMetadata, UsageProvider};

use super::fetcher::ClaudeProvider;
use crate::descriptor::{CliConfig, ProviderDescriptor};

/// Creates the Claude provider descriptor.
pub fn claude_descriptor() -> ProviderDescriptor {
    ProviderDescriptor {
        metadata: claude_metadata(),
        cli: claude_cli_config(),
        build: || Arc::new(ClaudeProvider::new()) as Arc<dyn UsageProvider>,
    }
}

/// Claude metadata configuration.
pub(crate) fn claude_metadata() -> ProviderMetadata {
    ProviderMetadata {
        login_hint: "Install Claude Code and run \"claude login\"".to_string(),
        dashboard_url: Some("https://claude.ai/settings/usage".to_string()),
        status_page_url: Some("https://status.anthropic.com".to_string()),
        ..ProviderMetadata::new(ProviderKind::Claude)
    }
}

/// Claude CLI invocation surface. No RPC server mode.
pub(crate) fn claude_cli_config() -> CliConfig {
    CliConfig {
        status_json_args: vec!["usage".to_string(), "--json".to_string()],
        status_args: vec!["usage".to_string()],
        ..CliConfig::new("claude")
    }
}

// ============================================================================
// Tests
// ============================================================================
