//! Claude fetch strategies.
//!
//! Two cascading stages behind the version probe: usage JSON, then the
//! text scrape that never propagates its own failure.

use async_trait::async_trait;
use tallybar_core::{ProviderMetadata, UsageReport};
use tallybar_fetch::{FetchContext, FetchError, FetchKind, FetchResult, FetchStrategy};
use tracing::{debug, instrument, warn};

use super::parser;
use crate::descriptor::CliConfig;

// ============================================================================
// Usage JSON Strategy
// ============================================================================

/// Fetches usage via `claude usage --json`.
pub struct ClaudeStatusJsonStrategy {
    cli: CliConfig,
    metadata: ProviderMetadata,
}

impl ClaudeStatusJsonStrategy {
    /// Creates the strategy for the given CLI configuration.
    pub fn new(cli: CliConfig, metadata: ProviderMetadata) -> Self {
        Self { cli, metadata }
    }
}

#[async_trait]
impl FetchStrategy for ClaudeStatusJsonStrategy {
    fn id(&self) -> &str {
        "claude.usage_json"
    }

    fn kind(&self) -> FetchKind {
        FetchKind::StatusJson
    }

    async fn is_available(&self, ctx: &FetchContext) -> bool {
        ctx.process.command_exists(&self.cli.name)
    }

    #[instrument(skip(self, ctx))]
    async fn fetch(&self, ctx: &FetchContext) -> Result<FetchResult, FetchError> {
        debug!("Fetching Claude usage via JSON");

        let args = CliConfig::arg_refs(&self.cli.status_json_args);
        let output = ctx
            .process
            .run_limited(
                &self.cli.name,
                &args,
                ctx.timeout(),
                ctx.settings.json_output_limit,
            )
            .await?;

        let stdout = output.stdout_if_success()?;
        let report = parser::parse_usage_json(stdout, &self.metadata)?;

        Ok(FetchResult::new(report, self.id(), self.kind()))
    }
}

// ============================================================================
// Text Scrape Strategy (final fallback)
// ============================================================================

/// Scrapes `claude usage` text output; catches its own failures.
pub struct ClaudeTextStrategy {
    cli: CliConfig,
    metadata: ProviderMetadata,
}

impl ClaudeTextStrategy {
    /// Creates the strategy for the given CLI configuration.
    pub fn new(cli: CliConfig, metadata: ProviderMetadata) -> Self {
        Self { cli, metadata }
    }

    fn reauth_hint(&self) -> String {
        format!("Run \"{} login\" to authenticate", self.cli.name)
    }
}

#[async_trait]
impl FetchStrategy for ClaudeTextStrategy {
    fn id(&self) -> &str {
        "claude.text"
    }

    fn kind(&self) -> FetchKind {
        FetchKind::TextScrape
    }

    async fn is_available(&self, ctx: &FetchContext) -> bool {
        ctx.process.command_exists(&self.cli.name)
    }

    #[instrument(skip(self, ctx))]
    async fn fetch(&self, ctx: &FetchContext) -> Result<FetchResult, FetchError> {
        debug!("Fetching Claude usage via text scrape");

        let args = CliConfig::arg_refs(&self.cli.status_args);
        let invocation = ctx
            .process
            .run_limited(
                &self.cli.name,
                &args,
                ctx.timeout(),
                ctx.settings.text_output_limit,
            )
            .await;

        let report = match invocation {
            Ok(output) if output.success() => {
                parser::parse_usage_text(&output.stdout, &self.metadata)
            }
            Ok(output) => {
                warn!(
                    exit_code = output.exit_code,
                    "Usage command failed, treating as logged out"
                );
                UsageReport::login_required(self.reauth_hint())
            }
            Err(e) => {
                warn!(error = %e, "Usage command errored, treating as logged out");
                UsageReport::login_required(self.reauth_hint())
            }
        };

        Ok(FetchResult::new(report, self.id(), self.kind()))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use super::super::descriptor::{claude_cli_config, claude_metadata};

    #[test]
    fn test_strategy_identities() {
        let json = ClaudeStatusJsonStrategy::new(claude_cli_config(), claude_metadata());
        assert_eq!(json.id(), "claude.usage_json");
        assert_eq!(json.kind(), FetchKind::StatusJson);

        let text = ClaudeTextStrategy::new(claude_cli_config(), claude_metadata());
        assert_eq!(text.id(), "claude.text");
        assert_eq!(text.kind(), FetchKind::TextScrape);

        assert!(json.priority() > text.priority());
    }
}
