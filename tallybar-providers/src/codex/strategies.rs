//! Codex fetch strategies.
//!
//! The three cascading stages behind the version probe:
//!
//! 1. **Status JSON** - `codex status --json`
//! 2. **RPC** - `getUsage` against the app-server mode
//! 3. **Text scrape** - `codex status`

use async_trait::async_trait;
use tallybar_core::{ProviderMetadata, UsageReport};
use tallybar_fetch::{
    FetchContext, FetchError, FetchKind, FetchResult, FetchStrategy, RpcProbe,
};
use tracing::{debug, instrument, warn};

use super::parser;
use crate::descriptor::CliConfig;

// ============================================================================
// Status JSON Strategy
// ============================================================================

/// Fetches usage via the JSON-emitting status subcommand.
pub struct CodexStatusJsonStrategy {
    cli: CliConfig,
    metadata: ProviderMetadata,
}

impl CodexStatusJsonStrategy {
    /// Creates the strategy for the given CLI configuration.
    pub fn new(cli: CliConfig, metadata: ProviderMetadata) -> Self {
        Self { cli, metadata }
    }
}

#[async_trait]
impl FetchStrategy for CodexStatusJsonStrategy {
    fn id(&self) -> &str {
        "codex.status_json"
    }

    fn kind(&self) -> FetchKind {
        FetchKind::StatusJson
    }

    async fn is_available(&self, ctx: &FetchContext) -> bool {
        ctx.process.command_exists(&self.cli.name)
    }

    #[instrument(skip(self, ctx))]
    async fn fetch(&self, ctx: &FetchContext) -> Result<FetchResult, FetchError> {
        debug!("Fetching Codex usage via status JSON");

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
        let report = parser::parse_status_json(stdout, &self.metadata)?;

        Ok(FetchResult::new(report, self.id(), self.kind()))
    }
}

// ============================================================================
// RPC Strategy
// ============================================================================

/// Fetches usage via the app-server JSON-RPC mode.
pub struct CodexRpcStrategy {
    cli: CliConfig,
    metadata: ProviderMetadata,
}

impl CodexRpcStrategy {
    /// Creates the strategy for the given CLI configuration.
    pub fn new(cli: CliConfig, metadata: ProviderMetadata) -> Self {
        Self { cli, metadata }
    }
}

#[async_trait]
impl FetchStrategy for CodexRpcStrategy {
    fn id(&self) -> &str {
        "codex.rpc"
    }

    fn kind(&self) -> FetchKind {
        FetchKind::Rpc
    }

    async fn is_available(&self, ctx: &FetchContext) -> bool {
        self.cli.rpc_args.is_some() && ctx.process.command_exists(&self.cli.name)
    }

    #[instrument(skip(self, ctx))]
    async fn fetch(&self, ctx: &FetchContext) -> Result<FetchResult, FetchError> {
        debug!("Fetching Codex usage via RPC");

        let args = self.cli.rpc_args.clone().ok_or_else(|| {
            FetchError::StrategyNotAvailable("No RPC mode configured".to_string())
        })?;

        let probe = RpcProbe::new(self.cli.name.clone(), args).with_timeout(ctx.timeout());
        let value = probe.request(&self.cli.rpc_method).await?;

        let report = parser::parse_rpc_value(value, &self.metadata)?;

        Ok(FetchResult::new(report, self.id(), self.kind()))
    }
}

// ============================================================================
// Text Scrape Strategy (final fallback)
// ============================================================================

/// Scrapes the plain-text status output.
///
/// As the last stage of the chain this one catches rather than
/// propagates: a failed invocation becomes a "needs login" report, so
/// the chain always ends in a well-formed result once the version probe
/// has passed.
pub struct CodexTextStrategy {
    cli: CliConfig,
    metadata: ProviderMetadata,
}

impl CodexTextStrategy {
    /// Creates the strategy for the given CLI configuration.
    pub fn new(cli: CliConfig, metadata: ProviderMetadata) -> Self {
        Self { cli, metadata }
    }

    fn reauth_hint(&self) -> String {
        format!("Run \"{} login\" to authenticate", self.cli.name)
    }
}

#[async_trait]
impl FetchStrategy for CodexTextStrategy {
    fn id(&self) -> &str {
        "codex.text"
    }

    fn kind(&self) -> FetchKind {
        FetchKind::TextScrape
    }

    async fn is_available(&self, ctx: &FetchContext) -> bool {
        ctx.process.command_exists(&self.cli.name)
    }

    #[instrument(skip(self, ctx))]
    async fn fetch(&self, ctx: &FetchContext) -> Result<FetchResult, FetchError> {
        debug!("Fetching Codex usage via text scrape");

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
                parser::parse_status_text(&output.stdout, &self.metadata)
            }
            Ok(output) => {
                warn!(
                    exit_code = output.exit_code,
                    "Status command failed, treating as logged out"
                );
                UsageReport::login_required(self.reauth_hint())
            }
            Err(e) => {
                warn!(error = %e, "Status command errored, treating as logged out");
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
    use super::super::descriptor::{codex_cli_config, codex_metadata};

    #[test]
    fn test_strategy_identities() {
        let cli = codex_cli_config();
        let meta = codex_metadata();

        let json = CodexStatusJsonStrategy::new(cli.clone(), meta.clone());
        assert_eq!(json.id(), "codex.status_json");
        assert_eq!(json.kind(), FetchKind::StatusJson);

        let rpc = CodexRpcStrategy::new(cli.clone(), meta.clone());
        assert_eq!(rpc.id(), "codex.rpc");
        assert_eq!(rpc.kind(), FetchKind::Rpc);

        let text = CodexTextStrategy::new(cli, meta);
        assert_eq!(text.id(), "codex.text");
        assert_eq!(text.kind(), FetchKind::TextScrape);
    }

    #[test]
    fn test_strategy_priority_order() {
        let cli = codex_cli_config();
        let meta = codex_metadata();

        let json = CodexStatusJsonStrategy::new(cli.clone(), meta.clone()).priority();
        let rpc = CodexRpcStrategy::new(cli.clone(), meta.clone()).priority();
        let text = CodexTextStrategy::new(cli, meta).priority();

        assert!(json > rpc);
        assert!(rpc > text);
    }
}
