//! Main Codex usage fetcher.
//!
//! Orchestrates the full chain: version probe first (terminal on
//! failure), then the strategy cascade, then record assembly. Whatever
//! happens, exactly one `ProviderUsage` comes out.

use async_trait::async_trait;
use regex::Regex;
use std::sync::LazyLock;
use tallybar_core::{
    CoreError, ProviderKind, ProviderMetadata, ProviderUsage, UsageProvider,
};
use tallybar_fetch::{FetchContext, FetchError, FetchPipeline, FetchStrategy};
use tracing::{info, instrument, warn};

use super::auth;
use super::descriptor::{codex_cli_config, codex_metadata};
use super::strategies::{CodexRpcStrategy, CodexStatusJsonStrategy, CodexTextStrategy};
use crate::descriptor::CliConfig;

/// Semantic version extracted from `--version` output.
static SEMVER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+\.\d+\.\d+)").expect("Invalid regex"));

// ============================================================================
// Fetcher
// ============================================================================

/// Main Codex usage fetcher.
#[derive(Debug, Clone)]
pub struct CodexUsageFetcher {
    metadata: ProviderMetadata,
    cli: CliConfig,
}

impl CodexUsageFetcher {
    /// Creates a fetcher with the real Codex CLI configuration.
    pub fn new() -> Self {
        Self {
            metadata: codex_metadata(),
            cli: codex_cli_config(),
        }
    }

    /// Creates a fetcher with a custom CLI configuration.
    ///
    /// Used by tests to point the chain at a stand-in binary.
    pub fn with_cli(cli: CliConfig) -> Self {
        Self {
            metadata: codex_metadata(),
            cli,
        }
    }

    /// Returns the provider metadata.
    pub fn metadata(&self) -> &ProviderMetadata {
        &self.metadata
    }

    /// Probes the installed tool version.
    ///
    /// Command success without a recognizable version yields `"unknown"`;
    /// only a failed invocation is a probe failure.
    ///
    /// # Errors
    ///
    /// Returns `FetchError::Process` when the tool is missing, exits
    /// non-zero, or times out.
    #[instrument(skip(self, ctx))]
    pub async fn detect_version(&self, ctx: &FetchContext) -> Result<String, FetchError> {
        let args = CliConfig::arg_refs(&self.cli.version_args);
        let output = ctx
            .process
            .run_limited(
                &self.cli.name,
                &args,
                ctx.timeout(),
                ctx.settings.text_output_limit,
            )
            .await?;

        let stdout = output.stdout_if_success()?;
        Ok(version_from_output(stdout))
    }

    /// Quick availability check: can the tool report a version.
    pub async fn is_available(&self, ctx: &FetchContext) -> bool {
        self.detect_version(ctx).await.is_ok()
    }

    /// Runs the full fetch chain, always producing one record.
    #[instrument(skip(self, ctx))]
    pub async fn fetch(&self, ctx: &FetchContext) -> ProviderUsage {
        // Stage gate: no working version command means no tool worth
        // talking to - terminal, with an actionable hint
        let version = match self.detect_version(ctx).await {
            Ok(version) => version,
            Err(e) => {
                warn!(error = %e, "Version probe failed");
                return ProviderUsage::login_required(
                    ProviderKind::Codex,
                    self.metadata.login_hint.clone(),
                );
            }
        };

        let outcome = self.build_pipeline().execute(ctx).await;

        match outcome.result {
            Ok(result) => {
                info!(strategy = %result.strategy_id, "Codex fetch succeeded");
                let mut report = result.report;

                // Fill identity gaps from the stored session, which often
                // knows more than the older CLI surfaces do
                let auth_identity = auth::read_account_identity();
                if let Some(auth_identity) = auth_identity {
                    match report.identity.as_mut() {
                        Some(identity) => identity.merge_missing(auth_identity),
                        None => report.identity = Some(auth_identity),
                    }
                }

                ProviderUsage::from_report(&self.metadata, Some(version), report)
            }
            Err(e) => {
                // The text stage catches its own failures, so this path
                // only fires when every stage was unavailable
                warn!(error = %e, "All Codex stages failed");
                ProviderUsage::login_required(
                    ProviderKind::Codex,
                    self.metadata.login_hint.clone(),
                )
                .with_version(version)
            }
        }
    }

    fn build_pipeline(&self) -> FetchPipeline {
        let mut strategies: Vec<Box<dyn FetchStrategy>> = vec![
            Box::new(CodexStatusJsonStrategy::new(
                self.cli.clone(),
                self.metadata.clone(),
            )),
            Box::new(CodexTextStrategy::new(
                self.cli.clone(),
                self.metadata.clone(),
            )),
        ];

        if self.cli.rpc_args.is_some() {
            strategies.push(Box::new(CodexRpcStrategy::new(
                self.cli.clone(),
                self.metadata.clone(),
            )));
        }

        FetchPipeline::with_strategies(strategies)
    }
}

impl Default for CodexUsageFetcher {
    fn default() -> Self {
        Self::new()
    }
}

/// Extracts a semantic version from version-command output.
fn version_from_output(stdout: &str) -> String {
    SEMVER_RE
        .captures(stdout)
        .map_or_else(|| "unknown".to_string(), |c| c[1].to_string())
}

// ============================================================================
// Provider
// ============================================================================

/// Codex provider: the fetcher plus its fetch context, satisfying the
/// provider contract the manager consumes.
pub struct CodexProvider {
    fetcher: CodexUsageFetcher,
    ctx: FetchContext,
}

impl CodexProvider {
    /// Creates the provider with default settings.
    pub fn new() -> Self {
        Self {
            fetcher: CodexUsageFetcher::new(),
            ctx: FetchContext::new(),
        }
    }

    /// Creates the provider from explicit parts (used by tests).
    pub fn from_parts(fetcher: CodexUsageFetcher, ctx: FetchContext) -> Self {
        Self { fetcher, ctx }
    }
}

impl Default for CodexProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UsageProvider for CodexProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Codex
    }

    async fn is_available(&self) -> bool {
        self.fetcher.is_available(&self.ctx).await
    }

    async fn fetch(&self) -> ProviderUsage {
        self.fetcher.fetch(&self.ctx).await
    }

    fn has_stored_session(&self) -> bool {
        auth::has_stored_session()
    }

    fn clear_stored_session(&self) -> Result<(), CoreError> {
        auth::clear_stored_session().map_err(|e| CoreError::Session(e.to_string()))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_from_output() {
        assert_eq!(version_from_output("codex 1.2.3"), "1.2.3");
        assert_eq!(version_from_output("1.2.3\n"), "1.2.3");
        assert_eq!(version_from_output("codex-cli version 0.45.1 (stable)"), "0.45.1");
        assert_eq!(version_from_output("no version here"), "unknown");
    }

    #[tokio::test]
    async fn test_missing_binary_is_terminal_needs_login() {
        let cli = CliConfig::new("definitely_not_a_real_codex_xyz");
        let fetcher = CodexUsageFetcher::with_cli(cli);
        let ctx = FetchContext::new();

        assert!(!fetcher.is_available(&ctx).await);

        let usage = fetcher.fetch(&ctx).await;
        assert!(usage.needs_login);
        assert!(usage.error.is_some());
        assert!(usage.primary.is_none());
        assert_eq!(usage.provider_id, "codex");
    }
}
