//! Main Claude usage fetcher.
//!
//! Same chain shape as Codex minus the RPC stage: version probe gates
//! the fetch, then usage JSON, then the text scrape.

use async_trait::async_trait;
use regex::Regex;
use std::sync::LazyLock;
use tallybar_core::{
    CoreError, ProviderKind, ProviderMetadata, ProviderUsage, UsageProvider,
};
use tallybar_fetch::{FetchContext, FetchError, FetchPipeline, FetchStrategy};
use tracing::{info, instrument, warn};

use super::auth;
use super::descriptor::{claude_cli_config, claude_metadata};
use super::strategies::{ClaudeStatusJsonStrategy, ClaudeTextStrategy};
use crate::descriptor::CliConfig;

static SEMVER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+\.\d+\.\d+)").expect("Invalid regex"));

// ============================================================================
// Fetcher
// ============================================================================

/// Main Claude usage fetcher.
#[derive(Debug, Clone)]
pub struct ClaudeUsageFetcher {
    metadata: ProviderMetadata,
    cli: CliConfig,
}

impl ClaudeUsageFetcher {
    /// Creates a fetcher with the real Claude CLI configuration.
    pub fn new() -> Self {
        Self {
            metadata: claude_metadata(),
            cli: claude_cli_config(),
        }
    }

    /// Creates a fetcher with a custom CLI configuration (tests).
    pub fn with_cli(cli: CliConfig) -> Self {
        Self {
            metadata: claude_metadata(),
            cli,
        }
    }

    /// Returns the provider metadata.
    pub fn metadata(&self) -> &ProviderMetadata {
        &self.metadata
    }

    /// Probes the installed tool version.
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
        let version = SEMVER_RE
            .captures(stdout)
            .map_or_else(|| "unknown".to_string(), |c| c[1].to_string());

        Ok(version)
    }

    /// Quick availability check.
    pub async fn is_available(&self, ctx: &FetchContext) -> bool {
        self.detect_version(ctx).await.is_ok()
    }

    /// Runs the fetch chain, always producing one record.
    #[instrument(skip(self, ctx))]
    pub async fn fetch(&self, ctx: &FetchContext) -> ProviderUsage {
        let version = match self.detect_version(ctx).await {
            Ok(version) => version,
            Err(e) => {
                warn!(error = %e, "Version probe failed");
                return ProviderUsage::login_required(
                    ProviderKind::Claude,
                    self.metadata.login_hint.clone(),
                );
            }
        };

        let pipeline = FetchPipeline::with_strategies(vec![
            Box::new(ClaudeStatusJsonStrategy::new(
                self.cli.clone(),
                self.metadata.clone(),
            )) as Box<dyn FetchStrategy>,
            Box::new(ClaudeTextStrategy::new(
                self.cli.clone(),
                self.metadata.clone(),
            )),
        ]);

        let outcome = pipeline.execute(ctx).await;

        match outcome.result {
            Ok(result) => {
                info!(strategy = %result.strategy_id, "Claude fetch succeeded");
                ProviderUsage::from_report(&self.metadata, Some(version), result.report)
            }
            Err(e) => {
                warn!(error = %e, "All Claude stages failed");
                ProviderUsage::login_required(
                    ProviderKind::Claude,
                    self.metadata.login_hint.clone(),
                )
                .with_version(version)
            }
        }
    }
}

impl Default for ClaudeUsageFetcher {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Provider
// ============================================================================

/// Claude provider satisfying the contract the manager consumes.
pub struct ClaudeProvider {
    fetcher: ClaudeUsageFetcher,
    ctx: FetchContext,
}

impl ClaudeProvider {
    /// Creates the provider with default settings.
    pub fn new() -> Self {
        Self {
            fetcher: ClaudeUsageFetcher::new(),
            ctx: FetchContext::new(),
        }
    }

    /// Creates the provider from explicit parts (used by tests).
    pub fn from_parts(fetcher: ClaudeUsageFetcher, ctx: FetchContext) -> Self {
        Self { fetcher, ctx }
    }
}

impl Default for ClaudeProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UsageProvider for ClaudeProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Claude
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
