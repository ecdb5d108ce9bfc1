//! Fetch strategy trait and types.
//!
//! A strategy represents one method of obtaining usage data from a
//! provider's CLI. Providers declare an ordered set of strategies
//! (structured status, RPC, text scraping) that the pipeline tries in
//! turn, richest first.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use tallybar_core::UsageReport;

use crate::context::FetchContext;
use crate::error::FetchError;

// ============================================================================
// Fetch Kind
// ============================================================================

/// The mechanism a strategy uses to talk to the tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchKind {
    /// JSON-emitting status subcommand.
    StatusJson,
    /// Interactive JSON-RPC subprocess mode.
    Rpc,
    /// Free-text status output, pattern matched.
    TextScrape,
}

impl FetchKind {
    /// Returns the display name for this kind.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::StatusJson => "Status JSON",
            Self::Rpc => "RPC",
            Self::TextScrape => "Text",
        }
    }
}

impl fmt::Display for FetchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

// ============================================================================
// Fetch Result
// ============================================================================

/// The result of a successful fetch stage.
#[derive(Debug, Clone)]
pub struct FetchResult {
    /// The usage data the stage obtained.
    pub report: UsageReport,
    /// The strategy that succeeded.
    pub strategy_id: String,
    /// The kind of fetch used.
    pub kind: FetchKind,
}

impl FetchResult {
    /// Creates a new fetch result.
    pub fn new(report: UsageReport, strategy_id: impl Into<String>, kind: FetchKind) -> Self {
        Self {
            report,
            strategy_id: strategy_id.into(),
            kind,
        }
    }
}

// ============================================================================
// Fetch Strategy Trait
// ============================================================================

/// A strategy for fetching usage data from a provider's CLI.
///
/// The pipeline tries strategies in priority order; a failing strategy
/// normally just hands over to the next one. Strategies whose failure
/// makes further attempts pointless (an authentication gap, say) opt out
/// of fallback via [`FetchStrategy::should_fallback`].
///
/// ## Implementing a Strategy
///
/// ```ignore
/// struct StatusJsonStrategy { cli: CliConfig }
///
/// #[async_trait]
/// impl FetchStrategy for StatusJsonStrategy {
///     fn id(&self) -> &str { "codex.status_json" }
///     fn kind(&self) -> FetchKind { FetchKind::StatusJson }
///
///     async fn is_available(&self, ctx: &FetchContext) -> bool {
///         ctx.process.command_exists(&self.cli.name)
///     }
///
///     async fn fetch(&self, ctx: &FetchContext) -> Result<FetchResult, FetchError> {
///         let output = ctx.process.run(&self.cli.name, &["status", "--json"]).await?;
///         // Parse output into a UsageReport
///     }
/// }
/// ```
#[async_trait]
pub trait FetchStrategy: Send + Sync {
    /// Unique identifier, `{provider}.{method}` (e.g. `codex.rpc`).
    fn id(&self) -> &str;

    /// The kind of fetch this strategy uses.
    fn kind(&self) -> FetchKind;

    /// Human-readable name for this strategy.
    fn display_name(&self) -> String {
        format!("{} ({})", self.id(), self.kind().display_name())
    }

    /// Check if this strategy is currently available.
    ///
    /// This should be quick - typically "is the CLI installed".
    async fn is_available(&self, ctx: &FetchContext) -> bool;

    /// Fetch usage data using this strategy.
    async fn fetch(&self, ctx: &FetchContext) -> Result<FetchResult, FetchError>;

    /// Whether to try the next strategy after this error.
    ///
    /// An authentication gap is terminal: every other stage would hit the
    /// same wall, so the cascade stops there.
    fn should_fallback(&self, error: &FetchError) -> bool {
        !matches!(error, FetchError::LoginRequired(_))
    }

    /// Priority of this strategy (higher = tried first).
    ///
    /// Defaults encode "most structured first":
    /// - Status JSON: 100
    /// - RPC: 90
    /// - Text scrape: 80
    fn priority(&self) -> u32 {
        match self.kind() {
            FetchKind::StatusJson => 100,
            FetchKind::Rpc => 90,
            FetchKind::TextScrape => 80,
        }
    }
}

// ============================================================================
// Strategy Info
// ============================================================================

/// Information about a strategy (for reporting).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyInfo {
    /// Strategy ID.
    pub id: String,
    /// Strategy kind.
    pub kind: FetchKind,
    /// Whether the strategy is available.
    pub available: bool,
    /// Priority.
    pub priority: u32,
}

impl StrategyInfo {
    /// Creates strategy info from a strategy implementation.
    pub async fn from_strategy(strategy: &dyn FetchStrategy, ctx: &FetchContext) -> Self {
        Self {
            id: strategy.id().to_string(),
            kind: strategy.kind(),
            available: strategy.is_available(ctx).await,
            priority: strategy.priority(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
