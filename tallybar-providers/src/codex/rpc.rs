//! Codex usage wire types.
//!
//! Both the `codex status --json` subcommand and the app-server RPC
//! `getUsage` method answer with the same camelCase payload shape, so
//! one set of wire structs serves both stages.

use serde::Deserialize;

/// Usage payload returned by Codex (status JSON and RPC alike).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodexRpcResponse {
    /// Account information.
    #[serde(default)]
    pub account: Option<CodexRpcAccount>,
    /// Primary rate limit (5-hour session window).
    #[serde(default)]
    pub primary: Option<CodexRpcWindow>,
    /// Secondary rate limit (weekly window).
    #[serde(default)]
    pub secondary: Option<CodexRpcWindow>,
    /// Credits information.
    #[serde(default)]
    pub credits: Option<CodexRpcCredits>,
}

/// One rate limit window as Codex reports it.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodexRpcWindow {
    /// Percentage of limit used (0-100).
    pub used_percent: f64,
    /// Window duration in minutes.
    pub window_duration_mins: Option<u32>,
    /// Unix timestamp (epoch seconds) when the window resets.
    pub resets_at: Option<i64>,
}

/// Account info embedded in the usage payload.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodexRpcAccount {
    /// Account type (e.g. "chatgpt").
    #[serde(rename = "type")]
    pub account_type: Option<String>,
    /// Account email.
    pub email: Option<String>,
    /// Plan type (e.g. "plus", "pro").
    pub plan_type: Option<String>,
}

/// Credits info embedded in the usage payload.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodexRpcCredits {
    /// Whether the account has credits.
    pub has_credits: Option<bool>,
    /// Whether credits are unlimited.
    pub unlimited: Option<bool>,
    /// Credit balance as a string (preserves the tool's precision).
    pub balance: Option<String>,
}

// ============================================================================
// Tests
// ============================================================================
