//! Claude response parsers.
//!
//! `claude usage --json` reports snake_case fields with RFC-3339 reset
//! timestamps (unlike Codex's epoch seconds); older builds only print a
//! text summary. Field aliases cover the renames the CLI has gone
//! through.

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::Deserialize;
use std::sync::LazyLock;
use tallybar_core::{AccountIdentity, ProviderMetadata, RateWindow, UsageReport};
use tallybar_fetch::FetchError;
use tracing::{debug, warn};

// ============================================================================
// JSON Output Structures
// ============================================================================

/// Response from `claude usage --json`.
#[derive(Debug, Deserialize)]
pub struct ClaudeUsageResponse {
    /// Session usage data.
    #[serde(default)]
    pub session: Option<ClaudeUsageWindow>,
    /// Weekly usage data.
    #[serde(default)]
    pub weekly: Option<ClaudeUsageWindow>,
    /// Account information.
    #[serde(default)]
    pub account: Option<ClaudeAccount>,
}

/// One usage window as Claude reports it.
#[derive(Debug, Deserialize)]
pub struct ClaudeUsageWindow {
    /// Usage percentage (0-100).
    #[serde(alias = "usage_percent", alias = "percent")]
    pub used_percent: Option<f64>,
    /// Window duration in minutes.
    #[serde(alias = "duration_minutes")]
    pub window_minutes: Option<u32>,
    /// Reset timestamp, RFC-3339.
    #[serde(alias = "reset_at")]
    pub resets_at: Option<String>,
}

/// Account info from Claude.
#[derive(Debug, Deserialize)]
pub struct ClaudeAccount {
    /// Email address.
    pub email: Option<String>,
    /// Organization name.
    #[serde(alias = "org")]
    pub organization: Option<String>,
    /// Plan name.
    pub plan: Option<String>,
}

// ============================================================================
// Text Patterns
// ============================================================================

static SESSION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)session(?:\s+usage)?\s*:\s*(\d+(?:\.\d+)?)%").expect("Invalid regex")
});

static WEEKLY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)weekly(?:\s+usage)?\s*:\s*(\d+(?:\.\d+)?)%").expect("Invalid regex")
});

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:account|email)\s*:\s*([^\s]+@[^\s]+)").expect("Invalid regex")
});

// ============================================================================
// Parsers
// ============================================================================

/// Parses `claude usage --json` output into a report.
///
/// # Errors
///
/// Returns `FetchError::InvalidResponse` when the output is not the
/// expected JSON shape.
pub fn parse_usage_json(
    json_str: &str,
    metadata: &ProviderMetadata,
) -> Result<UsageReport, FetchError> {
    debug!(len = json_str.len(), "Parsing Claude usage JSON");

    let response: ClaudeUsageResponse = serde_json::from_str(json_str).map_err(|e| {
        warn!(error = %e, "Failed to parse Claude usage JSON");
        FetchError::InvalidResponse(format!("Invalid JSON: {e}"))
    })?;

    let mut report = UsageReport {
        primary: response
            .session
            .map(|w| convert_window(w, &metadata.session_label)),
        secondary: response
            .weekly
            .map(|w| convert_window(w, &metadata.weekly_label)),
        ..UsageReport::default()
    };

    if let Some(account) = response.account {
        let identity = AccountIdentity {
            email: account.email,
            plan: account.plan,
            organization: account.organization,
        };
        if identity.has_data() {
            report.identity = Some(identity);
        }
    }

    Ok(report)
}

fn convert_window(window: ClaudeUsageWindow, label: &str) -> RateWindow {
    let resets_at = window
        .resets_at
        .as_deref()
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc));

    RateWindow {
        used_percent: window.used_percent.unwrap_or(0.0),
        window_minutes: window.window_minutes,
        resets_at,
        reset_description: Some(label.to_string()),
    }
}

/// Scrapes `claude usage` free-text output. Missing matches leave those
/// fields absent.
pub fn parse_usage_text(output: &str, metadata: &ProviderMetadata) -> UsageReport {
    let primary = SESSION_RE
        .captures(output)
        .and_then(|c| c[1].parse::<f64>().ok())
        .map(|pct| RateWindow::new(pct).labeled(&metadata.session_label));

    let secondary = WEEKLY_RE
        .captures(output)
        .and_then(|c| c[1].parse::<f64>().ok())
        .map(|pct| RateWindow::new(pct).labeled(&metadata.weekly_label));

    let identity = EMAIL_RE.captures(output).map(|c| AccountIdentity {
        email: Some(c[1].to_string()),
        ..AccountIdentity::default()
    });

    UsageReport {
        primary,
        secondary,
        identity,
        ..UsageReport::default()
    }
}

// ============================================================================
// Tests
// ============================================================================
