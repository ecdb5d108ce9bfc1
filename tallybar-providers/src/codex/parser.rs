//! Codex response parsers.
//!
//! Converts the tool's structured payloads and free-text status output
//! into the normalized [`UsageReport`] shape. Percentages are passed
//! through as reported; reset labels come from provider metadata, never
//! from the tool.

use regex::Regex;
use std::sync::LazyLock;
use tallybar_core::models::usage::epoch_seconds_to_instant;
use tallybar_core::{AccountIdentity, CreditBalance, ProviderMetadata, RateWindow, UsageReport};
use tallybar_fetch::FetchError;
use tracing::{debug, warn};

use super::rpc::{CodexRpcResponse, CodexRpcWindow};

// ============================================================================
// Text Patterns
// ============================================================================

/// "session usage: 41%" / "Session: 41%"
static SESSION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)session(?:\s+usage)?\s*:\s*(\d+(?:\.\d+)?)%").expect("Invalid regex")
});

/// "weekly usage: 12%" / "Weekly: 12%"
static WEEKLY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)weekly(?:\s+usage)?\s*:\s*(\d+(?:\.\d+)?)%").expect("Invalid regex")
});

/// "email: user@host" / "Account: user@host"
static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:account|email)\s*:\s*([^\s]+@[^\s]+)").expect("Invalid regex")
});

// ============================================================================
// Structured Parsers
// ============================================================================

/// Parses `codex status --json` output into a report.
///
/// # Errors
///
/// Returns `FetchError::InvalidResponse` when the output is not the
/// expected JSON shape - the caller falls through to the next stage.
pub fn parse_status_json(
    json_str: &str,
    metadata: &ProviderMetadata,
) -> Result<UsageReport, FetchError> {
    debug!(len = json_str.len(), "Parsing Codex status JSON");

    let response: CodexRpcResponse = serde_json::from_str(json_str).map_err(|e| {
        warn!(error = %e, "Failed to parse Codex status JSON");
        FetchError::InvalidResponse(format!("Invalid JSON: {e}"))
    })?;

    Ok(convert_response(response, metadata))
}

/// Parses the first JSON object the RPC subprocess produced.
///
/// # Errors
///
/// Returns `FetchError::InvalidResponse` when the object does not match
/// the usage payload shape.
pub fn parse_rpc_value(
    value: serde_json::Value,
    metadata: &ProviderMetadata,
) -> Result<UsageReport, FetchError> {
    let response: CodexRpcResponse = serde_json::from_value(value).map_err(|e| {
        warn!(error = %e, "RPC object does not match usage payload");
        FetchError::InvalidResponse(format!("Unexpected RPC payload: {e}"))
    })?;

    Ok(convert_response(response, metadata))
}

/// Converts a structured Codex payload into a report.
fn convert_response(response: CodexRpcResponse, metadata: &ProviderMetadata) -> UsageReport {
    let mut report = UsageReport {
        primary: response
            .primary
            .map(|w| convert_window(w, &metadata.session_label)),
        secondary: response
            .secondary
            .map(|w| convert_window(w, &metadata.weekly_label)),
        ..UsageReport::default()
    };

    if let Some(account) = response.account {
        let identity = AccountIdentity {
            email: account.email,
            plan: account.plan_type,
            organization: None,
        };
        if identity.has_data() {
            report.identity = Some(identity);
        }
    }

    if let Some(credits) = response.credits {
        report.credits = Some(CreditBalance {
            balance: credits.balance.unwrap_or_else(|| "0".to_string()),
            unlimited: credits.unlimited.unwrap_or(false),
        });
    }

    report
}

fn convert_window(window: CodexRpcWindow, label: &str) -> RateWindow {
    RateWindow {
        used_percent: window.used_percent,
        window_minutes: window.window_duration_mins,
        // Epoch seconds to instant; absent stays absent
        resets_at: window.resets_at.and_then(epoch_seconds_to_instant),
        reset_description: Some(label.to_string()),
    }
}

// ============================================================================
// Text Parser
// ============================================================================

/// Scrapes `codex status` free-text output.
///
/// Missing matches simply leave those fields absent; this parser cannot
/// fail.
pub fn parse_status_text(output: &str, metadata: &ProviderMetadata) -> UsageReport {
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

    debug!(
        has_primary = primary.is_some(),
        has_secondary = secondary.is_some(),
        has_email = identity.is_some(),
        "Codex status text scraped"
    );

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

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use tallybar_core::ProviderKind;

    fn metadata() -> ProviderMetadata {
        ProviderMetadata::new(ProviderKind::Codex)
    }

    #[test]
    fn test_parse_status_json_full() {
        let json = r#"{
            "account": { "email": "user@example.com", "planType": "pro" },
            "primary": { "usedPercent": 28.5, "windowDurationMins": 300, "resetsAt": 1700000000 },
            "secondary": { "usedPercent": 59.2, "windowDurationMins": 10080 }
        }"#;

        let report = parse_status_json(json, &metadata()).unwrap();

        let primary = report.primary.unwrap();
        assert_eq!(primary.used_percent, 28.5);
        assert_eq!(primary.window_minutes, Some(300));
        assert_eq!(primary.reset_description.as_deref(), Some("Session"));
        assert_eq!(
            primary.resets_at,
            Some(Utc.with_ymd_and_hms(2023, 11, 14, 22, 13, 20).unwrap())
        );

        let secondary = report.secondary.unwrap();
        assert_eq!(secondary.used_percent, 59.2);
        assert_eq!(secondary.reset_description.as_deref(), Some("Weekly"));
        // Absent reset field stays unset, not defaulted
        assert!(secondary.resets_at.is_none());

        let identity = report.identity.unwrap();
        assert_eq!(identity.email.as_deref(), Some("user@example.com"));
        assert_eq!(identity.plan.as_deref(), Some("pro"));
    }

    #[test]
    fn test_parse_status_json_minimal() {
        let report = parse_status_json("{}", &metadata()).unwrap();
        assert!(report.primary.is_none());
        assert!(report.secondary.is_none());
        assert!(report.identity.is_none());
        assert!(!report.has_data());
    }

    #[test]
    fn test_parse_status_json_invalid() {
        assert!(parse_status_json("not json", &metadata()).is_err());
        assert!(parse_status_json("{ \"primary\": 42 }", &metadata()).is_err());
    }

    #[test]
    fn test_parse_rpc_value_shape_mismatch() {
        let value = serde_json::json!({ "primary": "not-a-window" });
        assert!(parse_rpc_value(value, &metadata()).is_err());
    }

    #[test]
    fn test_percentage_passed_through_unclamped() {
        let json = r#"{ "primary": { "usedPercent": 130.0 } }"#;
        let report = parse_status_json(json, &metadata()).unwrap();
        assert_eq!(report.primary.unwrap().used_percent, 130.0);
    }

    #[test]
    fn test_parse_status_text_full() {
        let output = "Signed in\nEmail: dev@example.com\nSession usage: 41%\nWeekly usage: 12%\n";

        let report = parse_status_text(output, &metadata());

        assert_eq!(report.primary.as_ref().unwrap().used_percent, 41.0);
        assert_eq!(
            report.primary.unwrap().reset_description.as_deref(),
            Some("Session")
        );
        assert_eq!(report.secondary.unwrap().used_percent, 12.0);
        assert_eq!(
            report.identity.unwrap().email.as_deref(),
            Some("dev@example.com")
        );
    }

    #[test]
    fn test_parse_status_text_missing_fields_stay_absent() {
        let report = parse_status_text("Session: 80%\n", &metadata());

        assert!(report.primary.is_some());
        assert!(report.secondary.is_none());
        assert!(report.identity.is_none());

        let report = parse_status_text("nothing useful here\n", &metadata());
        assert!(!report.has_data());
    }
}
