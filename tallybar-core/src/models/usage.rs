//! Usage-related types.
//!
//! This module contains the normalized usage model:
//! - [`RateWindow`] - One quota window's state
//! - [`CreditBalance`] - Provider-specific credit info
//! - [`UsageReport`] - Raw data obtained by a single fetch stage
//! - [`ProviderUsage`] - The finished per-provider snapshot record

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use super::provider::{AccountIdentity, ProviderKind, ProviderMetadata};

// ============================================================================
// Rate Window
// ============================================================================

/// State of a single quota window (session, weekly).
///
/// Records serialize camelCase because the tray/window renderer consumes
/// them over IPC in that shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateWindow {
    /// Percentage of quota used, as reported by the tool.
    ///
    /// Not clamped here: degenerate inputs may exceed 100. The renderer
    /// clamps for display via [`RateWindow::remaining_percent`].
    pub used_percent: f64,
    /// Window duration in minutes (300 = 5 hours, 10080 = 1 week).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub window_minutes: Option<u32>,
    /// When this window resets, if the provider reports it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resets_at: Option<DateTime<Utc>>,
    /// Fixed human label for UI grouping ("Session", "Weekly").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reset_description: Option<String>,
}

impl RateWindow {
    /// Creates a new window with the given used percentage.
    pub fn new(used_percent: f64) -> Self {
        Self {
            used_percent,
            window_minutes: None,
            resets_at: None,
            reset_description: None,
        }
    }

    /// Sets the UI grouping label.
    #[must_use]
    pub fn labeled(mut self, label: impl Into<String>) -> Self {
        self.reset_description = Some(label.into());
        self
    }

    /// Returns the remaining percentage (100 - used), clamped to >= 0.
    ///
    /// The clamp applies to this display value only; `used_percent` keeps
    /// whatever the tool reported.
    pub fn remaining_percent(&self) -> f64 {
        (100.0 - self.used_percent).max(0.0)
    }

    /// Returns true if usage has reached or passed the limit.
    pub fn is_over_limit(&self) -> bool {
        self.used_percent >= 100.0
    }

    /// Returns time until reset, if known.
    pub fn time_until_reset(&self) -> Option<chrono::Duration> {
        self.resets_at.map(|reset| reset - Utc::now())
    }
}

/// Converts an epoch-seconds reset timestamp to an instant.
///
/// Out-of-range values yield `None` rather than a defaulted "now".
pub fn epoch_seconds_to_instant(secs: i64) -> Option<DateTime<Utc>> {
    Utc.timestamp_opt(secs, 0).single()
}

// ============================================================================
// Credits
// ============================================================================

/// Credit/monetary balance for providers that report one.
///
/// The balance is kept as a string to preserve whatever precision the
/// provider uses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditBalance {
    /// Remaining balance as reported.
    pub balance: String,
    /// Whether the account has unlimited credits.
    pub unlimited: bool,
}

// ============================================================================
// Usage Report (stage-level)
// ============================================================================

/// Raw usage data produced by one fetch stage.
///
/// A report is provider-agnostic: it carries only what the stage actually
/// obtained. The provider's fetcher stamps identity constants, version,
/// and the fetch timestamp when assembling the final [`ProviderUsage`].
#[derive(Debug, Clone, Default)]
pub struct UsageReport {
    /// Primary (session-scoped) window, if obtained.
    pub primary: Option<RateWindow>,
    /// Secondary (periodic) window, if obtained.
    pub secondary: Option<RateWindow>,
    /// Account identity, if the stage surfaced it.
    pub identity: Option<AccountIdentity>,
    /// Credit balance, if the stage surfaced it.
    pub credits: Option<CreditBalance>,
    /// Set when the stage determined the user must (re)authenticate.
    pub needs_login: bool,
    /// Human-readable failure description, if any.
    pub error: Option<String>,
}

impl UsageReport {
    /// Returns true if the report carries any usable window data.
    pub fn has_data(&self) -> bool {
        self.primary.is_some() || self.secondary.is_some()
    }

    /// Creates a report signalling that authentication is required.
    pub fn login_required(message: impl Into<String>) -> Self {
        Self {
            needs_login: true,
            error: Some(message.into()),
            ..Self::default()
        }
    }
}

// ============================================================================
// Provider Usage (final record)
// ============================================================================

/// A single provider's full snapshot at fetch time.
///
/// Exactly one record is produced per `fetch()` call, success or failure;
/// nothing ever escapes the provider boundary as an error. Records are
/// immutable once returned - the manager replaces whole entries.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderUsage {
    /// Stable identifier, unique per provider instance.
    pub provider_id: String,
    /// Display name shown in the UI.
    pub display_name: String,
    /// Primary (session-scoped) window. Absence signals no usable data.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary: Option<RateWindow>,
    /// Secondary (periodic) window.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secondary: Option<RateWindow>,
    /// Account email, best effort.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_email: Option<String>,
    /// Account plan name, best effort.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_plan: Option<String>,
    /// Installed tool version, best effort.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Credit balance, provider-specific.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credits: Option<CreditBalance>,
    /// Link to the provider's usage dashboard (static constant).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dashboard_url: Option<String>,
    /// Link to the provider's status page (static constant).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_page_url: Option<String>,
    /// Human-readable failure description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// True when the failure is an authentication gap rather than a
    /// transient/tooling error.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub needs_login: bool,
    /// When the fetch attempt completed. Always set, even on failure.
    pub updated_at: DateTime<Utc>,
}

impl ProviderUsage {
    /// Creates an empty record for a provider, stamped with the current time.
    pub fn new(kind: ProviderKind) -> Self {
        Self {
            provider_id: kind.id().to_string(),
            display_name: kind.display_name().to_string(),
            primary: None,
            secondary: None,
            account_email: None,
            account_plan: None,
            version: None,
            credits: None,
            dashboard_url: None,
            status_page_url: None,
            error: None,
            needs_login: false,
            updated_at: Utc::now(),
        }
    }

    /// Creates a terminal "needs login" record.
    ///
    /// Error records never claim window data they did not obtain.
    pub fn login_required(kind: ProviderKind, message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            needs_login: true,
            ..Self::new(kind)
        }
    }

    /// Creates a transient-failure record (not an authentication gap).
    pub fn failure(kind: ProviderKind, message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            ..Self::new(kind)
        }
    }

    /// Assembles a record from a stage report plus provider constants.
    pub fn from_report(metadata: &ProviderMetadata, version: Option<String>, report: UsageReport) -> Self {
        Self {
            provider_id: metadata.id.id().to_string(),
            display_name: metadata.display_name.clone(),
            primary: report.primary,
            secondary: report.secondary,
            account_email: report.identity.as_ref().and_then(|i| i.email.clone()),
            account_plan: report.identity.as_ref().and_then(|i| i.plan.clone()),
            version,
            credits: report.credits,
            dashboard_url: metadata.dashboard_url.clone(),
            status_page_url: metadata.status_page_url.clone(),
            error: report.error,
            needs_login: report.needs_login,
            updated_at: Utc::now(),
        }
    }

    /// Sets the tool version on an existing record.
    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Returns true if this record carries usable window data.
    pub fn has_data(&self) -> bool {
        self.primary.is_some()
    }

    /// Returns true if this record describes a failed fetch.
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

// ============================================================================
// Tests
// ============================================================================
