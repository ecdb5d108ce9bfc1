//! Provider-related types.
//!
//! This module contains types related to provider integrations:
//! - [`ProviderKind`] - Enum of supported providers
//! - [`ProviderMetadata`] - Static display and configuration data
//! - [`AccountIdentity`] - Account identity (siloed per provider)

use serde::{Deserialize, Serialize};

// ============================================================================
// Provider Kind
// ============================================================================

/// Supported provider integrations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// OpenAI Codex
    Codex,
    /// Anthropic Claude
    Claude,
}

impl ProviderKind {
    /// Returns the stable provider id used as the snapshot map key.
    pub fn id(&self) -> &'static str {
        match self {
            Self::Codex => "codex",
            Self::Claude => "claude",
        }
    }

    /// Returns the display name for this provider.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Codex => "Codex",
            Self::Claude => "Claude",
        }
    }

    /// Returns the CLI binary name for this provider.
    pub fn cli_name(&self) -> &'static str {
        match self {
            Self::Codex => "codex",
            Self::Claude => "claude",
        }
    }

    /// Returns all available provider kinds.
    pub fn all() -> &'static [ProviderKind] {
        &[Self::Codex, Self::Claude]
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

// ============================================================================
// Provider Metadata
// ============================================================================

/// Static display and configuration data for a provider.
///
/// Everything here is a constant of the integration, not fetched data:
/// window labels, dashboard links, and the login hint shown when the
/// CLI is missing or unauthenticated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderMetadata {
    /// Provider identifier.
    pub id: ProviderKind,
    /// Display name shown in the UI.
    pub display_name: String,
    /// Label for the primary (session-scoped) window.
    pub session_label: String,
    /// Label for the secondary (periodic) window.
    pub weekly_label: String,
    /// Actionable message when the tool is missing or logged out.
    pub login_hint: String,
    /// Whether this provider is enabled by default.
    pub default_enabled: bool,
    /// Link to the provider's usage dashboard.
    pub dashboard_url: Option<String>,
    /// Link to the provider's status page.
    pub status_page_url: Option<String>,
}

impl ProviderMetadata {
    /// Creates metadata with the common defaults for a provider.
    pub fn new(id: ProviderKind) -> Self {
        Self {
            id,
            display_name: id.display_name().to_string(),
            session_label: "Session".to_string(),
            weekly_label: "Weekly".to_string(),
            login_hint: format!("Run \"{} login\" to authenticate", id.cli_name()),
            default_enabled: true,
            dashboard_url: None,
            status_page_url: None,
        }
    }
}

// ============================================================================
// Account Identity
// ============================================================================

/// Account identity information for a provider.
///
/// **Important**: This is siloed per provider - never mix identity from
/// different providers. Each provider has its own authentication context.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccountIdentity {
    /// Account email address.
    pub email: Option<String>,
    /// Plan/subscription name.
    pub plan: Option<String>,
    /// Organization name (if applicable).
    pub organization: Option<String>,
}

impl AccountIdentity {
    /// Returns true if any identity field is populated.
    pub fn has_data(&self) -> bool {
        self.email.is_some() || self.plan.is_some() || self.organization.is_some()
    }

    /// Fills empty fields from another identity source.
    ///
    /// Existing values win; `other` only supplies what is missing.
    pub fn merge_missing(&mut self, other: AccountIdentity) {
        if self.email.is_none() {
            self.email = other.email;
        }
        if self.plan.is_none() {
            self.plan = other.plan;
        }
        if self.organization.is_none() {
            self.organization = other.organization;
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
