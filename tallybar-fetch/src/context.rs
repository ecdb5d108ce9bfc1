//! Fetch context providing timeouts, buffer caps, and host API access.
//!
//! The context is passed to every strategy. All knobs live here so that
//! tests (and the watch loop) can tighten timeouts without touching the
//! strategies themselves.

use std::sync::Arc;
use std::time::Duration;

use crate::host::process::ProcessRunner;

/// Default timeout for every external invocation.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Capture limit for plain-text command output (version probe, status text).
const TEXT_OUTPUT_LIMIT: usize = 1024 * 1024;

/// Capture limit for JSON status output, which can be considerably larger.
const JSON_OUTPUT_LIMIT: usize = 4 * 1024 * 1024;

// ============================================================================
// Fetch Settings
// ============================================================================

/// Settings for fetch operations.
#[derive(Debug, Clone)]
pub struct FetchSettings {
    /// Timeout applied to each external invocation.
    pub timeout: Duration,
    /// Output cap for plain-text commands.
    pub text_output_limit: usize,
    /// Output cap for JSON-emitting commands.
    pub json_output_limit: usize,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            text_output_limit: TEXT_OUTPUT_LIMIT,
            json_output_limit: JSON_OUTPUT_LIMIT,
        }
    }
}

impl FetchSettings {
    /// Creates settings with a custom timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

// ============================================================================
// Fetch Context
// ============================================================================

/// Context provided to fetch strategies.
#[derive(Clone)]
pub struct FetchContext {
    /// Subprocess runner for CLI tools.
    pub process: Arc<ProcessRunner>,
    /// Fetch settings.
    pub settings: FetchSettings,
}

impl FetchContext {
    /// Creates a context with default settings.
    pub fn new() -> Self {
        Self::with_settings(FetchSettings::default())
    }

    /// Creates a context with custom settings.
    pub fn with_settings(settings: FetchSettings) -> Self {
        Self {
            process: Arc::new(ProcessRunner::new()),
            settings,
        }
    }

    /// Creates a builder for customizing the context.
    pub fn builder() -> FetchContextBuilder {
        FetchContextBuilder::new()
    }

    /// Returns the per-invocation timeout.
    pub fn timeout(&self) -> Duration {
        self.settings.timeout
    }
}

impl Default for FetchContext {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for FetchContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FetchContext")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Fetch Context Builder
// ============================================================================

/// Builder for constructing a [`FetchContext`].
pub struct FetchContextBuilder {
    process: Option<Arc<ProcessRunner>>,
    settings: FetchSettings,
}

impl FetchContextBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self {
            process: None,
            settings: FetchSettings::default(),
        }
    }

    /// Sets the process runner.
    #[must_use]
    pub fn process(mut self, process: Arc<ProcessRunner>) -> Self {
        self.process = Some(process);
        self
    }

    /// Sets the fetch settings.
    #[must_use]
    pub fn settings(mut self, settings: FetchSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Sets the per-invocation timeout.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.settings.timeout = timeout;
        self
    }

    /// Builds the fetch context.
    pub fn build(self) -> FetchContext {
        FetchContext {
            process: self.process.unwrap_or_else(|| Arc::new(ProcessRunner::new())),
            settings: self.settings,
        }
    }
}

impl Default for FetchContextBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let ctx = FetchContext::new();
        assert_eq!(ctx.settings.timeout, Duration::from_secs(15));
        assert_eq!(ctx.settings.text_output_limit, 1024 * 1024);
        assert_eq!(ctx.settings.json_output_limit, 4 * 1024 * 1024);
    }

    #[test]
    fn test_context_builder() {
        let ctx = FetchContext::builder()
            .timeout(Duration::from_secs(60))
            .build();

        assert_eq!(ctx.settings.timeout, Duration::from_secs(60));
    }
}
