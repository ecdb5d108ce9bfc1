//! Provider descriptor system.
//!
//! A descriptor contains all the static configuration for a provider:
//! display metadata, the literal CLI invocations its fetch chain uses,
//! and a constructor for the provider object itself. The chain pattern
//! is universal; the invocations here are the provider-specific part.

use std::sync::Arc;

use tallybar_core::{ProviderKind, ProviderMetadata, UsageProvider};

// ============================================================================
// CLI Config
// ============================================================================

/// The literal command surface of one provider's CLI.
///
/// Owned strings rather than statics so tests can point a fetcher at a
/// stand-in binary.
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// CLI binary name (or path).
    pub name: String,
    /// Alternative names accepted in lookups (e.g. `openai` for codex).
    pub aliases: Vec<String>,
    /// Arguments for the version probe.
    pub version_args: Vec<String>,
    /// Arguments for the JSON-emitting status subcommand.
    pub status_json_args: Vec<String>,
    /// Arguments to start the JSON-RPC server mode. `None` when the tool
    /// has no such mode (the chain simply skips that stage).
    pub rpc_args: Option<Vec<String>>,
    /// JSON-RPC method requested from the server mode.
    pub rpc_method: String,
    /// Arguments for the plain-text status subcommand.
    pub status_args: Vec<String>,
}

impl CliConfig {
    /// Creates a config with the common defaults for a binary name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            aliases: Vec::new(),
            version_args: vec!["--version".to_string()],
            status_json_args: vec!["status".to_string(), "--json".to_string()],
            rpc_args: None,
            rpc_method: "getUsage".to_string(),
            status_args: vec!["status".to_string()],
        }
    }

    /// Borrows an argument list as `&str` slices for the process runner.
    pub fn arg_refs(args: &[String]) -> Vec<&str> {
        args.iter().map(String::as_str).collect()
    }
}

// ============================================================================
// Provider Descriptor
// ============================================================================

/// Complete static descriptor for a provider.
pub struct ProviderDescriptor {
    /// Display metadata and URLs.
    pub metadata: ProviderMetadata,
    /// CLI tool configuration.
    pub cli: CliConfig,
    /// Constructor for the provider object.
    pub build: fn() -> Arc<dyn UsageProvider>,
}

impl ProviderDescriptor {
    /// Returns the provider kind.
    pub fn id(&self) -> ProviderKind {
        self.metadata.id
    }

    /// Returns the display name.
    pub fn display_name(&self) -> &str {
        &self.metadata.display_name
    }

    /// Returns the CLI binary name.
    pub fn cli_name(&self) -> &str {
        &self.cli.name
    }

    /// Constructs the provider object for this descriptor.
    pub fn build_provider(&self) -> Arc<dyn UsageProvider> {
        (self.build)()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_config_defaults() {
        let cli = CliConfig::new("sometool");
        assert_eq!(cli.name, "sometool");
        assert_eq!(cli.version_args, vec!["--version"]);
        assert_eq!(cli.rpc_method, "getUsage");
        assert!(cli.rpc_args.is_none());
    }

    #[test]
    fn test_arg_refs() {
        let args = vec!["status".to_string(), "--json".to_string()];
        assert_eq!(CliConfig::arg_refs(&args), vec!["status", "--json"]);
    }
}
