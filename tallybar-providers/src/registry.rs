//! Provider registry for managing all provider descriptors.
//!
//! The registry provides static access to all provider configurations
//! and is the central point for looking up providers.

use std::collections::HashMap;
use std::sync::OnceLock;

use tallybar_core::ProviderKind;

use crate::claude::claude_descriptor;
use crate::codex::codex_descriptor;
use crate::descriptor::ProviderDescriptor;

// ============================================================================
// Static Registry
// ============================================================================

/// Static storage for all provider descriptors.
static DESCRIPTORS: OnceLock<Vec<ProviderDescriptor>> = OnceLock::new();

/// Static storage for CLI name to provider kind mapping.
static CLI_NAME_MAP: OnceLock<HashMap<String, ProviderKind>> = OnceLock::new();

fn init_descriptors() -> Vec<ProviderDescriptor> {
    vec![codex_descriptor(), claude_descriptor()]
}

/// Builds the CLI name to provider kind mapping.
fn build_cli_name_map(descriptors: &[ProviderDescriptor]) -> HashMap<String, ProviderKind> {
    let mut map = HashMap::new();

    for desc in descriptors {
        map.insert(desc.cli.name.clone(), desc.id());
        for alias in &desc.cli.aliases {
            map.insert(alias.clone(), desc.id());
        }
    }

    map
}

// ============================================================================
// Provider Registry
// ============================================================================

/// Global registry of all provider descriptors.
///
/// Initialized lazily on first access; thread-safe.
pub struct ProviderRegistry;

impl ProviderRegistry {
    /// Returns all provider descriptors.
    pub fn all() -> &'static [ProviderDescriptor] {
        DESCRIPTORS.get_or_init(init_descriptors)
    }

    /// Gets a provider descriptor by kind.
    pub fn get(id: ProviderKind) -> Option<&'static ProviderDescriptor> {
        Self::all().iter().find(|d| d.id() == id)
    }

    /// Returns the CLI name to provider kind mapping.
    pub fn cli_name_map() -> &'static HashMap<String, ProviderKind> {
        CLI_NAME_MAP.get_or_init(|| build_cli_name_map(Self::all()))
    }

    /// Looks up a provider by CLI name or alias.
    pub fn get_by_cli_name(name: &str) -> Option<&'static ProviderDescriptor> {
        let kind = Self::cli_name_map().get(name)?;
        Self::get(*kind)
    }

    /// Returns all enabled-by-default providers.
    pub fn default_enabled() -> Vec<&'static ProviderDescriptor> {
        Self::all()
            .iter()
            .filter(|d| d.metadata.default_enabled)
            .collect()
    }

    /// Returns the number of registered providers.
    pub fn count() -> usize {
        Self::all().len()
    }

    /// Returns all provider kinds.
    pub fn kinds() -> Vec<ProviderKind> {
        Self::all().iter().map(ProviderDescriptor::id).collect()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_has_both_providers() {
        assert_eq!(ProviderRegistry::count(), 2);

        for kind in [ProviderKind::Codex, ProviderKind::Claude] {
            let desc = ProviderRegistry::get(kind);
            assert!(desc.is_some(), "Should find provider {kind:?}");
            assert_eq!(desc.unwrap().id(), kind);
        }
    }

    #[test]
    fn test_cli_name_lookup() {
        assert!(ProviderRegistry::get_by_cli_name("codex").is_some());
        assert!(ProviderRegistry::get_by_cli_name("claude").is_some());
        assert!(ProviderRegistry::get_by_cli_name("no_such_tool").is_none());

        // Alias
        let openai = ProviderRegistry::get_by_cli_name("openai");
        assert!(openai.is_some());
        assert_eq!(openai.unwrap().id(), ProviderKind::Codex);
    }

    #[test]
    fn test_default_enabled() {
        let enabled = ProviderRegistry::default_enabled();
        let kinds: Vec<_> = enabled.iter().map(|d| d.id()).collect();

        assert!(kinds.contains(&ProviderKind::Codex));
        assert!(kinds.contains(&ProviderKind::Claude));
    }
}
