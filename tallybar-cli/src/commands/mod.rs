//! CLI command implementations.

pub mod check;
pub mod providers;
pub mod usage;
pub mod watch;

use anyhow::bail;
use tallybar_providers::{descriptor::ProviderDescriptor, ProviderRegistry};
use tallybar_store::ProviderManager;

/// Resolves the `--provider` selection into descriptors.
///
/// `None` means the default-enabled set; "all" means everything;
/// otherwise a comma-separated list of CLI names.
pub fn resolve_descriptors(
    selection: Option<&str>,
) -> anyhow::Result<Vec<&'static ProviderDescriptor>> {
    match selection {
        None => Ok(ProviderRegistry::default_enabled()),
        Some("all") => Ok(ProviderRegistry::all().iter().collect()),
        Some(names) => {
            let mut descriptors = Vec::new();
            for name in names.split(',').map(str::trim).filter(|n| !n.is_empty()) {
                match ProviderRegistry::get_by_cli_name(name) {
                    Some(desc) => descriptors.push(desc),
                    None => bail!("Unknown provider: {name}"),
                }
            }
            if descriptors.is_empty() {
                bail!("No providers selected");
            }
            Ok(descriptors)
        }
    }
}

/// Builds a manager over the selected providers.
pub fn build_manager(selection: Option<&str>) -> anyhow::Result<ProviderManager> {
    let providers = resolve_descriptors(selection)?
        .into_iter()
        .map(ProviderDescriptor::build_provider)
        .collect();
    Ok(ProviderManager::new(providers))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_default() {
        let descriptors = resolve_descriptors(None).unwrap();
        assert!(!descriptors.is_empty());
    }

    #[test]
    fn test_resolve_by_name_and_alias() {
        let descriptors = resolve_descriptors(Some("codex,claude")).unwrap();
        assert_eq!(descriptors.len(), 2);

        let via_alias = resolve_descriptors(Some("openai")).unwrap();
        assert_eq!(via_alias[0].cli_name(), "codex");
    }

    #[test]
    fn test_resolve_unknown_fails() {
        assert!(resolve_descriptors(Some("nonsense")).is_err());
        assert!(resolve_descriptors(Some(",,")).is_err());
    }
}
