//! Trait definitions for Tallybar.
//!
//! This module defines the capability contract that every provider
//! integration must satisfy.

use async_trait::async_trait;

use crate::error::CoreError;
use crate::models::{ProviderKind, ProviderUsage};

/// Capability contract for a provider integration.
///
/// Implementors speak to one external CLI/RPC surface and normalize
/// whatever they obtain into [`ProviderUsage`] records.
///
/// The trait is dyn-compatible on purpose: the manager holds a
/// heterogeneous `Arc<dyn UsageProvider>` set and fans out over it.
#[async_trait]
pub trait UsageProvider: Send + Sync {
    /// Returns the kind of provider this implementation handles.
    fn kind(&self) -> ProviderKind;

    /// Stable identifier, unique per provider instance.
    fn id(&self) -> &'static str {
        self.kind().id()
    }

    /// Display name for this provider.
    fn display_name(&self) -> &'static str {
        self.kind().display_name()
    }

    /// Fast, best-effort availability check.
    ///
    /// Typically "can the underlying CLI be located and report a version"
    /// without performing a full usage fetch. Must not fail; any problem
    /// collapses to `false`.
    async fn is_available(&self) -> bool;

    /// Fetches the current usage snapshot.
    ///
    /// Never raises past this boundary: every failure mode is encoded in
    /// the returned record (`error`/`needs_login`), and `updated_at` is
    /// always set.
    async fn fetch(&self) -> ProviderUsage;

    /// Returns true if a stored session/credential exists for this
    /// provider. Storage is external (the CLI's own credential file).
    fn has_stored_session(&self) -> bool {
        false
    }

    /// Removes the stored session, forcing a fresh login.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Session` if the stored credential exists but
    /// could not be removed.
    fn clear_stored_session(&self) -> Result<(), CoreError> {
        Ok(())
    }
}
