//! Provider manager: concurrent refresh fan-out and the latest-result map.
//!
//! The manager owns the per-provider latest-result slots. Each slot is
//! written exactly once per completed fetch, at completion; readers get
//! cloned snapshots, never a live reference. Overlapping `refresh_all`
//! calls are tolerated without deduplication - last write wins per
//! provider id, which is the accepted behavior here rather than a gap.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use futures::stream::{self, StreamExt};
use tallybar_core::{ProviderUsage, UsageProvider};
use tokio::sync::watch;
use tracing::{debug, info, instrument, warn};

use crate::error::StoreError;

/// Aggregates usage across all registered providers.
pub struct ProviderManager {
    providers: Vec<Arc<dyn UsageProvider>>,
    latest: RwLock<HashMap<String, ProviderUsage>>,
    notify: watch::Sender<u64>,
    version: AtomicU64,
}

impl ProviderManager {
    /// Creates a manager over the given providers.
    ///
    /// Which providers are enabled is the settings collaborator's call;
    /// the manager just works with what it is handed.
    pub fn new(providers: Vec<Arc<dyn UsageProvider>>) -> Self {
        let (notify, _) = watch::channel(0);
        Self {
            providers,
            latest: RwLock::new(HashMap::new()),
            notify,
            version: AtomicU64::new(0),
        }
    }

    /// Returns the ids of all registered providers.
    pub fn provider_ids(&self) -> Vec<&'static str> {
        self.providers.iter().map(|p| p.id()).collect()
    }

    /// Returns the provider registered under the given id.
    ///
    /// Used by the login-flow collaborator for session hooks and
    /// post-login refreshes.
    pub fn provider(&self, id: &str) -> Option<Arc<dyn UsageProvider>> {
        self.providers.iter().find(|p| p.id() == id).cloned()
    }

    /// Fetches every provider concurrently and updates the map
    /// entry-by-entry as fetches complete.
    ///
    /// Failures are isolated per provider: a `fetch()` never errors, so
    /// one broken integration contributes an error record instead of
    /// blocking the others.
    #[instrument(skip(self), fields(providers = self.providers.len()))]
    pub async fn refresh_all(&self) {
        info!(count = self.providers.len(), "Refreshing all providers");

        stream::iter(self.providers.iter().cloned())
            .for_each_concurrent(None, |provider| async move {
                let usage = provider.fetch().await;
                self.store(usage);
            })
            .await;

        debug!("Refresh cycle complete");
    }

    /// Fetches a single provider and updates its slot.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::ProviderNotFound` for an unknown id.
    pub async fn refresh_one(&self, id: &str) -> Result<ProviderUsage, StoreError> {
        let provider = self
            .provider(id)
            .ok_or_else(|| StoreError::ProviderNotFound(id.to_string()))?;

        let usage = provider.fetch().await;
        self.store(usage.clone());
        Ok(usage)
    }

    /// Returns the current snapshot of all latest records.
    ///
    /// Synchronous and side-effect free: never triggers a fetch.
    pub fn get_latest_usage(&self) -> HashMap<String, ProviderUsage> {
        self.latest.read().expect("usage map lock poisoned").clone()
    }

    /// Returns the latest record for one provider, if any.
    pub fn get(&self, id: &str) -> Option<ProviderUsage> {
        self.latest
            .read()
            .expect("usage map lock poisoned")
            .get(id)
            .cloned()
    }

    /// Subscribes to change notifications. The value only ever
    /// increments; receivers re-read the snapshot when it does.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.notify.subscribe()
    }

    /// Writes one completed fetch into its slot, atomically.
    fn store(&self, usage: ProviderUsage) {
        if usage.is_error() {
            warn!(provider = %usage.provider_id, error = ?usage.error, "Provider fetch errored");
        } else {
            debug!(provider = %usage.provider_id, "Provider fetch stored");
        }

        {
            let mut latest = self.latest.write().expect("usage map lock poisoned");
            latest.insert(usage.provider_id.clone(), usage);
        }

        let version = self.version.fetch_add(1, Ordering::SeqCst) + 1;
        let _ = self.notify.send(version);
    }
}

// ============================================================================
// Tests
// ============================================================================
