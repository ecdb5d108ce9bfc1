// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Tallybar Store
//!
//! Aggregated usage state for the Tallybar application.
//!
//! The [`ProviderManager`] fans a refresh out across all registered
//! providers concurrently, keeps the latest `ProviderUsage` record per
//! provider id, and hands synchronous snapshots to whoever asks (the
//! tray icon renderer, the popup window, the CLI).

pub mod error;
pub mod manager;

pub use error::StoreError;
pub use manager::ProviderManager;
