// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Tallybar Core
//!
//! Core types, models, and traits for the Tallybar application.
//!
//! This crate provides the foundational abstractions used across all other
//! Tallybar crates:
//!
//! - Domain models (providers, rate windows, usage records)
//! - Error types
//! - The provider capability trait
//!
//! ## Key Types
//!
//! - [`ProviderKind`] - Enum of supported provider integrations
//! - [`ProviderMetadata`] - Static display/config data per provider
//! - [`RateWindow`] - One quota window's state
//! - [`UsageReport`] - Raw data obtained by a single fetch stage
//! - [`ProviderUsage`] - The finished per-provider snapshot record
//! - [`UsageProvider`] - Capability trait every integration satisfies

pub mod error;
pub mod models;
pub mod traits;

// Re-export error types
pub use error::CoreError;

// Re-export all model types
pub use models::{
    AccountIdentity, CreditBalance, ProviderKind, ProviderMetadata, ProviderUsage, RateWindow,
    UsageReport,
};

// Re-export traits
pub use traits::UsageProvider;
