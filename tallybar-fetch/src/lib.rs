// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Tallybar Fetch
//!
//! Fetch strategy chain and host APIs for the Tallybar application.
//!
//! External CLI tools evolve: newer versions expose rich structured
//! interfaces, older ones only free text. This crate provides the
//! machinery that lets each provider try its richest data source first
//! and fall back progressively to looser ones:
//!
//! ## Host APIs
//!
//! The [`host`] module abstracts system interactions:
//!
//! - [`host::process`] - Bounded subprocess execution for CLI tools
//! - [`host::rpc`] - Line-delimited JSON-RPC subprocess probing
//!
//! ## Fetch Chain
//!
//! - [`strategy::FetchStrategy`] - Trait for one fetch mechanism
//! - [`pipeline::FetchPipeline`] - Executes strategies in order until one
//!   succeeds, swallowing stage-local failures
//! - [`context::FetchContext`] - Timeouts, buffer caps, and host access
//!
//! ## Example
//!
//! ```ignore
//! use tallybar_fetch::{FetchContext, FetchPipeline};
//!
//! let ctx = FetchContext::new();
//! let pipeline = FetchPipeline::with_strategies(vec![
//!     Box::new(StatusJsonStrategy::new(cli.clone())),
//!     Box::new(TextScrapeStrategy::new(cli)),
//! ]);
//! let outcome = pipeline.execute(&ctx).await;
//! ```

pub mod context;
pub mod error;
pub mod host;
pub mod pipeline;
pub mod strategy;

// Errors
pub use error::{FetchError, ProcessError, RpcError};

// Host APIs
pub use host::{
    process::{ProcessOutput, ProcessRunner},
    rpc::RpcProbe,
};

// Strategy & Pipeline
pub use context::{FetchContext, FetchContextBuilder, FetchSettings};
pub use pipeline::{FetchAttempt, FetchOutcome, FetchPipeline};
pub use strategy::{FetchKind, FetchResult, FetchStrategy, StrategyInfo};
