// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Tallybar Providers
//!
//! Provider adapter implementations for the Tallybar application.
//!
//! Each provider module speaks to one external CLI tool through a
//! cascading fetch chain, richest interface first:
//!
//! 1. Version probe (gates the whole fetch)
//! 2. Structured JSON status subcommand
//! 3. Interactive JSON-RPC subprocess mode (where the tool has one)
//! 4. Free-text status scraping
//!
//! Each module includes:
//!
//! - **Descriptor**: Static configuration (metadata, CLI invocations)
//! - **Strategies**: Fetch stage implementations
//! - **Parser**: Response parsing for the tool's formats
//! - **Fetcher**: Chain orchestration producing `ProviderUsage` records
//!
//! ## Supported Providers
//!
//! | Provider | Status JSON | RPC | Text | Session file |
//! |----------|-------------|-----|------|--------------|
//! | Codex (OpenAI) | ✅ | ✅ | ✅ | `~/.codex/auth.json` |
//! | Claude (Anthropic) | ✅ | ❌ | ✅ | `~/.claude/.credentials.json` |
//!
//! ## Usage
//!
//! ```ignore
//! use tallybar_core::ProviderKind;
//! use tallybar_providers::ProviderRegistry;
//!
//! let desc = ProviderRegistry::get(ProviderKind::Codex).unwrap();
//! let provider = desc.build_provider();
//! let usage = provider.fetch().await;
//! ```

pub mod descriptor;
pub mod registry;

// Provider modules (alphabetical)
pub mod claude;
pub mod codex;

// Re-export key types
pub use descriptor::{CliConfig, ProviderDescriptor};
pub use registry::ProviderRegistry;

// Re-export provider descriptors and entry points
pub use claude::{claude_descriptor, ClaudeProvider, ClaudeUsageFetcher};
pub use codex::{codex_descriptor, CodexProvider, CodexUsageFetcher};
