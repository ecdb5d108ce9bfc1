//! Codex (OpenAI) provider implementation.
//!
//! Codex is OpenAI's CLI tool for agentic coding. This is the exemplar
//! four-stage adapter:
//!
//! ## Fetch Chain
//!
//! 1. **Version probe** - `codex --version`, gates the whole fetch.
//!    Failure here is terminal: the tool is missing or broken, so the
//!    record says "install/login" and no further stage runs.
//!
//! 2. **Status JSON** (priority 100): `codex status --json`
//!    - Richest source; parse failure falls through silently.
//!
//! 3. **RPC** (priority 90): `codex -s read-only -a untrusted app-server`
//!    - Writes one `getUsage` JSON-RPC request over stdin
//!    - First valid JSON object on stdout wins; subprocess then killed
//!
//! 4. **Text scrape** (priority 80): `codex status`
//!    - Pattern-matches session/weekly percentages and the email
//!    - Its own invocation failure becomes the final "needs login" record
//!
//! ## Authentication
//!
//! - Session file: `~/.codex/auth.json`
//! - Account email/plan enriched from the JWT id-token when a stage did
//!   not supply identity
//!
//! ## Usage
//!
//! ```ignore
//! use tallybar_providers::codex::CodexUsageFetcher;
//!
//! let fetcher = CodexUsageFetcher::new();
//! let usage = fetcher.fetch(&ctx).await;
//! ```

// Modules
mod auth;
mod descriptor;
mod error;
mod fetcher;
pub(crate) mod parser;
mod rpc;
mod strategies;

// Re-exports
pub use auth::{read_account_identity, session_file_path};
pub use descriptor::codex_descriptor;
pub use error::CodexError;
pub use fetcher::{CodexProvider, CodexUsageFetcher};
pub use rpc::CodexRpcResponse;
pub use strategies::{CodexRpcStrategy, CodexStatusJsonStrategy, CodexTextStrategy};
