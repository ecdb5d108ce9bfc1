//! Claude (Anthropic) provider implementation.
//!
//! Claude Code has no RPC server mode, so this adapter runs the
//! three-stage variant of the chain:
//!
//! 1. **Version probe** - `claude --version` (terminal on failure)
//! 2. **Usage JSON** (priority 100): `claude usage --json`
//! 3. **Text scrape** (priority 80): `claude usage`
//!
//! Session file: `~/.claude/.credentials.json`.

mod auth;
mod descriptor;
mod fetcher;
pub(crate) mod parser;
mod strategies;

pub use auth::session_file_path;
pub use descriptor::claude_descriptor;
pub use fetcher::{ClaudeProvider, ClaudeUsageFetcher};
pub use strategies::{ClaudeStatusJsonStrategy, ClaudeTextStrategy};
