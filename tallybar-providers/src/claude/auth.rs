//! Claude stored-session handling.
//!
//! Claude Code keeps its OAuth credentials in
//! `~/.claude/.credentials.json`. Only presence and removal matter here;
//! the token contents stay opaque.

use std::fs;
use std::io;
use std::path::PathBuf;
use tracing::debug;

/// Returns the path to the Claude session file.
pub fn session_file_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".claude").join(".credentials.json"))
}

/// Returns true if a stored Claude session exists.
pub fn has_stored_session() -> bool {
    session_file_path().is_some_and(|p| p.exists())
}

/// Removes the stored Claude session file, if present.
///
/// # Errors
///
/// Returns an IO error if the file exists but cannot be removed.
pub fn clear_stored_session() -> io::Result<()> {
    let Some(path) = session_file_path() else {
        return Ok(());
    };
    if path.exists() {
        debug!(path = %path.display(), "Clearing stored session");
        fs::remove_file(&path)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_file_path_shape() {
        let path = session_file_path().unwrap();
        assert!(path.ends_with(".credentials.json"));
        assert!(path.to_string_lossy().contains(".claude"));
    }
}
