//! Session persistence between CLI invocations.
//!
//! The access token is kept in `~/.potluck/session.json` so a sign-in
//! survives until sign-out. File permissions are left to the platform.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use potluck_core::Session;

fn session_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".potluck").join("session.json"))
}

/// Load the saved session, if any.
pub fn load() -> Option<Session> {
    let path = session_path()?;
    let data = fs::read_to_string(path).ok()?;
    serde_json::from_str(&data).ok()
}

/// Persist the session for later invocations.
pub fn save(session: &Session) -> Result<()> {
    let path = session_path().context("Could not determine home directory")?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&path, serde_json::to_string_pretty(session)?)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

/// Forget the saved session.
pub fn clear() -> Result<()> {
    if let Some(path) = session_path() {
        if path.exists() {
            fs::remove_file(path)?;
        }
    }
    Ok(())
}
