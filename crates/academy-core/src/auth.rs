//! Session token storage and in-memory sharing.
//!
//! Persists the single opaque session token in `<base>/auth.json` with
//! restricted permissions (0600). Tokens are never logged in full.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::config::paths;

/// Shared in-memory handle to the current session token.
///
/// The gateway reads through this cell when attaching the bearer credential,
/// so every request observes the most recently committed token.
#[derive(Clone, Default)]
pub struct TokenCell(Arc<RwLock<Option<String>>>);

impl TokenCell {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the current token, if any.
    pub fn get(&self) -> Option<String> {
        self.0.read().expect("token lock poisoned").clone()
    }

    /// Replaces the current token.
    pub fn set(&self, token: Option<String>) {
        *self.0.write().expect("token lock poisoned") = token;
    }

    pub fn is_present(&self) -> bool {
        self.0.read().expect("token lock poisoned").is_some()
    }
}

/// On-disk shape of the token file.
#[derive(Debug, Default, Serialize, Deserialize)]
struct AuthFile {
    token: Option<String>,
}

/// Persistent store for the session token.
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    /// Opens the store at the default location (`<base>/auth.json`).
    pub fn open_default() -> Self {
        Self::at(paths::auth_path())
    }

    /// Opens the store at a specific path.
    pub fn at(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    /// Loads the persisted token.
    /// Returns None if the file doesn't exist.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(&self) -> Result<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read token from {}", self.path.display()))?;

        let auth: AuthFile = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse token file {}", self.path.display()))?;

        Ok(auth.token.filter(|t| !t.is_empty()))
    }

    /// Persists the token with restricted permissions (0600).
    ///
    /// # Errors
    /// Returns an error if the operation fails.
    pub fn save(&self, token: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let auth = AuthFile {
            token: Some(token.to_string()),
        };
        let contents = serde_json::to_string_pretty(&auth).context("Failed to serialize token")?;

        // Write with restricted permissions
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            let mut file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .mode(0o600)
                .open(&self.path)
                .with_context(|| format!("Failed to open {} for writing", self.path.display()))?;
            file.write_all(contents.as_bytes())
                .with_context(|| format!("Failed to write to {}", self.path.display()))?;
        }

        #[cfg(not(unix))]
        {
            fs::write(&self.path, contents)
                .with_context(|| format!("Failed to write to {}", self.path.display()))?;
        }

        Ok(())
    }

    /// Removes the persisted token. Returns whether a token existed.
    ///
    /// Clearing an already-empty store is a no-op.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be removed.
    pub fn clear(&self) -> Result<bool> {
        let had_token = self.load().unwrap_or(None).is_some();
        if self.path.exists() {
            fs::remove_file(&self.path)
                .with_context(|| format!("Failed to remove {}", self.path.display()))?;
        }
        Ok(had_token)
    }
}

/// Returns a masked version of a token for display (first 8 chars + ...).
pub fn mask_token(token: &str) -> String {
    // Tokens are opaque; byte 8 may not be a char boundary.
    match token.get(..8) {
        Some(prefix) if token.len() > 12 => format!("{prefix}..."),
        _ => "***".to_string(),
    }
}
