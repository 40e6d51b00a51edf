use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::constants::SESSION_FILE;

/// On-disk session format
#[derive(Debug, Serialize, Deserialize)]
struct SessionFile {
    token: String,
}

/// Manages the persisted session token.
///
/// The terminal analogue of the browser's local storage: a single
/// session file under `~/.teller`, surviving restarts until an explicit
/// logout removes it.
pub struct Storage {
    config_dir: PathBuf,
}

impl Storage {
    pub fn new() -> Self {
        let config_dir = dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".teller");

        Storage { config_dir }
    }

    /// Storage rooted at an explicit directory
    #[allow(dead_code)] // Used by tests
    pub fn with_dir(config_dir: PathBuf) -> Self {
        Storage { config_dir }
    }

    /// Ensure config directory exists
    fn ensure_dir(&self) -> Result<()> {
        if !self.config_dir.exists() {
            fs::create_dir_all(&self.config_dir)?;
        }
        Ok(())
    }

    fn session_path(&self) -> PathBuf {
        self.config_dir.join(SESSION_FILE)
    }

    /// Load the persisted token, if any.
    ///
    /// Unreadable or malformed files degrade to the logged-out state.
    pub fn load_token(&self) -> Option<String> {
        let content = fs::read_to_string(self.session_path()).ok()?;
        let session = serde_yaml::from_str::<SessionFile>(&content).ok()?;
        if session.token.is_empty() {
            None
        } else {
            Some(session.token)
        }
    }

    /// Persist the token to the session file
    pub fn save_token(&self, token: &str) -> Result<()> {
        self.ensure_dir()?;
        let content = serde_yaml::to_string(&SessionFile {
            token: token.to_string(),
        })?;
        fs::write(self.session_path(), content)?;
        Ok(())
    }

    /// Remove the session file
    pub fn clear_token(&self) -> Result<()> {
        let path = self.session_path();
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }
}

impl Default for Storage {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_and_load_token() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::with_dir(dir.path().to_path_buf());

        storage.save_token("tok123").unwrap();
        assert_eq!(storage.load_token(), Some("tok123".to_string()));
    }

    #[test]
    fn test_token_survives_reload() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::with_dir(dir.path().to_path_buf());
        storage.save_token("tok123").unwrap();

        // A fresh Storage over the same directory simulates a restart
        let reloaded = Storage::with_dir(dir.path().to_path_buf());
        assert_eq!(reloaded.load_token(), Some("tok123".to_string()));
    }

    #[test]
    fn test_clear_token() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::with_dir(dir.path().to_path_buf());
        storage.save_token("tok123").unwrap();

        storage.clear_token().unwrap();
        assert_eq!(storage.load_token(), None);
    }

    #[test]
    fn test_missing_file_is_logged_out() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::with_dir(dir.path().to_path_buf());
        assert_eq!(storage.load_token(), None);
    }

    #[test]
    fn test_clear_without_file_is_ok() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::with_dir(dir.path().to_path_buf());
        assert!(storage.clear_token().is_ok());
    }
}
