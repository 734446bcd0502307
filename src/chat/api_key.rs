use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::{OlloError, Result};

/// Picks the user's key over the environment's. Empty keys count as absent.
pub fn resolve_api_key(user: Option<&str>, env: Option<&str>) -> Result<String> {
    user.filter(|k| !k.is_empty())
        .or_else(|| env.filter(|k| !k.is_empty()))
        .map(str::to_string)
        .ok_or(OlloError::MissingApiKey)
}

/// Reads the fallback key from the variable named by `var`.
#[must_use]
pub fn env_api_key(var: &str) -> Option<String> {
    std::env::var(var).ok().filter(|k| !k.is_empty())
}

/// Where the user's key is remembered between sessions.
pub trait ApiKeyStore {
    fn load(&self) -> Result<Option<String>>;

    /// Saving an empty key clears the store.
    fn save(&self, key: &str) -> Result<()>;

    fn clear(&self) -> Result<()>;
}

#[derive(Serialize, Deserialize)]
struct StoredKey {
    openai_api_key: String,
}

/// Keeps the key in a small JSON file.
#[derive(Debug, Clone)]
pub struct FileKeyStore {
    path: PathBuf,
}

impl FileKeyStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[inline]
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ApiKeyStore for FileKeyStore {
    fn load(&self) -> Result<Option<String>> {
        let bytes = match std::fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        let stored: StoredKey = serde_json::from_slice(&bytes)?;
        Ok(Some(stored.openai_api_key).filter(|k| !k.is_empty()))
    }

    fn save(&self, key: &str) -> Result<()> {
        if key.is_empty() {
            return self.clear();
        }
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        let stored = StoredKey { openai_api_key: key.to_string() };
        std::fs::write(&self.path, serde_json::to_vec(&stored)?)?;
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_key_wins_over_env() {
        assert_eq!(resolve_api_key(Some("user"), Some("env")).unwrap(), "user");
        assert_eq!(resolve_api_key(Some(""), Some("env")).unwrap(), "env");
        assert_eq!(resolve_api_key(None, Some("env")).unwrap(), "env");
        assert!(matches!(
            resolve_api_key(None, Some("")),
            Err(OlloError::MissingApiKey)
        ));
    }
}
