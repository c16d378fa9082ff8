use std::collections::BTreeMap;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use thiserror::Error;

pub const TOKEN_KEY: &str = "token";
pub const LEGACY_TOKEN_KEY: &str = "jwt";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("token file error: {0}")]
    Io(#[from] std::io::Error),
    #[error("token file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Key/value session storage holding the bearer token.
///
/// Writes go to `token`; reads fall back to the legacy `jwt` key so sessions
/// saved by older front ends keep working. When backed by a file, every
/// mutation is flushed immediately.
#[derive(Debug)]
pub struct TokenStore {
    path: Option<PathBuf>,
    entries: Mutex<BTreeMap<String, String>>,
}

impl TokenStore {
    pub fn in_memory() -> Self {
        Self {
            path: None,
            entries: Mutex::new(BTreeMap::new()),
        }
    }

    /// Opens a file-backed store. A missing, empty or unreadable-as-JSON file
    /// starts an anonymous session; the next write replaces it.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let entries = match fs::read_to_string(&path) {
            Ok(content) if content.trim().is_empty() => BTreeMap::new(),
            Ok(content) => match serde_json::from_str(&content) {
                Ok(entries) => entries,
                Err(err) => {
                    tracing::warn!("Discarding session file {}: {}", path.display(), err);
                    BTreeMap::new()
                }
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(err) => return Err(err.into()),
        };
        Ok(Self {
            path: Some(path),
            entries: Mutex::new(entries),
        })
    }

    pub fn get_token(&self) -> Option<String> {
        let entries = self.lock();
        [TOKEN_KEY, LEGACY_TOKEN_KEY]
            .iter()
            .filter_map(|key| entries.get(*key))
            .find(|value| !value.is_empty())
            .cloned()
    }

    pub fn set_token(&self, token: &str) -> Result<(), StoreError> {
        self.put(TOKEN_KEY, token)
    }

    pub fn clear_token(&self) -> Result<(), StoreError> {
        self.update(|entries| {
            entries.remove(TOKEN_KEY);
            entries.remove(LEGACY_TOKEN_KEY);
        })
    }

    /// Raw write under an arbitrary key.
    pub fn put(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.update(|entries| {
            entries.insert(key.to_string(), value.to_string());
        })
    }

    /// Applies a change in memory only once it has been persisted.
    fn update(&self, change: impl FnOnce(&mut BTreeMap<String, String>)) -> Result<(), StoreError> {
        let mut entries = self.lock();
        let mut next = entries.clone();
        change(&mut next);
        self.flush(&next)?;
        *entries = next;
        Ok(())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, String>> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn flush(&self, entries: &BTreeMap<String, String>) -> Result<(), StoreError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let content = serde_json::to_string_pretty(entries)?;
        let staging = path.with_extension("tmp");
        let mut options = OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }
        let mut file = options.open(&staging)?;
        file.write_all(content.as_bytes())?;
        file.sync_all()?;
        fs::rename(&staging, path)?;
        Ok(())
    }
}
