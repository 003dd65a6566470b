//! Lockout state storage
//!
//! Persists the login lockout bookkeeping so that restarting the shell
//! cannot reset or extend a lock. The file backend writes JSON atomically;
//! the memory backend is used by tests and ephemeral sessions.

use std::fmt::Debug;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use async_trait::async_trait;
use tracing::{debug, warn};

use crate::utils::errors::Result;
use super::lockout::LockoutState;

#[async_trait]
pub trait LockoutStore: Send + Sync + Debug {
    /// Load the saved state, `None` when nothing usable is stored
    async fn load(&self) -> Result<Option<LockoutState>>;

    async fn save(&self, state: &LockoutState) -> Result<()>;

    /// Remove any saved state
    async fn clear(&self) -> Result<()>;
}

/// JSON file storage
#[derive(Debug, Clone)]
pub struct FileStateStorage {
    path: PathBuf,
}

impl FileStateStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "lockout.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl LockoutStore for FileStateStorage {
    async fn load(&self) -> Result<Option<LockoutState>> {
        let data = match tokio::fs::read_to_string(&self.path).await {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No saved lockout state");
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        match serde_json::from_str::<LockoutState>(&data) {
            Ok(state) => {
                debug!(path = %self.path.display(), attempts = state.attempt_count, "Loaded lockout state");
                Ok(Some(state))
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Discarding unreadable lockout state");
                self.clear().await?;
                Ok(None)
            }
        }
    }

    async fn save(&self, state: &LockoutState) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let serialized = serde_json::to_string_pretty(state)?;
        let temp = self.temp_path();
        tokio::fs::write(&temp, serialized).await?;
        tokio::fs::rename(&temp, &self.path).await?;

        debug!(path = %self.path.display(), attempts = state.attempt_count, "Saved lockout state");
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => {
                debug!(path = %self.path.display(), "Removed lockout state");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-memory storage, clones share the same slot
#[derive(Debug, Clone, Default)]
pub struct MemoryStateStorage {
    slot: Arc<Mutex<Option<LockoutState>>>,
}

impl MemoryStateStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state(state: LockoutState) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Some(state))),
        }
    }

    /// Currently stored value
    pub fn snapshot(&self) -> Option<LockoutState> {
        self.slot.lock().unwrap_or_else(|p| p.into_inner()).clone()
    }
}

#[async_trait]
impl LockoutStore for MemoryStateStorage {
    async fn load(&self) -> Result<Option<LockoutState>> {
        Ok(self.snapshot())
    }

    async fn save(&self, state: &LockoutState) -> Result<()> {
        *self.slot.lock().unwrap_or_else(|p| p.into_inner()) = Some(state.clone());
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        *self.slot.lock().unwrap_or_else(|p| p.into_inner()) = None;
        Ok(())
    }
}
