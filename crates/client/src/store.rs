//! Persistence for the auth/session state.
//!
//! The state is small (two tokens, the signed-in user and the anonymous
//! session id) and is written back whole on every change. Two stores are
//! provided: [`MemoryStore`] for tests and embedding, and [`FileStore`],
//! which keeps a JSON file so an anonymous cart survives restarts.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use comptoir_core::User;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};
use uuid::Uuid;

/// Errors raised by a [`SessionStore`].
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing the backing file failed.
    #[error("I/O error on {path}: {source}")]
    Io {
        /// File being accessed.
        path: PathBuf,
        /// Underlying failure.
        #[source]
        source: std::io::Error,
    },

    /// The state could not be serialized.
    #[error("failed to serialize session state: {0}")]
    Serialize(#[from] serde_json::Error),

    /// A previous writer panicked while holding the lock.
    #[error("session store lock poisoned")]
    Poisoned,
}

/// Everything that is persisted between runs.
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredSession {
    /// Bearer token of the signed-in user.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_token: Option<String>,
    /// Token used to obtain a new bearer token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    /// The signed-in user as returned at sign-in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
    /// Anonymous visitor id, sent as `x-session-token`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_token: Option<Uuid>,
}

impl std::fmt::Debug for StoredSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoredSession")
            .field("auth_token", &self.auth_token.as_ref().map(|_| "[REDACTED]"))
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "[REDACTED]"))
            .field("user", &self.user.as_ref().map(|u| &u.id))
            .field("session_token", &self.session_token)
            .finish()
    }
}

/// Storage backend for [`StoredSession`].
pub trait SessionStore: Send + Sync {
    /// Load the persisted state (empty state when nothing is stored).
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the backing storage cannot be read.
    fn load(&self) -> Result<StoredSession, StoreError>;

    /// Replace the persisted state.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the backing storage cannot be written.
    fn save(&self, session: &StoredSession) -> Result<(), StoreError>;
}

/// In-process store; state is lost when the process exits.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<StoredSession>,
}

impl MemoryStore {
    /// Empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with `session`.
    #[must_use]
    pub const fn with_state(session: StoredSession) -> Self {
        Self {
            state: RwLock::new(session),
        }
    }

    /// Snapshot of the current contents.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Poisoned` if a writer panicked.
    pub fn snapshot(&self) -> Result<StoredSession, StoreError> {
        self.load()
    }
}

impl SessionStore for MemoryStore {
    fn load(&self) -> Result<StoredSession, StoreError> {
        self.state
            .read()
            .map(|state| state.clone())
            .map_err(|_| StoreError::Poisoned)
    }

    fn save(&self, session: &StoredSession) -> Result<(), StoreError> {
        let mut state = self.state.write().map_err(|_| StoreError::Poisoned)?;
        *state = session.clone();
        Ok(())
    }
}

/// JSON file store.
///
/// Writes go to a sibling temporary file that is then renamed over the
/// target. On Unix the file is created owner-readable only, since it holds
/// bearer tokens.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Store backed by the file at `path` (created on first save).
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl SessionStore for FileStore {
    fn load(&self) -> Result<StoredSession, StoreError> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no session file yet");
                return Ok(StoredSession::default());
            }
            Err(e) => return Err(self.io_error(e)),
        };

        match serde_json::from_str(&contents) {
            Ok(session) => Ok(session),
            Err(error) => {
                warn!(
                    path = %self.path.display(),
                    %error,
                    "session file is corrupt, starting from an empty session"
                );
                Ok(StoredSession::default())
            }
        }
    }

    fn save(&self, session: &StoredSession) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }

        let json = serde_json::to_vec_pretty(session)?;
        let tmp = self.path.with_extension("tmp");

        let mut options = std::fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }
        let mut file = options.open(&tmp).map_err(|e| self.io_error(e))?;

        // `mode` only applies on creation; a leftover temp file keeps its bits.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            file.set_permissions(std::fs::Permissions::from_mode(0o600))
                .map_err(|e| self.io_error(e))?;
        }

        file.write_all(&json).map_err(|e| self.io_error(e))?;
        file.sync_all().map_err(|e| self.io_error(e))?;
        drop(file);

        std::fs::rename(&tmp, &self.path).map_err(|e| self.io_error(e))
    }
}
