//! File-backed key-value store underneath the persistence façade.
//!
//! One JSON document per fixed key, stored as `<data_dir>/<key>.json`. The
//! key set mirrors the original app's localStorage layout so existing data
//! files stay readable:
//!
//!   ideal_db_settings : AdminConfig
//!   ideal_db_users    : [UserProfile]
//!   ideal_db_session  : UserProfile (absent when logged out)
//!   ideal_db_messages : [ChatMessage]
//!   ideal_db_content  : [ClassCategory] (denormalized copy of settings.classes)
//!
//! The underlying fs calls are synchronous; callers go through the async
//! `Database` façade, which keeps the door open for a remote store later.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, warn};

pub const KEY_SETTINGS: &str = "ideal_db_settings";
pub const KEY_USERS: &str = "ideal_db_users";
pub const KEY_SESSION: &str = "ideal_db_session";
pub const KEY_MESSAGES: &str = "ideal_db_messages";
pub const KEY_CONTENT: &str = "ideal_db_content";

/// Errors produced by the store layer. Reads never surface these; only
/// writes and opening can fail.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Generic I/O error (creating the data directory, writing a key).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization failure on the write path.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias used throughout the store and façade.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Thin namespaced key-value wrapper over a data directory.
pub struct KvStore {
    dir: PathBuf,
}

impl KvStore {
    /// Open (or create) a store rooted at an explicit directory.
    ///
    /// This is the only constructor; the data directory comes from the
    /// DATA_DIR env variable in production and from a tempdir in tests.
    pub fn open_at(dir: &Path) -> Result<Self> {
        fs::create_dir_all(dir)?;
        tracing::info!(target: "store", path = %dir.display(), "opening key-value store");
        Ok(Self { dir: dir.to_path_buf() })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    /// Raw string value for a key, or `None` when the key is absent or
    /// unreadable. Corruption is logged and treated as absence.
    pub fn get(&self, key: &str) -> Option<String> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(s) => Some(s),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => {
                warn!(target: "store", %key, error = %e, "unreadable key treated as absent");
                None
            }
        }
    }

    /// Overwrite the value for a key.
    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        fs::write(self.path_for(key), value)?;
        debug!(target: "store", %key, bytes = value.len(), "key written");
        Ok(())
    }

    /// Remove a key. Removing an absent key is not an error.
    pub fn remove(&self, key: &str) -> Result<()> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.path_for(key).exists()
    }
}
