//! File-backed snapshot of clients and access tokens.
//!
//! Authorization codes are short-lived and deliberately excluded: losing
//! them on restart is an availability trade-off, not a correctness one.
//! The snapshot keeps the two-collection layout (`clients`,
//! `access_tokens`) keyed by credential string.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::error::AuthResult;

use super::types::{AccessToken, Client};

/// The persisted two-collection layout.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub clients: HashMap<String, Client>,
    #[serde(default)]
    pub access_tokens: HashMap<String, AccessToken>,
}

/// Writes the full state as pretty-printed JSON with atomic replace.
#[derive(Debug)]
pub struct SnapshotStore {
    path: PathBuf,
    /// Concurrent savers are serialized to avoid a corrupt partial write.
    write_lock: Mutex<()>,
}

impl SnapshotStore {
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self { path, write_lock: Mutex::new(()) }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the snapshot: parent directories, temp file, rename into
    /// place.
    pub async fn save(&self, snapshot: &Snapshot) -> AuthResult<()> {
        let body = serde_json::to_string_pretty(snapshot)?;

        let _guard = self.write_lock.lock().await;

        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let mut tmp = self.path.as_os_str().to_owned();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        tokio::fs::write(&tmp, body).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }

    /// Read the snapshot, dropping access tokens already at or past
    /// their lifetime so an expired token is never resurrected.
    pub async fn load(&self, now: u64) -> AuthResult<Snapshot> {
        let body = tokio::fs::read_to_string(&self.path).await?;
        let mut snapshot: Snapshot = serde_json::from_str(&body)?;
        snapshot.access_tokens.retain(|_, token| !token.is_stale(now));
        Ok(snapshot)
    }
}
