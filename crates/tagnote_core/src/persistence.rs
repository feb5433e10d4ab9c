//! Snapshot persistence over a key-value repository.
//!
//! # Responsibility
//! - Serialize the whole snapshot as one JSON blob under a single key.
//! - Seed startup state from the previously stored blob.
//!
//! # Invariants
//! - `load` never fails: a missing key, a storage error and a malformed
//!   blob all read as "nothing stored".
//! - `save` never fails: errors are logged and dropped, the in-memory
//!   snapshot stays authoritative.

use crate::model::snapshot::Snapshot;
use crate::repo::kv_repo::KeyValueRepository;
use log::{debug, warn};

/// Default key the snapshot blob is stored under.
pub const DEFAULT_STORAGE_KEY: &str = "tagnote_state";

/// Best-effort snapshot load/save bound to one storage key.
pub struct PersistenceAdapter<R: KeyValueRepository> {
    repo: R,
    key: String,
}

impl<R: KeyValueRepository> PersistenceAdapter<R> {
    /// Creates an adapter using [`DEFAULT_STORAGE_KEY`].
    pub fn new(repo: R) -> Self {
        Self::with_key(repo, DEFAULT_STORAGE_KEY)
    }

    pub fn with_key(repo: R, key: impl Into<String>) -> Self {
        Self {
            repo,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns the stored snapshot, or `None` when there is nothing usable.
    pub fn load(&self) -> Option<Snapshot> {
        let blob = match self.repo.get_blob(&self.key) {
            Ok(Some(blob)) => blob,
            Ok(None) => {
                debug!("event=state_load module=persistence status=empty");
                return None;
            }
            Err(err) => {
                warn!(
                    "event=state_load module=persistence status=error error_code=storage_read_failed error={}",
                    err
                );
                return None;
            }
        };

        match serde_json::from_str::<Snapshot>(&blob) {
            Ok(snapshot) => {
                debug!(
                    "event=state_load module=persistence status=ok notes={} tags={}",
                    snapshot.notes.len(),
                    snapshot.tags.len()
                );
                Some(snapshot)
            }
            Err(err) => {
                warn!(
                    "event=state_load module=persistence status=error error_code=state_decode_failed error={}",
                    err
                );
                None
            }
        }
    }

    /// Writes `snapshot` under the adapter key; failures are logged only.
    pub fn save(&self, snapshot: &Snapshot) {
        let blob = match serde_json::to_string(snapshot) {
            Ok(blob) => blob,
            Err(err) => {
                warn!(
                    "event=state_save module=persistence status=error error_code=state_encode_failed error={}",
                    err
                );
                return;
            }
        };

        if let Err(err) = self.repo.set_blob(&self.key, &blob) {
            warn!(
                "event=state_save module=persistence status=error error_code=storage_write_failed error={}",
                err
            );
            return;
        }
        debug!(
            "event=state_save module=persistence status=ok bytes={}",
            blob.len()
        );
    }
}
