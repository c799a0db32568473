//! Process-local store. Backs the CLI's `--ephemeral` mode and the tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

use super::{Health, Storage};
use crate::digest::Digest;
use crate::entry::{unix_timestamp, Entry, ShortId};
use crate::error::StorageError;

#[derive(Debug)]
pub struct MemoryStore {
    entries: Mutex<HashMap<ShortId, Entry>>,
    online: AtomicBool,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            online: AtomicBool::new(true),
        }
    }

    /// Simulate losing (or regaining) the backend. While offline every
    /// operation fails with `Unavailable`.
    pub fn set_online(&self, online: bool) {
        self.online.store(online, Ordering::SeqCst);
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<ShortId, Entry>>, StorageError> {
        if !self.online.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable("memory store offline".to_string()));
        }
        self.entries
            .lock()
            .map_err(|_| StorageError::Unavailable("memory store lock poisoned".to_string()))
    }
}

impl Storage for MemoryStore {
    async fn find_by_digest(&self, digest: &Digest) -> Result<Vec<Entry>, StorageError> {
        let map = self.lock()?;
        let mut out: Vec<Entry> = map
            .values()
            .filter(|e| e.digest() == digest)
            .cloned()
            .collect();
        out.sort_by(|a, b| (a.created_on(), a.id()).cmp(&(b.created_on(), b.id())));
        Ok(out)
    }

    async fn find_by_id(&self, id: &ShortId) -> Result<Vec<Entry>, StorageError> {
        let map = self.lock()?;
        Ok(map.get(id).cloned().into_iter().collect())
    }

    async fn insert(&self, entry: &Entry) -> Result<(), StorageError> {
        let mut map = self.lock()?;
        if map.contains_key(entry.id()) {
            return Err(StorageError::UniquenessViolation);
        }
        map.insert(entry.id().clone(), entry.clone());
        Ok(())
    }

    async fn touch_access(&self, id: &ShortId) -> Result<i64, StorageError> {
        let mut map = self.lock()?;
        let now = unix_timestamp();
        if let Some(entry) = map.get_mut(id) {
            entry.mark_accessed(now);
        }
        Ok(now)
    }

    async fn health_check(&self) -> Health {
        if self.lock().is_ok() {
            Health::Reachable
        } else {
            Health::Unreachable
        }
    }
}
