//! Storage contract used by the allocator, plus the SQLite and in-memory backends.

pub mod memory;
pub mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use crate::digest::Digest;
use crate::entry::{Entry, ShortId};
use crate::error::StorageError;

/// Reachability reported by [`Storage::health_check`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Health {
    Reachable,
    Unreachable,
}

/// Key-value-by-id / key-value-by-digest store for entries.
///
/// Implementations must enforce identifier uniqueness on `insert` and report
/// a clash as [`StorageError::UniquenessViolation`]. Lookups return lists so
/// callers do not assume uniqueness is already enforced at read time.
#[allow(async_fn_in_trait)]
pub trait Storage {
    async fn find_by_digest(&self, digest: &Digest) -> Result<Vec<Entry>, StorageError>;

    async fn find_by_id(&self, id: &ShortId) -> Result<Vec<Entry>, StorageError>;

    async fn insert(&self, entry: &Entry) -> Result<(), StorageError>;

    /// Set `last_accessed` to now; returns the stored timestamp (Unix seconds).
    async fn touch_access(&self, id: &ShortId) -> Result<i64, StorageError>;

    async fn health_check(&self) -> Health;
}
