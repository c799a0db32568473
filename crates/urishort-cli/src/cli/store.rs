//! Backend picked at startup: SQLite by default, memory with `--ephemeral`.

use anyhow::{Context, Result};
use urishort_core::config::ShortenerConfig;
use urishort_core::{Digest, Entry, Health, MemoryStore, ShortId, SqliteStore, Storage, StorageError};

pub enum CliStore {
    Memory(MemoryStore),
    Sqlite(SqliteStore),
}

impl CliStore {
    pub async fn open(cfg: &ShortenerConfig, ephemeral: bool) -> Result<Self> {
        if ephemeral {
            return Ok(CliStore::Memory(MemoryStore::new()));
        }
        let store = SqliteStore::from_config(&cfg.database)
            .await
            .context("opening entry database")?;
        Ok(CliStore::Sqlite(store))
    }
}

impl Storage for CliStore {
    async fn find_by_digest(&self, digest: &Digest) -> Result<Vec<Entry>, StorageError> {
        match self {
            CliStore::Memory(s) => s.find_by_digest(digest).await,
            CliStore::Sqlite(s) => s.find_by_digest(digest).await,
        }
    }

    async fn find_by_id(&self, id: &ShortId) -> Result<Vec<Entry>, StorageError> {
        match self {
            CliStore::Memory(s) => s.find_by_id(id).await,
            CliStore::Sqlite(s) => s.find_by_id(id).await,
        }
    }

    async fn insert(&self, entry: &Entry) -> Result<(), StorageError> {
        match self {
            CliStore::Memory(s) => s.insert(entry).await,
            CliStore::Sqlite(s) => s.insert(entry).await,
        }
    }

    async fn touch_access(&self, id: &ShortId) -> Result<i64, StorageError> {
        match self {
            CliStore::Memory(s) => s.touch_access(id).await,
            CliStore::Sqlite(s) => s.touch_access(id).await,
        }
    }

    async fn health_check(&self) -> Health {
        match self {
            CliStore::Memory(s) => s.health_check().await,
            CliStore::Sqlite(s) => s.health_check().await,
        }
    }
}
