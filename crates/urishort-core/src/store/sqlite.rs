//! SQLite-backed entry store (sqlx).
//!
//! One table, keyed by identifier, with an index on the digest for dedup lookups:
//!
//! | id (PK) | original_uri | sha256 | created_on | last_accessed |

use anyhow::Result;
use sqlx::sqlite::{SqlitePoolOptions, SqliteRow};
use sqlx::{Pool, Row, Sqlite};
use std::path::Path;

use super::{Health, Storage};
use crate::config::DatabaseConfig;
use crate::digest::Digest;
use crate::entry::{unix_timestamp, Entry, ShortId};
use crate::error::StorageError;

/// Percent-encode a path for use in a sqlite:// URI so spaces and special chars don't break parsing.
fn path_to_sqlite_uri(path: &Path) -> String {
    let s = path.to_string_lossy();
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '%' => out.push_str("%25"),
            ' ' => out.push_str("%20"),
            '#' => out.push_str("%23"),
            '?' => out.push_str("%3F"),
            '&' => out.push_str("%26"),
            c => out.push(c),
        }
    }
    format!("sqlite://{}", out)
}

/// Handle to the SQLite entry database.
///
/// The default file lives under the XDG state directory:
/// `~/.local/state/urishort/uri.db`.
#[derive(Clone)]
pub struct SqliteStore {
    pub(crate) pool: Pool<Sqlite>,
}

impl SqliteStore {
    /// Open the database named by `[database]`, falling back to the default location.
    pub async fn from_config(cfg: &DatabaseConfig) -> Result<Self> {
        match &cfg.path {
            Some(path) => Self::open_at(path, cfg.max_connections).await,
            None => Self::open_default(cfg.max_connections).await,
        }
    }

    /// Open (or create) the default database and run migrations.
    pub async fn open_default(max_connections: u32) -> Result<Self> {
        let xdg_dirs = xdg::BaseDirectories::with_prefix("urishort")?;
        Self::open_at(xdg_dirs.get_state_home().join("uri.db"), max_connections).await
    }

    /// Open (or create) the database at a specific path. Creates parent dirs if needed.
    pub async fn open_at(path: impl AsRef<Path>, max_connections: u32) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let uri = path_to_sqlite_uri(path) + "?mode=rwc";
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections.max(1))
            .connect(&uri)
            .await?;
        let store = SqliteStore { pool };
        store.migrate().await?;
        tracing::debug!("opened entry store at {}", path.display());
        Ok(store)
    }

    async fn migrate(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS uri (
                id VARCHAR(12) NOT NULL PRIMARY KEY,
                original_uri TEXT NOT NULL,
                sha256 BLOB NOT NULL,
                created_on INTEGER NOT NULL,
                last_accessed INTEGER NOT NULL
            );
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS uri_sha256 ON uri (sha256);")
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Close the pool; later calls report `Unavailable`.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

fn row_to_entry(row: &SqliteRow) -> Result<Entry, StorageError> {
    let id: String = row.try_get("id").map_err(StorageError::from_sqlx)?;
    let uri: String = row.try_get("original_uri").map_err(StorageError::from_sqlx)?;
    let digest: Vec<u8> = row.try_get("sha256").map_err(StorageError::from_sqlx)?;
    let created_on: i64 = row.try_get("created_on").map_err(StorageError::from_sqlx)?;
    let last_accessed: i64 = row.try_get("last_accessed").map_err(StorageError::from_sqlx)?;

    Entry::from_stored(&id, &uri, &digest, created_on, last_accessed)
        .map_err(|e| StorageError::Corrupt(format!("row {id}: {e}")))
}

impl Storage for SqliteStore {
    async fn find_by_digest(&self, digest: &Digest) -> Result<Vec<Entry>, StorageError> {
        let rows = sqlx::query(
            r#"
            SELECT id, original_uri, sha256, created_on, last_accessed
            FROM uri
            WHERE sha256 = ?1
            ORDER BY created_on ASC, id ASC
            "#,
        )
        .bind(digest.as_bytes().as_slice())
        .fetch_all(&self.pool)
        .await
        .map_err(StorageError::from_sqlx)?;

        rows.iter().map(row_to_entry).collect()
    }

    async fn find_by_id(&self, id: &ShortId) -> Result<Vec<Entry>, StorageError> {
        let rows = sqlx::query(
            r#"
            SELECT id, original_uri, sha256, created_on, last_accessed
            FROM uri
            WHERE id = ?1
            "#,
        )
        .bind(id.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(StorageError::from_sqlx)?;

        rows.iter().map(row_to_entry).collect()
    }

    async fn insert(&self, entry: &Entry) -> Result<(), StorageError> {
        sqlx::query(
            r#"
            INSERT INTO uri (id, original_uri, sha256, created_on, last_accessed)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(entry.id().as_str())
        .bind(entry.uri())
        .bind(entry.digest().as_bytes().as_slice())
        .bind(entry.created_on())
        .bind(entry.last_accessed())
        .execute(&self.pool)
        .await
        .map_err(StorageError::from_sqlx)?;

        Ok(())
    }

    async fn touch_access(&self, id: &ShortId) -> Result<i64, StorageError> {
        let now = unix_timestamp();
        sqlx::query(
            r#"
            UPDATE uri
            SET last_accessed = ?1
            WHERE id = ?2
            "#,
        )
        .bind(now)
        .bind(id.as_str())
        .execute(&self.pool)
        .await
        .map_err(StorageError::from_sqlx)?;

        Ok(now)
    }

    async fn health_check(&self) -> Health {
        match sqlx::query("SELECT 1").execute(&self.pool).await {
            Ok(_) => Health::Reachable,
            Err(e) => {
                tracing::warn!("entry store health check failed: {e}");
                Health::Unreachable
            }
        }
    }
}

#[cfg(test)]
/// Open an in-memory database for tests (no disk I/O).
pub(crate) async fn open_memory() -> Result<SqliteStore> {
    // Single connection so the pool never hands back a different empty DB.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await?;
    let store = SqliteStore { pool };
    store.migrate().await?;
    Ok(store)
}
