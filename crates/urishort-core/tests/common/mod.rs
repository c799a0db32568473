//! Shared setup for integration tests: a service over a SQLite file in a temp dir.

use std::path::Path;
use urishort_core::config::ShortenerConfig;
use urishort_core::{ShortenService, SqliteStore};

pub fn config_for(db_path: &Path) -> ShortenerConfig {
    let mut cfg = ShortenerConfig::default();
    cfg.database.path = Some(db_path.to_path_buf());
    cfg.database.max_connections = 4;
    cfg
}

pub async fn sqlite_service(cfg: ShortenerConfig) -> ShortenService<SqliteStore> {
    let store = SqliteStore::from_config(&cfg.database).await.unwrap();
    ShortenService::new(cfg, store).unwrap()
}
