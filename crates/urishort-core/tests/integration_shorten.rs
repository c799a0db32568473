//! Integration test: shorten and resolve through the service on a real SQLite file,
//! including reopening the database and concurrent submissions.

mod common;

use std::collections::HashSet;
use std::sync::Arc;
use tempfile::tempdir;
use urishort_core::{ServiceError, ServiceStatus, Storage};

#[tokio::test]
async fn shorten_resolve_and_reopen() {
    let dir = tempdir().unwrap();
    let cfg = common::config_for(&dir.path().join("state").join("uri.db"));

    let service = common::sqlite_service(cfg.clone()).await;
    assert_eq!(service.status().await, ServiceStatus::Operational);

    let created = service.create("例子.com/例子?例子=例子#例子").await.unwrap();
    assert_eq!(created.raw_uri, "https://例子.com/例子?例子=例子#例子");
    assert_eq!(
        created.encoded_uri,
        "https://xn--fsqu00a.com/%E4%BE%8B%E5%AD%90?%E4%BE%8B%E5%AD%90=%E4%BE%8B%E5%AD%90#%E4%BE%8B%E5%AD%90"
    );
    assert!(created
        .id
        .as_str()
        .chars()
        .all(|c| c.is_ascii_alphanumeric() && !"1lLIi0Oo".contains(c)));

    let xss = service
        .create("https://example.com/?q=<script>alert(1)</script>")
        .await
        .unwrap();
    assert!(!xss.html_safe_uri.contains('<'));
    assert!(xss.raw_uri.contains("<script>"));

    drop(service);

    let reopened = common::sqlite_service(cfg).await;
    let got = reopened.retrieve(created.id.as_str()).await.unwrap();
    assert_eq!(got.raw_uri, created.raw_uri);
    assert_eq!(got.encoded_uri, created.encoded_uri);
    assert_eq!(got.html_safe_uri, created.html_safe_uri);

    // Dedup survives the reopen.
    let again = reopened.create("https://例子.com/例子?例子=例子#例子").await.unwrap();
    assert_eq!(again.id, created.id);

    assert_eq!(reopened.retrieve("missing").await, Err(ServiceError::NotFound));
}

#[tokio::test]
async fn concurrent_distinct_uris_get_distinct_ids() {
    let dir = tempdir().unwrap();
    let mut cfg = common::config_for(&dir.path().join("uri.db"));
    // Small space so candidates collide often.
    cfg.preference.id_char_count = 2;
    let service = Arc::new(common::sqlite_service(cfg).await);

    let mut handles = Vec::new();
    for n in 0..64 {
        let service = Arc::clone(&service);
        handles.push(tokio::spawn(async move {
            service.create(&format!("example.com/page/{n}")).await
        }));
    }

    let mut ids = HashSet::new();
    for h in handles {
        let created = h.await.unwrap().unwrap();
        assert!(ids.insert(created.id.clone()), "duplicate id {}", created.id);
    }
    assert_eq!(ids.len(), 64);

    for id in &ids {
        let stored = service.store().find_by_id(id).await.unwrap();
        assert_eq!(stored.len(), 1);
    }
}

#[tokio::test]
async fn maintenance_mode_blocks_requests() {
    let dir = tempdir().unwrap();
    let mut cfg = common::config_for(&dir.path().join("uri.db"));
    cfg.preference.maintenance_mode = true;
    let service = common::sqlite_service(cfg).await;

    assert_eq!(service.status().await, ServiceStatus::Maintenance);
    assert_eq!(
        service.create("example.com").await,
        Err(ServiceError::Maintenance)
    );
    assert_eq!(service.retrieve("abcdef").await, Err(ServiceError::Maintenance));
}
