//! `urishort status` – report maintenance flag and store reachability.

use anyhow::Result;
use urishort_core::{ShortenService, Storage};

pub async fn run_status<S: Storage>(service: &ShortenService<S>) -> Result<()> {
    let status = service.status().await;
    println!("{}", serde_json::json!({ "status": status }));
    Ok(())
}
