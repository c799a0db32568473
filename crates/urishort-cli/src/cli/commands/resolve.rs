//! `urishort resolve` – look up an identifier and bump its access time.

use anyhow::{Context, Result};
use urishort_core::{RetrieveResponse, ShortenService, Storage};

pub async fn run_resolve<S: Storage>(service: &ShortenService<S>, id: &str, text: bool) -> Result<()> {
    let entry = service
        .entry(id)
        .await
        .with_context(|| format!("resolving {id:?}"))?;
    if text {
        println!("{entry}");
    } else {
        let resp = RetrieveResponse::from(&entry);
        println!("{}", serde_json::to_string_pretty(&resp)?);
    }
    Ok(())
}
