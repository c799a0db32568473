//! `urishort shorten` – allocate (or reuse) identifiers.

use anyhow::{Context, Result};
use urishort_core::{ShortenService, Storage};

pub async fn run_shorten<S: Storage>(service: &ShortenService<S>, uris: &[String]) -> Result<()> {
    for uri in uris {
        let created = service
            .create(uri)
            .await
            .with_context(|| format!("shortening {uri:?}"))?;
        println!("{}", serde_json::to_string_pretty(&created)?);
    }
    Ok(())
}
