//! `urishort normalize` – show all renderings of a URI without storing it.

use anyhow::Result;
use urishort_core::config::ShortenerConfig;

pub fn run_normalize(cfg: &ShortenerConfig, uri: &str) -> Result<()> {
    let normalized = super::canonicalizer(cfg)?.normalize(uri)?;
    let out = serde_json::json!({
        "raw_uri": normalized.uri,
        "html_safe_uri": normalized.html_safe_uri,
        "encoded_uri": normalized.encoded_uri,
        "sha256": normalized.digest.to_hex(),
    });
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}
