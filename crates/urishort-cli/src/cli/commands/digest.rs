//! `urishort digest` – SHA-256 of the canonical form.

use anyhow::Result;
use urishort_core::config::ShortenerConfig;

/// Prints `<hex>  <canonical uri>`, like sha256sum.
pub fn run_digest(cfg: &ShortenerConfig, uri: &str) -> Result<()> {
    let normalized = super::canonicalizer(cfg)?.normalize(uri)?;
    println!("{}  {}", normalized.digest, normalized.uri);
    Ok(())
}
