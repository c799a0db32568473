//! CLI command handlers, one per file.

mod digest;
mod normalize;
mod resolve;
mod shorten;
mod status;

pub use digest::run_digest;
pub use normalize::run_normalize;
pub use resolve::run_resolve;
pub use shorten::run_shorten;
pub use status::run_status;

use anyhow::Result;
use urishort_core::config::ShortenerConfig;
use urishort_core::Canonicalizer;

/// Canonicalizer for the storage-free commands.
fn canonicalizer(cfg: &ShortenerConfig) -> Result<Canonicalizer> {
    Ok(Canonicalizer::new(&cfg.preference.default_scheme)?)
}
