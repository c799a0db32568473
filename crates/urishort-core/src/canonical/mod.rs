//! URI canonicalization.
//!
//! Turns untrusted free-form input into four consistent outputs:
//! - the canonical URI string (basis for hashing and storage),
//! - an HTML-safe display rendering,
//! - a redirect-safe encoded rendering,
//! - the SHA-256 digest of the canonical string.
//!
//! Everything here is pure; a [`Canonicalizer`] can be shared across threads.

mod encode;
mod html;
mod split;

pub use encode::render_redirect_safe;
pub use html::render_html_safe;
pub use split::CanonicalUri;

use crate::digest::Digest;
use crate::error::{Result, ShortenError};

/// Default schemes whose canonical form carries an authority (`scheme://host`).
pub const NETWORK_SCHEMES: &[&str] = &["http", "https", "ws", "wss", "ftp"];

/// Scheme applied when input has none and the config does not override it.
pub const DEFAULT_SCHEME: &str = "https";

/// All derived forms of one URI, always computed together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedUri {
    pub uri: String,
    pub html_safe_uri: String,
    pub encoded_uri: String,
    pub digest: Digest,
}

/// Canonicalizes raw input against a configured default scheme.
#[derive(Debug, Clone)]
pub struct Canonicalizer {
    default_scheme: String,
    network_default: bool,
}

impl Default for Canonicalizer {
    fn default() -> Self {
        Self {
            default_scheme: DEFAULT_SCHEME.to_string(),
            network_default: true,
        }
    }
}

impl Canonicalizer {
    /// Build a canonicalizer; `default_scheme` must be a syntactically valid scheme.
    pub fn new(default_scheme: &str) -> Result<Self> {
        let scheme = default_scheme.trim();
        if !split::is_scheme(scheme) {
            return Err(ShortenError::InvalidInput(format!(
                "invalid default scheme: {default_scheme:?}"
            )));
        }
        let scheme = scheme.to_ascii_lowercase();
        let network_default = NETWORK_SCHEMES.contains(&scheme.as_str());
        Ok(Self {
            default_scheme: scheme,
            network_default,
        })
    }

    pub fn default_scheme(&self) -> &str {
        &self.default_scheme
    }

    /// Split `raw` and fill in the default scheme.
    ///
    /// With a network-style default, input that has neither scheme nor
    /// authority (`example.com/x`) has its leading path segment promoted to the
    /// authority, giving `https://example.com/x` instead of `https:example.com/x`.
    /// A non-network default only fills in the missing scheme.
    pub fn parse_and_normalize(&self, raw: &str) -> Result<CanonicalUri> {
        let cleaned = clean_input(raw);
        if cleaned.is_empty() {
            return Err(ShortenError::InvalidInput(
                "URI cannot be an empty string".to_string(),
            ));
        }

        let mut uri = CanonicalUri::split(&cleaned)?;
        if uri.scheme.is_some() {
            return Ok(uri);
        }

        if self.network_default && uri.authority.is_none() {
            uri = CanonicalUri::from_parts(None, uri.path, None, uri.query, uri.fragment)?;
        }
        CanonicalUri::from_parts(
            Some(self.default_scheme.clone()),
            uri.authority,
            uri.path,
            uri.query,
            uri.fragment,
        )
    }

    /// Run the whole pipeline: parse, HTML rendering, redirect rendering, digest.
    pub fn normalize(&self, raw: &str) -> Result<NormalizedUri> {
        let parsed = self.parse_and_normalize(raw)?;
        let uri = parsed.join();
        let html_safe_uri = render_html_safe(&uri);
        let encoded_uri = render_redirect_safe(&parsed)?;
        let digest = fingerprint(&uri);
        Ok(NormalizedUri {
            uri,
            html_safe_uri,
            encoded_uri,
            digest,
        })
    }
}

/// SHA-256 of the canonical string.
pub fn fingerprint(uri: &str) -> Digest {
    Digest::of(uri)
}

/// Trim surrounding whitespace and drop embedded tab, CR and LF.
fn clean_input(raw: &str) -> String {
    raw.trim()
        .chars()
        .filter(|c| !matches!(c, '\t' | '\r' | '\n'))
        .collect()
}
