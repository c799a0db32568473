//! The persisted short-link record and its identifier type.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::canonical::{render_html_safe, render_redirect_safe, CanonicalUri, Canonicalizer, NormalizedUri};
use crate::digest::Digest;
use crate::error::{Result, ShortenError};

/// Maximum identifier length (the storage column is sized to it).
pub const MAX_ID_LEN: usize = 12;

/// Short identifier: 1..=12 ASCII alphanumeric characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ShortId(pub(crate) String);

impl ShortId {
    pub fn parse(s: &str) -> Result<Self> {
        if s.is_empty() {
            return Err(ShortenError::InvalidId("identifier is empty".to_string()));
        }
        if s.chars().count() > MAX_ID_LEN {
            return Err(ShortenError::InvalidId(format!(
                "identifier exceeds {MAX_ID_LEN} characters"
            )));
        }
        if !s.bytes().all(|b| b.is_ascii_alphanumeric()) {
            return Err(ShortenError::InvalidId(format!(
                "identifier {s:?} contains characters outside [A-Za-z0-9]"
            )));
        }
        Ok(Self(s.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ShortId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for ShortId {
    type Error = ShortenError;

    fn try_from(s: String) -> Result<Self> {
        Self::parse(&s)
    }
}

impl From<ShortId> for String {
    fn from(id: ShortId) -> Self {
        id.0
    }
}

/// A short link.
///
/// `html_safe_uri`, `encoded_uri` and `digest` are derived from `uri` and are
/// only ever replaced together with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    id: ShortId,
    uri: String,
    html_safe_uri: String,
    encoded_uri: String,
    digest: Digest,
    created_on: i64,
    last_accessed: i64,
}

impl Entry {
    /// Fresh entry; both timestamps are set to now.
    pub fn new(id: ShortId, normalized: NormalizedUri) -> Self {
        let now = unix_timestamp();
        Self {
            id,
            uri: normalized.uri,
            html_safe_uri: normalized.html_safe_uri,
            encoded_uri: normalized.encoded_uri,
            digest: normalized.digest,
            created_on: now,
            last_accessed: now,
        }
    }

    /// Rebuild a persisted row. The stored digest is trusted after a length
    /// check rather than recomputed; `uri` must already be canonical.
    pub fn from_stored(
        id: &str,
        uri: &str,
        digest: &[u8],
        created_on: i64,
        last_accessed: i64,
    ) -> Result<Self> {
        let id = ShortId::parse(id)?;
        let digest = Digest::from_slice(digest)?;
        let parsed = CanonicalUri::split(uri)?;
        if parsed.scheme().is_none() || parsed.join() != uri {
            return Err(ShortenError::InvalidInput(format!(
                "stored URI is not canonical: {uri}"
            )));
        }
        Ok(Self {
            id,
            uri: uri.to_string(),
            html_safe_uri: render_html_safe(uri),
            encoded_uri: render_redirect_safe(&parsed)?,
            digest,
            created_on,
            last_accessed,
        })
    }

    /// Replace the URI, recomputing every derived field. On error the entry
    /// is left untouched.
    pub fn update_uri(&mut self, raw: &str, canonicalizer: &Canonicalizer) -> Result<()> {
        let normalized = canonicalizer.normalize(raw)?;
        self.uri = normalized.uri;
        self.html_safe_uri = normalized.html_safe_uri;
        self.encoded_uri = normalized.encoded_uri;
        self.digest = normalized.digest;
        Ok(())
    }

    pub fn id(&self) -> &ShortId {
        &self.id
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn html_safe_uri(&self) -> &str {
        &self.html_safe_uri
    }

    pub fn encoded_uri(&self) -> &str {
        &self.encoded_uri
    }

    pub fn digest(&self) -> &Digest {
        &self.digest
    }

    /// Unix seconds.
    pub fn created_on(&self) -> i64 {
        self.created_on
    }

    /// Unix seconds.
    pub fn last_accessed(&self) -> i64 {
        self.last_accessed
    }

    /// Record a successful resolution.
    pub(crate) fn mark_accessed(&mut self, at: i64) {
        self.last_accessed = at;
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "ID            : {}", self.id)?;
        writeln!(f, "URI           : {}", self.uri)?;
        writeln!(f, "SHA256        : {}", self.digest)?;
        writeln!(f, "Created On    : {}", self.created_on)?;
        write!(f, "Last Accessed : {}", self.last_accessed)
    }
}

/// Current time as Unix seconds (for entry timestamps).
pub(crate) fn unix_timestamp() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64
}
