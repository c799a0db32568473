//! Short identifier allocation.
//!
//! `resolve` is content-addressed: a URI whose digest is already stored gets
//! the existing entry back. Otherwise random identifiers are drawn from the
//! alphabet until one is free, up to [`MAX_ALLOCATION_ATTEMPTS`].
//!
//! The existence check and the insert are not atomic. Storage enforces
//! identifier uniqueness; an insert-time [`StorageError::UniquenessViolation`]
//! counts as a taken candidate and the loop continues. Two concurrent
//! submissions of the same new URI may still both insert (at-least-one dedup).

mod alphabet;

pub use alphabet::{Alphabet, CONFUSING_CHARS};

use rand::rngs::OsRng;
use std::collections::HashSet;
use tracing::{debug, info, warn};

use crate::canonical::Canonicalizer;
use crate::config::PreferenceConfig;
use crate::entry::{Entry, ShortId, MAX_ID_LEN};
use crate::error::{Result, ShortenError, StorageError};
use crate::store::Storage;

/// Upper bound on candidates tried per allocation.
pub const MAX_ALLOCATION_ATTEMPTS: u32 = 50;

#[derive(Debug, Clone)]
pub struct Allocator {
    canonicalizer: Canonicalizer,
    alphabet: Alphabet,
    id_len: usize,
    reserved: HashSet<String>,
}

impl Allocator {
    pub fn new<I>(
        canonicalizer: Canonicalizer,
        alphabet: Alphabet,
        id_len: usize,
        reserved: I,
    ) -> Result<Self>
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        if id_len == 0 || id_len > MAX_ID_LEN {
            return Err(ShortenError::InvalidInput(format!(
                "identifier length must be between 1 and {MAX_ID_LEN}, got {id_len}"
            )));
        }
        Ok(Self {
            canonicalizer,
            alphabet,
            id_len,
            reserved: reserved.into_iter().map(Into::into).collect(),
        })
    }

    pub fn from_config(pref: &PreferenceConfig) -> Result<Self> {
        Self::new(
            Canonicalizer::new(&pref.default_scheme)?,
            Alphabet::new(pref.exclude_confusing_chars),
            pref.id_char_count,
            pref.reserved_path.iter().cloned(),
        )
    }

    pub fn canonicalizer(&self) -> &Canonicalizer {
        &self.canonicalizer
    }

    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    pub fn id_len(&self) -> usize {
        self.id_len
    }

    pub fn is_reserved(&self, id: &ShortId) -> bool {
        self.reserved.contains(id.as_str())
    }

    /// Draw `id_len` characters from the OS CSPRNG. No uniqueness check.
    pub fn generate_candidate(&self) -> ShortId {
        let mut rng = OsRng;
        let s: String = (0..self.id_len)
            .map(|_| self.alphabet.pick(&mut rng))
            .collect();
        ShortId(s)
    }

    /// Return the entry for `long_uri`, allocating a new identifier if the URI
    /// is not stored yet.
    pub async fn resolve<S: Storage>(&self, long_uri: &str, storage: &S) -> Result<Entry> {
        let normalized = self.canonicalizer.normalize(long_uri)?;

        if let Some(existing) = storage
            .find_by_digest(&normalized.digest)
            .await?
            .into_iter()
            .next()
        {
            info!(id = %existing.id(), digest = %normalized.digest, "dedup hit");
            return Ok(existing);
        }

        for attempt in 1..=MAX_ALLOCATION_ATTEMPTS {
            let candidate = self.generate_candidate();
            if self.is_reserved(&candidate) {
                debug!(attempt, id = %candidate, "candidate is a reserved path");
                continue;
            }
            if !storage.find_by_id(&candidate).await?.is_empty() {
                debug!(attempt, id = %candidate, "candidate already stored");
                continue;
            }

            let entry = Entry::new(candidate, normalized.clone());
            match storage.insert(&entry).await {
                Ok(()) => {
                    info!(id = %entry.id(), attempt, uri = %entry.uri(), "allocated identifier");
                    return Ok(entry);
                }
                Err(StorageError::UniquenessViolation) => {
                    debug!(attempt, id = %entry.id(), "candidate taken at insert");
                }
                Err(e) => return Err(e.into()),
            }
        }

        warn!(
            attempts = MAX_ALLOCATION_ATTEMPTS,
            id_len = self.id_len,
            alphabet = self.alphabet.len(),
            space = %self.alphabet.space(self.id_len),
            "cannot generate identifier, max attempts reached"
        );
        Err(ShortenError::AllocationExhausted {
            attempts: MAX_ALLOCATION_ATTEMPTS,
        })
    }

    /// Fetch the entry for `id` and bump its access time. `None` if unknown.
    pub async fn lookup<S: Storage>(&self, id: &ShortId, storage: &S) -> Result<Option<Entry>> {
        let Some(mut entry) = storage.find_by_id(id).await?.into_iter().next() else {
            return Ok(None);
        };
        let accessed = storage.touch_access(id).await?;
        entry.mark_accessed(accessed);
        Ok(Some(entry))
    }
}
