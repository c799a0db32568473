//! Identifier character sets.

use rand::Rng;

use crate::error::{Result, ShortenError};

/// Characters that are easy to misread for one another.
pub const CONFUSING_CHARS: &[u8] = b"1lLIi0Oo";

const BASE62: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// The set of characters identifiers are drawn from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alphabet {
    chars: Vec<u8>,
}

impl Alphabet {
    /// `[A-Za-z0-9]`, optionally without [`CONFUSING_CHARS`].
    pub fn new(exclude_confusing: bool) -> Self {
        let chars = BASE62
            .iter()
            .copied()
            .filter(|c| !exclude_confusing || !CONFUSING_CHARS.contains(c))
            .collect();
        Self { chars }
    }

    /// Custom alphabet; must be non-empty ASCII alphanumerics. Duplicates are dropped.
    pub fn from_chars(s: &str) -> Result<Self> {
        let mut chars: Vec<u8> = Vec::with_capacity(s.len());
        for b in s.bytes() {
            if !b.is_ascii_alphanumeric() {
                return Err(ShortenError::InvalidInput(format!(
                    "alphabet may only contain [A-Za-z0-9], got {:?}",
                    b as char
                )));
            }
            if !chars.contains(&b) {
                chars.push(b);
            }
        }
        if chars.is_empty() {
            return Err(ShortenError::InvalidInput("alphabet is empty".to_string()));
        }
        Ok(Self { chars })
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn contains(&self, c: char) -> bool {
        c.is_ascii() && self.chars.contains(&(c as u8))
    }

    /// Number of distinct identifiers of length `id_len` (saturating).
    pub fn space(&self, id_len: usize) -> u128 {
        let base = self.chars.len() as u128;
        (0..id_len).fold(1u128, |acc, _| acc.saturating_mul(base))
    }

    /// One uniformly drawn character.
    pub(crate) fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> char {
        self.chars[rng.gen_range(0..self.chars.len())] as char
    }
}
