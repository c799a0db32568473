//! Error types shared by the canonicalizer, allocator and storage backends.

use thiserror::Error;

/// Failure reported by a storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Insert hit the identifier uniqueness constraint. The allocator treats
    /// this as "candidate was taken" and retries.
    #[error("identifier already exists")]
    UniquenessViolation,
    /// Backend could not be reached (pool closed, connection lost, timeout).
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    /// Any other database failure.
    #[error("storage backend: {0}")]
    Backend(#[from] sqlx::Error),
    /// A persisted row failed validation while being rebuilt into an entry.
    #[error("corrupt row: {0}")]
    Corrupt(String),
}

impl StorageError {
    /// Classify a sqlx error, splitting out unique-constraint violations and
    /// connectivity failures.
    pub fn from_sqlx(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                StorageError::UniquenessViolation
            }
            sqlx::Error::PoolClosed | sqlx::Error::PoolTimedOut | sqlx::Error::Io(_) => {
                StorageError::Unavailable(err.to_string())
            }
            _ => StorageError::Backend(err),
        }
    }
}

/// Errors produced by the shortening core.
#[derive(Debug, Error)]
pub enum ShortenError {
    /// Raw URI is empty after trimming or structurally unusable.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// Authority cannot be represented in ASCII-compatible form.
    #[error("cannot encode authority: {0}")]
    Encoding(String),
    /// Digest bytes were not exactly 32 bytes long.
    #[error("digest is {len} bytes, expected {expected}", expected = crate::digest::DIGEST_LEN)]
    InvalidDigestLength { len: usize },
    /// Identifier is empty, too long, or contains characters outside `[A-Za-z0-9]`.
    #[error("invalid identifier: {0}")]
    InvalidId(String),
    /// No free identifier was found within the retry budget. Needs operator
    /// attention (alphabet/length too small for current occupancy).
    #[error("identifier allocation exhausted after {attempts} attempts")]
    AllocationExhausted { attempts: u32 },
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl ShortenError {
    /// True for failures the caller should present as "try again later".
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            ShortenError::AllocationExhausted { .. } | ShortenError::Storage(_)
        )
    }
}

pub type Result<T, E = ShortenError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transient_classification() {
        assert!(ShortenError::AllocationExhausted { attempts: 50 }.is_transient());
        assert!(ShortenError::Storage(StorageError::Unavailable("down".into())).is_transient());
        assert!(!ShortenError::InvalidInput("empty".into()).is_transient());
        assert!(!ShortenError::Encoding("bad label".into()).is_transient());
        assert!(!ShortenError::InvalidId("toolongtoolong".into()).is_transient());
    }

    #[test]
    fn digest_length_message_names_both_lengths() {
        let msg = ShortenError::InvalidDigestLength { len: 16 }.to_string();
        assert_eq!(msg, "digest is 16 bytes, expected 32");
    }

    #[test]
    fn pool_closed_is_unavailable() {
        let err = StorageError::from_sqlx(sqlx::Error::PoolClosed);
        assert!(matches!(err, StorageError::Unavailable(_)));
    }
}
