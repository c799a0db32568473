//! Core of the urishort link shortener: URI canonicalization, fingerprinting,
//! identifier allocation and entry storage.

pub mod allocator;
pub mod canonical;
pub mod config;
pub mod digest;
pub mod entry;
pub mod error;
pub mod logging;
pub mod service;
pub mod store;

pub use allocator::{Allocator, Alphabet, MAX_ALLOCATION_ATTEMPTS};
pub use canonical::{fingerprint, CanonicalUri, Canonicalizer, NormalizedUri};
pub use config::ShortenerConfig;
pub use digest::Digest;
pub use entry::{Entry, ShortId};
pub use error::{ShortenError, StorageError};
pub use service::{CreateResponse, RetrieveResponse, ServiceError, ServiceStatus, ShortenService};
pub use store::{Health, MemoryStore, SqliteStore, Storage};
