//! Request-layer facade: create, retrieve and status with public-facing errors.
//!
//! Internal failures are logged here and collapsed into [`ServiceError`],
//! whose messages are safe to return to an end user.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::allocator::Allocator;
use crate::canonical::Canonicalizer;
use crate::config::ShortenerConfig;
use crate::entry::{Entry, ShortId};
use crate::error::ShortenError;
use crate::store::{Health, Storage};

/// Payload returned for a successful create.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateResponse {
    pub id: ShortId,
    pub html_safe_uri: String,
    pub raw_uri: String,
    pub encoded_uri: String,
}

impl From<&Entry> for CreateResponse {
    fn from(entry: &Entry) -> Self {
        Self {
            id: entry.id().clone(),
            html_safe_uri: entry.html_safe_uri().to_string(),
            raw_uri: entry.uri().to_string(),
            encoded_uri: entry.encoded_uri().to_string(),
        }
    }
}

/// Payload returned for a successful retrieve. Timestamps are Unix seconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetrieveResponse {
    pub html_safe_uri: String,
    pub raw_uri: String,
    pub encoded_uri: String,
    pub created_on: i64,
    pub last_accessed: i64,
}

impl From<&Entry> for RetrieveResponse {
    fn from(entry: &Entry) -> Self {
        Self {
            html_safe_uri: entry.html_safe_uri().to_string(),
            raw_uri: entry.uri().to_string(),
            encoded_uri: entry.encoded_uri().to_string(),
            created_on: entry.created_on(),
            last_accessed: entry.last_accessed(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ServiceStatus {
    #[serde(rename = "Ok")]
    Operational,
    #[serde(rename = "Maintenance")]
    Maintenance,
    #[serde(rename = "Down")]
    Unavailable,
}

impl ServiceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceStatus::Operational => "Ok",
            ServiceStatus::Maintenance => "Maintenance",
            ServiceStatus::Unavailable => "Down",
        }
    }
}

/// Errors surfaced to callers of the service. Display strings are the public messages.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    #[error("Invalid URI.")]
    InvalidUri,
    #[error("Undefined id.")]
    UndefinedId,
    #[error("ID not found.")]
    NotFound,
    #[error("Please try again later.")]
    TryAgainLater,
    #[error("Server under maintenance, please try again later.")]
    Maintenance,
    #[error("Server down, check API server log for more information.")]
    Unavailable,
}

impl ServiceError {
    /// HTTP status a request layer should answer with.
    pub fn http_status(&self) -> u16 {
        match self {
            ServiceError::InvalidUri | ServiceError::UndefinedId => 400,
            ServiceError::NotFound => 404,
            ServiceError::TryAgainLater | ServiceError::Unavailable => 500,
            ServiceError::Maintenance => 503,
        }
    }
}

pub struct ShortenService<S: Storage> {
    config: ShortenerConfig,
    allocator: Allocator,
    store: S,
}

impl<S: Storage> ShortenService<S> {
    pub fn new(config: ShortenerConfig, store: S) -> anyhow::Result<Self> {
        config.validate()?;
        let allocator = Allocator::from_config(&config.preference)?;
        Ok(Self {
            config,
            allocator,
            store,
        })
    }

    pub fn config(&self) -> &ShortenerConfig {
        &self.config
    }

    pub fn canonicalizer(&self) -> &Canonicalizer {
        self.allocator.canonicalizer()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Maintenance wins over a reachable store; otherwise reachability decides.
    pub async fn status(&self) -> ServiceStatus {
        if self.config.preference.maintenance_mode {
            return ServiceStatus::Maintenance;
        }
        match self.store.health_check().await {
            Health::Reachable => ServiceStatus::Operational,
            Health::Unreachable => ServiceStatus::Unavailable,
        }
    }

    async fn ensure_operational(&self) -> Result<(), ServiceError> {
        match self.status().await {
            ServiceStatus::Operational => Ok(()),
            ServiceStatus::Maintenance => Err(ServiceError::Maintenance),
            ServiceStatus::Unavailable => Err(ServiceError::Unavailable),
        }
    }

    pub async fn create(&self, raw: &str) -> Result<CreateResponse, ServiceError> {
        self.ensure_operational().await?;
        match self.allocator.resolve(raw, &self.store).await {
            Ok(entry) => Ok(CreateResponse::from(&entry)),
            Err(e @ (ShortenError::InvalidInput(_) | ShortenError::Encoding(_))) => {
                warn!("rejected URI {raw:?}: {e}");
                Err(ServiceError::InvalidUri)
            }
            Err(e) => {
                warn!("create failed for {raw:?}: {e}");
                Err(ServiceError::TryAgainLater)
            }
        }
    }

    pub async fn retrieve(&self, id: &str) -> Result<RetrieveResponse, ServiceError> {
        self.entry(id).await.map(|entry| RetrieveResponse::from(&entry))
    }

    /// Like [`retrieve`](Self::retrieve) but returns the whole entry.
    pub async fn entry(&self, id: &str) -> Result<Entry, ServiceError> {
        self.ensure_operational().await?;
        let id = id.trim();
        if id.is_empty() {
            return Err(ServiceError::UndefinedId);
        }
        // A malformed id can never have been issued.
        let Ok(id) = ShortId::parse(id) else {
            info!("lookup of malformed id {id:?}");
            return Err(ServiceError::NotFound);
        };
        match self.allocator.lookup(&id, &self.store).await {
            Ok(Some(entry)) => Ok(entry),
            Ok(None) => Err(ServiceError::NotFound),
            Err(e) => {
                warn!("retrieve failed for {id}: {e}");
                Err(ServiceError::TryAgainLater)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn service(cfg: ShortenerConfig) -> ShortenService<MemoryStore> {
        ShortenService::new(cfg, MemoryStore::new()).unwrap()
    }

    #[tokio::test]
    async fn create_then_retrieve() {
        let svc = service(ShortenerConfig::default());
        let created = svc.create("example.com/example?ex=exp&as=sf#123").await.unwrap();
        assert_eq!(created.id.as_str().len(), 6);
        assert_eq!(created.raw_uri, "https://example.com/example?ex=exp&as=sf#123");
        assert_eq!(
            created.html_safe_uri,
            "https://example.com/example?ex=exp&amp;as=sf#123"
        );
        assert_eq!(created.encoded_uri, created.raw_uri);

        let got = svc.retrieve(created.id.as_str()).await.unwrap();
        assert_eq!(got.raw_uri, created.raw_uri);
        assert_eq!(got.html_safe_uri, created.html_safe_uri);
        assert_eq!(got.encoded_uri, created.encoded_uri);
        assert!(got.last_accessed >= got.created_on);
    }

    #[tokio::test]
    async fn create_is_idempotent_per_uri() {
        let svc = service(ShortenerConfig::default());
        let a = svc.create("https://example.com").await.unwrap();
        let b = svc.create("example.com").await.unwrap();
        assert_eq!(a, b);
        assert_eq!(svc.store().len(), 1);
    }

    #[tokio::test]
    async fn public_errors() {
        let svc = service(ShortenerConfig::default());
        assert_eq!(svc.create("   ").await, Err(ServiceError::InvalidUri));
        assert_eq!(svc.retrieve("").await, Err(ServiceError::UndefinedId));
        assert_eq!(svc.retrieve("nosuch").await, Err(ServiceError::NotFound));
        assert_eq!(svc.retrieve("../etc").await, Err(ServiceError::NotFound));
        assert_eq!(ServiceError::InvalidUri.to_string(), "Invalid URI.");
        assert_eq!(ServiceError::NotFound.http_status(), 404);
    }

    #[tokio::test]
    async fn status_reflects_store_and_maintenance() {
        let svc = service(ShortenerConfig::default());
        assert_eq!(svc.status().await, ServiceStatus::Operational);

        svc.store().set_online(false);
        assert_eq!(svc.status().await, ServiceStatus::Unavailable);
        assert_eq!(svc.create("example.com").await, Err(ServiceError::Unavailable));
        assert_eq!(svc.retrieve("abcdef").await, Err(ServiceError::Unavailable));

        let mut cfg = ShortenerConfig::default();
        cfg.preference.maintenance_mode = true;
        let svc = service(cfg);
        svc.store().set_online(false);
        assert_eq!(svc.status().await, ServiceStatus::Maintenance);
        assert_eq!(svc.create("example.com").await, Err(ServiceError::Maintenance));
        assert_eq!(ServiceError::Maintenance.http_status(), 503);
    }

    #[test]
    fn status_wire_strings() {
        assert_eq!(serde_json::to_string(&ServiceStatus::Operational).unwrap(), "\"Ok\"");
        assert_eq!(serde_json::to_string(&ServiceStatus::Maintenance).unwrap(), "\"Maintenance\"");
        assert_eq!(serde_json::to_string(&ServiceStatus::Unavailable).unwrap(), "\"Down\"");
        assert_eq!(ServiceStatus::Unavailable.as_str(), "Down");
    }

    #[tokio::test]
    async fn exhaustion_is_try_again_later() {
        let mut cfg = ShortenerConfig::default();
        cfg.preference.id_char_count = 1;
        cfg.preference.reserved_path = Vec::new();
        let svc = service(cfg);
        // 54 single-character ids; fill them all.
        let mut issued = 0;
        for n in 0..200 {
            if svc.create(&format!("example.com/{n}")).await.is_ok() {
                issued += 1;
            }
            if issued == 54 {
                break;
            }
        }
        assert_eq!(issued, 54);
        assert_eq!(
            svc.create("example.com/overflow").await,
            Err(ServiceError::TryAgainLater)
        );
    }
}
