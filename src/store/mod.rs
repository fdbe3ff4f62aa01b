use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use crate::config::{Config, StoreBackend};

/// Memcached-backed store used in production.
pub mod memcached;

/// In-process store for tests and local development.
pub mod memory;

pub use memcached::MemcachedStore;
pub use memory::MemoryStore;

/// Failure of a single backing-store call
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The key is absent, expired or evicted
    #[error("key not found")]
    NotFound,
    /// Connectivity, timeout or protocol failure
    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

/// Key/value primitives the record router is built on.
///
/// Implementations must be safe to share across concurrent requests. Values
/// are opaque bytes; expiry and eviction are owned by the store.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Fetch the value stored under `key`, or `StoreError::NotFound`.
    async fn get(&self, key: &str) -> Result<Vec<u8>, StoreError>;

    /// Unconditionally store `value` under `key`.
    async fn set(&self, key: &str, value: Vec<u8>) -> Result<(), StoreError>;

    /// Remove `key`, or `StoreError::NotFound` if nothing was stored.
    async fn delete(&self, key: &str) -> Result<(), StoreError>;
}

/// Build the store selected by the configuration
pub async fn connect(config: &Config) -> Result<Arc<dyn RecordStore>> {
    match config.store_backend {
        StoreBackend::Memcached => {
            let store = MemcachedStore::from_config(config).await?;
            Ok(Arc::new(store))
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory store; records will not survive a restart");
            Ok(Arc::new(MemoryStore::with_ttl(config.record_ttl_seconds)))
        }
    }
}
