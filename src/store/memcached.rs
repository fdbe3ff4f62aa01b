use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use memcache::{Client, MemcacheError};

use super::{RecordStore, StoreError};
use crate::config::Config;

/// Shareable memcached client for use across async handlers
#[derive(Clone)]
pub struct MemcachedStore {
    inner: Arc<Client>,
    ttl_seconds: u32,
}

impl MemcachedStore {
    /// Connect to the memcached servers named in the configuration
    ///
    /// `MEMCACHED_ADDR` may list several servers separated by commas; keys are
    /// sharded across them by the client. Each server gets its own pool of
    /// `memcached_pool_size` connections.
    ///
    /// Connecting issues a `version` command to every server, so an
    /// unreachable cache fails startup instead of the first request.
    pub async fn from_config(config: &Config) -> Result<Self> {
        let addr = config
            .memcached_addr
            .as_deref()
            .ok_or_else(|| anyhow!("MEMCACHED_ADDR is not configured"))?;
        let urls = server_urls(addr);
        let pool_size = config.memcached_pool_size;
        let timeout = config.memcached_timeout;

        tracing::info!("Connecting to memcached at: {}", urls.join(", "));

        // The client connects eagerly and blocks while doing so.
        let client = tokio::task::spawn_blocking(move || -> Result<Client> {
            let client = Client::with_pool_size(urls, pool_size)
                .context("Failed to create memcached client")?;
            client
                .set_read_timeout(Some(timeout))
                .context("Failed to set memcached read timeout")?;
            client
                .set_write_timeout(Some(timeout))
                .context("Failed to set memcached write timeout")?;

            let versions = client
                .version()
                .context("Failed to query memcached server version")?;
            for (server, version) in versions {
                tracing::info!("Connected to memcached {} (version {})", server, version);
            }
            Ok(client)
        })
        .await
        .context("memcached connect task failed")??;

        Ok(Self {
            inner: Arc::new(client),
            ttl_seconds: config.record_ttl_seconds,
        })
    }

    /// Run a blocking client call on tokio's blocking pool
    async fn call<T, F>(&self, op: &'static str, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(&Client) -> Result<T, MemcacheError> + Send + 'static,
        T: Send + 'static,
    {
        let client = self.inner.clone();
        let result = tokio::task::spawn_blocking(move || f(&client))
            .await
            .with_context(|| format!("memcached {} task failed", op))?;

        Ok(result.with_context(|| format!("memcached {} failed", op))?)
    }
}

#[async_trait]
impl RecordStore for MemcachedStore {
    async fn get(&self, key: &str) -> Result<Vec<u8>, StoreError> {
        let owned_key = key.to_string();
        let value = self
            .call("get", move |client| client.get::<Vec<u8>>(&owned_key))
            .await?;

        match value {
            Some(bytes) => {
                tracing::debug!("memcached hit for key: {}", key);
                Ok(bytes)
            }
            None => {
                tracing::debug!("memcached miss for key: {}", key);
                Err(StoreError::NotFound)
            }
        }
    }

    async fn set(&self, key: &str, value: Vec<u8>) -> Result<(), StoreError> {
        let owned_key = key.to_string();
        let ttl = self.ttl_seconds;
        self.call("set", move |client| {
            client.set(&owned_key, value.as_slice(), ttl)
        })
        .await?;

        tracing::debug!("memcached set key: {} (ttl {}s)", key, ttl);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        let owned_key = key.to_string();
        let deleted = self
            .call("delete", move |client| client.delete(&owned_key))
            .await?;

        if deleted {
            tracing::debug!("memcached deleted key: {}", key);
            Ok(())
        } else {
            Err(StoreError::NotFound)
        }
    }
}

/// Turn `host:port[,host:port...]` into memcache URLs.
///
/// Entries that already carry a scheme (`memcache://`, `memcache+udp://`, ...)
/// are passed through untouched.
fn server_urls(addr: &str) -> Vec<String> {
    addr.split(',')
        .map(str::trim)
        .filter(|server| !server.is_empty())
        .map(|server| {
            if server.contains("://") {
                server.to_string()
            } else {
                format!("memcache://{}", server)
            }
        })
        .collect()
}
