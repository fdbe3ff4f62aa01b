use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tokio::time::Instant;

use super::{RecordStore, StoreError};

/// Map size at which a write first sweeps out expired entries
const PURGE_MIN_ENTRIES: usize = 1024;

#[derive(Debug, Clone)]
struct Entry {
    value: Vec<u8>,
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|deadline| deadline <= now)
    }
}

#[derive(Debug)]
struct Entries {
    map: HashMap<String, Entry>,
    /// Next map size that triggers a sweep; doubles with the live set
    purge_at: usize,
}

impl Default for Entries {
    fn default() -> Self {
        Self {
            map: HashMap::new(),
            purge_at: PURGE_MIN_ENTRIES,
        }
    }
}

impl Entries {
    fn purge_expired(&mut self, now: Instant) {
        let before = self.map.len();
        self.map.retain(|_, entry| !entry.is_expired(now));
        self.purge_at = (self.map.len() * 2).max(PURGE_MIN_ENTRIES);
        tracing::debug!("Purged {} expired records", before - self.map.len());
    }
}

/// Volatile store holding records in a process-local map.
///
/// Mirrors the memcached contract: writes overwrite, missing and expired keys
/// read as `NotFound`. Expired entries are dropped when read, and swept in
/// bulk once the map has grown past `purge_at`.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<Entries>,
    ttl: Option<Duration>,
}

impl MemoryStore {
    pub fn new(ttl: Option<Duration>) -> Self {
        Self {
            entries: RwLock::new(Entries::default()),
            ttl,
        }
    }

    /// Expire records `ttl_seconds` after they are written; 0 disables expiry.
    pub fn with_ttl(ttl_seconds: u32) -> Self {
        let ttl = (ttl_seconds > 0).then(|| Duration::from_secs(u64::from(ttl_seconds)));
        Self::new(ttl)
    }

    #[cfg(test)]
    async fn len(&self) -> usize {
        let now = Instant::now();
        self.entries
            .read()
            .await
            .map
            .values()
            .filter(|entry| !entry.is_expired(now))
            .count()
    }

    /// Entries held in the map, expired or not
    #[cfg(test)]
    async fn held(&self) -> usize {
        self.entries.read().await.map.len()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Vec<u8>, StoreError> {
        let now = Instant::now();
        {
            let entries = self.entries.read().await;
            match entries.map.get(key) {
                Some(entry) if !entry.is_expired(now) => return Ok(entry.value.clone()),
                Some(_) => {}
                None => return Err(StoreError::NotFound),
            }
        }

        // Expired: purge under the write lock unless a writer got there first.
        let mut entries = self.entries.write().await;
        if entries.map.get(key).is_some_and(|entry| entry.is_expired(now)) {
            entries.map.remove(key);
            tracing::debug!("Purged expired record: {}", key);
        }
        Err(StoreError::NotFound)
    }

    async fn set(&self, key: &str, value: Vec<u8>) -> Result<(), StoreError> {
        let now = Instant::now();
        let entry = Entry {
            value,
            expires_at: self.ttl.map(|ttl| now + ttl),
        };

        let mut entries = self.entries.write().await;
        if self.ttl.is_some() && entries.map.len() >= entries.purge_at {
            entries.purge_expired(now);
        }
        entries.map.insert(key.to_string(), entry);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        let now = Instant::now();
        match self.entries.write().await.map.remove(key) {
            Some(entry) if !entry.is_expired(now) => Ok(()),
            _ => Err(StoreError::NotFound),
        }
    }
}
