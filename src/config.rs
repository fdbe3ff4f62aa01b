use std::env;
use std::fmt;
use std::time::Duration;

use anyhow::{Context, Result, bail};

/// Longest relative expiry memcached accepts; larger values are read as Unix timestamps
pub const MAX_RECORD_TTL_SECONDS: u32 = 60 * 60 * 24 * 30;

/// Which backing store the service keeps records in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Memcached,
    Memory,
}

impl fmt::Display for StoreBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreBackend::Memcached => f.write_str("memcached"),
            StoreBackend::Memory => f.write_str("memory"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub store_backend: StoreBackend,
    pub memcached_addr: Option<String>,
    pub memcached_pool_size: u32,
    pub memcached_timeout: Duration,
    pub record_ttl_seconds: u32,
    pub service_port: u16,
    pub service_host: String,
    pub docs_enabled: bool,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build the config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let store_backend = match lookup("STORE_BACKEND").as_deref() {
            None | Some("memcached") => StoreBackend::Memcached,
            Some("memory") => StoreBackend::Memory,
            Some(other) => bail!(
                "STORE_BACKEND must be one of: memcached, memory, got '{}'",
                other
            ),
        };

        let memcached_addr = lookup("MEMCACHED_ADDR").filter(|addr| !addr.trim().is_empty());
        if store_backend == StoreBackend::Memcached && memcached_addr.is_none() {
            bail!("MEMCACHED_ADDR environment variable is required when STORE_BACKEND is memcached");
        }

        let memcached_pool_size = lookup("MEMCACHED_POOL_SIZE")
            .unwrap_or_else(|| "4".to_string())
            .parse::<u32>()
            .context("MEMCACHED_POOL_SIZE must be a positive integer")?;
        if memcached_pool_size == 0 {
            bail!("MEMCACHED_POOL_SIZE must be at least 1");
        }

        let memcached_timeout_ms = lookup("MEMCACHED_TIMEOUT_MS")
            .unwrap_or_else(|| "1000".to_string())
            .parse::<u64>()
            .context("MEMCACHED_TIMEOUT_MS must be a number of milliseconds")?;

        let record_ttl_seconds = lookup("RECORD_TTL_SECONDS")
            .unwrap_or_else(|| "0".to_string())
            .parse::<u32>()
            .context("RECORD_TTL_SECONDS must be a non-negative number of seconds")?;
        if record_ttl_seconds > MAX_RECORD_TTL_SECONDS {
            bail!(
                "RECORD_TTL_SECONDS must be at most {} (30 days), got {}",
                MAX_RECORD_TTL_SECONDS,
                record_ttl_seconds
            );
        }

        let service_port = lookup("SERVICE_PORT")
            .unwrap_or_else(|| "3000".to_string())
            .parse::<u16>()
            .context("SERVICE_PORT must be a valid port number (0-65535)")?;

        let service_host = lookup("SERVICE_HOST").unwrap_or_else(|| "0.0.0.0".to_string());

        let docs_enabled = match lookup("DOCS_ENABLED").as_deref() {
            None | Some("false") | Some("0") => false,
            Some("true") | Some("1") => true,
            Some(other) => bail!("DOCS_ENABLED must be true or false, got '{}'", other),
        };

        Ok(Config {
            store_backend,
            memcached_addr,
            memcached_pool_size,
            memcached_timeout: Duration::from_millis(memcached_timeout_ms),
            record_ttl_seconds,
            service_port,
            service_host,
            docs_enabled,
        })
    }

    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.service_host, self.service_port)
    }

    pub fn log_startup(&self) {
        tracing::info!("Configuration loaded:");
        tracing::info!("  Store backend: {}", self.store_backend);
        if self.store_backend == StoreBackend::Memcached {
            tracing::info!(
                "  Memcached servers: {}",
                self.memcached_addr.as_deref().unwrap_or("none")
            );
            tracing::info!("  Memcached pool size: {}", self.memcached_pool_size);
            tracing::info!("  Memcached timeout: {:?}", self.memcached_timeout);
        }
        if self.record_ttl_seconds == 0 {
            tracing::info!("  Record TTL: none");
        } else {
            tracing::info!("  Record TTL: {}s", self.record_ttl_seconds);
        }
        tracing::info!("  API docs: {}", if self.docs_enabled { "enabled" } else { "disabled" });
        tracing::info!("  Service listening on: {}", self.socket_addr());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_config_with_all_vars() {
        let config = config_from(&[
            ("STORE_BACKEND", "memcached"),
            ("MEMCACHED_ADDR", "10.0.0.1:11211,10.0.0.2:11211"),
            ("MEMCACHED_POOL_SIZE", "8"),
            ("MEMCACHED_TIMEOUT_MS", "250"),
            ("RECORD_TTL_SECONDS", "600"),
            ("SERVICE_PORT", "8080"),
            ("SERVICE_HOST", "127.0.0.1"),
            ("DOCS_ENABLED", "true"),
        ])
        .unwrap();

        assert_eq!(config.store_backend, StoreBackend::Memcached);
        assert_eq!(
            config.memcached_addr,
            Some("10.0.0.1:11211,10.0.0.2:11211".to_string())
        );
        assert_eq!(config.memcached_pool_size, 8);
        assert_eq!(config.memcached_timeout, Duration::from_millis(250));
        assert_eq!(config.record_ttl_seconds, 600);
        assert_eq!(config.service_port, 8080);
        assert_eq!(config.service_host, "127.0.0.1");
        assert!(config.docs_enabled);
        assert_eq!(config.socket_addr(), "127.0.0.1:8080");
    }

    #[test]
    fn test_config_with_defaults() {
        let config = config_from(&[("MEMCACHED_ADDR", "localhost:11211")]).unwrap();

        assert_eq!(config.store_backend, StoreBackend::Memcached);
        assert_eq!(config.memcached_pool_size, 4);
        assert_eq!(config.memcached_timeout, Duration::from_secs(1));
        assert_eq!(config.record_ttl_seconds, 0);
        assert_eq!(config.service_port, 3000);
        assert_eq!(config.service_host, "0.0.0.0");
        assert!(!config.docs_enabled);
    }

    #[test]
    fn test_memory_backend_needs_no_addr() {
        let config = config_from(&[("STORE_BACKEND", "memory")]).unwrap();

        assert_eq!(config.store_backend, StoreBackend::Memory);
        assert_eq!(config.memcached_addr, None);
    }

    #[test]
    fn test_missing_memcached_addr() {
        let error = config_from(&[]).unwrap_err();
        assert!(error.to_string().contains("MEMCACHED_ADDR"));

        let error = config_from(&[("MEMCACHED_ADDR", "  ")]).unwrap_err();
        assert!(error.to_string().contains("MEMCACHED_ADDR"));
    }

    #[test]
    fn test_unknown_backend() {
        let error = config_from(&[("STORE_BACKEND", "redis")]).unwrap_err();
        assert!(error.to_string().contains("STORE_BACKEND"));
        assert!(error.to_string().contains("redis"));
    }

    #[test]
    fn test_invalid_port() {
        let result = config_from(&[
            ("STORE_BACKEND", "memory"),
            ("SERVICE_PORT", "not-a-number"),
        ]);
        assert!(result.unwrap_err().to_string().contains("SERVICE_PORT"));
    }

    #[test]
    fn test_port_out_of_range() {
        let result = config_from(&[("STORE_BACKEND", "memory"), ("SERVICE_PORT", "99999")]);
        assert!(result.is_err());
    }

    #[test]
    fn test_zero_pool_size() {
        let result = config_from(&[
            ("MEMCACHED_ADDR", "localhost:11211"),
            ("MEMCACHED_POOL_SIZE", "0"),
        ]);
        assert!(result.unwrap_err().to_string().contains("MEMCACHED_POOL_SIZE"));
    }

    #[test]
    fn test_invalid_ttl() {
        let result = config_from(&[("STORE_BACKEND", "memory"), ("RECORD_TTL_SECONDS", "-5")]);
        assert!(result.unwrap_err().to_string().contains("RECORD_TTL_SECONDS"));
    }

    #[test]
    fn test_ttl_over_thirty_days() {
        let config = config_from(&[("STORE_BACKEND", "memory"), ("RECORD_TTL_SECONDS", "2592000")])
            .unwrap();
        assert_eq!(config.record_ttl_seconds, MAX_RECORD_TTL_SECONDS);

        let result = config_from(&[("STORE_BACKEND", "memory"), ("RECORD_TTL_SECONDS", "2592001")]);
        assert!(result.unwrap_err().to_string().contains("RECORD_TTL_SECONDS"));
    }

    #[test]
    fn test_invalid_docs_flag() {
        let result = config_from(&[("STORE_BACKEND", "memory"), ("DOCS_ENABLED", "maybe")]);
        assert!(result.unwrap_err().to_string().contains("DOCS_ENABLED"));
    }
}
