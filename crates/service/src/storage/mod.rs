//! Storage abstractions for the service layer.
//!
//! [`KvStore`] is the small slice of Redis the repository needs: hashes,
//! sets, key existence and server metadata, all addressed by string keys.
//! Implementations must be safe to share between concurrent requests.

pub mod memory_store;
pub mod redis_store;

use std::{collections::HashMap, sync::Arc, time::Duration};

use async_trait::async_trait;
use configs::{RedisConfig, StoreBackend};
use tracing::info;

use crate::errors::ServiceError;

pub use memory_store::MemoryStore;
pub use redis_store::RedisStore;

/// Where the store lives plus its `INFO server` section.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreInfo {
    pub endpoint: String,
    pub server: HashMap<String, String>,
}

#[async_trait]
pub trait KvStore: Send + Sync {
    /// Write every `(field, value)` pair into the hash at `key`, creating it if needed.
    async fn hset_all(&self, key: &str, fields: &[(String, String)]) -> Result<(), ServiceError>;
    /// All fields of the hash at `key`; empty when the key does not exist.
    async fn hget_all(&self, key: &str) -> Result<HashMap<String, String>, ServiceError>;
    /// Remove `key` of any type. Returns whether it existed.
    async fn del(&self, key: &str) -> Result<bool, ServiceError>;
    async fn exists(&self, key: &str) -> Result<bool, ServiceError>;
    /// Returns whether `member` was newly added.
    async fn sadd(&self, key: &str, member: &str) -> Result<bool, ServiceError>;
    /// Returns whether `member` was present.
    async fn srem(&self, key: &str, member: &str) -> Result<bool, ServiceError>;
    async fn smembers(&self, key: &str) -> Result<Vec<String>, ServiceError>;
    async fn scard(&self, key: &str) -> Result<u64, ServiceError>;
    async fn server_info(&self) -> Result<StoreInfo, ServiceError>;
}

/// Build the store selected by configuration.
pub async fn connect(cfg: &RedisConfig) -> Result<Arc<dyn KvStore>, ServiceError> {
    match cfg.backend {
        StoreBackend::Memory => {
            info!(backend = "memory", "using in-process store; data is lost on restart");
            Ok(Arc::new(MemoryStore::new()))
        }
        StoreBackend::Redis => {
            let store = RedisStore::connect(
                &cfg.url,
                Duration::from_secs(cfg.connect_timeout_secs),
                Duration::from_secs(cfg.response_timeout_secs),
            )
            .await?;
            info!(backend = "redis", endpoint = %store.endpoint(), url = %cfg.redacted_url(), "connected to redis");
            Ok(Arc::new(store))
        }
    }
}

/// Parse the text returned by `INFO`: `# Section` headers, blank lines and
/// `key:value` lines.
pub fn parse_info(raw: &str) -> HashMap<String, String> {
    raw.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .filter_map(|l| l.split_once(':'))
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_info_reads_key_values() {
        let raw = "# Server\r\nredis_version:7.2.4\r\nredis_mode:standalone\r\nos:Linux 6.1 x86_64\r\n\r\nexecutable:/usr/bin/redis-server\r\nconfig_file:\r\n";
        let info = parse_info(raw);
        assert_eq!(info.get("redis_version").map(String::as_str), Some("7.2.4"));
        assert_eq!(info.get("os").map(String::as_str), Some("Linux 6.1 x86_64"));
        assert_eq!(info.get("config_file").map(String::as_str), Some(""));
        assert!(!info.contains_key("# Server"));
        assert_eq!(info.len(), 5);
    }

    #[tokio::test]
    async fn connect_memory_backend() -> Result<(), anyhow::Error> {
        let cfg = RedisConfig { backend: StoreBackend::Memory, ..Default::default() };
        let store = connect(&cfg).await?;
        assert!(store.sadd("items", "a").await?);
        assert_eq!(store.scard("items").await?, 1);
        Ok(())
    }

    #[tokio::test]
    async fn connect_rejects_malformed_url() {
        let cfg = RedisConfig { url: "not a url".into(), ..Default::default() };
        let err = connect(&cfg).await.err().expect("malformed url must fail");
        assert!(err.is_store_error());
    }
}
