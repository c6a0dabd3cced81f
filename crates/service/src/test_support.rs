#![cfg(test)]
use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::errors::ServiceError;
use crate::items::ItemRepository;
use crate::storage::{KvStore, MemoryStore, StoreInfo};

/// Repository over a fresh in-memory store; the store is returned too so
/// tests can inspect or corrupt the raw keys.
pub fn memory_repository() -> (ItemRepository, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    (ItemRepository::new(store.clone()), store)
}

/// Store whose every command fails as if the server were down.
pub struct DownStore;

fn down() -> ServiceError {
    ServiceError::StoreUnavailable("connection refused".into())
}

#[async_trait]
impl KvStore for DownStore {
    async fn hset_all(&self, _: &str, _: &[(String, String)]) -> Result<(), ServiceError> { Err(down()) }
    async fn hget_all(&self, _: &str) -> Result<HashMap<String, String>, ServiceError> { Err(down()) }
    async fn del(&self, _: &str) -> Result<bool, ServiceError> { Err(down()) }
    async fn exists(&self, _: &str) -> Result<bool, ServiceError> { Err(down()) }
    async fn sadd(&self, _: &str, _: &str) -> Result<bool, ServiceError> { Err(down()) }
    async fn srem(&self, _: &str, _: &str) -> Result<bool, ServiceError> { Err(down()) }
    async fn smembers(&self, _: &str) -> Result<Vec<String>, ServiceError> { Err(down()) }
    async fn scard(&self, _: &str) -> Result<u64, ServiceError> { Err(down()) }
    async fn server_info(&self) -> Result<StoreInfo, ServiceError> { Err(down()) }
}

pub fn failing_repository() -> ItemRepository {
    ItemRepository::new(Arc::new(DownStore))
}

/// `REDIS_URL` for tests that need a real server; `None` skips them.
pub fn live_redis_url() -> Option<String> {
    if std::env::var("SKIP_REDIS_TESTS").is_ok() {
        return None;
    }
    std::env::var("REDIS_URL").ok().filter(|u| !u.trim().is_empty())
}
