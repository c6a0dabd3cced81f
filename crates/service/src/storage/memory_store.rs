use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{KvStore, StoreInfo};
use crate::errors::ServiceError;

#[derive(Debug, Clone)]
enum Entry {
    Hash(HashMap<String, String>),
    Set(HashSet<String>),
}

impl Entry {
    fn kind(&self) -> &'static str {
        match self {
            Entry::Hash(_) => "hash",
            Entry::Set(_) => "set",
        }
    }
}

fn wrong_type(key: &str, found: &Entry, wanted: &str) -> ServiceError {
    ServiceError::StoreCommand(format!(
        "WRONGTYPE key {key} holds a {}, not a {wanted}",
        found.kind()
    ))
}

/// In-process store with Redis keyspace semantics: one namespace shared by
/// hashes and sets, empty collections disappear, type mismatches are errors.
///
/// Used by tests and by `redis.backend = "memory"`.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<HashMap<String, Entry>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KvStore for MemoryStore {
    async fn hset_all(&self, key: &str, fields: &[(String, String)]) -> Result<(), ServiceError> {
        if fields.is_empty() {
            return Err(ServiceError::StoreCommand("wrong number of arguments for 'hset' command".into()));
        }
        let mut map = self.inner.write().await;
        let entry = map
            .entry(key.to_string())
            .or_insert_with(|| Entry::Hash(HashMap::new()));
        match entry {
            Entry::Hash(h) => {
                h.extend(fields.iter().cloned());
                Ok(())
            }
            other => Err(wrong_type(key, other, "hash")),
        }
    }

    async fn hget_all(&self, key: &str) -> Result<HashMap<String, String>, ServiceError> {
        let map = self.inner.read().await;
        match map.get(key) {
            None => Ok(HashMap::new()),
            Some(Entry::Hash(h)) => Ok(h.clone()),
            Some(other) => Err(wrong_type(key, other, "hash")),
        }
    }

    async fn del(&self, key: &str) -> Result<bool, ServiceError> {
        Ok(self.inner.write().await.remove(key).is_some())
    }

    async fn exists(&self, key: &str) -> Result<bool, ServiceError> {
        Ok(self.inner.read().await.contains_key(key))
    }

    async fn sadd(&self, key: &str, member: &str) -> Result<bool, ServiceError> {
        let mut map = self.inner.write().await;
        let entry = map
            .entry(key.to_string())
            .or_insert_with(|| Entry::Set(HashSet::new()));
        match entry {
            Entry::Set(s) => Ok(s.insert(member.to_string())),
            other => Err(wrong_type(key, other, "set")),
        }
    }

    async fn srem(&self, key: &str, member: &str) -> Result<bool, ServiceError> {
        let mut map = self.inner.write().await;
        let (removed, now_empty) = match map.get_mut(key) {
            None => return Ok(false),
            Some(Entry::Set(s)) => (s.remove(member), s.is_empty()),
            Some(other) => return Err(wrong_type(key, other, "set")),
        };
        if now_empty {
            map.remove(key);
        }
        Ok(removed)
    }

    async fn smembers(&self, key: &str) -> Result<Vec<String>, ServiceError> {
        let map = self.inner.read().await;
        match map.get(key) {
            None => Ok(Vec::new()),
            Some(Entry::Set(s)) => Ok(s.iter().cloned().collect()),
            Some(other) => Err(wrong_type(key, other, "set")),
        }
    }

    async fn scard(&self, key: &str) -> Result<u64, ServiceError> {
        let map = self.inner.read().await;
        match map.get(key) {
            None => Ok(0),
            Some(Entry::Set(s)) => Ok(s.len() as u64),
            Some(other) => Err(wrong_type(key, other, "set")),
        }
    }

    async fn server_info(&self) -> Result<StoreInfo, ServiceError> {
        let server = HashMap::from([
            ("redis_mode".to_string(), "standalone".to_string()),
            ("server_name".to_string(), "memory".to_string()),
        ]);
        Ok(StoreInfo { endpoint: "memory".to_string(), server })
    }
}
