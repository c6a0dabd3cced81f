use std::{collections::HashMap, future::Future, time::Duration};

use async_trait::async_trait;
use redis::{aio::ConnectionManager, AsyncCommands, RedisResult};

use super::{parse_info, KvStore, StoreInfo};
use crate::errors::ServiceError;

/// Redis-backed store.
///
/// Holds one [`ConnectionManager`]: a multiplexed connection that reconnects
/// on its own. Cloning it per command is cheap and lets concurrent requests
/// pipeline over the same socket.
#[derive(Clone)]
pub struct RedisStore {
    conn: ConnectionManager,
    endpoint: String,
    response_timeout: Duration,
}

impl RedisStore {
    pub async fn connect(url: &str, connect_timeout: Duration, response_timeout: Duration) -> Result<Self, ServiceError> {
        let client = redis::Client::open(url)?;
        let endpoint = client.get_connection_info().addr.to_string();
        let conn = tokio::time::timeout(connect_timeout, ConnectionManager::new(client))
            .await
            .map_err(|_| {
                ServiceError::StoreUnavailable(format!("connecting to {endpoint} timed out after {connect_timeout:?}"))
            })??;
        Ok(Self { conn, endpoint, response_timeout })
    }

    /// `host:port` (or socket path) this store talks to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn run<T, F>(&self, command: &'static str, fut: F) -> Result<T, ServiceError>
    where
        F: Future<Output = RedisResult<T>>,
    {
        match tokio::time::timeout(self.response_timeout, fut).await {
            Ok(res) => res.map_err(ServiceError::from),
            Err(_) => Err(ServiceError::StoreUnavailable(format!(
                "{command} on {} timed out after {:?}",
                self.endpoint, self.response_timeout
            ))),
        }
    }
}

#[async_trait]
impl KvStore for RedisStore {
    async fn hset_all(&self, key: &str, fields: &[(String, String)]) -> Result<(), ServiceError> {
        let mut con = self.conn.clone();
        self.run("HSET", con.hset_multiple(key, fields)).await
    }

    async fn hget_all(&self, key: &str) -> Result<HashMap<String, String>, ServiceError> {
        let mut con = self.conn.clone();
        self.run("HGETALL", con.hgetall(key)).await
    }

    async fn del(&self, key: &str) -> Result<bool, ServiceError> {
        let mut con = self.conn.clone();
        let removed: u64 = self.run("DEL", con.del(key)).await?;
        Ok(removed > 0)
    }

    async fn exists(&self, key: &str) -> Result<bool, ServiceError> {
        let mut con = self.conn.clone();
        self.run("EXISTS", con.exists(key)).await
    }

    async fn sadd(&self, key: &str, member: &str) -> Result<bool, ServiceError> {
        let mut con = self.conn.clone();
        let added: u64 = self.run("SADD", con.sadd(key, member)).await?;
        Ok(added > 0)
    }

    async fn srem(&self, key: &str, member: &str) -> Result<bool, ServiceError> {
        let mut con = self.conn.clone();
        let removed: u64 = self.run("SREM", con.srem(key, member)).await?;
        Ok(removed > 0)
    }

    async fn smembers(&self, key: &str) -> Result<Vec<String>, ServiceError> {
        let mut con = self.conn.clone();
        self.run("SMEMBERS", con.smembers(key)).await
    }

    async fn scard(&self, key: &str) -> Result<u64, ServiceError> {
        let mut con = self.conn.clone();
        self.run("SCARD", con.scard(key)).await
    }

    async fn server_info(&self) -> Result<StoreInfo, ServiceError> {
        let mut con = self.conn.clone();
        let mut cmd = redis::cmd("INFO");
        cmd.arg("server");
        let raw: String = self.run("INFO", cmd.query_async(&mut con)).await?;
        Ok(StoreInfo { endpoint: self.endpoint.clone(), server: parse_info(&raw) })
    }
}
