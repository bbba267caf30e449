//! Redis key-value store.
//!
//! [`RedisStore`] maps the [`KvStore`] commands one-to-one onto Redis
//! commands. The connection is opened lazily on the first command and then
//! shared: a [`ConnectionManager`] multiplexes every caller over one socket
//! and reconnects in the background after transport failures, while each
//! command still reports its own error to its caller.
//!
//! `push_and_set` runs as a `MULTI/EXEC` pipeline, so a reader never sees a
//! queued key before its body.

use super::KvStore;
use crate::config::Endpoint;
use crate::error::{Error, Result};
use ::redis::aio::ConnectionManager;
use ::redis::{AsyncCommands, Client};
use async_trait::async_trait;
use std::num::NonZeroUsize;
use tokio::sync::OnceCell;
use tracing::debug;

pub struct RedisStore {
    client: Client,
    endpoint: String,
    conn: OnceCell<ConnectionManager>,
}

impl std::fmt::Debug for RedisStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisStore")
            .field("endpoint", &self.endpoint)
            .field("connected", &self.conn.initialized())
            .finish()
    }
}

impl RedisStore {
    /// Prepare a store for `endpoint`. No connection is made until the
    /// first command.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the endpoint does not form a valid
    /// Redis connection URL.
    pub fn new(endpoint: &Endpoint) -> Result<Self> {
        let client = Client::open(endpoint.connection_url())
            .map_err(|e| Error::Config(format!("invalid Redis endpoint: {e}")))?;
        Ok(Self {
            client,
            endpoint: endpoint.describe(),
            conn: OnceCell::new(),
        })
    }

    /// The shared connection, opened on first use.
    async fn conn(&self) -> Result<ConnectionManager> {
        let conn = self
            .conn
            .get_or_try_init(|| async {
                debug!(endpoint = %self.endpoint, "opening Redis connection");
                ConnectionManager::new(self.client.clone()).await
            })
            .await?;
        Ok(conn.clone())
    }
}

#[async_trait]
impl KvStore for RedisStore {
    async fn rpush(&self, list: &str, value: &str) -> Result<u64> {
        let mut conn = self.conn().await?;
        let len: u64 = conn.rpush(list, value).await?;
        Ok(len)
    }

    async fn lpop(&self, list: &str) -> Result<Option<String>> {
        let mut conn = self.conn().await?;
        let head: Option<String> = conn.lpop(list, None::<NonZeroUsize>).await?;
        Ok(head)
    }

    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut conn = self.conn().await?;
        let value: Option<String> = conn.get(key).await?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut conn = self.conn().await?;
        let _: () = conn.set(key, value).await?;
        Ok(())
    }

    async fn del(&self, key: &str) -> Result<u64> {
        let mut conn = self.conn().await?;
        let removed: u64 = conn.del(key).await?;
        Ok(removed)
    }

    async fn llen(&self, list: &str) -> Result<u64> {
        let mut conn = self.conn().await?;
        let len: u64 = conn.llen(list).await?;
        Ok(len)
    }

    async fn lrange(&self, list: &str, start: isize, stop: isize) -> Result<Vec<String>> {
        let mut conn = self.conn().await?;
        let entries: Vec<String> = conn.lrange(list, start, stop).await?;
        Ok(entries)
    }

    async fn push_and_set(&self, list: &str, key: &str, value: &str) -> Result<()> {
        let mut conn = self.conn().await?;
        let _: () = ::redis::pipe()
            .atomic()
            .rpush(list, key)
            .ignore()
            .set(key, value)
            .ignore()
            .query_async(&mut conn)
            .await?;
        Ok(())
    }

    async fn ping(&self) -> Result<()> {
        let mut conn = self.conn().await?;
        let _: String = ::redis::cmd("PING").query_async(&mut conn).await?;
        Ok(())
    }
}
