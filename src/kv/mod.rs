//! Key-value store abstraction.
//!
//! [`KvStore`] is the contract the queue and log protocols run against: a
//! handful of list and string commands with Redis semantics. Stores are dumb;
//! key derivation, serialization and sequencing live in
//! [`Storage`](crate::queue::Storage).
//!
//! - [`RedisStore`]: production backend over a managed Redis connection.
//! - [`MemoryStore`]: in-process backend for tests and local development,
//!   with per-command fault injection.

pub mod memory;
pub mod redis;

pub use self::memory::{KvOp, MemoryStore};
pub use self::redis::RedisStore;

use crate::error::Result;
use async_trait::async_trait;

#[async_trait]
pub trait KvStore: Send + Sync {
    /// Append `value` to the tail of `list`. Returns the new list length.
    async fn rpush(&self, list: &str, value: &str) -> Result<u64>;

    /// Remove and return the head of `list`, or `None` if it is empty.
    async fn lpop(&self, list: &str) -> Result<Option<String>>;

    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Unconditionally overwrite `key`.
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Delete `key`. Returns the number of keys removed.
    async fn del(&self, key: &str) -> Result<u64>;

    async fn llen(&self, list: &str) -> Result<u64>;

    /// Elements `start..=stop` of `list`; negative indexes count from the tail.
    async fn lrange(&self, list: &str, start: isize, stop: isize) -> Result<Vec<String>>;

    /// Push `key` onto `list`, then write `value` at `key`.
    ///
    /// The default issues two round trips: a failed push skips the write,
    /// a failed write leaves the pushed reference behind. Stores with
    /// transactions override this to make both visible at once.
    async fn push_and_set(&self, list: &str, key: &str, value: &str) -> Result<()> {
        self.rpush(list, key).await?;
        self.set(key, value).await
    }

    /// Health check.
    ///
    /// The default always succeeds; stores with a server round trip
    /// override it.
    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}
