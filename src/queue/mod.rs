//! Queue and result-log handle.
//!
//! [`Storage`] owns the store handle and the keyspace. The task queue
//! operations live in [`tasks`], the result log in [`log`]; both share the
//! same store and keep no state of their own between calls.

pub mod log;
pub mod tasks;

use crate::config::Config;
use crate::error::Result;
use crate::keys::{KeyPolicy, Keyspace};
use crate::kv::{KvStore, RedisStore};
use opentelemetry::KeyValue;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;

/// Queue + log handle over one key-value store.
pub struct Storage<S = RedisStore> {
    store: Arc<S>,
    keyspace: Keyspace,
    key_policy: KeyPolicy,
}

impl<S> Clone for Storage<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            keyspace: self.keyspace.clone(),
            key_policy: self.key_policy,
        }
    }
}

impl Storage<RedisStore> {
    /// Build a Redis-backed handle from configuration.
    ///
    /// The connection itself is opened on the first operation.
    pub fn connect(config: &Config) -> Result<Self> {
        let store = RedisStore::new(&config.endpoint())?;
        Ok(Self::with_store(Arc::new(store), Keyspace::new(&config.keyspace))
            .key_policy(config.key_policy))
    }
}

impl<S: KvStore> Storage<S> {
    /// Build a handle over an existing store.
    pub fn with_store(store: Arc<S>, keyspace: Keyspace) -> Self {
        Self {
            store,
            keyspace,
            key_policy: KeyPolicy::default(),
        }
    }

    /// Set the key policy used by `enqueue` (builder pattern).
    pub fn key_policy(mut self, policy: KeyPolicy) -> Self {
        self.key_policy = policy;
        self
    }

    pub fn keyspace(&self) -> &Keyspace {
        &self.keyspace
    }

    /// The underlying store.
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Round-trip to the store.
    pub async fn health_check(&self) -> Result<()> {
        self.store.ping().await
    }

    /// Metric labels for one operation on this keyspace.
    fn labels(&self, operation: &'static str) -> [KeyValue; 2] {
        [
            KeyValue::new("keyspace", self.keyspace.prefix().to_string()),
            KeyValue::new("operation", operation),
        ]
    }
}

/// Canonical encoding used both for hashing and for storage.
pub(crate) fn encode<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string(value)?)
}

pub(crate) fn decode<T: DeserializeOwned>(raw: &str) -> Result<T> {
    Ok(serde_json::from_str(raw)?)
}
