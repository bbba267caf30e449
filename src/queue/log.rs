//! Result log operations.
//!
//! Append-only: each call pushes `{task-key}-result` onto the log list and
//! writes the result body under that key. Nothing here deletes or
//! deduplicates.

use super::{decode, encode};
use crate::error::Result;
use crate::keys::TaskKey;
use crate::kv::KvStore;
use crate::telemetry::metrics;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

impl<S: KvStore + 'static> super::Storage<S> {
    /// Record `result` for the task stored under `key`.
    ///
    /// Calling twice for the same key appends a second reference and
    /// overwrites the body.
    pub async fn log_append<R: Serialize + ?Sized>(&self, key: &TaskKey, result: &R) -> Result<()> {
        let body = encode(result)?;
        let result_key = key.result_key();

        self.store
            .push_and_set(&self.keyspace.log_key(), &result_key, &body)
            .await?;

        metrics::queue_operations().add(1, &self.labels("log_append"));
        debug!(key = %result_key, "result logged");
        Ok(())
    }

    /// Result keys in the log, oldest first.
    pub async fn log_entries(&self) -> Result<Vec<String>> {
        self.store.lrange(&self.keyspace.log_key(), 0, -1).await
    }

    /// The stored result for `key`, if one was logged.
    pub async fn result<R: DeserializeOwned>(&self, key: &TaskKey) -> Result<Option<R>> {
        self.store
            .get(&key.result_key())
            .await?
            .map(|raw| decode(&raw))
            .transpose()
    }
}
