//! Task queue operations: key generation, enqueue, dequeue.
//!
//! The queue list holds task keys only; each body lives under its own key.
//! Pushing a key and writing its body are separate store commands unless
//! the store's `push_and_set` makes them atomic.

use super::{decode, encode};
use crate::error::Result;
use crate::keys::TaskKey;
use crate::kv::KvStore;
use crate::model::Dequeued;
use crate::telemetry::metrics;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

impl<S: KvStore> super::Storage<S> {
    /// Content-addressed key for `task`. Deterministic and side-effect free.
    pub fn keygen<T: Serialize + ?Sized>(&self, task: &T) -> Result<TaskKey> {
        let body = encode(task)?;
        Ok(self.keyspace.task_key(body.as_bytes()))
    }

    /// Queue `task` at the tail. Returns the key it was stored under.
    ///
    /// The key is pushed before the body is written. If the push fails
    /// nothing is written; if the write fails the pushed key is left
    /// behind and a later dequeue reports it as a ghost.
    pub async fn enqueue<T: Serialize + ?Sized>(&self, task: &T) -> Result<TaskKey> {
        let body = encode(task)?;
        let key = self
            .keyspace
            .task_key_with(body.as_bytes(), self.key_policy);

        self.store
            .push_and_set(&self.keyspace.queue_key(), key.as_str(), &body)
            .await?;

        metrics::queue_operations().add(1, &self.labels("enqueue"));
        debug!(key = %key, "task enqueued");
        Ok(key)
    }

    /// Pop the task at the head of the queue.
    ///
    /// The popped key is consumed whether or not its body is found. The body
    /// is deleted before this returns, so a later enqueue of the same payload
    /// is never clobbered by it. A failed delete is logged and otherwise
    /// ignored.
    pub async fn dequeue<T: DeserializeOwned>(&self) -> Result<Dequeued<T>> {
        let Some(raw_key) = self.store.lpop(&self.keyspace.queue_key()).await? else {
            metrics::queue_operations().add(1, &self.labels("dequeue_empty"));
            return Ok(Dequeued::Empty);
        };
        let key = TaskKey::new(raw_key);

        let Some(body) = self.store.get(key.as_str()).await? else {
            warn!(key = %key, "popped task key has no stored body");
            metrics::ghost_pops().add(1, &self.labels("dequeue_ghost"));
            return Ok(Dequeued::Ghost { key });
        };

        self.delete_body(&key).await;

        let task = decode(&body)?;
        metrics::queue_operations().add(1, &self.labels("dequeue"));
        debug!(key = %key, "task dequeued");
        Ok(Dequeued::Task { task, key })
    }

    /// Number of task keys waiting in the queue list.
    pub async fn queue_len(&self) -> Result<u64> {
        self.store.llen(&self.keyspace.queue_key()).await
    }

    /// Task keys waiting in the queue list, head first.
    pub async fn pending(&self) -> Result<Vec<TaskKey>> {
        let keys = self.store.lrange(&self.keyspace.queue_key(), 0, -1).await?;
        Ok(keys.into_iter().map(TaskKey::new).collect())
    }

    async fn delete_body(&self, key: &TaskKey) {
        if let Err(e) = self.store.del(key.as_str()).await {
            warn!(key = %key, error = %e, "failed to delete dequeued task body");
            metrics::delete_failures().add(1, &self.labels("delete"));
        }
    }
}
