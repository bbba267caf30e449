//! # later-store
//!
//! Redis-backed FIFO task queue with an append-only result log.
//!
//! Producers [`enqueue`](queue::Storage::enqueue) serializable tasks under
//! content-addressed keys; a single consumer
//! [`dequeue`](queue::Storage::dequeue)s them in order, runs them and
//! records the outcome with [`log_append`](queue::Storage::log_append).
//! Everything lives in the key-value store; the handles keep no queue state.

pub mod config;
pub mod error;
pub mod keys;
pub mod kv;
pub mod model;
pub mod queue;
pub mod telemetry;
pub mod worker;

pub use error::{Error, Result};
pub use keys::{KeyPolicy, Keyspace, TaskKey};
pub use model::{Dequeued, TaskOutcome};
pub use queue::Storage;
