//! Consumer side: pull tasks off the queue, run them, log the outcome.

pub mod consumer;

pub use consumer::{Consumer, ConsumerConfig, Processed};

use async_trait::async_trait;
use serde::de::DeserializeOwned;

/// Runs one kind of task.
///
/// The returned value is stored as the `data` of a successful
/// [`TaskOutcome`](crate::model::TaskOutcome); an error is stored as its
/// `error` string. Neither stops the consumer.
#[async_trait]
pub trait TaskHandler: Send + Sync + 'static {
    type Task: DeserializeOwned + Send + 'static;

    async fn handle(&self, task: Self::Task) -> anyhow::Result<serde_json::Value>;
}
