//! Consumer loop: dequeue, run the handler, append the outcome to the log.

use super::TaskHandler;
use crate::config::Config;
use crate::error::Result;
use crate::keys::TaskKey;
use crate::kv::KvStore;
use crate::model::{Dequeued, TaskOutcome};
use crate::queue::Storage;
use crate::telemetry::metrics;
use crate::telemetry::task::{record_outcome, start_task_span};
use opentelemetry::KeyValue;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};
use tokio::sync::Notify;
use tracing::{Instrument, error, info, warn};

/// Configuration for the consumer loop.
#[derive(Debug, Clone)]
pub struct ConsumerConfig {
    /// How long to sleep after finding the queue empty.
    pub poll_interval: Duration,
}

impl Default for ConsumerConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(1),
        }
    }
}

impl ConsumerConfig {
    pub fn from_config(config: &Config) -> Self {
        Self {
            poll_interval: config.poll_interval(),
        }
    }
}

/// What one iteration of the loop did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Processed {
    /// A task ran and its outcome was logged.
    Task(TaskKey),
    /// A key was popped with no body behind it.
    Ghost(TaskKey),
    /// Nothing was queued.
    Empty,
}

/// Single consumer over one queue.
pub struct Consumer<S, H> {
    storage: Storage<S>,
    handler: Arc<H>,
    config: ConsumerConfig,
    stopping: Arc<AtomicBool>,
    wake: Arc<Notify>,
}

impl<S, H> Clone for Consumer<S, H> {
    fn clone(&self) -> Self {
        Self {
            storage: self.storage.clone(),
            handler: Arc::clone(&self.handler),
            config: self.config.clone(),
            stopping: Arc::clone(&self.stopping),
            wake: Arc::clone(&self.wake),
        }
    }
}

impl<S: KvStore + 'static, H: TaskHandler> Consumer<S, H> {
    pub fn new(storage: Storage<S>, handler: Arc<H>, config: ConsumerConfig) -> Self {
        Self {
            storage,
            handler,
            config,
            stopping: Arc::new(AtomicBool::new(false)),
            wake: Arc::new(Notify::new()),
        }
    }

    /// Signal the loop to stop after the task in hand, if any.
    pub fn shutdown(&self) {
        self.stopping.store(true, Ordering::SeqCst);
        self.wake.notify_one();
    }

    /// Run until [`shutdown`](Consumer::shutdown) is called.
    ///
    /// Store failures are logged and retried after the poll interval.
    pub async fn run(&self) -> Result<()> {
        info!(keyspace = self.storage.keyspace().prefix(), "consumer started");

        while !self.stopping.load(Ordering::SeqCst) {
            let idle = match self.process_one().await {
                Ok(Processed::Task(_)) | Ok(Processed::Ghost(_)) => false,
                Ok(Processed::Empty) => true,
                Err(e) => {
                    error!("process_one error: {e}");
                    true
                }
            };

            if idle {
                tokio::select! {
                    _ = self.wake.notified() => {}
                    _ = tokio::time::sleep(self.config.poll_interval) => {}
                }
            }
        }

        info!("consumer shutting down");
        Ok(())
    }

    /// Dequeue and handle at most one task.
    pub async fn process_one(&self) -> Result<Processed> {
        let (task, key) = match self.storage.dequeue::<H::Task>().await? {
            Dequeued::Task { task, key } => (task, key),
            Dequeued::Ghost { key } => {
                warn!(key = %key, "skipping task key without body");
                return Ok(Processed::Ghost(key));
            }
            Dequeued::Empty => return Ok(Processed::Empty),
        };

        let span = start_task_span(&key);
        let outcome = async {
            let start = Instant::now();
            let result = self.handler.handle(task).await;
            let duration_ms = start.elapsed().as_millis() as u64;
            match result {
                Ok(data) => TaskOutcome::succeeded(data, duration_ms),
                Err(e) => {
                    let message = format!("{e:#}");
                    error!(error = %message, duration_ms, "task failed");
                    TaskOutcome::failed(message, duration_ms)
                }
            }
        }
        .instrument(span.clone())
        .await;

        record_outcome(&span, outcome.success, outcome.duration_ms);
        let result_label = if outcome.success { "ok" } else { "error" };
        metrics::tasks_processed().add(1, &[KeyValue::new("result", result_label)]);
        metrics::task_duration_ms().record(
            outcome.duration_ms as f64,
            &[KeyValue::new("result", result_label)],
        );

        self.storage.log_append(&key, &outcome).await?;
        Ok(Processed::Task(key))
    }
}
