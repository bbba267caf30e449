//! Metric instrument factories for later-store.
//!
//! Uses the OTel Meter API with the globally-registered `MeterProvider`.
//! All instruments are created lazily from the `"later-store"` meter. With no
//! provider installed they are no-ops.

use opentelemetry::metrics::{Counter, Histogram, Meter};

/// Returns the shared meter for later-store instruments.
fn meter() -> Meter {
    opentelemetry::global::meter("later-store")
}

/// Counter: queue and log operations (enqueue, dequeue, dequeue_empty, log_append).
/// Labels: `keyspace`, `operation`.
pub fn queue_operations() -> Counter<u64> {
    meter()
        .u64_counter("later.queue.operations")
        .with_description("Number of queue and log operations")
        .build()
}

/// Counter: popped task keys whose body was missing.
/// Labels: `keyspace`, `operation`.
pub fn ghost_pops() -> Counter<u64> {
    meter()
        .u64_counter("later.queue.ghost_pops")
        .with_description("Task keys popped without a stored body")
        .build()
}

/// Counter: deletes of dequeued task bodies that failed.
/// Labels: `keyspace`, `operation`.
pub fn delete_failures() -> Counter<u64> {
    meter()
        .u64_counter("later.queue.delete_failures")
        .with_description("Failed deletes of dequeued task bodies")
        .build()
}

/// Counter: tasks run by the consumer.
/// Labels: `result` ("ok" | "error").
pub fn tasks_processed() -> Counter<u64> {
    meter()
        .u64_counter("later.consumer.tasks")
        .with_description("Number of tasks run by the consumer")
        .build()
}

/// Histogram: task handler duration in milliseconds.
/// Labels: `result`.
pub fn task_duration_ms() -> Histogram<f64> {
    meter()
        .f64_histogram("later.consumer.task_duration_ms")
        .with_description("Task handler duration in milliseconds")
        .with_unit("ms")
        .build()
}
