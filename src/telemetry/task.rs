//! Task execution span helpers.

use crate::keys::TaskKey;
use tracing::Span;

/// Start a span for running one dequeued task.
///
/// `task.success` and `task.duration_ms` are declared empty and filled by
/// [`record_outcome`].
pub fn start_task_span(key: &TaskKey) -> Span {
    tracing::info_span!(
        "task.execute",
        "task.key" = %key,
        "task.success" = tracing::field::Empty,
        "task.duration_ms" = tracing::field::Empty,
    )
}

/// Record how the task ended on its span.
pub fn record_outcome(span: &Span, success: bool, duration_ms: u64) {
    span.record("task.success", success);
    span.record("task.duration_ms", duration_ms);
    span.in_scope(|| {
        tracing::info!(success, duration_ms, "task_finished");
    });
}
