//! Core data model.
//!
//! A task is any serializable value a producer hands to the queue. Dequeuing
//! yields a [`Dequeued`], and the consumer records a [`TaskOutcome`] in the
//! result log once the task has run.

use crate::keys::TaskKey;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Dequeue result
// ---------------------------------------------------------------------------

/// What a single dequeue produced.
#[derive(Debug, Clone, PartialEq)]
pub enum Dequeued<T> {
    /// A task and the key it was stored under.
    Task { task: T, key: TaskKey },
    /// The queue list was empty.
    Empty,
    /// A key was popped but its body was missing. The key is consumed and
    /// not re-queued.
    Ghost { key: TaskKey },
}

impl<T> Dequeued<T> {
    /// True for both `Empty` and `Ghost`: nothing to process.
    pub fn is_empty(&self) -> bool {
        !matches!(self, Dequeued::Task { .. })
    }

    pub fn is_ghost(&self) -> bool {
        matches!(self, Dequeued::Ghost { .. })
    }

    /// The key that was popped, if any.
    pub fn key(&self) -> Option<&TaskKey> {
        match self {
            Dequeued::Task { key, .. } | Dequeued::Ghost { key } => Some(key),
            Dequeued::Empty => None,
        }
    }

    /// Collapse to task-or-nothing. Empty queues and ghost pops are
    /// indistinguishable in this view.
    pub fn into_task(self) -> Option<(T, TaskKey)> {
        match self {
            Dequeued::Task { task, key } => Some((task, key)),
            Dequeued::Empty | Dequeued::Ghost { .. } => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Outcome
// ---------------------------------------------------------------------------

/// Result of running a task, as written to the result log by the consumer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskOutcome {
    pub success: bool,
    pub data: Option<serde_json::Value>,
    pub error: Option<String>,
    pub duration_ms: u64,
    pub completed_at: DateTime<Utc>,
}

impl TaskOutcome {
    pub fn succeeded(data: serde_json::Value, duration_ms: u64) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            duration_ms,
            completed_at: Utc::now(),
        }
    }

    pub fn failed(error: impl Into<String>, duration_ms: u64) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
            duration_ms,
            completed_at: Utc::now(),
        }
    }
}
