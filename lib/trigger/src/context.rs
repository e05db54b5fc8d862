//! Per-task execution history fed back into trigger evaluation.

use chrono::{DateTime, Utc};
use std::sync::{Arc, RwLock};

#[derive(Debug, Clone, Default)]
struct ExecutionContextData {
    last_scheduled: Option<DateTime<Utc>>,
    last_actual_start: Option<DateTime<Utc>>,
    last_completion: Option<DateTime<Utc>>,
    last_error: Option<String>,
    execution_count: u64,
}

/// A shared, mutable record of a task's execution history.
///
/// Triggers read this to compute their next fire time; the runtime
/// updates it as a task is scheduled, starts, and completes.
#[derive(Debug, Clone, Default)]
pub struct ExecutionContext {
    data: Arc<RwLock<ExecutionContextData>>,
}

impl ExecutionContext {
    /// Creates a fresh context with no recorded history.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that an execution was scheduled to fire at `at`.
    pub fn record_scheduled(&self, at: DateTime<Utc>) {
        self.data.write().expect("execution context lock poisoned").last_scheduled = Some(at);
    }

    /// Records that an execution actually began at `at`, incrementing
    /// the execution count.
    pub fn record_actual_start(&self, at: DateTime<Utc>) {
        let mut data = self.data.write().expect("execution context lock poisoned");
        data.last_actual_start = Some(at);
        data.execution_count += 1;
    }

    /// Records a successful completion at `at`, clearing any prior
    /// error.
    pub fn record_completion(&self, at: DateTime<Utc>) {
        let mut data = self.data.write().expect("execution context lock poisoned");
        data.last_completion = Some(at);
        data.last_error = None;
    }

    /// Records a failed completion at `at` with `error`.
    pub fn record_failure(&self, error: impl Into<String>, at: DateTime<Utc>) {
        let mut data = self.data.write().expect("execution context lock poisoned");
        data.last_completion = Some(at);
        data.last_error = Some(error.into());
    }

    /// The instant the most recent execution was scheduled to fire.
    #[must_use]
    pub fn last_scheduled(&self) -> Option<DateTime<Utc>> {
        self.data.read().expect("execution context lock poisoned").last_scheduled
    }

    /// The instant the most recent execution actually began.
    #[must_use]
    pub fn last_actual_start(&self) -> Option<DateTime<Utc>> {
        self.data.read().expect("execution context lock poisoned").last_actual_start
    }

    /// The instant the most recent execution completed, successfully
    /// or not.
    #[must_use]
    pub fn last_completion(&self) -> Option<DateTime<Utc>> {
        self.data.read().expect("execution context lock poisoned").last_completion
    }

    /// The error message of the most recent execution, if it failed.
    #[must_use]
    pub fn last_error(&self) -> Option<String> {
        self.data.read().expect("execution context lock poisoned").last_error.clone()
    }

    /// The number of executions that have actually started.
    #[must_use]
    pub fn execution_count(&self) -> u64 {
        self.data.read().expect("execution context lock poisoned").execution_count
    }
}
