//! Example jobs registered by the demo binary.

use async_trait::async_trait;
use cadence_runtime::{ScheduledJob, TaskExecutionError};

/// Logs a heartbeat message on every fire.
pub struct Heartbeat {
    /// Label included in the log line.
    pub label: String,
}

#[async_trait]
impl ScheduledJob for Heartbeat {
    async fn run(&self) -> Result<(), TaskExecutionError> {
        tracing::info!(label = %self.label, "heartbeat");
        Ok(())
    }
}

/// A job that always fails, to exercise the error-recording path.
pub struct AlwaysFails;

#[async_trait]
impl ScheduledJob for AlwaysFails {
    async fn run(&self) -> Result<(), TaskExecutionError> {
        Err(TaskExecutionError::from("simulated failure"))
    }
}
