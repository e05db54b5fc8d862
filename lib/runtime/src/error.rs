//! Error types for the runtime crate.

use cadence_trigger::TriggerError;
use std::fmt;

/// Umbrella error for runtime scheduling faults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchedulerError {
    /// The overflow queue was already at capacity.
    QueueFull,
    /// `schedule` was called after `shutdown`.
    ScheduleAfterShutdown,
    /// `start` was called on an already-cancelled task.
    AlreadyCancelled {
        /// The name of the offending task.
        name: String,
    },
    /// Trigger construction failed.
    Trigger(TriggerError),
}

impl fmt::Display for SchedulerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::QueueFull => write!(f, "overflow queue is full"),
            Self::ScheduleAfterShutdown => write!(f, "cannot schedule after shutdown"),
            Self::AlreadyCancelled { name } => {
                write!(f, "task '{name}' is already cancelled and cannot be restarted")
            }
            Self::Trigger(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for SchedulerError {}

impl From<TriggerError> for SchedulerError {
    fn from(err: TriggerError) -> Self {
        Self::Trigger(err)
    }
}

/// An error raised by a task closure during execution.
///
/// Recorded in the task's [`cadence_trigger::ExecutionContext`] and
/// logged; never propagated out of the task loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskExecutionError(pub String);

impl fmt::Display for TaskExecutionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for TaskExecutionError {}

impl From<String> for TaskExecutionError {
    fn from(message: String) -> Self {
        Self(message)
    }
}

impl From<&str> for TaskExecutionError {
    fn from(message: &str) -> Self {
        Self(message.to_string())
    }
}
