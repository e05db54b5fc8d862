//! Serializable snapshots of scheduler and task state, for external
//! observation without exposing the live, mutable types.

use cadence_core::TaskId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A point-in-time snapshot of one scheduled task.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduledTaskSnapshot {
    /// The task's id.
    pub id: TaskId,
    /// The task's unique name.
    pub name: String,
    /// Whether the task has been cancelled.
    pub is_cancelled: bool,
    /// Whether the task closure is currently running.
    pub is_executing: bool,
    /// The number of times the task closure has been entered.
    pub execution_count: u64,
    /// The instant the most recent execution was scheduled to fire.
    pub last_scheduled: Option<DateTime<Utc>>,
    /// The instant the most recent execution actually began.
    pub last_actual_start: Option<DateTime<Utc>>,
    /// The instant the most recent execution completed, successfully
    /// or not.
    pub last_completion: Option<DateTime<Utc>>,
    /// The error message of the most recent execution, if it failed.
    pub last_error: Option<String>,
    /// The next fire instant, if the trigger still has one.
    pub next_fire_time: Option<DateTime<Utc>>,
}

/// A point-in-time snapshot of the scheduler as a whole.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerSnapshot {
    /// The number of closures currently executing.
    pub active_count: usize,
    /// The number of callers currently queued for admission.
    pub queued_count: usize,
    /// The total number of tasks the scheduler is tracking.
    pub total_count: usize,
    /// A snapshot of every tracked task.
    pub tasks: Vec<ScheduledTaskSnapshot>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_snapshot_round_trips_through_json() {
        let snapshot = ScheduledTaskSnapshot {
            id: TaskId::new(),
            name: "demo".to_string(),
            is_cancelled: false,
            is_executing: true,
            execution_count: 3,
            last_scheduled: None,
            last_actual_start: None,
            last_completion: None,
            last_error: Some("boom".to_string()),
            next_fire_time: None,
        };

        let json = serde_json::to_string(&snapshot).expect("serialize");
        let parsed: ScheduledTaskSnapshot = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(parsed.id, snapshot.id);
        assert_eq!(parsed.name, snapshot.name);
        assert_eq!(parsed.last_error, snapshot.last_error);
    }

    #[test]
    fn scheduler_snapshot_round_trips_through_json() {
        let snapshot = SchedulerSnapshot {
            active_count: 1,
            queued_count: 0,
            total_count: 1,
            tasks: vec![ScheduledTaskSnapshot {
                id: TaskId::new(),
                name: "demo".to_string(),
                is_cancelled: false,
                is_executing: false,
                execution_count: 0,
                last_scheduled: None,
                last_actual_start: None,
                last_completion: None,
                last_error: None,
                next_fire_time: None,
            }],
        };

        let json = serde_json::to_string(&snapshot).expect("serialize");
        let parsed: SchedulerSnapshot = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(parsed.total_count, snapshot.total_count);
        assert_eq!(parsed.tasks.len(), 1);
    }
}
