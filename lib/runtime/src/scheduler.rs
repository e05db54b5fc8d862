//! The concurrent scheduler: owns a set of scheduled tasks, gates
//! their concurrent execution, and manages shutdown.

use crate::error::SchedulerError;
use crate::gate::Gate;
use crate::job::ScheduledJob;
use crate::task::ScheduledTask;
use cadence_trigger::{Trigger, TriggerBuilder, TriggerParams};
use chrono_tz::Tz;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Default concurrency cap (`Cmax`).
pub const DEFAULT_MAX_CONCURRENCY: usize = 10;
/// Default overflow queue capacity (`Qmax`).
pub const DEFAULT_QUEUE_CAPACITY: usize = 1000;

/// A concurrent task scheduler.
///
/// Cheaply cloneable; clones share the same task set and gate.
#[derive(Clone)]
pub struct ConcurrentScheduler {
    tasks: Arc<Mutex<HashMap<String, ScheduledTask>>>,
    gate: Gate,
    default_zone: Tz,
    shutdown: Arc<AtomicBool>,
}

impl ConcurrentScheduler {
    /// Creates a scheduler with the given concurrency cap, queue
    /// capacity, and default zone.
    #[must_use]
    pub fn new(max_concurrency: usize, queue_capacity: usize, default_zone: Tz) -> Self {
        Self {
            tasks: Arc::new(Mutex::new(HashMap::new())),
            gate: Gate::new(max_concurrency, queue_capacity),
            default_zone,
            shutdown: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Creates a scheduler with the default concurrency cap, queue
    /// capacity, and `UTC` as the default zone.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(DEFAULT_MAX_CONCURRENCY, DEFAULT_QUEUE_CAPACITY, Tz::UTC)
    }

    /// Schedules `job` under `trigger` as `name`.
    ///
    /// Idempotent by name: if a live task with that name exists,
    /// returns it and logs a warning instead of creating a second
    /// one. Fails if the scheduler has been shut down.
    pub fn schedule(
        &self,
        job: Arc<dyn ScheduledJob>,
        trigger: Trigger,
        name: impl Into<String>,
    ) -> Result<ScheduledTask, SchedulerError> {
        if self.shutdown.load(Ordering::SeqCst) {
            return Err(SchedulerError::ScheduleAfterShutdown);
        }

        let name = name.into();
        let mut tasks = self.tasks.lock().expect("scheduler task map lock poisoned");
        if let Some(existing) = tasks.get(&name) {
            tracing::warn!(task = %name, "schedule called for an already-live task name; returning the existing task");
            return Ok(existing.clone());
        }

        let task = ScheduledTask::new(name.clone(), trigger, job, self.gate.clone());
        task.start()?;
        tasks.insert(name, task.clone());
        Ok(task)
    }

    /// Schedules `job` at a fixed start-to-start cadence.
    pub fn schedule_at_fixed_rate(
        &self,
        job: Arc<dyn ScheduledJob>,
        period: Duration,
        name: impl Into<String>,
        initial_delay: Option<Duration>,
    ) -> Result<ScheduledTask, SchedulerError> {
        let mut params = TriggerParams::new().with_fixed_rate(period);
        if let Some(delay) = initial_delay {
            params = params.with_initial_delay(delay);
        }
        let trigger = TriggerBuilder::build(&params, self.default_zone)?;
        self.schedule(job, trigger, name)
    }

    /// Schedules `job` at a fixed end-to-start spacing.
    pub fn schedule_with_fixed_delay(
        &self,
        job: Arc<dyn ScheduledJob>,
        delay: Duration,
        name: impl Into<String>,
        initial_delay: Option<Duration>,
    ) -> Result<ScheduledTask, SchedulerError> {
        let mut params = TriggerParams::new().with_fixed_delay(delay);
        if let Some(delay) = initial_delay {
            params = params.with_initial_delay(delay);
        }
        let trigger = TriggerBuilder::build(&params, self.default_zone)?;
        self.schedule(job, trigger, name)
    }

    /// The number of closures currently executing.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.gate.active_count()
    }

    /// The number of callers currently queued for admission.
    #[must_use]
    pub fn queued_count(&self) -> usize {
        self.gate.queued_count()
    }

    /// The number of tasks currently tracked by the scheduler.
    #[must_use]
    pub fn total_count(&self) -> usize {
        self.tasks.lock().expect("scheduler task map lock poisoned").len()
    }

    /// Whether `shutdown` has been called.
    #[must_use]
    pub fn is_shut_down(&self) -> bool {
        self.shutdown.load(Ordering::SeqCst)
    }

    /// A serializable, point-in-time snapshot of the scheduler and
    /// every task it tracks.
    #[must_use]
    pub fn snapshot(&self) -> crate::snapshot::SchedulerSnapshot {
        let tasks: Vec<_> =
            self.tasks.lock().expect("scheduler task map lock poisoned").values().map(ScheduledTask::snapshot).collect();
        crate::snapshot::SchedulerSnapshot {
            active_count: self.active_count(),
            queued_count: self.queued_count(),
            total_count: tasks.len(),
            tasks,
        }
    }

    /// Shuts the scheduler down.
    ///
    /// Idempotent: prevents further `schedule` calls, cancels every
    /// tracked task (propagating `force` as `may_interrupt`), awaits
    /// every cancellation, then clears the task set.
    pub async fn shutdown(&self, force: bool) {
        self.shutdown.store(true, Ordering::SeqCst);

        let snapshot: Vec<ScheduledTask> = {
            let mut tasks = self.tasks.lock().expect("scheduler task map lock poisoned");
            tasks.drain().map(|(_, task)| task).collect()
        };

        let cancellations = snapshot.iter().map(|task| task.cancel(force));
        futures::future::join_all(cancellations).await;
    }
}
