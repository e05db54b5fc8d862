//! A single scheduled task: consult its trigger, sleep until the
//! fire instant, execute, record, reschedule.

use crate::error::SchedulerError;
use crate::gate::Gate;
use crate::job::ScheduledJob;
use crate::snapshot::ScheduledTaskSnapshot;
use cadence_core::TaskId;
use cadence_trigger::{ExecutionContext, Trigger};
use chrono::Utc;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::{Arc, Mutex};
use tokio::task::JoinHandle;

const STATE_NEW: u8 = 0;
const STATE_RUNNING: u8 = 1;
const STATE_CANCELLED: u8 = 2;

struct Inner {
    id: TaskId,
    name: String,
    trigger: Trigger,
    ctx: ExecutionContext,
    gate: Gate,
    job: Arc<dyn ScheduledJob>,
    state: AtomicU8,
    executing: AtomicBool,
    handle: Mutex<Option<JoinHandle<()>>>,
}

/// A task under the scheduler's management.
///
/// Cheaply cloneable; clones observe the same underlying state.
#[derive(Clone)]
pub struct ScheduledTask {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for ScheduledTask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScheduledTask")
            .field("id", &self.inner.id)
            .field("name", &self.inner.name)
            .field("is_cancelled", &self.is_cancelled())
            .field("is_executing", &self.is_executing())
            .finish()
    }
}

impl ScheduledTask {
    pub(crate) fn new(name: String, trigger: Trigger, job: Arc<dyn ScheduledJob>, gate: Gate) -> Self {
        Self {
            inner: Arc::new(Inner {
                id: TaskId::new(),
                name,
                trigger,
                ctx: ExecutionContext::new(),
                gate,
                job,
                state: AtomicU8::new(STATE_NEW),
                executing: AtomicBool::new(false),
                handle: Mutex::new(None),
            }),
        }
    }

    /// The task's id, assigned at construction for log correlation
    /// across restarts of a task registered under the same name.
    #[must_use]
    pub fn id(&self) -> TaskId {
        self.inner.id
    }

    /// The task's unique name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// The task's zone.
    #[must_use]
    pub fn zone(&self) -> chrono_tz::Tz {
        self.inner.trigger.zone()
    }

    /// The task's trigger.
    #[must_use]
    pub fn trigger(&self) -> &Trigger {
        &self.inner.trigger
    }

    /// The task's execution context.
    #[must_use]
    pub fn execution_context(&self) -> &ExecutionContext {
        &self.inner.ctx
    }

    /// Whether the task closure is currently running.
    #[must_use]
    pub fn is_executing(&self) -> bool {
        self.inner.executing.load(Ordering::SeqCst)
    }

    /// Whether the task has been cancelled.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.inner.state.load(Ordering::SeqCst) == STATE_CANCELLED
    }

    /// The number of times the task closure has been entered.
    #[must_use]
    pub fn execution_count(&self) -> u64 {
        self.inner.ctx.execution_count()
    }

    /// The next fire instant, recomputed on demand.
    #[must_use]
    pub fn next_fire_time(&self) -> Option<chrono::DateTime<Utc>> {
        self.inner.trigger.next_fire_time(&self.inner.ctx).ok().flatten()
    }

    /// A serializable, point-in-time snapshot of this task's state.
    #[must_use]
    pub fn snapshot(&self) -> ScheduledTaskSnapshot {
        let ctx = &self.inner.ctx;
        ScheduledTaskSnapshot {
            id: self.inner.id,
            name: self.inner.name.clone(),
            is_cancelled: self.is_cancelled(),
            is_executing: self.is_executing(),
            execution_count: ctx.execution_count(),
            last_scheduled: ctx.last_scheduled(),
            last_actual_start: ctx.last_actual_start(),
            last_completion: ctx.last_completion(),
            last_error: ctx.last_error(),
            next_fire_time: self.next_fire_time(),
        }
    }

    /// Transitions NEW -> RUNNING and spawns the task loop.
    ///
    /// Fails if the task was already cancelled. Calling `start` twice
    /// on a running task is a no-op.
    pub fn start(&self) -> Result<(), SchedulerError> {
        match self.inner.state.compare_exchange(
            STATE_NEW,
            STATE_RUNNING,
            Ordering::SeqCst,
            Ordering::SeqCst,
        ) {
            Ok(_) => {
                let inner = self.inner.clone();
                let task = tokio::spawn(run_loop(inner));
                *self.inner.handle.lock().expect("task handle lock poisoned") = Some(task);
                Ok(())
            }
            Err(STATE_RUNNING) => Ok(()),
            Err(_) => Err(SchedulerError::AlreadyCancelled { name: self.inner.name.clone() }),
        }
    }

    /// Cancels the task.
    ///
    /// Returns `false` if it was already cancelled. When
    /// `may_interrupt` is `false`, awaits the in-flight execution (if
    /// any) before returning; when `true`, returns immediately
    /// without awaiting, leaving any running closure to finish on its
    /// own.
    pub async fn cancel(&self, may_interrupt: bool) -> bool {
        let previous = self.inner.state.swap(STATE_CANCELLED, Ordering::SeqCst);
        if previous == STATE_CANCELLED {
            return false;
        }

        let handle = self.inner.handle.lock().expect("task handle lock poisoned").take();
        if let Some(handle) = handle {
            if may_interrupt {
                tracing::warn!(
                    task = %self.inner.name,
                    task_id = %self.inner.id,
                    "cancel requested with may_interrupt; the running closure is not preemptible and will run to completion"
                );
            } else {
                let _ = handle.await;
            }
        }
        true
    }
}

async fn run_loop(inner: Arc<Inner>) {
    loop {
        if inner.state.load(Ordering::SeqCst) == STATE_CANCELLED {
            return;
        }

        let fire = match inner.trigger.next_fire_time(&inner.ctx) {
            Ok(Some(fire)) => fire,
            Ok(None) => {
                tracing::debug!(task = %inner.name, task_id = %inner.id, "trigger produced no further fire instant");
                return;
            }
            Err(err) => {
                tracing::warn!(task = %inner.name, task_id = %inner.id, error = %err, "trigger evaluation failed");
                return;
            }
        };

        let delay = fire - Utc::now();
        if delay > chrono::Duration::zero()
            && let Ok(std_delay) = delay.to_std()
        {
            tokio::time::sleep(std_delay).await;
        }

        if inner.state.load(Ordering::SeqCst) == STATE_CANCELLED {
            return;
        }

        execute_once(&inner).await;
    }
}

async fn execute_once(inner: &Arc<Inner>) {
    let scheduled_at = Utc::now();
    inner.ctx.record_scheduled(scheduled_at);

    let job = inner.job.clone();
    let ctx = inner.ctx.clone();
    let executing = {
        let inner = inner.clone();
        move || async move {
            if inner.state.load(Ordering::SeqCst) == STATE_CANCELLED {
                return;
            }
            inner.executing.store(true, Ordering::SeqCst);
            ctx.record_actual_start(Utc::now());

            match job.run().await {
                Ok(()) => ctx.record_completion(Utc::now()),
                Err(err) => {
                    tracing::warn!(task = %inner.name, task_id = %inner.id, error = %err, "task execution failed");
                    ctx.record_failure(err.to_string(), Utc::now());
                }
            }

            inner.executing.store(false, Ordering::SeqCst);
        }
    };

    if let Err(err) = inner.gate.run(executing).await {
        tracing::warn!(task = %inner.name, task_id = %inner.id, error = %err, "task admission failed");
        inner.ctx.record_failure(err.to_string(), Utc::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TaskExecutionError;
    use crate::job::ScheduledJob;
    use async_trait::async_trait;
    use cadence_trigger::{PeriodicTrigger, Trigger};
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration as StdDuration;

    struct CountingJob {
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl ScheduledJob for CountingJob {
        async fn run(&self) -> Result<(), TaskExecutionError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    struct FailingJob;

    #[async_trait]
    impl ScheduledJob for FailingJob {
        async fn run(&self) -> Result<(), TaskExecutionError> {
            Err(TaskExecutionError::from("always fails"))
        }
    }

    #[tokio::test]
    async fn periodic_task_executes_repeatedly() {
        let calls = Arc::new(AtomicUsize::new(0));
        let trigger = Trigger::Periodic(PeriodicTrigger::new(StdDuration::from_millis(20), chrono_tz::UTC));
        let task = ScheduledTask::new(
            "counting".to_string(),
            trigger,
            Arc::new(CountingJob { calls: calls.clone() }),
            Gate::new(10, 10),
        );

        task.start().unwrap();
        tokio::time::sleep(StdDuration::from_millis(500)).await;

        assert!(calls.load(Ordering::SeqCst) >= 10, "got {} calls", calls.load(Ordering::SeqCst));
        assert!(task.execution_count() >= 10);
        task.cancel(false).await;
    }

    #[tokio::test]
    async fn failure_does_not_stop_the_task() {
        let trigger = Trigger::Periodic(PeriodicTrigger::new(StdDuration::from_millis(20), chrono_tz::UTC));
        let task = ScheduledTask::new("failing".to_string(), trigger, Arc::new(FailingJob), Gate::new(10, 10));

        task.start().unwrap();
        tokio::time::sleep(StdDuration::from_millis(500)).await;

        assert!(task.execution_count() >= 10);
        assert!(task.execution_context().last_error().is_some());
        task.cancel(false).await;
    }

    #[tokio::test]
    async fn cancel_is_monotonic() {
        let trigger = Trigger::Periodic(PeriodicTrigger::new(StdDuration::from_secs(3600), chrono_tz::UTC));
        let task = ScheduledTask::new(
            "cancel-once".to_string(),
            trigger,
            Arc::new(CountingJob { calls: Arc::new(AtomicUsize::new(0)) }),
            Gate::new(10, 10),
        );

        assert!(!task.is_cancelled());
        task.start().unwrap();
        assert!(task.cancel(false).await);
        assert!(task.is_cancelled());
        assert!(!task.cancel(false).await);
    }

    #[tokio::test]
    async fn start_after_cancel_fails() {
        let trigger = Trigger::Periodic(PeriodicTrigger::new(StdDuration::from_secs(3600), chrono_tz::UTC));
        let task = ScheduledTask::new(
            "restart".to_string(),
            trigger,
            Arc::new(CountingJob { calls: Arc::new(AtomicUsize::new(0)) }),
            Gate::new(10, 10),
        );

        task.start().unwrap();
        task.cancel(false).await;
        assert_eq!(
            task.start(),
            Err(SchedulerError::AlreadyCancelled { name: "restart".to_string() })
        );
    }
}
