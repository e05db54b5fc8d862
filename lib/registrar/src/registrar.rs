//! Programmatic task registration, deferred scheduling until the
//! runtime is up.

use crate::config::RegistrarConfig;
use crate::error::RegistrarError;
use cadence_runtime::{ConcurrentScheduler, ScheduledJob, ScheduledTask};
use cadence_trigger::{Trigger, TriggerBuilder, TriggerParams};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

struct TaskHolder {
    name: String,
    trigger: Trigger,
    job: Arc<dyn ScheduledJob>,
}

/// Owns a set of live tasks, a holder map of registrations not yet
/// scheduled, and the configuration used to build a default scheduler
/// on `ready`.
pub struct Registrar {
    config: RegistrarConfig,
    pending: Mutex<HashMap<String, TaskHolder>>,
    live: Mutex<HashMap<String, ScheduledTask>>,
    scheduler: Mutex<Option<ConcurrentScheduler>>,
}

impl Registrar {
    /// Creates a registrar from configuration, with no scheduler
    /// attached and no tasks registered.
    #[must_use]
    pub fn new(config: RegistrarConfig) -> Self {
        Self {
            config,
            pending: Mutex::new(HashMap::new()),
            live: Mutex::new(HashMap::new()),
            scheduler: Mutex::new(None),
        }
    }

    /// Attaches a scheduler constructed elsewhere, overriding the
    /// default one `ready` would otherwise build.
    pub fn attach_scheduler(&self, scheduler: ConcurrentScheduler) {
        *self.scheduler.lock().expect("registrar scheduler lock poisoned") = Some(scheduler);
    }

    /// Registers a cron-triggered task.
    pub fn register_cron(
        &self,
        name: impl Into<String>,
        job: Arc<dyn ScheduledJob>,
        expression: impl Into<String>,
        zone: Option<String>,
    ) -> Result<(), RegistrarError> {
        let mut params = TriggerParams::new().with_expression(expression);
        if let Some(zone) = zone {
            params = params.with_zone(zone);
        }
        self.register_with_params(name, job, &params)
    }

    /// Registers a fixed-rate task.
    pub fn register_fixed_rate(
        &self,
        name: impl Into<String>,
        job: Arc<dyn ScheduledJob>,
        period: Duration,
        initial_delay: Option<Duration>,
    ) -> Result<(), RegistrarError> {
        let mut params = TriggerParams::new().with_fixed_rate(period);
        if let Some(delay) = initial_delay {
            params = params.with_initial_delay(delay);
        }
        self.register_with_params(name, job, &params)
    }

    /// Registers a fixed-delay task.
    pub fn register_fixed_delay(
        &self,
        name: impl Into<String>,
        job: Arc<dyn ScheduledJob>,
        delay: Duration,
        initial_delay: Option<Duration>,
    ) -> Result<(), RegistrarError> {
        let mut params = TriggerParams::new().with_fixed_delay(delay);
        if let Some(initial) = initial_delay {
            params = params.with_initial_delay(initial);
        }
        self.register_with_params(name, job, &params)
    }

    /// Registers a simple periodic task.
    pub fn register_periodic(
        &self,
        name: impl Into<String>,
        job: Arc<dyn ScheduledJob>,
        period: Duration,
    ) -> Result<(), RegistrarError> {
        let params = TriggerParams::new().with_period(period);
        self.register_with_params(name, job, &params)
    }

    pub(crate) fn register_with_params(
        &self,
        name: impl Into<String>,
        job: Arc<dyn ScheduledJob>,
        params: &TriggerParams,
    ) -> Result<(), RegistrarError> {
        let default_zone = self.config.default_zone()?;
        let trigger = TriggerBuilder::build(params, default_zone)?;
        self.register_trigger(name, job, trigger)
    }

    /// Registers a trigger under `name`.
    ///
    /// Idempotent by name: if `name` is already pending or live, this
    /// logs a warning and returns `Ok(())` without inserting a second
    /// holder, rather than erroring.
    fn register_trigger(
        &self,
        name: impl Into<String>,
        job: Arc<dyn ScheduledJob>,
        trigger: Trigger,
    ) -> Result<(), RegistrarError> {
        let name = name.into();
        let mut pending = self.pending.lock().expect("registrar pending lock poisoned");
        let live = self.live.lock().expect("registrar live lock poisoned");
        if pending.contains_key(&name) || live.contains_key(&name) {
            tracing::warn!(task = %name, "register called for an already-registered task name; keeping the existing registration");
            return Ok(());
        }
        drop(live);
        pending.insert(name.clone(), TaskHolder { name, trigger, job });
        Ok(())
    }

    /// Attaches a default scheduler (if none was attached) and
    /// schedules every pending registration.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying scheduler rejects a
    /// registration (e.g. it has already been shut down).
    pub fn ready(&self) -> Result<(), RegistrarError> {
        {
            let mut scheduler = self.scheduler.lock().expect("registrar scheduler lock poisoned");
            if scheduler.is_none() {
                let default_zone = self.config.default_zone()?;
                *scheduler =
                    Some(ConcurrentScheduler::new(self.config.max_concurrency, self.config.queue_capacity, default_zone));
            }
        }

        let holders: Vec<TaskHolder> = {
            let mut pending = self.pending.lock().expect("registrar pending lock poisoned");
            pending.drain().map(|(_, holder)| holder).collect()
        };

        let scheduler = self
            .scheduler
            .lock()
            .expect("registrar scheduler lock poisoned")
            .clone()
            .expect("scheduler attached above");

        let mut live = self.live.lock().expect("registrar live lock poisoned");
        for holder in holders {
            let task = scheduler.schedule(holder.job, holder.trigger, holder.name.clone())?;
            live.insert(holder.name, task);
        }

        Ok(())
    }

    /// Cancels every live task, then shuts the scheduler down, both
    /// non-forced.
    pub async fn destroy(&self) {
        let tasks: Vec<ScheduledTask> = {
            let mut live = self.live.lock().expect("registrar live lock poisoned");
            live.drain().map(|(_, task)| task).collect()
        };
        for task in &tasks {
            task.cancel(false).await;
        }

        let scheduler = self.scheduler.lock().expect("registrar scheduler lock poisoned").clone();
        if let Some(scheduler) = scheduler {
            scheduler.shutdown(false).await;
        }
    }

    /// A read-only snapshot of currently live tasks.
    #[must_use]
    pub fn live_tasks(&self) -> Vec<ScheduledTask> {
        self.live.lock().expect("registrar live lock poisoned").values().cloned().collect()
    }

    /// Whether the registrar has any live or pending tasks.
    #[must_use]
    pub fn has_tasks(&self) -> bool {
        !self.live.lock().expect("registrar live lock poisoned").is_empty()
            || !self.pending.lock().expect("registrar pending lock poisoned").is_empty()
    }

    /// The registrar's configuration.
    #[must_use]
    pub fn config(&self) -> &RegistrarConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use cadence_runtime::TaskExecutionError;
    use std::sync::atomic::{AtomicUsize, Ordering};

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

    #[test]
    fn duplicate_name_is_idempotent() {
        let registrar = Registrar::new(RegistrarConfig::default());
        let job = Arc::new(CountingJob { calls: Arc::new(AtomicUsize::new(0)) });

        registrar.register_periodic("dup", job.clone(), Duration::from_secs(1)).unwrap();
        registrar.register_periodic("dup", job, Duration::from_secs(1)).unwrap();

        let pending = registrar.pending.lock().expect("registrar pending lock poisoned");
        assert_eq!(pending.len(), 1);
    }

    #[test]
    fn has_tasks_reflects_pending_registrations() {
        let registrar = Registrar::new(RegistrarConfig::default());
        assert!(!registrar.has_tasks());

        let job = Arc::new(CountingJob { calls: Arc::new(AtomicUsize::new(0)) });
        registrar.register_periodic("a-task", job, Duration::from_secs(1)).unwrap();
        assert!(registrar.has_tasks());
    }

    #[tokio::test]
    async fn ready_schedules_pending_registrations_and_destroy_cancels_them() {
        let registrar = Registrar::new(RegistrarConfig::default());
        let calls = Arc::new(AtomicUsize::new(0));
        let job = Arc::new(CountingJob { calls: calls.clone() });

        registrar.register_periodic("repeating", job, Duration::from_millis(20)).unwrap();
        registrar.ready().unwrap();

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(calls.load(Ordering::SeqCst) > 0);

        let live = registrar.live_tasks();
        assert_eq!(live.len(), 1);

        registrar.destroy().await;
        assert!(!registrar.has_tasks());
        assert!(live[0].is_cancelled());
    }
}
