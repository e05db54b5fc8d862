//! The task closure contract.

use crate::error::TaskExecutionError;
use async_trait::async_trait;
use std::future::Future;
use std::pin::Pin;

/// A runnable unit of work scheduled against a trigger.
///
/// This is the capability-bearing object form; [`FnJob`] adapts a
/// bare async closure to this trait.
#[async_trait]
pub trait ScheduledJob: Send + Sync {
    /// Runs the job once.
    async fn run(&self) -> Result<(), TaskExecutionError>;
}

type BoxedFuture = Pin<Box<dyn Future<Output = Result<(), TaskExecutionError>> + Send>>;

/// Adapts a bare closure returning a boxed future into a
/// [`ScheduledJob`].
pub struct FnJob<F>(F)
where
    F: Fn() -> BoxedFuture + Send + Sync;

impl<F> FnJob<F>
where
    F: Fn() -> BoxedFuture + Send + Sync,
{
    /// Wraps `f` as a scheduled job.
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

#[async_trait]
impl<F> ScheduledJob for FnJob<F>
where
    F: Fn() -> BoxedFuture + Send + Sync,
{
    async fn run(&self) -> Result<(), TaskExecutionError> {
        (self.0)().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[tokio::test]
    async fn fn_job_runs_the_wrapped_closure() {
        let calls = Arc::new(AtomicUsize::new(0));
        let calls_clone = calls.clone();
        let job = FnJob::new(move || {
            let calls = calls_clone.clone();
            Box::pin(async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }) as BoxedFuture
        });

        job.run().await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn fn_job_propagates_errors() {
        let job = FnJob::new(|| Box::pin(async { Err(TaskExecutionError::from("boom")) }) as BoxedFuture);
        assert_eq!(job.run().await.unwrap_err(), TaskExecutionError::from("boom"));
    }
}
