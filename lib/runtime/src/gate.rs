//! Concurrency admission control: caps simultaneous closure
//! invocations at `Cmax`, with a bounded overflow queue of waiters.

use crate::error::SchedulerError;
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Semaphore;

/// Gates concurrent execution of task closures.
///
/// Up to `cmax` closures run at once; beyond that, up to `qmax`
/// callers queue on the semaphore's FIFO waiter list; beyond that,
/// admission fails with [`SchedulerError::QueueFull`].
#[derive(Clone)]
pub struct Gate {
    cmax: usize,
    qmax: usize,
    semaphore: Arc<Semaphore>,
    queued: Arc<AtomicUsize>,
}

impl Gate {
    /// Creates a gate with the given concurrency cap and queue
    /// capacity.
    pub fn new(cmax: usize, qmax: usize) -> Self {
        Self {
            cmax,
            qmax,
            semaphore: Arc::new(Semaphore::new(cmax)),
            queued: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// The number of closures currently admitted and running.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.cmax - self.semaphore.available_permits()
    }

    /// The number of callers currently queued for admission.
    #[must_use]
    pub fn queued_count(&self) -> usize {
        self.queued.load(Ordering::SeqCst)
    }

    /// Runs `f` once admitted, releasing its slot on completion.
    ///
    /// Fails fast with [`SchedulerError::QueueFull`] when both the
    /// active slots and the overflow queue are at capacity.
    pub async fn run<F, Fut, T>(&self, f: F) -> Result<T, SchedulerError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        let permit = match self.semaphore.clone().try_acquire_owned() {
            Ok(permit) => permit,
            Err(_) => {
                self.reserve_queue_slot()?;
                let permit = self
                    .semaphore
                    .clone()
                    .acquire_owned()
                    .await
                    .expect("gate semaphore is never closed");
                self.queued.fetch_sub(1, Ordering::SeqCst);
                permit
            }
        };

        let result = f().await;
        drop(permit);
        Ok(result)
    }

    fn reserve_queue_slot(&self) -> Result<(), SchedulerError> {
        loop {
            let current = self.queued.load(Ordering::SeqCst);
            if current >= self.qmax {
                return Err(SchedulerError::QueueFull);
            }
            if self
                .queued
                .compare_exchange(current, current + 1, Ordering::SeqCst, Ordering::SeqCst)
                .is_ok()
            {
                return Ok(());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize as Counter;
    use std::time::Duration;
    use tokio::sync::Barrier;

    #[tokio::test]
    async fn admits_up_to_cmax_concurrently() {
        let gate = Gate::new(2, 10);
        let active = Arc::new(Counter::new(0));
        let max_seen = Arc::new(Counter::new(0));
        let barrier = Arc::new(Barrier::new(2));

        let mut handles = Vec::new();
        for _ in 0..2 {
            let gate = gate.clone();
            let active = active.clone();
            let max_seen = max_seen.clone();
            let barrier = barrier.clone();
            handles.push(tokio::spawn(async move {
                gate.run(|| async move {
                    let now = active.fetch_add(1, Ordering::SeqCst) + 1;
                    max_seen.fetch_max(now, Ordering::SeqCst);
                    barrier.wait().await;
                    active.fetch_sub(1, Ordering::SeqCst);
                })
                .await
                .unwrap();
            }));
        }

        for h in handles {
            h.await.unwrap();
        }

        assert_eq!(max_seen.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn queue_full_fails_fast() {
        let gate = Gate::new(1, 1);
        let barrier = Arc::new(Barrier::new(2));

        let holder_barrier = barrier.clone();
        let holder_gate = gate.clone();
        let holder = tokio::spawn(async move {
            holder_gate
                .run(|| async move {
                    holder_barrier.wait().await;
                })
                .await
                .unwrap();
        });

        // Give the holder a moment to acquire the single permit.
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(gate.active_count(), 1);

        let queued_gate = gate.clone();
        let queued = tokio::spawn(async move { queued_gate.run(|| async {}).await });
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(gate.queued_count(), 1);

        let rejected = gate.run(|| async {}).await;
        assert_eq!(rejected.unwrap_err(), SchedulerError::QueueFull);

        barrier.wait().await;
        holder.await.unwrap();
        queued.await.unwrap().unwrap();
    }
}
