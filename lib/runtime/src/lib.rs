//! The concurrent task runtime for the cadence task scheduler.
//!
//! A [`ScheduledTask`] loops: consult its trigger, sleep until the
//! next fire instant, execute, record, reschedule. A
//! [`ConcurrentScheduler`] owns a set of these tasks and admits their
//! executions through a [`Gate`] that caps concurrency and bounds an
//! overflow queue.

pub mod error;
pub mod gate;
pub mod job;
pub mod scheduler;
pub mod snapshot;
pub mod task;

pub use error::{SchedulerError, TaskExecutionError};
pub use gate::Gate;
pub use job::{FnJob, ScheduledJob};
pub use scheduler::ConcurrentScheduler;
pub use snapshot::{ScheduledTaskSnapshot, SchedulerSnapshot};
pub use task::ScheduledTask;
