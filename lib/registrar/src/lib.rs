//! Programmatic task registration, deferred scheduling until the
//! runtime is up, and a declaration-based façade for the cadence task
//! scheduler.
//!
//! [`Registrar`] is the primary public surface: register fixed-rate,
//! fixed-delay, cron, or periodic tasks by closure, then call
//! [`Registrar::ready`] once the runtime is up to construct (or use
//! an attached) [`cadence_runtime::ConcurrentScheduler`] and schedule
//! everything pending. [`DeclarationRegistrar`] is a secondary,
//! validation-only surface for callers that discover scheduled
//! entities externally (e.g. via configuration tables or attributes)
//! — the core registrar does not depend on it.

pub mod config;
pub mod declaration;
pub mod error;
pub mod naming;
pub mod registrar;

pub use config::RegistrarConfig;
pub use declaration::{DeclarationRegistrar, ScheduledDeclaration};
pub use error::RegistrarError;
pub use naming::{generate_name, NameKind};
pub use registrar::Registrar;
