//! Error types for the registrar crate.

use cadence_runtime::SchedulerError;
use cadence_trigger::TriggerError;
use std::fmt;

/// Errors from task registration and the registrar lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrarError {
    /// A declaration exposed parameters; scheduled entities must be
    /// parameterless.
    ParameterizedDeclaration {
        /// The offending declaration's name.
        name: String,
    },
    /// A declaration supplied more than one trigger-kind parameter.
    ConflictingTriggerParams {
        /// The offending declaration's name.
        name: String,
    },
    /// Trigger construction failed.
    Trigger(TriggerError),
    /// The underlying scheduler rejected the registration.
    Scheduler(SchedulerError),
}

impl fmt::Display for RegistrarError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ParameterizedDeclaration { name } => {
                write!(f, "scheduled methods must be parameterless: '{name}' declares parameters")
            }
            Self::ConflictingTriggerParams { name } => {
                write!(f, "'{name}' supplies conflicting trigger parameters")
            }
            Self::Trigger(err) => write!(f, "{err}"),
            Self::Scheduler(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for RegistrarError {}

impl From<TriggerError> for RegistrarError {
    fn from(err: TriggerError) -> Self {
        Self::Trigger(err)
    }
}

impl From<SchedulerError> for RegistrarError {
    fn from(err: SchedulerError) -> Self {
        Self::Scheduler(err)
    }
}
