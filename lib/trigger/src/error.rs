//! Error types for the trigger crate.

use cadence_cron::CronError;
use std::fmt;

/// Errors from trigger construction and evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriggerError {
    /// None of the four trigger-kind parameters (cron expression,
    /// fixed-rate, fixed-delay, simple period) was set.
    NoTriggerSpecified,
    /// A duration-valued parameter that must be strictly positive was
    /// zero.
    NonPositiveDuration {
        /// The name of the offending parameter.
        field: &'static str,
    },
    /// The zone string did not resolve to a known IANA time zone.
    InvalidTimezone {
        /// The offending zone string.
        timezone: String,
    },
    /// The cron expression failed to parse or evaluate.
    Cron(CronError),
}

impl fmt::Display for TriggerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoTriggerSpecified => write!(
                f,
                "no trigger specified: set exactly one of expression, fixed-rate, fixed-delay, or period"
            ),
            Self::NonPositiveDuration { field } => {
                write!(f, "'{field}' must be a strictly positive duration")
            }
            Self::InvalidTimezone { timezone } => {
                write!(f, "invalid IANA time zone: '{timezone}'")
            }
            Self::Cron(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for TriggerError {}

impl From<CronError> for TriggerError {
    fn from(err: CronError) -> Self {
        Self::Cron(err)
    }
}
