//! Error types for the cron crate.

use std::fmt;

/// Errors from cron expression parsing and evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CronError {
    /// The expression failed to parse.
    InvalidExpression {
        /// The offending expression, verbatim.
        expression: String,
        /// A human-readable explanation of why it is invalid.
        reason: String,
    },
    /// No matching instant was found within the five-year search
    /// horizon.
    NoMatchWithinHorizon {
        /// The expression that produced no match.
        expression: String,
    },
}

impl fmt::Display for CronError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidExpression { expression, reason } => {
                write!(f, "invalid cron expression '{expression}': {reason}")
            }
            Self::NoMatchWithinHorizon { expression } => {
                write!(
                    f,
                    "no match for cron expression '{expression}' within five years"
                )
            }
        }
    }
}

impl std::error::Error for CronError {}
