//! Environment-sourced scheduler configuration.

use serde::Deserialize;

fn default_max_concurrency() -> usize {
    cadence_runtime::scheduler::DEFAULT_MAX_CONCURRENCY
}

fn default_queue_capacity() -> usize {
    cadence_runtime::scheduler::DEFAULT_QUEUE_CAPACITY
}

/// Configuration for a [`crate::Registrar`] and the default
/// [`cadence_runtime::ConcurrentScheduler`] it builds on `ready`.
#[derive(Debug, Clone, Deserialize)]
pub struct RegistrarConfig {
    /// `Cmax`: the concurrency cap.
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,
    /// `Qmax`: the overflow queue capacity.
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
    /// Default IANA zone for triggers that don't specify one.
    #[serde(default)]
    pub timezone: Option<String>,
    /// Prefix used by the task name generator.
    #[serde(default)]
    pub name_prefix: Option<String>,
}

impl Default for RegistrarConfig {
    fn default() -> Self {
        Self {
            max_concurrency: default_max_concurrency(),
            queue_capacity: default_queue_capacity(),
            timezone: None,
            name_prefix: None,
        }
    }
}

impl RegistrarConfig {
    /// Loads configuration from environment variables under the
    /// `scheduler` prefix (e.g. `SCHEDULER__MAX_CONCURRENCY`).
    ///
    /// # Errors
    ///
    /// Returns an error if a present value fails to parse.
    pub fn from_env() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .set_default("max_concurrency", default_max_concurrency() as i64)?
            .set_default("queue_capacity", default_queue_capacity() as i64)?
            .add_source(
                config::Environment::default()
                    .prefix("SCHEDULER")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    /// Resolves the configured zone, defaulting to UTC.
    ///
    /// # Errors
    ///
    /// Returns a [`cadence_trigger::TriggerError::InvalidTimezone`] if
    /// the configured string does not resolve to a known zone.
    pub fn default_zone(&self) -> Result<chrono_tz::Tz, cadence_trigger::TriggerError> {
        use std::str::FromStr;
        match &self.timezone {
            Some(raw) => chrono_tz::Tz::from_str(raw)
                .map_err(|_| cadence_trigger::TriggerError::InvalidTimezone { timezone: raw.clone() }),
            None => Ok(chrono_tz::Tz::UTC),
        }
    }
}
