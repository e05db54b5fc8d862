//! The cross-boundary trigger declaration shape: a configuration
//! bundle with all trigger-kind parameters optional, from which a
//! [`crate::builder::TriggerBuilder`] constructs a concrete
//! [`crate::trigger::Trigger`].

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A configuration bundle describing a desired trigger.
///
/// Exactly one of `expression`, `fixed_rate`, `fixed_delay`, or
/// `period` must be present; [`crate::builder::TriggerBuilder`]
/// enforces this.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TriggerParams {
    /// A 6-field cron expression.
    pub expression: Option<String>,
    /// Start-to-start cadence.
    #[serde(with = "duration_opt", default)]
    pub fixed_rate: Option<Duration>,
    /// End-to-start spacing.
    #[serde(with = "duration_opt", default)]
    pub fixed_delay: Option<Duration>,
    /// Simple periodic, actual-start anchored.
    #[serde(with = "duration_opt", default)]
    pub period: Option<Duration>,
    /// First-fire offset; only meaningful for fixed-rate/fixed-delay.
    #[serde(with = "duration_opt", default)]
    pub initial_delay: Option<Duration>,
    /// IANA zone id; defaults to the runtime default zone when unset.
    pub zone: Option<String>,
}

impl TriggerParams {
    /// Creates an empty parameter bundle.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the cron expression.
    #[must_use]
    pub fn with_expression(mut self, expression: impl Into<String>) -> Self {
        self.expression = Some(expression.into());
        self
    }

    /// Sets the fixed-rate period.
    #[must_use]
    pub fn with_fixed_rate(mut self, period: Duration) -> Self {
        self.fixed_rate = Some(period);
        self
    }

    /// Sets the fixed-delay duration.
    #[must_use]
    pub fn with_fixed_delay(mut self, delay: Duration) -> Self {
        self.fixed_delay = Some(delay);
        self
    }

    /// Sets the simple periodic interval.
    #[must_use]
    pub fn with_period(mut self, period: Duration) -> Self {
        self.period = Some(period);
        self
    }

    /// Sets the initial delay.
    #[must_use]
    pub fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = Some(delay);
        self
    }

    /// Sets the zone.
    #[must_use]
    pub fn with_zone(mut self, zone: impl Into<String>) -> Self {
        self.zone = Some(zone.into());
        self
    }
}

mod duration_opt {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Option<Duration>, s: S) -> Result<S::Ok, S::Error> {
        value.map(|d| d.as_millis() as u64).serialize(s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Duration>, D::Error> {
        Ok(Option::<u64>::deserialize(d)?.map(Duration::from_millis))
    }
}
