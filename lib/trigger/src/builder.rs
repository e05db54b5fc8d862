//! Constructs a concrete [`Trigger`] from a [`TriggerParams`] bundle,
//! enforcing exactly-one-trigger-kind and validating durations and
//! the zone.

use crate::error::TriggerError;
use crate::params::TriggerParams;
use crate::trigger::{CronTrigger, FixedDelayTrigger, FixedRateTrigger, PeriodicTrigger, Trigger};
use cadence_cron::CronExpression;
use chrono_tz::Tz;
use std::str::FromStr;
use std::time::Duration;

/// Builds a [`Trigger`] from a [`TriggerParams`] bundle.
///
/// Precedence when more than one trigger-kind parameter is present is
/// cron, then fixed-delay, then fixed-rate, then simple period.
pub struct TriggerBuilder;

impl TriggerBuilder {
    /// Builds a trigger, resolving the zone against `default_zone`
    /// when `params.zone` is unset.
    pub fn build(params: &TriggerParams, default_zone: Tz) -> Result<Trigger, TriggerError> {
        let zone = match &params.zone {
            Some(raw) => {
                Tz::from_str(raw).map_err(|_| TriggerError::InvalidTimezone { timezone: raw.clone() })?
            }
            None => default_zone,
        };

        if let Some(expression) = &params.expression {
            let expression = CronExpression::parse(expression)?;
            return Ok(Trigger::Cron(CronTrigger::new(expression, zone)));
        }

        if let Some(delay) = params.fixed_delay {
            non_zero(delay, "fixed_delay")?;
            let initial_delay = non_zero_opt(params.initial_delay, "initial_delay")?;
            return Ok(Trigger::FixedDelay(FixedDelayTrigger::new(delay, zone, initial_delay)));
        }

        if let Some(period) = params.fixed_rate {
            non_zero(period, "fixed_rate")?;
            let initial_delay = non_zero_opt(params.initial_delay, "initial_delay")?;
            return Ok(Trigger::FixedRate(FixedRateTrigger::new(period, zone, initial_delay)));
        }

        if let Some(period) = params.period {
            non_zero(period, "period")?;
            return Ok(Trigger::Periodic(PeriodicTrigger::new(period, zone)));
        }

        Err(TriggerError::NoTriggerSpecified)
    }
}

fn non_zero(duration: Duration, field: &'static str) -> Result<(), TriggerError> {
    if duration.is_zero() {
        Err(TriggerError::NonPositiveDuration { field })
    } else {
        Ok(())
    }
}

fn non_zero_opt(duration: Option<Duration>, field: &'static str) -> Result<Option<Duration>, TriggerError> {
    match duration {
        Some(d) => {
            non_zero(d, field)?;
            Ok(Some(d))
        }
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cron_takes_precedence_over_everything() {
        let params = TriggerParams::new()
            .with_expression("0 * * * * *")
            .with_fixed_rate(Duration::from_secs(1));

        let trigger = TriggerBuilder::build(&params, Tz::UTC).unwrap();
        assert!(matches!(trigger, Trigger::Cron(_)));
    }

    #[test]
    fn fixed_delay_takes_precedence_over_fixed_rate_and_period() {
        let params = TriggerParams::new()
            .with_fixed_delay(Duration::from_secs(1))
            .with_fixed_rate(Duration::from_secs(2))
            .with_period(Duration::from_secs(3));

        let trigger = TriggerBuilder::build(&params, Tz::UTC).unwrap();
        assert!(matches!(trigger, Trigger::FixedDelay(_)));
    }

    #[test]
    fn fixed_rate_takes_precedence_over_period() {
        let params = TriggerParams::new()
            .with_fixed_rate(Duration::from_secs(2))
            .with_period(Duration::from_secs(3));

        let trigger = TriggerBuilder::build(&params, Tz::UTC).unwrap();
        assert!(matches!(trigger, Trigger::FixedRate(_)));
    }

    #[test]
    fn no_params_is_an_error() {
        let params = TriggerParams::new();
        assert_eq!(
            TriggerBuilder::build(&params, Tz::UTC).unwrap_err(),
            TriggerError::NoTriggerSpecified
        );
    }

    #[test]
    fn zero_duration_is_rejected() {
        let params = TriggerParams::new().with_period(Duration::ZERO);
        assert_eq!(
            TriggerBuilder::build(&params, Tz::UTC).unwrap_err(),
            TriggerError::NonPositiveDuration { field: "period" }
        );
    }

    #[test]
    fn invalid_zone_is_rejected() {
        let params = TriggerParams::new()
            .with_period(Duration::from_secs(1))
            .with_zone("Not/A_Zone");

        assert_eq!(
            TriggerBuilder::build(&params, Tz::UTC).unwrap_err(),
            TriggerError::InvalidTimezone { timezone: "Not/A_Zone".to_string() }
        );
    }

    #[test]
    fn unset_zone_falls_back_to_default() {
        let params = TriggerParams::new().with_period(Duration::from_secs(1));
        let trigger = TriggerBuilder::build(&params, Tz::America__New_York).unwrap();
        assert_eq!(trigger.zone(), Tz::America__New_York);
    }
}
