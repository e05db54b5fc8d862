//! The four trigger kinds and their common `next_fire_time` contract.

use crate::context::ExecutionContext;
use crate::error::TriggerError;
use cadence_cron::CronExpression;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use std::time::Duration;

/// A cron-scheduled trigger: fires at the next instant matched by its
/// expression, in its zone.
#[derive(Debug, Clone)]
pub struct CronTrigger {
    expression: CronExpression,
    zone: Tz,
}

impl CronTrigger {
    /// Builds a cron trigger from a parsed expression and zone.
    #[must_use]
    pub fn new(expression: CronExpression, zone: Tz) -> Self {
        Self { expression, zone }
    }

    /// The parsed cron expression.
    #[must_use]
    pub fn expression(&self) -> &CronExpression {
        &self.expression
    }
}

/// A fixed-rate trigger: cadence is measured start-to-start, from the
/// instant the previous execution was scheduled to fire.
#[derive(Debug, Clone)]
pub struct FixedRateTrigger {
    period: Duration,
    zone: Tz,
    initial_delay: Option<Duration>,
}

impl FixedRateTrigger {
    /// Builds a fixed-rate trigger with the given period and optional
    /// first-fire delay.
    #[must_use]
    pub fn new(period: Duration, zone: Tz, initial_delay: Option<Duration>) -> Self {
        Self { period, zone, initial_delay }
    }

    /// The start-to-start cadence.
    #[must_use]
    pub fn period(&self) -> Duration {
        self.period
    }
}

/// A fixed-delay trigger: spacing is measured end-to-start, from the
/// instant the previous execution completed.
#[derive(Debug, Clone)]
pub struct FixedDelayTrigger {
    delay: Duration,
    zone: Tz,
    initial_delay: Option<Duration>,
}

impl FixedDelayTrigger {
    /// Builds a fixed-delay trigger with the given spacing and
    /// optional first-fire delay.
    #[must_use]
    pub fn new(delay: Duration, zone: Tz, initial_delay: Option<Duration>) -> Self {
        Self { delay, zone, initial_delay }
    }

    /// The end-to-start spacing.
    #[must_use]
    pub fn delay(&self) -> Duration {
        self.delay
    }
}

/// A simple periodic trigger: anchored to the previous execution's
/// actual start, so it drifts when executions run long.
#[derive(Debug, Clone)]
pub struct PeriodicTrigger {
    period: Duration,
    zone: Tz,
}

impl PeriodicTrigger {
    /// Builds a periodic trigger with the given interval.
    #[must_use]
    pub fn new(period: Duration, zone: Tz) -> Self {
        Self { period, zone }
    }

    /// The actual-start-anchored interval.
    #[must_use]
    pub fn period(&self) -> Duration {
        self.period
    }
}

/// A task's firing policy: one of four variants, each with its own
/// rule for computing the next fire time from an [`ExecutionContext`].
#[derive(Debug, Clone)]
pub enum Trigger {
    /// Fires on cron-expression matches.
    Cron(CronTrigger),
    /// Fires at a fixed start-to-start cadence.
    FixedRate(FixedRateTrigger),
    /// Fires at a fixed end-to-start spacing.
    FixedDelay(FixedDelayTrigger),
    /// Fires at a simple actual-start-anchored interval.
    Periodic(PeriodicTrigger),
}

impl Trigger {
    /// The zone this trigger evaluates in.
    #[must_use]
    pub fn zone(&self) -> Tz {
        match self {
            Self::Cron(t) => t.zone,
            Self::FixedRate(t) => t.zone,
            Self::FixedDelay(t) => t.zone,
            Self::Periodic(t) => t.zone,
        }
    }

    /// Computes the next instant this trigger should fire, given the
    /// task's execution history so far.
    ///
    /// Returns `Ok(None)` only if a cron expression has no match
    /// within its search horizon's complement is impossible to
    /// represent otherwise; in practice this always returns
    /// `Ok(Some(_))` except when the underlying cron engine reports
    /// no match.
    pub fn next_fire_time(
        &self,
        ctx: &ExecutionContext,
    ) -> Result<Option<DateTime<Utc>>, TriggerError> {
        match self {
            Self::Cron(t) => {
                let after = ctx.last_actual_start().unwrap_or_else(Utc::now);
                match t.expression.next(after, t.zone) {
                    Ok(next) => Ok(Some(next)),
                    Err(cadence_cron::CronError::NoMatchWithinHorizon { .. }) => Ok(None),
                    Err(err) => Err(err.into()),
                }
            }
            Self::FixedRate(t) => {
                let next = match ctx.last_scheduled() {
                    Some(last) => last + chrono::Duration::from_std(t.period)
                        .map_err(|_| TriggerError::NonPositiveDuration { field: "fixed_rate" })?,
                    None => {
                        Utc::now()
                            + chrono::Duration::from_std(t.initial_delay.unwrap_or_default())
                                .map_err(|_| TriggerError::NonPositiveDuration {
                                    field: "initial_delay",
                                })?
                    }
                };
                Ok(Some(next))
            }
            Self::FixedDelay(t) => {
                let next = match ctx.last_completion() {
                    Some(last) => last + chrono::Duration::from_std(t.delay)
                        .map_err(|_| TriggerError::NonPositiveDuration { field: "fixed_delay" })?,
                    None => {
                        Utc::now()
                            + chrono::Duration::from_std(t.initial_delay.unwrap_or_default())
                                .map_err(|_| TriggerError::NonPositiveDuration {
                                    field: "initial_delay",
                                })?
                    }
                };
                Ok(Some(next))
            }
            Self::Periodic(t) => {
                let next = match ctx.last_actual_start() {
                    Some(last) => last + chrono::Duration::from_std(t.period)
                        .map_err(|_| TriggerError::NonPositiveDuration { field: "period" })?,
                    None => Utc::now(),
                };
                Ok(Some(next))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cadence_cron::CronExpression;
    use chrono::TimeZone;

    #[test]
    fn fixed_rate_uses_last_scheduled_plus_period() {
        let ctx = ExecutionContext::new();
        let trigger = Trigger::FixedRate(FixedRateTrigger::new(
            Duration::from_secs(60),
            Tz::UTC,
            None,
        ));

        let scheduled = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        ctx.record_scheduled(scheduled);

        let next = trigger.next_fire_time(&ctx).unwrap().unwrap();
        assert_eq!(next, scheduled + chrono::Duration::seconds(60));
    }

    #[test]
    fn fixed_delay_uses_last_completion_plus_delay() {
        let ctx = ExecutionContext::new();
        let trigger = Trigger::FixedDelay(FixedDelayTrigger::new(
            Duration::from_secs(30),
            Tz::UTC,
            None,
        ));

        let completed = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        ctx.record_completion(completed);

        let next = trigger.next_fire_time(&ctx).unwrap().unwrap();
        assert_eq!(next, completed + chrono::Duration::seconds(30));
    }

    #[test]
    fn periodic_uses_last_actual_start_plus_period_and_drifts() {
        let ctx = ExecutionContext::new();
        let trigger = Trigger::Periodic(PeriodicTrigger::new(Duration::from_secs(10), Tz::UTC));

        let started = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        ctx.record_actual_start(started);

        let next = trigger.next_fire_time(&ctx).unwrap().unwrap();
        assert_eq!(next, started + chrono::Duration::seconds(10));
    }

    #[test]
    fn cron_trigger_falls_back_to_now_with_no_history() {
        let expr = CronExpression::parse("0 * * * * *").unwrap();
        let trigger = Trigger::Cron(CronTrigger::new(expr, Tz::UTC));
        let ctx = ExecutionContext::new();

        let next = trigger.next_fire_time(&ctx).unwrap();
        assert!(next.is_some());
    }

    #[test]
    fn cron_trigger_reports_no_match_within_horizon() {
        let expr = CronExpression::parse("0 0 0 30 2 *").unwrap();
        let trigger = Trigger::Cron(CronTrigger::new(expr, Tz::UTC));
        let ctx = ExecutionContext::new();

        assert_eq!(trigger.next_fire_time(&ctx).unwrap(), None);
    }
}
