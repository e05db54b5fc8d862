//! 6-field cron expression parsing and timezone-correct "next fire
//! time" computation.

use crate::error::CronError;
use crate::field::CronField;
use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, TimeZone, Timelike, Utc};
use chrono_tz::Tz;

/// The maximum number of skip-ahead iterations `next` will perform
/// before giving up, guarding against pathological field combinations.
/// Since the matcher jumps to the next allowed month/day/hour/minute
/// rather than stepping one second at a time, this is reached only by
/// a field combination that can never match.
const MAX_ITERATIONS: usize = 200_000;

/// An immutable, parsed 6-field cron expression:
/// `second minute hour day-of-month month day-of-week`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CronExpression {
    raw: String,
    second: CronField,
    minute: CronField,
    hour: CronField,
    day_of_month: CronField,
    month: CronField,
    day_of_week: CronField,
}

impl CronExpression {
    /// Parses a 6-field cron expression.
    ///
    /// # Errors
    ///
    /// Returns [`CronError::InvalidExpression`] if the string does not
    /// have exactly 6 whitespace-separated fields, or if any field is
    /// malformed.
    pub fn parse(expression: &str) -> Result<Self, CronError> {
        let invalid = |reason: String| CronError::InvalidExpression {
            expression: expression.to_string(),
            reason,
        };

        let fields: Vec<&str> = expression.split_whitespace().collect();
        if fields.len() != 6 {
            return Err(invalid(format!(
                "expected 6 fields (second minute hour day-of-month month day-of-week), got {}",
                fields.len()
            )));
        }

        let second = CronField::parse(fields[0], 0, 59, false, false).map_err(invalid)?;
        let minute = CronField::parse(fields[1], 0, 59, false, false).map_err(invalid)?;
        let hour = CronField::parse(fields[2], 0, 23, false, false).map_err(invalid)?;
        let day_of_month = CronField::parse(fields[3], 1, 31, true, false).map_err(invalid)?;
        let month = CronField::parse(fields[4], 1, 12, false, false).map_err(invalid)?;
        let day_of_week = CronField::parse(fields[5], 0, 7, true, true).map_err(invalid)?;

        Ok(Self {
            raw: expression.to_string(),
            second,
            minute,
            hour,
            day_of_month,
            month,
            day_of_week,
        })
    }

    /// Returns the original expression string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Computes the smallest instant strictly greater than `after`,
    /// expressed in `zone`, whose wall-clock components all lie in
    /// their field's allowed set.
    ///
    /// # Errors
    ///
    /// Returns [`CronError::NoMatchWithinHorizon`] if no match is
    /// found within five years of `after`.
    pub fn next(&self, after: DateTime<Utc>, zone: Tz) -> Result<DateTime<Utc>, CronError> {
        let local_after = after.with_timezone(&zone).naive_local();
        let horizon = local_after + Duration::days(5 * 365 + 2);

        let mut candidate = local_after + Duration::seconds(1);

        for _ in 0..MAX_ITERATIONS {
            if candidate > horizon {
                return Err(CronError::NoMatchWithinHorizon {
                    expression: self.raw.clone(),
                });
            }

            if !self.month.contains(candidate.month() as u8) {
                candidate = Self::start_of_next_month(candidate);
                continue;
            }

            if !self.day_of_month.contains(candidate.day() as u8) || !self.day_of_week_matches(candidate)
            {
                candidate = Self::start_of_next_day(candidate);
                continue;
            }

            if !self.hour.contains(candidate.hour() as u8) {
                candidate = Self::start_of_next_hour(candidate);
                continue;
            }

            if !self.minute.contains(candidate.minute() as u8) {
                candidate = Self::start_of_next_minute(candidate);
                continue;
            }

            if !self.second.contains(candidate.second() as u8) {
                candidate += Duration::seconds(1);
                continue;
            }

            match zone.from_local_datetime(&candidate) {
                chrono::LocalResult::Single(dt) => return Ok(dt.with_timezone(&Utc)),
                chrono::LocalResult::Ambiguous(earliest, _latest) => {
                    return Ok(earliest.with_timezone(&Utc));
                }
                // The wall-clock time falls in a DST spring-forward gap
                // and never occurs in this zone; try the next second.
                chrono::LocalResult::None => {
                    candidate += Duration::seconds(1);
                }
            }
        }

        Err(CronError::NoMatchWithinHorizon {
            expression: self.raw.clone(),
        })
    }

    fn day_of_week_matches(&self, candidate: NaiveDateTime) -> bool {
        let dow = candidate.weekday().num_days_from_sunday() as u8;
        self.day_of_week.contains(dow)
    }

    fn start_of_next_month(dt: NaiveDateTime) -> NaiveDateTime {
        let (year, month) = (dt.year(), dt.month());
        let (next_year, next_month) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
        NaiveDate::from_ymd_opt(next_year, next_month, 1)
            .expect("valid calendar month")
            .and_hms_opt(0, 0, 0)
            .expect("midnight is valid")
    }

    fn start_of_next_day(dt: NaiveDateTime) -> NaiveDateTime {
        dt.date()
            .and_hms_opt(0, 0, 0)
            .expect("midnight is valid")
            + Duration::days(1)
    }

    fn start_of_next_hour(dt: NaiveDateTime) -> NaiveDateTime {
        dt.date()
            .and_hms_opt(dt.hour(), 0, 0)
            .expect("valid wall clock")
            + Duration::hours(1)
    }

    fn start_of_next_minute(dt: NaiveDateTime) -> NaiveDateTime {
        dt.date()
            .and_hms_opt(dt.hour(), dt.minute(), 0)
            .expect("valid wall clock")
            + Duration::minutes(1)
    }
}
