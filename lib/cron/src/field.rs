//! A single parsed cron field: a set of allowed integer values over a
//! closed range `[min, max]`.

use std::collections::BTreeSet;

/// A parsed specification for one cron field (second, minute, hour,
/// day-of-month, month, or day-of-week).
///
/// Built from `*`, `?`, or a comma-separated list of single values or
/// `a-b` ranges, each optionally divided by a `/step`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CronField {
    allowed: BTreeSet<u8>,
    min: u8,
    max: u8,
}

impl CronField {
    /// Parses one field token against its valid `[min, max]` range.
    ///
    /// `allow_question` permits the `?` wildcard (day-of-month and
    /// day-of-week only). `alias_seven_to_zero` folds the value `7`
    /// into `0` as it is inserted, for the day-of-week field where `7`
    /// is a Sunday alias.
    pub fn parse(
        token: &str,
        min: u8,
        max: u8,
        allow_question: bool,
        alias_seven_to_zero: bool,
    ) -> Result<Self, String> {
        if token.is_empty() {
            return Err("field is empty".to_string());
        }

        if token == "?" {
            if !allow_question {
                return Err("'?' is only valid for day-of-month and day-of-week".to_string());
            }
            return Ok(Self::full_range(min, max, alias_seven_to_zero));
        }

        if token == "*" {
            return Ok(Self::full_range(min, max, alias_seven_to_zero));
        }

        let mut allowed = BTreeSet::new();
        for part in token.split(',') {
            Self::parse_part(part, min, max, &mut allowed)?;
        }

        if alias_seven_to_zero && allowed.remove(&7) {
            allowed.insert(0);
        }

        Ok(Self { allowed, min, max })
    }

    fn full_range(min: u8, max: u8, alias_seven_to_zero: bool) -> Self {
        let mut allowed: BTreeSet<u8> = (min..=max).collect();
        if alias_seven_to_zero {
            allowed.remove(&7);
            allowed.insert(0);
        }
        Self { allowed, min, max }
    }

    fn parse_part(part: &str, min: u8, max: u8, allowed: &mut BTreeSet<u8>) -> Result<(), String> {
        if part.is_empty() {
            return Err("empty list element".to_string());
        }

        let (base, step) = match part.split_once('/') {
            Some((base, step_str)) => {
                let step: u32 = step_str
                    .parse()
                    .map_err(|_| format!("invalid step '{step_str}'"))?;
                if step == 0 {
                    return Err("step must be a positive integer".to_string());
                }
                (base, step)
            }
            None => (part, 1),
        };

        let (lo, hi) = if base == "*" {
            (min, max)
        } else if let Some((a, b)) = base.split_once('-') {
            let lo: u8 = a
                .parse()
                .map_err(|_| format!("invalid range start '{a}'"))?;
            let hi: u8 = b.parse().map_err(|_| format!("invalid range end '{b}'"))?;
            if lo < min || hi > max {
                return Err(format!(
                    "value out of range [{min}, {max}]: '{base}'"
                ));
            }
            if lo > hi {
                return Err(format!("range start {lo} is greater than end {hi}"));
            }
            (lo, hi)
        } else {
            let v: u8 = base.parse().map_err(|_| format!("invalid value '{base}'"))?;
            if v < min || v > max {
                return Err(format!("value out of range [{min}, {max}]: '{v}'"));
            }
            // A bare value with a step iterates from that value to the
            // field's maximum, matching common crontab semantics for
            // e.g. "5/15".
            if step > 1 { (v, max) } else { (v, v) }
        };

        let mut v = lo;
        while v <= hi {
            allowed.insert(v);
            let Some(next) = (v as u32).checked_add(step) else {
                break;
            };
            let Ok(next) = u8::try_from(next) else {
                break;
            };
            v = next;
        }

        Ok(())
    }

    /// Returns whether `value` is allowed by this field.
    #[must_use]
    pub fn contains(&self, value: u8) -> bool {
        self.allowed.contains(&value)
    }

    /// Returns the smallest allowed value `>= value`, if any remain
    /// within `[min, max]`.
    #[must_use]
    pub fn next_at_or_after(&self, value: u8) -> Option<u8> {
        self.allowed.range(value..).next().copied()
    }

    /// Returns the smallest allowed value.
    #[must_use]
    pub fn min_allowed(&self) -> Option<u8> {
        self.allowed.iter().next().copied()
    }

    /// Returns the field's valid range.
    #[must_use]
    pub fn range(&self) -> (u8, u8) {
        (self.min, self.max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wildcard_covers_full_range() {
        let field = CronField::parse("*", 0, 59, false, false).unwrap();
        assert!(field.contains(0));
        assert!(field.contains(59));
        assert_eq!(field.min_allowed(), Some(0));
    }

    #[test]
    fn question_mark_only_for_day_fields() {
        assert!(CronField::parse("?", 0, 59, false, false).is_err());
        assert!(CronField::parse("?", 1, 31, true, false).is_ok());
    }

    #[test]
    fn single_values_and_ranges() {
        let field = CronField::parse("1,5,10-12", 0, 59, false, false).unwrap();
        assert!(field.contains(1));
        assert!(field.contains(5));
        assert!(field.contains(10));
        assert!(field.contains(11));
        assert!(field.contains(12));
        assert!(!field.contains(2));
        assert!(!field.contains(13));
    }

    #[test]
    fn range_with_step() {
        let field = CronField::parse("0-30/10", 0, 59, false, false).unwrap();
        assert!(field.contains(0));
        assert!(field.contains(10));
        assert!(field.contains(20));
        assert!(field.contains(30));
        assert!(!field.contains(5));
        assert!(!field.contains(40));
    }

    #[test]
    fn wildcard_with_step() {
        let field = CronField::parse("*/15", 0, 59, false, false).unwrap();
        assert!(field.contains(0));
        assert!(field.contains(15));
        assert!(field.contains(45));
        assert!(!field.contains(1));
    }

    #[test]
    fn bare_value_with_step_iterates_to_max() {
        let field = CronField::parse("5/15", 0, 59, false, false).unwrap();
        assert!(field.contains(5));
        assert!(field.contains(20));
        assert!(field.contains(35));
        assert!(field.contains(50));
        assert!(!field.contains(4));
    }

    #[test]
    fn rejects_inverted_range() {
        let err = CronField::parse("10-5", 0, 59, false, false).unwrap_err();
        assert!(err.contains("greater than"));
    }

    #[test]
    fn rejects_out_of_range_value() {
        assert!(CronField::parse("60", 0, 59, false, false).is_err());
        assert!(CronField::parse("-1", 0, 59, false, false).is_err());
    }

    #[test]
    fn rejects_zero_step() {
        let err = CronField::parse("*/0", 0, 59, false, false).unwrap_err();
        assert!(err.contains("positive"));
    }

    #[test]
    fn day_of_week_seven_aliases_zero() {
        let field = CronField::parse("7", 0, 7, false, true).unwrap();
        assert!(field.contains(0));
        assert!(!field.contains(7));

        let field = CronField::parse("*", 0, 7, false, true).unwrap();
        assert!(field.contains(0));
        assert!(!field.contains(7));
    }
}
