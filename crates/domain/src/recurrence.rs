use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};
use thiserror::Error;

const DAY_MILLIS: i64 = 1000 * 60 * 60 * 24;

/// How often a `Reminder` repeats
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Frequency {
    OneTime,
    Daily,
    Weekly,
    Monthly,
}

impl Frequency {
    /// Distance between two occurrences in millis, `None` for `OneTime`.
    ///
    /// A month is a fixed 30 days, not a calendar month.
    pub fn period_millis(&self) -> Option<i64> {
        match self {
            Self::OneTime => None,
            Self::Daily => Some(DAY_MILLIS),
            Self::Weekly => Some(7 * DAY_MILLIS),
            Self::Monthly => Some(30 * DAY_MILLIS),
        }
    }

    pub fn is_recurring(&self) -> bool {
        *self != Self::OneTime
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OneTime => "one_time",
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        }
    }
}

impl Default for Frequency {
    fn default() -> Self {
        Self::OneTime
    }
}

impl Display for Frequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Error, Debug, PartialEq)]
#[error("Invalid frequency: `{0}`. Expected one of: one_time, daily, weekly, monthly")]
pub struct InvalidFrequencyError(pub String);

impl FromStr for Frequency {
    type Err = InvalidFrequencyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "one_time" => Ok(Self::OneTime),
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            _ => Err(InvalidFrequencyError(s.to_string())),
        }
    }
}

/// Computes the send time of the occurrence following `last_send_ts`.
///
/// Returns `None` for one time reminders, when no `recurring_end_ts` is set,
/// or when the candidate lies after `recurring_end_ts`. A series whose first
/// computed candidate already exceeds the end silently ends there.
pub fn next_occurrence(
    frequency: Frequency,
    last_send_ts: i64,
    recurring_end_ts: Option<i64>,
) -> Option<i64> {
    nth_occurrence(frequency, last_send_ts, 1, recurring_end_ts)
}

/// Send time of occurrence `n` of a series that started at `series_start_ts`,
/// bounded by `recurring_end_ts` in the same way as `next_occurrence`.
pub fn nth_occurrence(
    frequency: Frequency,
    series_start_ts: i64,
    n: i64,
    recurring_end_ts: Option<i64>,
) -> Option<i64> {
    let period = frequency.period_millis()?;
    let end = recurring_end_ts?;
    let candidate = series_start_ts.checked_add(period.checked_mul(n)?)?;
    if candidate <= end {
        Some(candidate)
    } else {
        None
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono::prelude::*;

    fn ts(y: i32, m: u32, d: u32) -> i64 {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0)
            .unwrap()
            .timestamp_millis()
    }

    #[test]
    fn one_time_never_recurs() {
        for t in [0, 1000, ts(2024, 1, 1), i64::MAX] {
            assert_eq!(next_occurrence(Frequency::OneTime, t, None), None);
            assert_eq!(
                next_occurrence(Frequency::OneTime, t, Some(ts(2030, 1, 1))),
                None
            );
        }
    }

    #[test]
    fn daily_is_bounded_by_end() {
        let start = ts(2024, 1, 1);
        assert_eq!(
            next_occurrence(Frequency::Daily, start, Some(ts(2024, 1, 2))),
            Some(ts(2024, 1, 2))
        );
        assert_eq!(
            next_occurrence(Frequency::Daily, ts(2024, 1, 2), Some(ts(2024, 1, 2))),
            None
        );
        assert_eq!(
            next_occurrence(Frequency::Daily, start, Some(ts(2024, 1, 2) - 1)),
            None
        );
    }

    #[test]
    fn recurring_without_end_stops() {
        assert_eq!(next_occurrence(Frequency::Weekly, ts(2024, 1, 1), None), None);
    }

    #[test]
    fn weekly_and_monthly_offsets() {
        let start = ts(2024, 1, 1);
        let end = Some(ts(2025, 1, 1));
        assert_eq!(
            next_occurrence(Frequency::Weekly, start, end),
            Some(ts(2024, 1, 8))
        );
        // 30 days, not the calendar month
        assert_eq!(
            next_occurrence(Frequency::Monthly, start, end),
            Some(ts(2024, 1, 31))
        );
    }

    #[test]
    fn nth_occurrence_matches_chained_next() {
        let start = ts(2024, 3, 1);
        let end = Some(ts(2024, 6, 1));
        for freq in [Frequency::Daily, Frequency::Weekly, Frequency::Monthly] {
            let mut last = start;
            let mut n = 1;
            while let Some(next) = next_occurrence(freq, last, end) {
                assert_eq!(nth_occurrence(freq, start, n, end), Some(next));
                last = next;
                n += 1;
            }
            assert_eq!(nth_occurrence(freq, start, n, end), None);
        }
    }

    #[test]
    fn parses_frequencies() {
        assert_eq!("one_time".parse::<Frequency>(), Ok(Frequency::OneTime));
        assert_eq!("monthly".parse::<Frequency>(), Ok(Frequency::Monthly));
        assert!("yearly".parse::<Frequency>().is_err());
        assert!("Daily".parse::<Frequency>().is_err());
    }
}
