use crate::config::ScheduleConfig;
use chrono::{Datelike, NaiveDate, Weekday};
use std::collections::{BTreeSet, HashSet};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CalendarError {
    #[error("no working day found within {lookback_days} days on or before {from}")]
    Unschedulable { from: NaiveDate, lookback_days: u32 },
    #[error("walked past the earliest representable date starting from {0}")]
    OutOfRange(NaiveDate),
    #[error("working-day span must be at least 1 (got {0})")]
    NonPositiveSpan(i64),
}

/// Working-day predicate derived from a [`ScheduleConfig`].
#[derive(Debug, Clone, PartialEq)]
pub struct WorkCalendar {
    holidays: HashSet<NaiveDate>,
    non_working_days: HashSet<Weekday>,
    exclude_holidays: bool,
    max_lookback_days: u32,
}

impl Default for WorkCalendar {
    fn default() -> Self {
        Self::from_config(&ScheduleConfig::default())
    }
}

impl WorkCalendar {
    const WEEKEND: [Weekday; 2] = [Weekday::Sat, Weekday::Sun];

    pub fn from_config(config: &ScheduleConfig) -> Self {
        let non_working_days = if config.skip_weekends {
            Self::WEEKEND.into_iter().collect()
        } else {
            HashSet::new()
        };

        Self {
            holidays: config.holidays.iter().copied().collect(),
            non_working_days,
            exclude_holidays: config.exclude_holidays,
            max_lookback_days: config.max_lookback_days,
        }
    }

    pub fn with_holidays<I>(holidays: I) -> Self
    where
        I: IntoIterator<Item = NaiveDate>,
    {
        let config = ScheduleConfig {
            exclude_holidays: true,
            holidays: holidays.into_iter().collect::<BTreeSet<_>>(),
            ..ScheduleConfig::default()
        };
        Self::from_config(&config)
    }

    pub fn excludes_holidays(&self) -> bool {
        self.exclude_holidays
    }

    pub fn max_lookback_days(&self) -> u32 {
        self.max_lookback_days
    }

    pub fn is_holiday(&self, date: NaiveDate) -> bool {
        self.exclude_holidays && self.holidays.contains(&date)
    }

    /// Check if a date can carry task work
    pub fn is_working_day(&self, date: NaiveDate) -> bool {
        !self.non_working_days.contains(&date.weekday()) && !self.is_holiday(date)
    }

    /// Latest working day on or before `date` (may be `date` itself).
    pub fn last_working_day_on_or_before(
        &self,
        date: NaiveDate,
    ) -> Result<NaiveDate, CalendarError> {
        let mut current = date;
        let mut skipped: u32 = 0;
        while !self.is_working_day(current) {
            skipped += 1;
            if skipped > self.max_lookback_days {
                return Err(CalendarError::Unschedulable {
                    from: date,
                    lookback_days: self.max_lookback_days,
                });
            }
            current = Self::day_before(current)?;
        }
        Ok(current)
    }

    /// Latest working day strictly before `date`
    pub fn prev_working_day(&self, date: NaiveDate) -> Result<NaiveDate, CalendarError> {
        self.last_working_day_on_or_before(Self::day_before(date)?)
    }

    /// Start of a span of `days_back` working days whose last working day is on or before `end`.
    ///
    /// The walk counts `end` itself when it is a working day, so a one-day span
    /// starting on a working day returns `end` unchanged. Runs of non-working days
    /// longer than the configured lookback abort the walk.
    pub fn find_prev_working(
        &self,
        end: NaiveDate,
        days_back: i64,
    ) -> Result<NaiveDate, CalendarError> {
        if days_back < 1 {
            return Err(CalendarError::NonPositiveSpan(days_back));
        }

        let mut remaining = days_back;
        let mut current = end;
        let mut gap: u32 = 0;
        loop {
            if self.is_working_day(current) {
                remaining -= 1;
                if remaining == 0 {
                    return Ok(current);
                }
                gap = 0;
            } else {
                gap += 1;
                if gap > self.max_lookback_days {
                    return Err(CalendarError::Unschedulable {
                        from: current,
                        lookback_days: self.max_lookback_days,
                    });
                }
            }
            current = Self::day_before(current)?;
        }
    }

    /// Get all working days in an inclusive date range
    pub fn working_days_in_range(&self, start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
        start
            .iter_days()
            .take_while(|day| *day <= end)
            .filter(|day| self.is_working_day(*day))
            .collect()
    }

    /// Count working days in an inclusive date range
    pub fn count_working_days(&self, start: NaiveDate, end: NaiveDate) -> i64 {
        start
            .iter_days()
            .take_while(|day| *day <= end)
            .filter(|day| self.is_working_day(*day))
            .count() as i64
    }

    fn day_before(date: NaiveDate) -> Result<NaiveDate, CalendarError> {
        date.pred_opt().ok_or(CalendarError::OutOfRange(date))
    }
}
