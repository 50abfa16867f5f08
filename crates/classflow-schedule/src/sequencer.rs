//! Weekly date sequencing.
//!
//! Weekdays are indexed 0 (Sunday) through 6 (Saturday), matching what the
//! API and the `classes.week_day` column store.

use chrono::{Datelike, Days, NaiveDate, Weekday};

use crate::error::ScheduleError;

const WEEKDAYS: [Weekday; 7] = [
    Weekday::Sun,
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
];

pub fn weekday_from_index(index: i32) -> Result<Weekday, ScheduleError> {
    usize::try_from(index)
        .ok()
        .and_then(|i| WEEKDAYS.get(i).copied())
        .ok_or(ScheduleError::InvalidWeekday(index))
}

pub fn weekday_index(weekday: Weekday) -> i32 {
    weekday.num_days_from_sunday() as i32
}

/// Advances `start` day by day (at most six steps) until it lands on `weekday`.
pub fn first_occurrence(start: NaiveDate, weekday: Weekday) -> Result<NaiveDate, ScheduleError> {
    let mut date = start;
    while date.weekday() != weekday {
        date = date.succ_opt().ok_or(ScheduleError::DateOutOfRange)?;
    }
    Ok(date)
}

/// Unbounded iterator over `first`, `first + 7`, `first + 14`, ...
///
/// Yields `Err(DateOutOfRange)` once if the next date cannot be represented,
/// then stops.
#[derive(Debug, Clone)]
pub struct WeeklyDates {
    next: Option<NaiveDate>,
    overflowed: bool,
}

impl WeeklyDates {
    pub fn starting_at(first: NaiveDate) -> Self {
        Self {
            next: Some(first),
            overflowed: false,
        }
    }

    /// Sequence beginning at the first `weekday` on or after `start`.
    pub fn from_start(start: NaiveDate, weekday: Weekday) -> Result<Self, ScheduleError> {
        Ok(Self::starting_at(first_occurrence(start, weekday)?))
    }
}

impl Iterator for WeeklyDates {
    type Item = Result<NaiveDate, ScheduleError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.next {
            Some(date) => {
                self.next = date.checked_add_days(Days::new(7));
                self.overflowed = self.next.is_none();
                Some(Ok(date))
            }
            None if self.overflowed => {
                self.overflowed = false;
                Some(Err(ScheduleError::DateOutOfRange))
            }
            None => None,
        }
    }
}
