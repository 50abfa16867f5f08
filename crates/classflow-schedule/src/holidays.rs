use std::collections::BTreeSet;

use chrono::NaiveDate;

use crate::error::ScheduleError;
use crate::schedule::{HOLIDAY_NOTE, parse_date};
use crate::status::SessionStatus;

/// Set of dates on which no teaching happens.
///
/// Sessions that fall on one of these dates keep their slot and number but
/// are marked [`SessionStatus::Cancelled`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HolidayCalendar {
    dates: BTreeSet<NaiveDate>,
}

impl HolidayCalendar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a calendar from ISO date strings, rejecting the first one that
    /// does not parse.
    pub fn parse<I, S>(dates: I) -> Result<Self, ScheduleError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        dates
            .into_iter()
            .map(|raw| parse_date(raw.as_ref()))
            .collect()
    }

    pub fn insert(&mut self, date: NaiveDate) -> bool {
        self.dates.insert(date)
    }

    pub fn contains(&self, date: &NaiveDate) -> bool {
        self.dates.contains(date)
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &NaiveDate> {
        self.dates.iter()
    }

    /// Status and note for a session held on `date`.
    pub fn classify(&self, date: &NaiveDate) -> (SessionStatus, Option<String>) {
        if self.contains(date) {
            (SessionStatus::Cancelled, Some(HOLIDAY_NOTE.to_string()))
        } else {
            (SessionStatus::Scheduled, None)
        }
    }
}

impl FromIterator<NaiveDate> for HolidayCalendar {
    fn from_iter<T: IntoIterator<Item = NaiveDate>>(iter: T) -> Self {
        Self {
            dates: iter.into_iter().collect(),
        }
    }
}

impl Extend<NaiveDate> for HolidayCalendar {
    fn extend<T: IntoIterator<Item = NaiveDate>>(&mut self, iter: T) {
        self.dates.extend(iter);
    }
}
