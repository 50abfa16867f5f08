//! Schedule building and regeneration.
//!
//! A schedule is always produced in full: session numbers are the 1-based
//! emission positions, dates step by exactly seven days, and holidays cancel
//! a slot without removing it. Regenerating a schedule discards the previous
//! generation entirely.

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::ScheduleError;
use crate::holidays::HolidayCalendar;
use crate::sequencer::{WeeklyDates, weekday_from_index};
use crate::status::SessionStatus;

pub const HOLIDAY_NOTE: &str = "Holiday";
pub const DEFAULT_SESSION_COUNT: i32 = 15;
/// Upper bound on sessions per class, roughly ten years of weekly meetings.
pub const MAX_SESSION_COUNT: i32 = 500;
/// Monday
pub const DEFAULT_WEEKDAY: i32 = 1;

/// One generated (or stored) session slot of a class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ScheduledSession {
    pub number: i32,
    pub date: NaiveDate,
    pub status: SessionStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Parses an ISO `YYYY-MM-DD` date. A full RFC 3339 timestamp is accepted
/// and truncated to its date.
pub fn parse_date(raw: &str) -> Result<NaiveDate, ScheduleError> {
    let trimmed = raw.trim();
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .or_else(|_| DateTime::parse_from_rfc3339(trimmed).map(|dt| dt.date_naive()))
        .map_err(|_| ScheduleError::InvalidDate(raw.to_string()))
}

/// Generates `session_count` weekly sessions starting from the first
/// `weekday` (0 = Sunday) on or after `start_date`. The count must lie in
/// `1..=MAX_SESSION_COUNT`.
pub fn generate_schedule(
    start_date: NaiveDate,
    weekday: i32,
    session_count: i32,
    holidays: &HolidayCalendar,
) -> Result<Vec<ScheduledSession>, ScheduleError> {
    let weekday = weekday_from_index(weekday)?;
    if !(1..=MAX_SESSION_COUNT).contains(&session_count) {
        return Err(ScheduleError::InvalidSessionCount(session_count));
    }

    WeeklyDates::from_start(start_date, weekday)?
        .take(session_count as usize)
        .zip(1..=session_count)
        .map(|(date, number)| {
            let date = date?;
            let (status, note) = holidays.classify(&date);
            Ok(ScheduledSession {
                number,
                date,
                status,
                note,
            })
        })
        .collect()
}

/// Checks that `numbers` is a permutation of `1..=N`.
pub fn validate_session_numbers<I>(numbers: I) -> Result<(), ScheduleError>
where
    I: IntoIterator<Item = i32>,
{
    let mut numbers: Vec<i32> = numbers.into_iter().collect();
    numbers.sort_unstable();
    let expected = numbers.len();
    let contiguous = numbers
        .iter()
        .enumerate()
        .all(|(i, &number)| i64::from(number) == i as i64 + 1);

    if contiguous {
        Ok(())
    } else {
        Err(ScheduleError::NonContiguousNumbers { expected })
    }
}

/// Generator input in its wire form, with dates still as strings.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ScheduleRequest {
    #[schema(example = "2024-01-01")]
    pub start_date: String,
    #[serde(default = "default_weekday")]
    #[schema(example = 1, minimum = 0, maximum = 6)]
    pub weekday: i32,
    #[serde(default = "default_session_count")]
    #[schema(example = 15)]
    pub session_count: i32,
    #[serde(default)]
    pub holidays: Vec<String>,
}

fn default_weekday() -> i32 {
    DEFAULT_WEEKDAY
}

fn default_session_count() -> i32 {
    DEFAULT_SESSION_COUNT
}

impl ScheduleRequest {
    pub fn generate(&self) -> Result<Vec<ScheduledSession>, ScheduleError> {
        let start = parse_date(&self.start_date)?;
        let holidays = HolidayCalendar::parse(&self.holidays)?;
        generate_schedule(start, self.weekday, self.session_count, &holidays)
    }
}

/// The current session generation of one class.
///
/// There is no incremental patching: a reschedule builds a complete new
/// generation and swaps it in, and manual edits replace the whole list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassSchedule {
    sessions: Vec<ScheduledSession>,
}

impl ClassSchedule {
    pub fn generate(
        start_date: NaiveDate,
        weekday: i32,
        session_count: i32,
        holidays: &HolidayCalendar,
    ) -> Result<Self, ScheduleError> {
        Ok(Self {
            sessions: generate_schedule(start_date, weekday, session_count, holidays)?,
        })
    }

    /// Wraps an existing list, enforcing the `1..=N` numbering and the
    /// session cap. Sessions are kept ordered by number.
    pub fn from_sessions(mut sessions: Vec<ScheduledSession>) -> Result<Self, ScheduleError> {
        if sessions.len() > MAX_SESSION_COUNT as usize {
            let count = i32::try_from(sessions.len()).unwrap_or(i32::MAX);
            return Err(ScheduleError::InvalidSessionCount(count));
        }
        validate_session_numbers(sessions.iter().map(|s| s.number))?;
        sessions.sort_by_key(|s| s.number);
        Ok(Self { sessions })
    }

    /// Replaces every session with a fresh generation. On error the current
    /// sessions are left untouched.
    pub fn regenerate(
        &mut self,
        start_date: NaiveDate,
        weekday: i32,
        session_count: i32,
        holidays: &HolidayCalendar,
    ) -> Result<(), ScheduleError> {
        let next = generate_schedule(start_date, weekday, session_count, holidays)?;
        self.sessions = next;
        Ok(())
    }

    pub fn sessions(&self) -> &[ScheduledSession] {
        &self.sessions
    }

    pub fn into_sessions(self) -> Vec<ScheduledSession> {
        self.sessions
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn cancelled_count(&self) -> usize {
        self.sessions
            .iter()
            .filter(|s| s.status == SessionStatus::Cancelled)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_end_to_end_holiday_scenario() {
        let holidays: HolidayCalendar = [date(2024, 1, 15)].into_iter().collect();
        let sessions = generate_schedule(date(2024, 1, 1), 1, 4, &holidays).unwrap();

        let summary: Vec<_> = sessions
            .iter()
            .map(|s| (s.number, s.date, s.status))
            .collect();
        assert_eq!(
            summary,
            vec![
                (1, date(2024, 1, 1), SessionStatus::Scheduled),
                (2, date(2024, 1, 8), SessionStatus::Scheduled),
                (3, date(2024, 1, 15), SessionStatus::Cancelled),
                (4, date(2024, 1, 22), SessionStatus::Scheduled),
            ]
        );
        assert_eq!(sessions[2].note.as_deref(), Some(HOLIDAY_NOTE));
        assert!(sessions[0].note.is_none());
    }

    #[test]
    fn test_count_numbering_and_spacing_without_holidays() {
        let empty = HolidayCalendar::new();
        let starts = [date(2024, 1, 1), date(2024, 2, 27), date(2023, 12, 30)];

        for start in starts {
            for weekday in 0..7 {
                for count in [1, 2, 15, 40] {
                    let sessions = generate_schedule(start, weekday, count, &empty).unwrap();

                    assert_eq!(sessions.len(), count as usize);
                    assert_eq!(
                        sessions.iter().map(|s| s.number).collect::<Vec<_>>(),
                        (1..=count).collect::<Vec<_>>()
                    );
                    assert_eq!(sessions[0].date.weekday().num_days_from_sunday() as i32, weekday);
                    assert!(sessions[0].date >= start);
                    assert!((sessions[0].date - start).num_days() <= 6);
                    for pair in sessions.windows(2) {
                        assert_eq!((pair[1].date - pair[0].date).num_days(), 7);
                    }
                    assert!(sessions.iter().all(|s| s.status == SessionStatus::Scheduled));
                }
            }
        }
    }

    #[test]
    fn test_holidays_cancel_without_changing_count_or_numbers() {
        let start = date(2024, 3, 4);
        let plain = generate_schedule(start, 1, 10, &HolidayCalendar::new()).unwrap();

        // Every other session date plus one date that never matches.
        let mut holidays: HolidayCalendar = plain.iter().step_by(2).map(|s| s.date).collect();
        holidays.insert(date(2024, 3, 5));

        let filtered = generate_schedule(start, 1, 10, &holidays).unwrap();
        assert_eq!(filtered.len(), plain.len());

        for (before, after) in plain.iter().zip(&filtered) {
            assert_eq!(before.number, after.number);
            assert_eq!(before.date, after.date);
            let expected = if holidays.contains(&after.date) {
                SessionStatus::Cancelled
            } else {
                SessionStatus::Scheduled
            };
            assert_eq!(after.status, expected);
        }
    }

    #[test]
    fn test_input_errors() {
        let empty = HolidayCalendar::new();
        let start = date(2024, 1, 1);

        assert_eq!(
            generate_schedule(start, 7, 4, &empty),
            Err(ScheduleError::InvalidWeekday(7))
        );
        assert_eq!(
            generate_schedule(start, -1, 4, &empty),
            Err(ScheduleError::InvalidWeekday(-1))
        );
        assert_eq!(
            generate_schedule(start, 1, 0, &empty),
            Err(ScheduleError::InvalidSessionCount(0))
        );
        assert_eq!(
            generate_schedule(start, 1, -3, &empty),
            Err(ScheduleError::InvalidSessionCount(-3))
        );
    }

    #[test]
    fn test_session_count_cap() {
        let empty = HolidayCalendar::new();
        let start = date(2024, 1, 1);

        let longest = generate_schedule(start, 1, MAX_SESSION_COUNT, &empty).unwrap();
        assert_eq!(longest.len(), MAX_SESSION_COUNT as usize);
        assert_eq!(longest.last().map(|s| s.number), Some(MAX_SESSION_COUNT));

        assert_eq!(
            generate_schedule(start, 1, MAX_SESSION_COUNT + 1, &empty),
            Err(ScheduleError::InvalidSessionCount(MAX_SESSION_COUNT + 1))
        );
        assert_eq!(
            generate_schedule(start, 1, i32::MAX, &empty),
            Err(ScheduleError::InvalidSessionCount(i32::MAX))
        );
    }

    #[test]
    fn test_date_out_of_range() {
        let near_end = NaiveDate::MAX - chrono::Days::new(10);
        let result = generate_schedule(near_end, 1, 5, &HolidayCalendar::new());
        assert_eq!(result, Err(ScheduleError::DateOutOfRange));
    }

    #[test]
    fn test_generation_is_deterministic() {
        let holidays: HolidayCalendar = [date(2024, 5, 1)].into_iter().collect();
        let a = generate_schedule(date(2024, 4, 1), 3, 8, &holidays).unwrap();
        let b = generate_schedule(date(2024, 4, 1), 3, 8, &holidays).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_parse_date_formats() {
        assert_eq!(parse_date("2024-01-01").unwrap(), date(2024, 1, 1));
        assert_eq!(parse_date(" 2024-01-01 ").unwrap(), date(2024, 1, 1));
        assert_eq!(
            parse_date("2024-01-01T10:30:00Z").unwrap(),
            date(2024, 1, 1)
        );
        assert_eq!(
            parse_date("01/02/2024"),
            Err(ScheduleError::InvalidDate("01/02/2024".to_string()))
        );
        assert!(parse_date("").is_err());
    }

    #[test]
    fn test_schedule_request_generate() {
        let request: ScheduleRequest = serde_json::from_str(
            r#"{"start_date":"2024-01-01","weekday":1,"session_count":4,"holidays":["2024-01-15"]}"#,
        )
        .unwrap();
        let sessions = request.generate().unwrap();
        assert_eq!(sessions.len(), 4);
        assert_eq!(sessions[2].status, SessionStatus::Cancelled);
    }

    #[test]
    fn test_schedule_request_defaults() {
        let request: ScheduleRequest =
            serde_json::from_str(r#"{"start_date":"2024-01-03"}"#).unwrap();
        assert_eq!(request.weekday, DEFAULT_WEEKDAY);
        assert_eq!(request.session_count, DEFAULT_SESSION_COUNT);

        let sessions = request.generate().unwrap();
        assert_eq!(sessions.len(), 15);
        assert_eq!(sessions[0].date, date(2024, 1, 8));
    }

    #[test]
    fn test_schedule_request_bad_inputs() {
        let bad_start = ScheduleRequest {
            start_date: "not-a-date".into(),
            weekday: 1,
            session_count: 4,
            holidays: vec![],
        };
        assert!(matches!(bad_start.generate(), Err(ScheduleError::InvalidDate(_))));

        let bad_holiday = ScheduleRequest {
            holidays: vec!["2024-13-01".into()],
            start_date: "2024-01-01".into(),
            ..bad_start
        };
        assert_eq!(
            bad_holiday.generate(),
            Err(ScheduleError::InvalidDate("2024-13-01".to_string()))
        );
    }

    #[test]
    fn test_validate_session_numbers() {
        assert!(validate_session_numbers([3, 1, 2]).is_ok());
        assert!(validate_session_numbers(Vec::<i32>::new()).is_ok());
        assert_eq!(
            validate_session_numbers([1, 3]),
            Err(ScheduleError::NonContiguousNumbers { expected: 2 })
        );
        assert!(validate_session_numbers([1, 1, 2]).is_err());
        assert!(validate_session_numbers([0, 1]).is_err());
    }

    #[test]
    fn test_regenerate_replaces_wholesale() {
        let empty = HolidayCalendar::new();
        let mut schedule = ClassSchedule::generate(date(2024, 1, 1), 1, 4, &empty).unwrap();

        let mut edited = schedule.sessions().to_vec();
        edited[0].status = SessionStatus::Completed;
        edited[0].note = Some("covered chapter 1".into());
        schedule = ClassSchedule::from_sessions(edited).unwrap();

        let holidays: HolidayCalendar = [date(2024, 1, 17)].into_iter().collect();
        schedule.regenerate(date(2024, 1, 1), 3, 6, &holidays).unwrap();

        assert_eq!(schedule.len(), 6);
        assert_eq!(schedule.sessions()[0].date, date(2024, 1, 3));
        assert_eq!(schedule.sessions()[0].status, SessionStatus::Scheduled);
        assert!(schedule.sessions()[0].note.is_none());
        assert_eq!(schedule.cancelled_count(), 1);
    }

    #[test]
    fn test_failed_regenerate_keeps_current_generation() {
        let empty = HolidayCalendar::new();
        let mut schedule = ClassSchedule::generate(date(2024, 1, 1), 1, 4, &empty).unwrap();
        let before = schedule.clone();

        assert!(schedule.regenerate(date(2024, 1, 1), 9, 4, &empty).is_err());
        assert_eq!(schedule, before);
        assert_eq!(schedule.into_sessions().len(), 4);
    }

    #[test]
    fn test_from_sessions_orders_by_number() {
        let empty = HolidayCalendar::new();
        let mut sessions = generate_schedule(date(2024, 1, 1), 1, 3, &empty).unwrap();
        sessions.reverse();

        let schedule = ClassSchedule::from_sessions(sessions).unwrap();
        let numbers: Vec<_> = schedule.sessions().iter().map(|s| s.number).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
        assert!(!schedule.is_empty());
    }

    #[test]
    fn test_from_sessions_enforces_cap() {
        let start = date(2024, 1, 1);
        let mut sessions =
            generate_schedule(start, 1, MAX_SESSION_COUNT, &HolidayCalendar::new()).unwrap();
        sessions.push(ScheduledSession {
            number: MAX_SESSION_COUNT + 1,
            date: start,
            status: SessionStatus::Scheduled,
            note: None,
        });

        assert_eq!(
            ClassSchedule::from_sessions(sessions),
            Err(ScheduleError::InvalidSessionCount(MAX_SESSION_COUNT + 1))
        );
    }
}
