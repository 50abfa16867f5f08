//! # ClassFlow Schedule
//!
//! The computational core of ClassFlow. Everything here is synchronous and
//! pure: no I/O, no shared state.
//!
//! - [`sequencer`]: first occurrence of a weekday and the weekly date sequence after it
//! - [`holidays`]: the holiday calendar that cancels coinciding sessions
//! - [`schedule`]: builds numbered session lists and owns the replace-wholesale
//!   regeneration of a class schedule
//! - [`attendance`]: attendance counts and rate
//! - [`grades`]: weighted grade average on a 10-point scale
//!
//! ```
//! use chrono::NaiveDate;
//! use classflow_schedule::{HolidayCalendar, SessionStatus, generate_schedule};
//!
//! let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
//! let holidays: HolidayCalendar = [NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()]
//!     .into_iter()
//!     .collect();
//!
//! let sessions = generate_schedule(start, 1, 4, &holidays).unwrap();
//! assert_eq!(sessions.len(), 4);
//! assert_eq!(sessions[2].status, SessionStatus::Cancelled);
//! ```

pub mod attendance;
pub mod error;
pub mod grades;
pub mod holidays;
pub mod schedule;
pub mod sequencer;
pub mod status;

pub use attendance::{AttendanceStats, attendance_rate, compute_attendance_stats};
pub use error::ScheduleError;
pub use grades::{GradeInput, compute_weighted_average, rank_by_average};
pub use holidays::HolidayCalendar;
pub use schedule::{
    ClassSchedule, DEFAULT_SESSION_COUNT, DEFAULT_WEEKDAY, HOLIDAY_NOTE, MAX_SESSION_COUNT,
    ScheduleRequest,
    ScheduledSession, generate_schedule, parse_date, validate_session_numbers,
};
pub use sequencer::{WeeklyDates, first_occurrence, weekday_from_index, weekday_index};
pub use status::{AttendanceStatus, SessionStatus, UnknownStatus};

/// Rounds half away from zero to `decimals` places.
pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
