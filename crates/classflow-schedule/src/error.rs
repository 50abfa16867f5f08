use thiserror::Error;

/// Rejected input to the schedule generator.
///
/// Every variant is an input-validation failure: callers report it back
/// (HTTP 400) and never correct the input silently.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleError {
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Weekday must be between 0 (Sunday) and 6 (Saturday), got {0}")]
    InvalidWeekday(i32),

    #[error(
        "Session count must be between 1 and {max}, got {0}",
        max = crate::schedule::MAX_SESSION_COUNT
    )]
    InvalidSessionCount(i32),

    #[error("Session numbers must run from 1 to {expected} without gaps or duplicates")]
    NonContiguousNumbers { expected: usize },

    #[error("Schedule extends past the supported date range")]
    DateOutOfRange,
}
