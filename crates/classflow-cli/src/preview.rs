//! Plain-text rendering of a generated schedule.

use chrono::Datelike;
use classflow_schedule::{ScheduledSession, SessionStatus};

/// One line per session: number, weekday, date, status and note.
pub fn render_schedule(sessions: &[ScheduledSession]) -> String {
    let mut out = String::new();
    for session in sessions {
        let line = format!(
            "{:>3}  {}  {}  {:<9}{}",
            session.number,
            session.date.weekday(),
            session.date,
            session.status.as_str(),
            session
                .note
                .as_deref()
                .map(|n| format!("  ({n})"))
                .unwrap_or_default()
        );
        out.push_str(line.trim_end());
        out.push('\n');
    }

    let cancelled = sessions
        .iter()
        .filter(|s| s.status == SessionStatus::Cancelled)
        .count();
    out.push_str(&format!(
        "{} sessions, {} cancelled\n",
        sessions.len(),
        cancelled
    ));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use classflow_schedule::{HolidayCalendar, generate_schedule};

    #[test]
    fn test_render_marks_holidays() {
        let holidays: HolidayCalendar = [NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()]
            .into_iter()
            .collect();
        let sessions = generate_schedule(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            1,
            4,
            &holidays,
        )
        .unwrap();

        let rendered = render_schedule(&sessions);
        let lines: Vec<&str> = rendered.lines().collect();

        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0], "  1  Mon  2024-01-01  scheduled");
        assert_eq!(lines[2], "  3  Mon  2024-01-15  cancelled  (Holiday)");
        assert_eq!(lines[4], "4 sessions, 1 cancelled");
    }
}
