use chrono::{Days, Utc};
use classflow_schedule::AttendanceStats;
use sqlx::PgPool;
use tracing::instrument;

use crate::modules::attendance::model::AttendanceCounts;
use crate::modules::dashboard::model::{DashboardResponse, EntityCounts, UpcomingSession};

const RECENT_DAYS: u64 = 7;
const UPCOMING_SESSIONS: i64 = 10;

pub struct DashboardService;

impl DashboardService {
    #[instrument(skip(db))]
    pub async fn overview(db: &PgPool) -> Result<DashboardResponse, sqlx::Error> {
        let today = Utc::now().date_naive();
        let since = today
            .checked_sub_days(Days::new(RECENT_DAYS))
            .unwrap_or(today);

        let counts = sqlx::query_as::<_, EntityCounts>(
            r#"SELECT
                 (SELECT COUNT(*) FROM classes) AS classes,
                 (SELECT COUNT(*) FROM classes WHERE status = 'active') AS active_classes,
                 (SELECT COUNT(*) FROM students WHERE active) AS students,
                 (SELECT COUNT(*) FROM teachers WHERE active) AS teachers,
                 (SELECT COUNT(*) FROM managers WHERE active) AS managers,
                 (SELECT COUNT(*) FROM holidays WHERE date >= $1) AS upcoming_holidays"#,
        )
        .bind(today)
        .fetch_one(db)
        .await?;

        let recent = sqlx::query_as::<_, AttendanceCounts>(
            r#"SELECT
                 COUNT(*) FILTER (WHERE a.status = 'on-time') AS on_time,
                 COUNT(*) FILTER (WHERE a.status = 'late') AS late,
                 COUNT(*) FILTER (WHERE a.status = 'excused') AS excused,
                 COUNT(*) FILTER (WHERE a.status = 'absent') AS absent
               FROM attendance a
               JOIN sessions se
                 ON se.class_id = a.class_id AND se.session_number = a.session_number
              WHERE se.date BETWEEN $1 AND $2"#,
        )
        .bind(since)
        .bind(today)
        .fetch_one(db)
        .await?;

        let upcoming_sessions = sqlx::query_as::<_, UpcomingSession>(
            r#"SELECT c.id AS class_id, c.code AS class_code, c.name AS class_name,
                      c.time_slot, se.session_number, se.date, se.status
                 FROM sessions se
                 JOIN classes c ON c.id = se.class_id
                WHERE se.date >= $1 AND se.status = 'scheduled' AND c.status = 'active'
                ORDER BY se.date, c.time_slot NULLS LAST, c.code
                LIMIT $2"#,
        )
        .bind(today)
        .bind(UPCOMING_SESSIONS)
        .fetch_all(db)
        .await?;

        Ok(DashboardResponse {
            counts,
            recent_attendance: AttendanceStats::from(recent),
            upcoming_sessions,
        })
    }
}
