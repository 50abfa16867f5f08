//! Session persistence shared by seeding and regeneration.

use classflow_models::ClassId;
use classflow_schedule::{ClassSchedule, HolidayCalendar, ScheduledSession};
use sqlx::{PgConnection, PgPool, Postgres, QueryBuilder};

pub async fn load_holidays(db: &PgPool) -> Result<HolidayCalendar, sqlx::Error> {
    let dates = sqlx::query_scalar::<_, chrono::NaiveDate>("SELECT date FROM holidays")
        .fetch_all(db)
        .await?;
    Ok(dates.into_iter().collect())
}

/// Deletes the class's sessions and inserts `sessions` instead. Attendance
/// past the new last session number goes with them.
pub async fn replace_sessions(
    conn: &mut PgConnection,
    class_id: ClassId,
    sessions: &[ScheduledSession],
) -> Result<u64, sqlx::Error> {
    sqlx::query("DELETE FROM sessions WHERE class_id = $1")
        .bind(class_id)
        .execute(&mut *conn)
        .await?;
    sqlx::query("DELETE FROM attendance WHERE class_id = $1 AND session_number > $2")
        .bind(class_id)
        .bind(sessions.len() as i32)
        .execute(&mut *conn)
        .await?;

    if sessions.is_empty() {
        return Ok(0);
    }

    let mut qb = QueryBuilder::<Postgres>::new(
        "INSERT INTO sessions (class_id, session_number, date, status, note) ",
    );
    qb.push_values(sessions, |mut row, session| {
        row.push_bind(class_id)
            .push_bind(session.number)
            .push_bind(session.date)
            .push_bind(session.status)
            .push_bind(session.note.clone());
    });

    Ok(qb.build().execute(&mut *conn).await?.rows_affected())
}

/// Rebuilds the sessions of the class with `code` from its stored schedule
/// fields and the current holidays. Returns the new schedule.
pub async fn regenerate_by_code(
    db: &PgPool,
    code: &str,
) -> Result<ClassSchedule, Box<dyn std::error::Error>> {
    let class: Option<(ClassId, chrono::NaiveDate, i32, i32)> = sqlx::query_as(
        "SELECT id, start_date, week_day, total_sessions FROM classes WHERE code = $1",
    )
    .bind(code)
    .fetch_optional(db)
    .await?;

    let Some((class_id, start_date, week_day, total_sessions)) = class else {
        return Err(format!("No class with code '{code}'").into());
    };

    let holidays = load_holidays(db).await?;
    let schedule = ClassSchedule::generate(start_date, week_day, total_sessions, &holidays)?;

    let mut tx = db.begin().await?;
    replace_sessions(&mut *tx, class_id, schedule.sessions()).await?;
    sqlx::query("UPDATE classes SET updated_at = NOW() WHERE id = $1")
        .bind(class_id)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;

    Ok(schedule)
}
