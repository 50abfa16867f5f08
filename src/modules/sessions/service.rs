use anyhow::anyhow;
use classflow_core::AppError;
use classflow_models::ClassId;
use classflow_schedule::{ClassSchedule, ScheduledSession};
use sqlx::{PgConnection, PgPool, Postgres, QueryBuilder};
use tracing::instrument;

use crate::modules::classes::service::ClassService;
use crate::modules::sessions::model::{ReplaceSessionsDto, Session, UpdateSessionDto};

pub struct SessionService;

impl SessionService {
    /// Deletes every session of `class_id` and inserts `sessions` in its
    /// place, dropping attendance recorded for session numbers that no longer
    /// exist. Runs on the caller's connection so it can share a transaction.
    pub async fn replace_in_tx(
        conn: &mut PgConnection,
        class_id: ClassId,
        sessions: &[ScheduledSession],
    ) -> Result<Vec<Session>, sqlx::Error> {
        sqlx::query("DELETE FROM sessions WHERE class_id = $1")
            .bind(class_id)
            .execute(&mut *conn)
            .await?;

        // Numbers are contiguous, so the list length is the last valid one.
        sqlx::query("DELETE FROM attendance WHERE class_id = $1 AND session_number > $2")
            .bind(class_id)
            .bind(sessions.len() as i32)
            .execute(&mut *conn)
            .await?;

        if sessions.is_empty() {
            return Ok(Vec::new());
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
        qb.push(" RETURNING *");

        let mut stored = qb.build_query_as::<Session>().fetch_all(&mut *conn).await?;
        stored.sort_by_key(|s| s.session_number);
        Ok(stored)
    }

    #[instrument(skip(db))]
    pub async fn list_sessions(db: &PgPool, class_id: ClassId) -> Result<Vec<Session>, AppError> {
        ClassService::ensure_exists(db, class_id).await?;

        let sessions = sqlx::query_as::<_, Session>(
            "SELECT * FROM sessions WHERE class_id = $1 ORDER BY session_number",
        )
        .bind(class_id)
        .fetch_all(db)
        .await?;
        Ok(sessions)
    }

    /// Manual replacement of the whole schedule. The class's
    /// `total_sessions` follows the new list length.
    #[instrument(skip(db, dto), fields(count = dto.sessions.len()))]
    pub async fn replace_sessions(
        db: &PgPool,
        class_id: ClassId,
        dto: ReplaceSessionsDto,
    ) -> Result<Vec<Session>, AppError> {
        let schedule = ClassSchedule::from_sessions(
            dto.sessions.into_iter().map(ScheduledSession::from).collect(),
        )
        .map_err(AppError::bad_request)?;

        let mut tx = db.begin().await?;

        let updated = sqlx::query(
            "UPDATE classes SET total_sessions = $1, updated_at = NOW() WHERE id = $2",
        )
        .bind(schedule.len() as i32)
        .bind(class_id)
        .execute(&mut *tx)
        .await?;
        if updated.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!("Class not found")));
        }

        let sessions = Self::replace_in_tx(&mut *tx, class_id, schedule.sessions()).await?;
        tx.commit().await?;

        tracing::info!(%class_id, count = sessions.len(), "Sessions replaced");
        Ok(sessions)
    }

    #[instrument(skip(db))]
    pub async fn update_session(
        db: &PgPool,
        class_id: ClassId,
        number: i32,
        dto: UpdateSessionDto,
    ) -> Result<Session, AppError> {
        let existing = sqlx::query_as::<_, Session>(
            "SELECT * FROM sessions WHERE class_id = $1 AND session_number = $2",
        )
        .bind(class_id)
        .bind(number)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow!("Session {number} not found")))?;

        let session = sqlx::query_as::<_, Session>(
            r#"UPDATE sessions
               SET date = $1, status = $2, note = $3, updated_at = NOW()
               WHERE id = $4
               RETURNING *"#,
        )
        .bind(dto.date.unwrap_or(existing.date))
        .bind(dto.status.unwrap_or(existing.status))
        .bind(dto.note.unwrap_or(existing.note))
        .bind(existing.id)
        .fetch_one(db)
        .await?;

        Ok(session)
    }
}
