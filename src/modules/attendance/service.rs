use anyhow::anyhow;
use classflow_core::{AppError, errors::is_foreign_key_violation};
use classflow_models::{AttendanceId, ClassId, StudentId};
use classflow_schedule::{AttendanceStats, compute_attendance_stats};
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use tracing::instrument;

use crate::metrics::track_attendance_saved;
use crate::modules::attendance::model::{
    AttendanceCounts, AttendanceWithStudent, SaveAttendanceDto, SaveAttendanceResponse,
    StudentAttendanceStats, StudentAttendanceSummary,
};
use crate::modules::classes::service::ClassService;

const STATUS_COUNTS: &str = r#"COUNT(a.id) FILTER (WHERE a.status = 'on-time') AS on_time,
       COUNT(a.id) FILTER (WHERE a.status = 'late') AS late,
       COUNT(a.id) FILTER (WHERE a.status = 'excused') AS excused,
       COUNT(a.id) FILTER (WHERE a.status = 'absent') AS absent"#;

#[derive(FromRow)]
struct SummaryRow {
    student_id: StudentId,
    student_code: String,
    student_name: String,
    #[sqlx(flatten)]
    counts: AttendanceCounts,
}

pub struct AttendanceService;

impl AttendanceService {
    /// Replaces the roster of one (class, session) pair. The session must
    /// exist in the class's current schedule.
    #[instrument(skip(db, dto), fields(class_id = %dto.class_id, session = dto.session))]
    pub async fn save_attendance(
        db: &PgPool,
        dto: SaveAttendanceDto,
    ) -> Result<SaveAttendanceResponse, AppError> {
        ClassService::ensure_exists(db, dto.class_id).await?;

        let session_exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM sessions WHERE class_id = $1 AND session_number = $2)",
        )
        .bind(dto.class_id)
        .bind(dto.session)
        .fetch_one(db)
        .await?;
        if !session_exists {
            return Err(AppError::not_found(anyhow!(
                "Session {} not found for this class",
                dto.session
            )));
        }

        let stats = compute_attendance_stats(dto.records.iter().map(|r| r.status));
        let saved = dto.records.len();

        let mut tx = db.begin().await?;

        sqlx::query("DELETE FROM attendance WHERE class_id = $1 AND session_number = $2")
            .bind(dto.class_id)
            .bind(dto.session)
            .execute(&mut *tx)
            .await?;

        if !dto.records.is_empty() {
            let mut qb = QueryBuilder::<Postgres>::new(
                "INSERT INTO attendance (class_id, session_number, student_id, status, note) ",
            );
            qb.push_values(dto.records, |mut row, record| {
                row.push_bind(dto.class_id)
                    .push_bind(dto.session)
                    .push_bind(record.student_id)
                    .push_bind(record.status)
                    .push_bind(record.note);
            });

            qb.build().execute(&mut *tx).await.map_err(|e| {
                if is_foreign_key_violation(&e) {
                    AppError::bad_request(anyhow!("One or more students do not exist"))
                } else {
                    AppError::internal(e)
                }
            })?;
        }

        tx.commit().await?;

        track_attendance_saved(saved);
        tracing::info!(saved, rate = stats.rate, "Attendance saved");

        Ok(SaveAttendanceResponse {
            class_id: dto.class_id,
            session: dto.session,
            saved,
            stats,
        })
    }

    #[instrument(skip(db))]
    pub async fn class_attendance(
        db: &PgPool,
        class_id: ClassId,
        session: Option<i32>,
    ) -> Result<Vec<AttendanceWithStudent>, AppError> {
        ClassService::ensure_exists(db, class_id).await?;

        let records = sqlx::query_as::<_, AttendanceWithStudent>(
            r#"SELECT a.*, s.code AS student_code, s.name AS student_name
                 FROM attendance a
                 JOIN students s ON s.id = a.student_id
                WHERE a.class_id = $1 AND ($2::INT IS NULL OR a.session_number = $2)
                ORDER BY a.session_number, s.name"#,
        )
        .bind(class_id)
        .bind(session)
        .fetch_all(db)
        .await?;
        Ok(records)
    }

    /// Class-wide stats, optionally for a single session.
    #[instrument(skip(db))]
    pub async fn class_stats(
        db: &PgPool,
        class_id: ClassId,
        session: Option<i32>,
    ) -> Result<AttendanceStats, AppError> {
        ClassService::ensure_exists(db, class_id).await?;

        let counts = sqlx::query_as::<_, AttendanceCounts>(&format!(
            "SELECT {STATUS_COUNTS} FROM attendance a
              WHERE a.class_id = $1 AND ($2::INT IS NULL OR a.session_number = $2)"
        ))
        .bind(class_id)
        .bind(session)
        .fetch_one(db)
        .await?;
        Ok(counts.into())
    }

    /// Stats for every student enrolled in the class or holding records in
    /// it, ordered by name.
    #[instrument(skip(db))]
    pub async fn student_summaries(
        db: &PgPool,
        class_id: ClassId,
    ) -> Result<Vec<StudentAttendanceSummary>, AppError> {
        ClassService::ensure_exists(db, class_id).await?;

        let rows = sqlx::query_as::<_, SummaryRow>(&format!(
            "SELECT s.id AS student_id, s.code AS student_code, s.name AS student_name,
                    {STATUS_COUNTS}
               FROM students s
               LEFT JOIN attendance a ON a.student_id = s.id AND a.class_id = $1
              WHERE s.class_id = $1 OR a.id IS NOT NULL
              GROUP BY s.id, s.code, s.name
              ORDER BY s.name"
        ))
        .bind(class_id)
        .fetch_all(db)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| StudentAttendanceSummary {
                student_id: row.student_id,
                student_code: row.student_code,
                student_name: row.student_name,
                stats: row.counts.into(),
            })
            .collect())
    }

    #[instrument(skip(db))]
    pub async fn student_stats(
        db: &PgPool,
        student_id: StudentId,
        class_id: Option<ClassId>,
    ) -> Result<StudentAttendanceStats, AppError> {
        let student_exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM students WHERE id = $1)")
                .bind(student_id)
                .fetch_one(db)
                .await?;
        if !student_exists {
            return Err(AppError::not_found(anyhow!("Student not found")));
        }

        let counts = sqlx::query_as::<_, AttendanceCounts>(&format!(
            "SELECT {STATUS_COUNTS} FROM attendance a
              WHERE a.student_id = $1 AND ($2::UUID IS NULL OR a.class_id = $2)"
        ))
        .bind(student_id)
        .bind(class_id)
        .fetch_one(db)
        .await?;

        Ok(StudentAttendanceStats {
            student_id,
            class_id,
            stats: counts.into(),
        })
    }

    #[instrument(skip(db))]
    pub async fn delete_attendance(db: &PgPool, id: AttendanceId) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM attendance WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!("Attendance record not found")));
        }
        Ok(())
    }
}
