use anyhow::anyhow;
use classflow_core::{AppError, PaginationMeta, PaginationParams, errors::is_foreign_key_violation};
use classflow_models::{ClassId, ManagerId};
use classflow_models::classes::DEFAULT_COLOR;
use classflow_schedule::{
    ClassSchedule, DEFAULT_SESSION_COUNT, DEFAULT_WEEKDAY, HolidayCalendar, parse_date,
};
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::instrument;

use crate::metrics::{track_class_created, track_sessions_generated};
use crate::modules::classes::model::{
    Class, ClassDetail, ClassFilterParams, ClassWithStats, CreateClassDto,
    PaginatedClassesResponse, SchedulePreviewDto, SchedulePreviewResponse, UpdateClassDto,
};
use crate::modules::holidays::service::HolidayService;
use crate::modules::sessions::model::Session;
use crate::modules::sessions::service::SessionService;

const CODE_CONSTRAINT: &str = "classes_code_key";

const CLASS_WITH_STATS: &str = r#"SELECT c.*,
       t.name AS teacher_name,
       m.name AS manager_name,
       (SELECT COUNT(*) FROM students s WHERE s.class_id = c.id) AS student_count
  FROM classes c
  LEFT JOIN teachers t ON t.id = c.teacher_id
  LEFT JOIN managers m ON m.id = c.manager_id"#;

/// Maps insert/update failures: duplicate code is a 409, an unknown
/// teacher or manager a 400.
fn write_error(err: sqlx::Error, code: &str) -> AppError {
    if is_foreign_key_violation(&err) {
        return AppError::bad_request(anyhow!("Teacher or manager does not exist"));
    }
    AppError::from_unique_violation(
        err,
        CODE_CONSTRAINT,
        &format!("Class with code '{code}' already exists"),
    )
}

fn push_filters(qb: &mut QueryBuilder<'_, Postgres>, filters: &ClassFilterParams) {
    qb.push(" WHERE 1 = 1");
    if let Some(status) = filters.status {
        qb.push(" AND c.status = ").push_bind(status);
    }
    if let Some(teacher_id) = filters.teacher_id {
        qb.push(" AND c.teacher_id = ").push_bind(teacher_id);
    }
    if let Some(manager_id) = filters.manager_id {
        qb.push(" AND c.manager_id = ").push_bind(manager_id);
    }
    if let Some(search) = filters.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        let pattern = format!("%{search}%");
        qb.push(" AND (c.code ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR c.name ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
}

pub struct ClassService;

impl ClassService {
    pub async fn ensure_exists(db: &PgPool, id: ClassId) -> Result<(), AppError> {
        let exists = sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM classes WHERE id = $1)")
            .bind(id)
            .fetch_one(db)
            .await?;

        if exists {
            Ok(())
        } else {
            Err(AppError::not_found(anyhow!("Class not found")))
        }
    }

    async fn find_class(db: &PgPool, id: ClassId) -> Result<Class, AppError> {
        sqlx::query_as::<_, Class>("SELECT * FROM classes WHERE id = $1")
            .bind(id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!("Class not found")))
    }

    /// Creates the class and its generated schedule in one transaction.
    /// Stored holidays cancel the sessions they coincide with.
    #[instrument(skip(db, dto), fields(code = %dto.code))]
    pub async fn create_class(db: &PgPool, dto: CreateClassDto) -> Result<ClassDetail, AppError> {
        let start_date = parse_date(&dto.start_date).map_err(AppError::bad_request)?;
        let week_day = dto.week_day.unwrap_or(DEFAULT_WEEKDAY);
        let total_sessions = dto.total_sessions.unwrap_or(DEFAULT_SESSION_COUNT);

        let holidays = HolidayService::load_calendar(db).await?;
        let schedule = ClassSchedule::generate(start_date, week_day, total_sessions, &holidays)
            .map_err(AppError::bad_request)?;

        let mut tx = db.begin().await?;

        let class = sqlx::query_as::<_, Class>(
            r#"INSERT INTO classes
                 (code, name, teacher_id, manager_id, start_date, week_day, time_slot, color,
                  total_sessions, status)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
               RETURNING *"#,
        )
        .bind(dto.code.trim())
        .bind(dto.name.trim())
        .bind(dto.teacher_id)
        .bind(dto.manager_id)
        .bind(start_date)
        .bind(week_day)
        .bind(&dto.time_slot)
        .bind(dto.color.as_deref().unwrap_or(DEFAULT_COLOR))
        .bind(total_sessions)
        .bind(dto.status.unwrap_or_default())
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| write_error(e, &dto.code))?;

        SessionService::replace_in_tx(&mut *tx, class.id, schedule.sessions()).await?;
        tx.commit().await?;

        track_class_created();
        track_sessions_generated(schedule.sessions());
        tracing::info!(
            class_id = %class.id,
            sessions = schedule.len(),
            cancelled = schedule.cancelled_count(),
            "Class created"
        );

        Self::get_class(db, class.id).await
    }

    #[instrument(skip(db))]
    pub async fn list_classes(
        db: &PgPool,
        filters: ClassFilterParams,
        pagination: PaginationParams,
    ) -> Result<PaginatedClassesResponse, AppError> {
        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM classes c");
        push_filters(&mut count, &filters);
        let total = count.build_query_scalar::<i64>().fetch_one(db).await?;

        let mut query = QueryBuilder::<Postgres>::new(CLASS_WITH_STATS);
        push_filters(&mut query, &filters);
        query
            .push(" ORDER BY c.created_at DESC, c.code LIMIT ")
            .push_bind(pagination.limit())
            .push(" OFFSET ")
            .push_bind(pagination.offset());

        let data = query
            .build_query_as::<ClassWithStats>()
            .fetch_all(db)
            .await?;

        Ok(PaginatedClassesResponse {
            data,
            meta: PaginationMeta::new(total, &pagination),
        })
    }

    #[instrument(skip(db))]
    pub async fn get_class(db: &PgPool, id: ClassId) -> Result<ClassDetail, AppError> {
        let class = sqlx::query_as::<_, ClassWithStats>(&format!("{CLASS_WITH_STATS} WHERE c.id = $1"))
            .bind(id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!("Class not found")))?;

        let sessions = sqlx::query_as::<_, Session>(
            "SELECT * FROM sessions WHERE class_id = $1 ORDER BY session_number",
        )
        .bind(id)
        .fetch_all(db)
        .await?;

        Ok(ClassDetail { class, sessions })
    }

    /// Every class supervised by `manager_id`, newest first.
    pub async fn classes_for_manager(
        db: &PgPool,
        manager_id: ManagerId,
    ) -> Result<Vec<ClassWithStats>, AppError> {
        let classes = sqlx::query_as::<_, ClassWithStats>(&format!(
            "{CLASS_WITH_STATS} WHERE c.manager_id = $1 ORDER BY c.created_at DESC, c.code"
        ))
        .bind(manager_id)
        .fetch_all(db)
        .await?;
        Ok(classes)
    }

    /// Partial update. When the merged start date, weekday or session count
    /// differs from the stored one, the schedule is regenerated in the same
    /// transaction and manual session edits are lost.
    #[instrument(skip(db, dto))]
    pub async fn update_class(
        db: &PgPool,
        id: ClassId,
        dto: UpdateClassDto,
    ) -> Result<ClassDetail, AppError> {
        let existing = Self::find_class(db, id).await?;

        let start_date = match dto.start_date.as_deref() {
            Some(raw) => parse_date(raw).map_err(AppError::bad_request)?,
            None => existing.start_date,
        };
        let week_day = dto.week_day.unwrap_or(existing.week_day);
        let total_sessions = dto.total_sessions.unwrap_or(existing.total_sessions);

        let reschedule = dto.touches_schedule()
            && (start_date != existing.start_date
                || week_day != existing.week_day
                || total_sessions != existing.total_sessions);

        let schedule = if reschedule {
            let holidays = HolidayService::load_calendar(db).await?;
            Some(
                ClassSchedule::generate(start_date, week_day, total_sessions, &holidays)
                    .map_err(AppError::bad_request)?,
            )
        } else {
            None
        };

        let code = dto.code.map(|c| c.trim().to_string()).unwrap_or(existing.code);
        let name = dto.name.map(|n| n.trim().to_string()).unwrap_or(existing.name);

        let mut tx = db.begin().await?;

        sqlx::query(
            r#"UPDATE classes
               SET code = $1, name = $2, teacher_id = $3, manager_id = $4, start_date = $5,
                   week_day = $6, time_slot = $7, color = $8, total_sessions = $9,
                   status = $10, updated_at = NOW()
               WHERE id = $11"#,
        )
        .bind(&code)
        .bind(name)
        .bind(dto.teacher_id.unwrap_or(existing.teacher_id))
        .bind(dto.manager_id.unwrap_or(existing.manager_id))
        .bind(start_date)
        .bind(week_day)
        .bind(dto.time_slot.unwrap_or(existing.time_slot))
        .bind(dto.color.unwrap_or(existing.color))
        .bind(total_sessions)
        .bind(dto.status.unwrap_or(existing.status))
        .bind(id)
        .execute(&mut *tx)
        .await
        .map_err(|e| write_error(e, &code))?;

        if let Some(schedule) = &schedule {
            SessionService::replace_in_tx(&mut *tx, id, schedule.sessions()).await?;
        }
        tx.commit().await?;

        if let Some(schedule) = &schedule {
            track_sessions_generated(schedule.sessions());
            tracing::info!(class_id = %id, sessions = schedule.len(), "Class rescheduled");
        }

        Self::get_class(db, id).await
    }

    #[instrument(skip(db))]
    pub async fn delete_class(db: &PgPool, id: ClassId) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM classes WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!("Class not found")));
        }
        tracing::info!(class_id = %id, "Class deleted");
        Ok(())
    }

    /// Discards the current sessions and rebuilds them from the class's
    /// stored schedule fields and the current holiday table.
    #[instrument(skip(db))]
    pub async fn regenerate_sessions(db: &PgPool, id: ClassId) -> Result<Vec<Session>, AppError> {
        let class = Self::find_class(db, id).await?;

        let mut tx = db.begin().await?;
        let holidays = HolidayService::load_calendar(&mut *tx).await?;
        let schedule = ClassSchedule::generate(
            class.start_date,
            class.week_day,
            class.total_sessions,
            &holidays,
        )
        .map_err(AppError::bad_request)?;

        let sessions = SessionService::replace_in_tx(&mut *tx, id, schedule.sessions()).await?;
        sqlx::query("UPDATE classes SET updated_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        track_sessions_generated(schedule.sessions());
        tracing::info!(class_id = %id, sessions = sessions.len(), "Sessions regenerated");
        Ok(sessions)
    }

    /// Runs the generator without touching any class.
    #[instrument(skip(db, dto))]
    pub async fn preview_schedule(
        db: &PgPool,
        dto: SchedulePreviewDto,
    ) -> Result<SchedulePreviewResponse, AppError> {
        let start_date = parse_date(&dto.request.start_date).map_err(AppError::bad_request)?;
        let mut holidays =
            HolidayCalendar::parse(&dto.request.holidays).map_err(AppError::bad_request)?;
        if dto.include_stored_holidays {
            holidays.extend(HolidayService::load_calendar(db).await?.iter().copied());
        }

        let schedule = ClassSchedule::generate(
            start_date,
            dto.request.weekday,
            dto.request.session_count,
            &holidays,
        )
        .map_err(AppError::bad_request)?;

        Ok(SchedulePreviewResponse::new(schedule.into_sessions()))
    }
}
