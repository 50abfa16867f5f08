use anyhow::anyhow;
use classflow_core::AppError;
use classflow_models::TeacherId;
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::instrument;

use crate::modules::teachers::model::{
    CreateTeacherDto, Teacher, TeacherFilterParams, TeacherWithStats, UpdateTeacherDto,
};

const CODE_CONSTRAINT: &str = "teachers_code_key";

const TEACHER_WITH_STATS: &str = r#"SELECT t.*,
       (SELECT COUNT(*) FROM classes c WHERE c.teacher_id = t.id) AS class_count
  FROM teachers t"#;

fn duplicate_code(err: sqlx::Error, code: &str) -> AppError {
    AppError::from_unique_violation(
        err,
        CODE_CONSTRAINT,
        &format!("Teacher with code '{code}' already exists"),
    )
}

pub struct TeacherService;

impl TeacherService {
    #[instrument(skip(db, dto), fields(code = %dto.code))]
    pub async fn create_teacher(
        db: &PgPool,
        dto: CreateTeacherDto,
    ) -> Result<TeacherWithStats, AppError> {
        let teacher = sqlx::query_as::<_, Teacher>(
            r#"INSERT INTO teachers (code, name, email, phone, subject)
               VALUES ($1, $2, $3, $4, $5)
               RETURNING *"#,
        )
        .bind(dto.code.trim())
        .bind(dto.name.trim())
        .bind(&dto.email)
        .bind(&dto.phone)
        .bind(&dto.subject)
        .fetch_one(db)
        .await
        .map_err(|e| duplicate_code(e, &dto.code))?;

        Ok(TeacherWithStats {
            teacher,
            class_count: 0,
        })
    }

    #[instrument(skip(db))]
    pub async fn list_teachers(
        db: &PgPool,
        filters: TeacherFilterParams,
    ) -> Result<Vec<TeacherWithStats>, AppError> {
        let mut qb = QueryBuilder::<Postgres>::new(TEACHER_WITH_STATS);
        qb.push(" WHERE 1 = 1");
        if let Some(active) = filters.active {
            qb.push(" AND t.active = ").push_bind(active);
        }
        if let Some(search) = filters.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            let pattern = format!("%{search}%");
            qb.push(" AND (t.code ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR t.name ILIKE ")
                .push_bind(pattern)
                .push(")");
        }
        qb.push(" ORDER BY t.name");

        let teachers = qb
            .build_query_as::<TeacherWithStats>()
            .fetch_all(db)
            .await?;
        Ok(teachers)
    }

    #[instrument(skip(db))]
    pub async fn get_teacher(db: &PgPool, id: TeacherId) -> Result<TeacherWithStats, AppError> {
        sqlx::query_as::<_, TeacherWithStats>(&format!("{TEACHER_WITH_STATS} WHERE t.id = $1"))
            .bind(id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!("Teacher not found")))
    }

    #[instrument(skip(db, dto))]
    pub async fn update_teacher(
        db: &PgPool,
        id: TeacherId,
        dto: UpdateTeacherDto,
    ) -> Result<TeacherWithStats, AppError> {
        let existing = Self::get_teacher(db, id).await?;
        let current = existing.teacher;
        let code = dto.code.map(|c| c.trim().to_string()).unwrap_or(current.code);

        let teacher = sqlx::query_as::<_, Teacher>(
            r#"UPDATE teachers
               SET code = $1, name = $2, email = $3, phone = $4, subject = $5, active = $6,
                   updated_at = NOW()
               WHERE id = $7
               RETURNING *"#,
        )
        .bind(&code)
        .bind(dto.name.map(|n| n.trim().to_string()).unwrap_or(current.name))
        .bind(dto.email.unwrap_or(current.email))
        .bind(dto.phone.unwrap_or(current.phone))
        .bind(dto.subject.unwrap_or(current.subject))
        .bind(dto.active.unwrap_or(current.active))
        .bind(id)
        .fetch_one(db)
        .await
        .map_err(|e| duplicate_code(e, &code))?;

        Ok(TeacherWithStats {
            teacher,
            class_count: existing.class_count,
        })
    }

    /// Classes taught by the teacher keep existing with no teacher assigned.
    #[instrument(skip(db))]
    pub async fn delete_teacher(db: &PgPool, id: TeacherId) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM teachers WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!("Teacher not found")));
        }
        Ok(())
    }
}
