use anyhow::anyhow;
use classflow_core::{AppError, PaginationMeta, PaginationParams, errors::is_foreign_key_violation};
use classflow_models::StudentId;
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::instrument;

use crate::modules::students::model::{
    CreateStudentDto, PaginatedStudentsResponse, Student, StudentFilterParams, StudentWithClass,
    UpdateStudentDto,
};

const CODE_CONSTRAINT: &str = "students_code_key";

const STUDENT_WITH_CLASS: &str = r#"SELECT s.*, c.code AS class_code, c.name AS class_name
  FROM students s
  LEFT JOIN classes c ON c.id = s.class_id"#;

fn write_error(err: sqlx::Error, code: &str) -> AppError {
    if is_foreign_key_violation(&err) {
        return AppError::bad_request(anyhow!("Class does not exist"));
    }
    AppError::from_unique_violation(
        err,
        CODE_CONSTRAINT,
        &format!("Student with code '{code}' already exists"),
    )
}

fn push_filters(qb: &mut QueryBuilder<'_, Postgres>, filters: &StudentFilterParams) {
    qb.push(" WHERE 1 = 1");
    if let Some(class_id) = filters.class_id {
        qb.push(" AND s.class_id = ").push_bind(class_id);
    }
    if let Some(active) = filters.active {
        qb.push(" AND s.active = ").push_bind(active);
    }
    if let Some(search) = filters.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        let pattern = format!("%{search}%");
        qb.push(" AND (s.code ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR s.name ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR s.email ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
}

pub struct StudentService;

impl StudentService {
    #[instrument(skip(db, dto), fields(code = %dto.code))]
    pub async fn create_student(
        db: &PgPool,
        dto: CreateStudentDto,
    ) -> Result<StudentWithClass, AppError> {
        let student = sqlx::query_as::<_, Student>(
            r#"INSERT INTO students
                 (code, name, email, phone, class_id, parent_name, parent_phone, parent_email,
                  address, date_of_birth, gender)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
               RETURNING *"#,
        )
        .bind(dto.code.trim())
        .bind(dto.name.trim())
        .bind(&dto.email)
        .bind(&dto.phone)
        .bind(dto.class_id)
        .bind(&dto.parent_name)
        .bind(&dto.parent_phone)
        .bind(&dto.parent_email)
        .bind(&dto.address)
        .bind(dto.date_of_birth)
        .bind(&dto.gender)
        .fetch_one(db)
        .await
        .map_err(|e| write_error(e, &dto.code))?;

        tracing::info!(student_id = %student.id, "Student created");
        Self::get_student(db, student.id).await
    }

    #[instrument(skip(db))]
    pub async fn list_students(
        db: &PgPool,
        filters: StudentFilterParams,
        pagination: PaginationParams,
    ) -> Result<PaginatedStudentsResponse, AppError> {
        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM students s");
        push_filters(&mut count, &filters);
        let total = count.build_query_scalar::<i64>().fetch_one(db).await?;

        let mut query = QueryBuilder::<Postgres>::new(STUDENT_WITH_CLASS);
        push_filters(&mut query, &filters);
        query
            .push(" ORDER BY s.name, s.code LIMIT ")
            .push_bind(pagination.limit())
            .push(" OFFSET ")
            .push_bind(pagination.offset());

        let data = query
            .build_query_as::<StudentWithClass>()
            .fetch_all(db)
            .await?;

        Ok(PaginatedStudentsResponse {
            data,
            meta: PaginationMeta::new(total, &pagination),
        })
    }

    #[instrument(skip(db))]
    pub async fn get_student(db: &PgPool, id: StudentId) -> Result<StudentWithClass, AppError> {
        sqlx::query_as::<_, StudentWithClass>(&format!("{STUDENT_WITH_CLASS} WHERE s.id = $1"))
            .bind(id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!("Student not found")))
    }

    #[instrument(skip(db, dto))]
    pub async fn update_student(
        db: &PgPool,
        id: StudentId,
        dto: UpdateStudentDto,
    ) -> Result<StudentWithClass, AppError> {
        let existing = Self::get_student(db, id).await?.student;
        let code = dto.code.map(|c| c.trim().to_string()).unwrap_or(existing.code);

        sqlx::query(
            r#"UPDATE students
               SET code = $1, name = $2, email = $3, phone = $4, class_id = $5,
                   parent_name = $6, parent_phone = $7, parent_email = $8, address = $9,
                   date_of_birth = $10, gender = $11, active = $12, updated_at = NOW()
               WHERE id = $13"#,
        )
        .bind(&code)
        .bind(dto.name.map(|n| n.trim().to_string()).unwrap_or(existing.name))
        .bind(dto.email.unwrap_or(existing.email))
        .bind(dto.phone.unwrap_or(existing.phone))
        .bind(dto.class_id.unwrap_or(existing.class_id))
        .bind(dto.parent_name.unwrap_or(existing.parent_name))
        .bind(dto.parent_phone.unwrap_or(existing.parent_phone))
        .bind(dto.parent_email.unwrap_or(existing.parent_email))
        .bind(dto.address.unwrap_or(existing.address))
        .bind(dto.date_of_birth.unwrap_or(existing.date_of_birth))
        .bind(dto.gender.unwrap_or(existing.gender))
        .bind(dto.active.unwrap_or(existing.active))
        .bind(id)
        .execute(db)
        .await
        .map_err(|e| write_error(e, &code))?;

        Self::get_student(db, id).await
    }

    #[instrument(skip(db))]
    pub async fn delete_student(db: &PgPool, id: StudentId) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM students WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!("Student not found")));
        }
        Ok(())
    }
}
