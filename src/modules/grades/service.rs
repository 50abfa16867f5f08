use std::collections::HashMap;

use anyhow::anyhow;
use chrono::Utc;
use classflow_core::{AppError, errors::is_foreign_key_violation};
use classflow_models::grades::{DEFAULT_MAX_SCORE, DEFAULT_WEIGHT};
use classflow_models::{ClassId, GradeId, StudentId};
use classflow_schedule::{GradeInput, compute_weighted_average, rank_by_average};
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use tracing::instrument;

use crate::metrics::track_grades_saved;
use crate::modules::classes::service::ClassService;
use crate::modules::grades::model::{
    BulkGradesDto, BulkGradesResponse, CreateGradeDto, Grade, GradeWithStudent, StudentAverage,
    StudentGradesResponse, UpdateGradeDto,
};

const ASSIGNMENT_CONSTRAINT: &str = "grades_class_student_assignment_key";

fn write_error(err: sqlx::Error) -> AppError {
    if is_foreign_key_violation(&err) {
        return AppError::bad_request(anyhow!("Class or student does not exist"));
    }
    AppError::from_unique_violation(
        err,
        ASSIGNMENT_CONSTRAINT,
        "This student already has a grade for that assignment",
    )
}

#[derive(FromRow)]
struct StudentRef {
    id: StudentId,
    code: String,
    name: String,
}

/// Keeps the last grade for each (class, student, assignment), in first-seen
/// order. One upsert statement cannot touch the same row twice.
fn dedupe_grades(grades: Vec<CreateGradeDto>) -> Vec<CreateGradeDto> {
    let mut positions: HashMap<(ClassId, StudentId, String), usize> = HashMap::new();
    let mut unique: Vec<CreateGradeDto> = Vec::with_capacity(grades.len());

    for mut grade in grades {
        grade.assignment_name = grade.assignment_name.trim().to_string();
        let key = (grade.class_id, grade.student_id, grade.assignment_name.clone());
        match positions.get(&key) {
            Some(&index) => unique[index] = grade,
            None => {
                positions.insert(key, unique.len());
                unique.push(grade);
            }
        }
    }
    unique
}

pub struct GradeService;

impl GradeService {
    #[instrument(skip(db))]
    pub async fn get_grade(db: &PgPool, id: GradeId) -> Result<Grade, AppError> {
        sqlx::query_as::<_, Grade>("SELECT * FROM grades WHERE id = $1")
            .bind(id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!("Grade not found")))
    }

    #[instrument(skip(db, dto), fields(class_id = %dto.class_id, student_id = %dto.student_id))]
    pub async fn create_grade(db: &PgPool, dto: CreateGradeDto) -> Result<Grade, AppError> {
        let grade = sqlx::query_as::<_, Grade>(
            r#"INSERT INTO grades
                 (class_id, student_id, assignment_name, assignment_type, score, max_score,
                  weight, note, graded_at)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
               RETURNING *"#,
        )
        .bind(dto.class_id)
        .bind(dto.student_id)
        .bind(dto.assignment_name.trim())
        .bind(dto.assignment_type.unwrap_or_default())
        .bind(dto.score)
        .bind(dto.max_score.unwrap_or(DEFAULT_MAX_SCORE))
        .bind(dto.weight.unwrap_or(DEFAULT_WEIGHT))
        .bind(&dto.note)
        .bind(dto.graded_at.unwrap_or_else(Utc::now))
        .fetch_one(db)
        .await
        .map_err(write_error)?;

        track_grades_saved(1);
        Ok(grade)
    }

    /// Upserts by (class, student, assignment name). Repeated keys within
    /// the request collapse to their last occurrence.
    #[instrument(skip(db, dto), fields(count = dto.grades.len()))]
    pub async fn bulk_upsert_grades(
        db: &PgPool,
        dto: BulkGradesDto,
    ) -> Result<BulkGradesResponse, AppError> {
        let grades = dedupe_grades(dto.grades);
        let now = Utc::now();

        let mut qb = QueryBuilder::<Postgres>::new(
            "INSERT INTO grades (class_id, student_id, assignment_name, assignment_type, score, \
             max_score, weight, note, graded_at) ",
        );
        qb.push_values(grades, |mut row, grade| {
            row.push_bind(grade.class_id)
                .push_bind(grade.student_id)
                .push_bind(grade.assignment_name)
                .push_bind(grade.assignment_type.unwrap_or_default())
                .push_bind(grade.score)
                .push_bind(grade.max_score.unwrap_or(DEFAULT_MAX_SCORE))
                .push_bind(grade.weight.unwrap_or(DEFAULT_WEIGHT))
                .push_bind(grade.note)
                .push_bind(grade.graded_at.unwrap_or(now));
        });
        qb.push(format!(
            " ON CONFLICT ON CONSTRAINT {ASSIGNMENT_CONSTRAINT} DO UPDATE SET \
               assignment_type = EXCLUDED.assignment_type, \
               score = EXCLUDED.score, \
               max_score = EXCLUDED.max_score, \
               weight = EXCLUDED.weight, \
               note = EXCLUDED.note, \
               graded_at = EXCLUDED.graded_at, \
               updated_at = NOW() \
             RETURNING (xmax = 0) AS inserted"
        ));

        let inserted = qb
            .build_query_scalar::<bool>()
            .fetch_all(db)
            .await
            .map_err(write_error)?;

        let created = inserted.iter().filter(|&&fresh| fresh).count();
        let total = inserted.len();
        track_grades_saved(total);

        Ok(BulkGradesResponse {
            created,
            updated: total - created,
            total,
        })
    }

    #[instrument(skip(db))]
    pub async fn update_grade(
        db: &PgPool,
        id: GradeId,
        dto: UpdateGradeDto,
    ) -> Result<Grade, AppError> {
        let existing = Self::get_grade(db, id).await?;

        let grade = sqlx::query_as::<_, Grade>(
            r#"UPDATE grades
               SET assignment_name = $1, assignment_type = $2, score = $3, max_score = $4,
                   weight = $5, note = $6, graded_at = $7, updated_at = NOW()
               WHERE id = $8
               RETURNING *"#,
        )
        .bind(
            dto.assignment_name
                .map(|n| n.trim().to_string())
                .unwrap_or(existing.assignment_name),
        )
        .bind(dto.assignment_type.unwrap_or(existing.assignment_type))
        .bind(dto.score.unwrap_or(existing.score))
        .bind(dto.max_score.unwrap_or(existing.max_score))
        .bind(dto.weight.unwrap_or(existing.weight))
        .bind(dto.note.unwrap_or(existing.note))
        .bind(dto.graded_at.unwrap_or(existing.graded_at))
        .bind(id)
        .fetch_one(db)
        .await
        .map_err(write_error)?;

        Ok(grade)
    }

    #[instrument(skip(db))]
    pub async fn delete_grade(db: &PgPool, id: GradeId) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM grades WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!("Grade not found")));
        }
        Ok(())
    }

    #[instrument(skip(db))]
    pub async fn class_grades(
        db: &PgPool,
        class_id: ClassId,
    ) -> Result<Vec<GradeWithStudent>, AppError> {
        ClassService::ensure_exists(db, class_id).await?;

        let grades = sqlx::query_as::<_, GradeWithStudent>(
            r#"SELECT g.*, s.code AS student_code, s.name AS student_name
                 FROM grades g
                 JOIN students s ON s.id = g.student_id
                WHERE g.class_id = $1
                ORDER BY s.name, g.graded_at, g.assignment_name"#,
        )
        .bind(class_id)
        .fetch_all(db)
        .await?;
        Ok(grades)
    }

    /// Weighted average per student of the class, best first. Enrolled
    /// students without usable grades are listed last with `average: null`.
    #[instrument(skip(db))]
    pub async fn class_averages(
        db: &PgPool,
        class_id: ClassId,
    ) -> Result<Vec<StudentAverage>, AppError> {
        let grades = Self::class_grades(db, class_id).await?;

        let students = sqlx::query_as::<_, StudentRef>(
            r#"SELECT id, code, name FROM students
                WHERE class_id = $1
                   OR id IN (SELECT student_id FROM grades WHERE class_id = $1)
                ORDER BY name"#,
        )
        .bind(class_id)
        .fetch_all(db)
        .await?;

        let mut by_student: HashMap<StudentId, Vec<GradeInput>> = HashMap::new();
        for entry in &grades {
            by_student
                .entry(entry.grade.student_id)
                .or_default()
                .push(entry.grade.as_input());
        }

        let mut ranked: Vec<(StudentAverage, Option<f64>)> = students
            .into_iter()
            .map(|student| {
                let inputs = by_student.remove(&student.id).unwrap_or_default();
                let average = compute_weighted_average(&inputs);
                let summary = StudentAverage {
                    student_id: student.id,
                    student_code: student.code,
                    student_name: student.name,
                    grade_count: inputs.len(),
                    average,
                };
                (summary, average)
            })
            .collect();

        rank_by_average(&mut ranked);
        Ok(ranked.into_iter().map(|(summary, _)| summary).collect())
    }

    #[instrument(skip(db))]
    pub async fn student_grades(
        db: &PgPool,
        student_id: StudentId,
        class_id: Option<ClassId>,
    ) -> Result<StudentGradesResponse, AppError> {
        let student_exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM students WHERE id = $1)")
                .bind(student_id)
                .fetch_one(db)
                .await?;
        if !student_exists {
            return Err(AppError::not_found(anyhow!("Student not found")));
        }

        let grades = sqlx::query_as::<_, Grade>(
            r#"SELECT * FROM grades
                WHERE student_id = $1 AND ($2::UUID IS NULL OR class_id = $2)
                ORDER BY graded_at, assignment_name"#,
        )
        .bind(student_id)
        .bind(class_id)
        .fetch_all(db)
        .await?;

        let inputs: Vec<GradeInput> = grades.iter().map(Grade::as_input).collect();
        let average = compute_weighted_average(&inputs);

        Ok(StudentGradesResponse {
            student_id,
            class_id,
            grades,
            average,
        })
    }
}
