//! Grade models and DTOs.
//!
//! Grades are unique per (class, student, assignment name). Averages are
//! computed on a 10-point scale by the schedule crate's grade calculator.

use chrono::{DateTime, Utc};
use classflow_core::serde::nullable;
use classflow_schedule::GradeInput;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::ids::{ClassId, GradeId, StudentId};
use crate::value_types::AssignmentType;

pub const DEFAULT_MAX_SCORE: f64 = 10.0;
pub const DEFAULT_WEIGHT: f64 = 1.0;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Grade {
    pub id: GradeId,
    pub class_id: ClassId,
    pub student_id: StudentId,
    pub assignment_name: String,
    pub assignment_type: AssignmentType,
    pub score: f64,
    pub max_score: f64,
    pub weight: f64,
    pub note: Option<String>,
    pub graded_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Grade {
    pub fn as_input(&self) -> GradeInput {
        GradeInput::new(self.score, self.max_score, self.weight)
    }
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct GradeWithStudent {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub grade: Grade,
    pub student_code: String,
    pub student_name: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
pub struct CreateGradeDto {
    pub class_id: ClassId,
    pub student_id: StudentId,
    #[validate(length(min = 1, max = 200))]
    pub assignment_name: String,
    pub assignment_type: Option<AssignmentType>,
    #[validate(range(min = 0.0))]
    pub score: f64,
    /// Defaults to 10
    #[validate(range(exclusive_min = 0.0))]
    pub max_score: Option<f64>,
    /// Defaults to 1
    #[validate(range(min = 0.0))]
    pub weight: Option<f64>,
    #[validate(length(max = 1000))]
    pub note: Option<String>,
    pub graded_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateGradeDto {
    #[validate(length(min = 1, max = 200))]
    pub assignment_name: Option<String>,
    pub assignment_type: Option<AssignmentType>,
    #[validate(range(min = 0.0))]
    pub score: Option<f64>,
    #[validate(range(exclusive_min = 0.0))]
    pub max_score: Option<f64>,
    #[validate(range(min = 0.0))]
    pub weight: Option<f64>,
    #[validate(length(max = 1000))]
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub note: Option<Option<String>>,
    pub graded_at: Option<DateTime<Utc>>,
}

/// Upserts keyed by (class, student, assignment name).
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct BulkGradesDto {
    #[validate(length(min = 1, max = 1000), nested)]
    pub grades: Vec<CreateGradeDto>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BulkGradesResponse {
    pub created: usize,
    pub updated: usize,
    pub total: usize,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StudentAverage {
    pub student_id: StudentId,
    pub student_code: String,
    pub student_name: String,
    pub grade_count: usize,
    /// `null` when the student has no weighted grades
    pub average: Option<f64>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StudentGradesResponse {
    pub student_id: StudentId,
    pub class_id: Option<ClassId>,
    pub grades: Vec<Grade>,
    pub average: Option<f64>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct StudentGradesParams {
    pub class_id: Option<ClassId>,
}
