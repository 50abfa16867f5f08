//! Attendance models and DTOs.
//!
//! Records are keyed by (class, session number, student). Saving a session's
//! roster replaces every record of that (class, session) pair.

use chrono::{DateTime, Utc};
use classflow_schedule::{AttendanceStats, AttendanceStatus};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

use crate::ids::{AttendanceId, ClassId, StudentId};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct AttendanceRecord {
    pub id: AttendanceId,
    pub class_id: ClassId,
    #[sqlx(rename = "session_number")]
    pub session: i32,
    pub student_id: StudentId,
    pub status: AttendanceStatus,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct AttendanceWithStudent {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub record: AttendanceRecord,
    pub student_code: String,
    pub student_name: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
pub struct AttendanceEntryDto {
    pub student_id: StudentId,
    pub status: AttendanceStatus,
    #[validate(length(max = 500))]
    pub note: Option<String>,
}

/// The full roster of one session. An empty `records` list clears it.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SaveAttendanceDto {
    pub class_id: ClassId,
    #[validate(range(min = 1))]
    pub session: i32,
    #[validate(length(max = 1000), nested, custom(function = "unique_students"))]
    pub records: Vec<AttendanceEntryDto>,
}

fn unique_students(records: &[AttendanceEntryDto]) -> Result<(), ValidationError> {
    let mut seen = std::collections::HashSet::new();
    if records.iter().all(|r| seen.insert(r.student_id)) {
        Ok(())
    } else {
        let mut err = ValidationError::new("duplicate_student");
        err.message = Some("Each student may appear only once per session".into());
        Err(err)
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SaveAttendanceResponse {
    pub class_id: ClassId,
    pub session: i32,
    pub saved: usize,
    pub stats: AttendanceStats,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AttendanceQueryParams {
    /// Restrict to one session number
    pub session: Option<i32>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct StudentAttendanceParams {
    /// Restrict to one class
    pub class_id: Option<ClassId>,
}

/// Aggregated counts as returned by `COUNT(*) FILTER (...)` queries.
#[derive(Debug, Clone, Copy, Default, FromRow)]
pub struct AttendanceCounts {
    pub on_time: i64,
    pub late: i64,
    pub excused: i64,
    pub absent: i64,
}

impl From<AttendanceCounts> for AttendanceStats {
    fn from(c: AttendanceCounts) -> Self {
        AttendanceStats::from_counts(c.on_time, c.late, c.excused, c.absent)
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StudentAttendanceSummary {
    pub student_id: StudentId,
    pub student_code: String,
    pub student_name: String,
    pub stats: AttendanceStats,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StudentAttendanceStats {
    pub student_id: StudentId,
    pub class_id: Option<ClassId>,
    pub stats: AttendanceStats,
}
