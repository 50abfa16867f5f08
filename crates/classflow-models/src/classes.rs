//! Class models and DTOs.
//!
//! A class owns its session schedule. The schedule inputs (`start_date`,
//! `week_day`, `total_sessions`) are taken as raw values here and checked by
//! the schedule generator, so bad input surfaces as a `400` with the
//! generator's message.

use chrono::{DateTime, NaiveDate, Utc};
use classflow_core::{PaginationMeta, serde::nullable};
use classflow_schedule::{ScheduleRequest, ScheduledSession};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::ids::{ClassId, ManagerId, TeacherId};
use crate::sessions::Session;
use crate::value_types::ClassStatus;

pub const DEFAULT_COLOR: &str = "green";

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Class {
    pub id: ClassId,
    pub code: String,
    pub name: String,
    pub teacher_id: Option<TeacherId>,
    pub manager_id: Option<ManagerId>,
    pub start_date: NaiveDate,
    /// 0 = Sunday ... 6 = Saturday
    pub week_day: i32,
    pub time_slot: Option<String>,
    pub color: String,
    pub total_sessions: i32,
    pub status: ClassStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct ClassWithStats {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub class: Class,
    pub teacher_name: Option<String>,
    pub manager_name: Option<String>,
    pub student_count: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ClassDetail {
    #[serde(flatten)]
    pub class: ClassWithStats,
    pub sessions: Vec<Session>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateClassDto {
    #[validate(length(min = 1, max = 50))]
    pub code: String,
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    pub teacher_id: Option<TeacherId>,
    pub manager_id: Option<ManagerId>,
    /// ISO date (`YYYY-MM-DD`)
    #[schema(example = "2024-01-01")]
    pub start_date: String,
    /// Defaults to 1 (Monday)
    pub week_day: Option<i32>,
    #[validate(length(max = 50))]
    pub time_slot: Option<String>,
    #[validate(length(min = 1, max = 30))]
    pub color: Option<String>,
    /// Defaults to 15
    pub total_sessions: Option<i32>,
    pub status: Option<ClassStatus>,
}

/// Partial update. A missing key keeps the stored value and `null` clears an
/// optional one. Changing `start_date`, `week_day` or `total_sessions`
/// regenerates every session of the class.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateClassDto {
    #[validate(length(min = 1, max = 50))]
    pub code: Option<String>,
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>, format = "uuid")]
    pub teacher_id: Option<Option<TeacherId>>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>, format = "uuid")]
    pub manager_id: Option<Option<ManagerId>>,
    pub start_date: Option<String>,
    pub week_day: Option<i32>,
    #[validate(length(max = 50))]
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub time_slot: Option<Option<String>>,
    #[validate(length(min = 1, max = 30))]
    pub color: Option<String>,
    pub total_sessions: Option<i32>,
    pub status: Option<ClassStatus>,
}

impl UpdateClassDto {
    pub fn touches_schedule(&self) -> bool {
        self.start_date.is_some() || self.week_day.is_some() || self.total_sessions.is_some()
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ClassFilterParams {
    pub status: Option<ClassStatus>,
    pub teacher_id: Option<TeacherId>,
    pub manager_id: Option<ManagerId>,
    /// Case-insensitive match on code or name
    pub search: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedClassesResponse {
    pub data: Vec<ClassWithStats>,
    pub meta: PaginationMeta,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SchedulePreviewDto {
    #[serde(flatten)]
    pub request: ScheduleRequest,
    /// Also cancel sessions that fall on stored holidays
    #[serde(default)]
    pub include_stored_holidays: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SchedulePreviewResponse {
    pub sessions: Vec<ScheduledSession>,
    pub total: usize,
    pub cancelled: usize,
}

impl SchedulePreviewResponse {
    pub fn new(sessions: Vec<ScheduledSession>) -> Self {
        let cancelled = sessions
            .iter()
            .filter(|s| s.status == classflow_schedule::SessionStatus::Cancelled)
            .count();
        Self {
            total: sessions.len(),
            cancelled,
            sessions,
        }
    }
}
