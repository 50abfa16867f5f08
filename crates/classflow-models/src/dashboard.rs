use chrono::NaiveDate;
use classflow_schedule::{AttendanceStats, SessionStatus};
use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::ids::ClassId;

#[derive(Debug, Clone, Default, Serialize, FromRow, ToSchema)]
pub struct EntityCounts {
    pub classes: i64,
    pub active_classes: i64,
    pub students: i64,
    pub teachers: i64,
    pub managers: i64,
    pub upcoming_holidays: i64,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct UpcomingSession {
    pub class_id: ClassId,
    pub class_code: String,
    pub class_name: String,
    pub time_slot: Option<String>,
    pub session_number: i32,
    pub date: NaiveDate,
    pub status: SessionStatus,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DashboardResponse {
    pub counts: EntityCounts,
    /// Attendance recorded for sessions held in the last 7 days
    pub recent_attendance: AttendanceStats,
    pub upcoming_sessions: Vec<UpcomingSession>,
}
