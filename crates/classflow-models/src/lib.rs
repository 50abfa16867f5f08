//! # ClassFlow Models
//!
//! Database entities, request/response DTOs and query parameters for the
//! ClassFlow API.
//!
//! - [`ids`]: typed UUID identifiers
//! - [`value_types`]: `TEXT`-backed enumerations
//! - [`classes`], [`sessions`]: classes and their session schedules
//! - [`holidays`]: the global holiday calendar
//! - [`attendance`], [`grades`], [`comments`]: per-student class records
//! - [`students`], [`teachers`], [`managers`]: people
//! - [`dashboard`]: aggregate overview

pub mod attendance;
pub mod classes;
pub mod comments;
pub mod dashboard;
pub mod grades;
pub mod holidays;
pub mod ids;
pub mod managers;
pub mod sessions;
pub mod students;
pub mod teachers;
pub mod value_types;

pub use ids::{
    AttendanceId, ClassId, CommentId, GradeId, HolidayId, ManagerId, SessionId, StudentId,
    TeacherId,
};
pub use value_types::{AssignmentType, ClassStatus, UnknownVariant};
