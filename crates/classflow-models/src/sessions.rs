use chrono::{DateTime, NaiveDate, Utc};
use classflow_core::serde::nullable;
use classflow_schedule::{MAX_SESSION_COUNT, ScheduledSession, SessionStatus};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::ids::{ClassId, SessionId};

const MAX_SESSIONS: u64 = MAX_SESSION_COUNT as u64;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Session {
    pub id: SessionId,
    pub class_id: ClassId,
    pub session_number: i32,
    pub date: NaiveDate,
    pub status: SessionStatus,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Session> for ScheduledSession {
    fn from(session: &Session) -> Self {
        ScheduledSession {
            number: session.session_number,
            date: session.date,
            status: session.status,
            note: session.note.clone(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
pub struct SessionInputDto {
    #[validate(range(min = 1))]
    pub number: i32,
    pub date: NaiveDate,
    pub status: Option<SessionStatus>,
    #[validate(length(max = 500))]
    pub note: Option<String>,
}

impl From<SessionInputDto> for ScheduledSession {
    fn from(dto: SessionInputDto) -> Self {
        ScheduledSession {
            number: dto.number,
            date: dto.date,
            status: dto.status.unwrap_or_default(),
            note: dto.note,
        }
    }
}

/// Replaces a class's sessions wholesale. Numbers must form `1..=N`.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ReplaceSessionsDto {
    #[validate(length(min = 1, max = MAX_SESSIONS), nested)]
    pub sessions: Vec<SessionInputDto>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateSessionDto {
    pub date: Option<NaiveDate>,
    pub status: Option<SessionStatus>,
    #[validate(length(max = 500))]
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub note: Option<Option<String>>,
}
