use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::ids::{ClassId, CommentId, StudentId};

/// Teacher's comment on one student's progress in a class.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Comment {
    pub id: CommentId,
    pub class_id: ClassId,
    pub student_id: StudentId,
    pub comment: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct CommentWithStudent {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub comment: Comment,
    pub student_code: String,
    pub student_name: String,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CommentEntryDto {
    pub student_id: StudentId,
    #[validate(length(max = 2000))]
    pub comment: String,
}

/// Replaces every comment of a class. Blank comments are dropped.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ReplaceCommentsDto {
    #[validate(nested)]
    pub comments: Vec<CommentEntryDto>,
}

impl ReplaceCommentsDto {
    /// Entries with non-blank text, trimmed. A later entry for the same
    /// student wins.
    pub fn effective_entries(&self) -> Vec<(StudentId, String)> {
        let mut entries: Vec<(StudentId, String)> = Vec::new();
        for entry in &self.comments {
            let text = entry.comment.trim();
            entries.retain(|(id, _)| *id != entry.student_id);
            if !text.is_empty() {
                entries.push((entry.student_id, text.to_string()));
            }
        }
        entries
    }
}

/// A blank comment deletes the student's comment.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpsertCommentDto {
    #[validate(length(max = 2000))]
    pub comment: String,
}
