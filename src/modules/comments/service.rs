use anyhow::anyhow;
use classflow_core::{AppError, errors::is_foreign_key_violation};
use classflow_models::{ClassId, StudentId};
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::instrument;

use crate::modules::classes::service::ClassService;
use crate::modules::comments::model::{
    Comment, CommentWithStudent, ReplaceCommentsDto, UpsertCommentDto,
};

fn unknown_student(err: sqlx::Error) -> AppError {
    if is_foreign_key_violation(&err) {
        AppError::bad_request(anyhow!("One or more students do not exist"))
    } else {
        AppError::internal(err)
    }
}

pub struct CommentService;

impl CommentService {
    #[instrument(skip(db))]
    pub async fn list_comments(
        db: &PgPool,
        class_id: ClassId,
    ) -> Result<Vec<CommentWithStudent>, AppError> {
        ClassService::ensure_exists(db, class_id).await?;

        let comments = sqlx::query_as::<_, CommentWithStudent>(
            r#"SELECT cm.*, s.code AS student_code, s.name AS student_name
                 FROM comments cm
                 JOIN students s ON s.id = cm.student_id
                WHERE cm.class_id = $1
                ORDER BY s.name"#,
        )
        .bind(class_id)
        .fetch_all(db)
        .await?;
        Ok(comments)
    }

    /// Drops every comment of the class and stores the non-blank entries.
    #[instrument(skip(db, dto), fields(count = dto.comments.len()))]
    pub async fn replace_comments(
        db: &PgPool,
        class_id: ClassId,
        dto: ReplaceCommentsDto,
    ) -> Result<Vec<CommentWithStudent>, AppError> {
        ClassService::ensure_exists(db, class_id).await?;
        let entries = dto.effective_entries();

        let mut tx = db.begin().await?;

        sqlx::query("DELETE FROM comments WHERE class_id = $1")
            .bind(class_id)
            .execute(&mut *tx)
            .await?;

        if !entries.is_empty() {
            let mut qb =
                QueryBuilder::<Postgres>::new("INSERT INTO comments (class_id, student_id, comment) ");
            qb.push_values(entries, |mut row, (student_id, comment)| {
                row.push_bind(class_id)
                    .push_bind(student_id)
                    .push_bind(comment);
            });
            qb.build()
                .execute(&mut *tx)
                .await
                .map_err(unknown_student)?;
        }

        tx.commit().await?;
        Self::list_comments(db, class_id).await
    }

    /// Stores or overwrites one student's comment. A blank comment deletes
    /// it and yields `None`.
    #[instrument(skip(db, dto))]
    pub async fn upsert_comment(
        db: &PgPool,
        class_id: ClassId,
        student_id: StudentId,
        dto: UpsertCommentDto,
    ) -> Result<Option<Comment>, AppError> {
        ClassService::ensure_exists(db, class_id).await?;

        let text = dto.comment.trim();
        if text.is_empty() {
            sqlx::query("DELETE FROM comments WHERE class_id = $1 AND student_id = $2")
                .bind(class_id)
                .bind(student_id)
                .execute(db)
                .await?;
            return Ok(None);
        }

        let comment = sqlx::query_as::<_, Comment>(
            r#"INSERT INTO comments (class_id, student_id, comment)
               VALUES ($1, $2, $3)
               ON CONFLICT ON CONSTRAINT comments_class_student_key
               DO UPDATE SET comment = EXCLUDED.comment, updated_at = NOW()
               RETURNING *"#,
        )
        .bind(class_id)
        .bind(student_id)
        .bind(text)
        .fetch_one(db)
        .await
        .map_err(unknown_student)?;

        Ok(Some(comment))
    }

    #[instrument(skip(db))]
    pub async fn delete_comment(
        db: &PgPool,
        class_id: ClassId,
        student_id: StudentId,
    ) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM comments WHERE class_id = $1 AND student_id = $2")
            .bind(class_id)
            .bind(student_id)
            .execute(db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!("Comment not found")));
        }
        Ok(())
    }
}
