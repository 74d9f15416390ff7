use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{Error as SqlxError, FromRow, query_as};
use thiserror::Error;
use uuid::Uuid;
use crate::{
    db::DBClient,
    modules::comment::dto::NewComment,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Comment {
    pub id: Uuid,
    pub movie_id: String,
    pub name: String,
    pub email: String,
    pub comment: String,
    pub date: DateTime<Utc>,
    pub approved: bool,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[source] SqlxError),
    #[error("Comment store is unavailable: {0}")]
    Unavailable(String),
}

impl From<SqlxError> for StoreError {
    fn from(err: SqlxError) -> Self {
        match err {
            SqlxError::PoolTimedOut | SqlxError::PoolClosed => StoreError::Unavailable(err.to_string()),
            err => StoreError::Database(err),
        }
    }
}

/// The persistent collection behind both comment handlers. Implementations
/// are shared by every request of the process.
#[async_trait]
pub trait CommentRepository: Send + Sync {
    async fn save_comment(&self, data: NewComment) -> Result<Comment, StoreError>;
    /// Approved comments for `movie_id`, newest first.
    async fn get_approved_comments_by_movie(&self, movie_id: &str) -> Result<Vec<Comment>, StoreError>;
}

#[async_trait]
impl CommentRepository for DBClient {
    async fn save_comment(&self, data: NewComment) -> Result<Comment, StoreError> {
        let new_comment = query_as::<_, Comment>(
            r#"
                INSERT INTO comments (movie_id, name, email, comment, date, approved)
                VALUES ($1, $2, $3, $4, $5, $6)
                RETURNING id, movie_id, name, email, comment, date, approved;
            "#,
        )
        .bind(data.movie_id)
        .bind(data.name)
        .bind(data.email)
        .bind(data.comment)
        .bind(data.date)
        .bind(data.approved)
        .fetch_one(&self.pool).await?;
        Ok(new_comment)
    }
    async fn get_approved_comments_by_movie(&self, movie_id: &str) -> Result<Vec<Comment>, StoreError> {
        let comments = query_as::<_, Comment>(
            r#"
                SELECT id, movie_id, name, email, comment, date, approved
                FROM comments
                WHERE movie_id = $1 AND approved = TRUE
                ORDER BY date DESC;
            "#,
        )
        .bind(movie_id)
        .fetch_all(&self.pool).await?;
        Ok(comments)
    }
}
