use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;
use crate::modules::comment::{
    dto::NewComment,
    model::{Comment, CommentRepository, StoreError},
};

/// Process-local comment store, used when no database is configured.
#[derive(Default)]
pub struct InMemoryCommentStore {
    comments: RwLock<Vec<Comment>>,
}

impl InMemoryCommentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CommentRepository for InMemoryCommentStore {
    async fn save_comment(&self, data: NewComment) -> Result<Comment, StoreError> {
        let comment = Comment {
            id: Uuid::new_v4(),
            movie_id: data.movie_id,
            name: data.name,
            email: data.email,
            comment: data.comment,
            date: data.date,
            approved: data.approved,
        };
        self.comments.write().await.push(comment.clone());
        Ok(comment)
    }
    async fn get_approved_comments_by_movie(&self, movie_id: &str) -> Result<Vec<Comment>, StoreError> {
        let mut comments: Vec<Comment> = self.comments.read().await
            .iter()
            .filter(|c| c.movie_id == movie_id && c.approved)
            .cloned()
            .collect();
        comments.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(comments)
    }
}
