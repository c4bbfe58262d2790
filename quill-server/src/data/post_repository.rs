use async_trait::async_trait;

use crate::domain::error::DomainError;
use crate::domain::post::Post;

#[derive(Debug, Clone)]
pub(crate) struct NewPost {
    pub(crate) title: String,
    pub(crate) body: String,
    pub(crate) author_id: i64,
}

#[derive(Debug, Clone)]
pub(crate) struct PostPatch {
    pub(crate) title: String,
    pub(crate) body: String,
}

#[async_trait]
pub(crate) trait PostRepository: Send {
    // newest first
    async fn list_posts(&mut self) -> Result<Vec<Post>, DomainError>;
    async fn get_post(&mut self, id: i64) -> Result<Option<Post>, DomainError>;
    async fn create_post(&mut self, input: NewPost) -> Result<i64, DomainError>;
    // update and delete are no-ops for a missing id
    async fn update_post(&mut self, id: i64, patch: PostPatch) -> Result<(), DomainError>;
    async fn delete_post(&mut self, id: i64) -> Result<(), DomainError>;
}
