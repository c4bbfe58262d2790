use async_trait::async_trait;

use crate::domain::error::DomainError;
use crate::domain::user::User;

#[derive(Debug, Clone)]
pub(crate) struct UserCredentials {
    pub(crate) user: User,
    pub(crate) password_hash: String,
}

#[derive(Debug, Clone)]
pub(crate) struct NewUser {
    pub(crate) username: String,
    pub(crate) password_hash: String,
}

#[async_trait]
pub(crate) trait UserRepository: Send {
    async fn create_user(&mut self, input: NewUser) -> Result<User, DomainError>;
    async fn find_by_username(&mut self, username: &str)
    -> Result<Option<UserCredentials>, DomainError>;
    async fn find_by_id(&mut self, id: i64) -> Result<Option<User>, DomainError>;
}
