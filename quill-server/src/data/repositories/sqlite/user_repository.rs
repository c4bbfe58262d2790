use async_trait::async_trait;
use sqlx::SqliteConnection;

use crate::data::user_repository::{NewUser, UserCredentials, UserRepository};
use crate::domain::error::DomainError;
use crate::domain::user::User;

#[derive(sqlx::FromRow)]
struct UserRow {
    id: i64,
    username: String,
}

#[derive(sqlx::FromRow)]
struct UserCredentialsRow {
    id: i64,
    username: String,
    password_hash: String,
}

#[async_trait]
impl UserRepository for SqliteConnection {
    async fn create_user(&mut self, input: NewUser) -> Result<User, DomainError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO user (username, password_hash)
            VALUES (?, ?)
            RETURNING id, username
            "#,
        )
        .bind(&input.username)
        .bind(&input.password_hash)
        .fetch_one(&mut *self)
        .await
        .map_err(|err| map_user_db_error(err, &input.username))?;

        Ok(User {
            id: row.id,
            username: row.username,
        })
    }

    async fn find_by_username(
        &mut self,
        username: &str,
    ) -> Result<Option<UserCredentials>, DomainError> {
        let row = sqlx::query_as::<_, UserCredentialsRow>(
            r#"
            SELECT id, username, password_hash
            FROM user
            WHERE username = ?
            "#,
        )
        .bind(username)
        .fetch_optional(&mut *self)
        .await
        .map_err(|err| map_user_db_error(err, username))?;

        Ok(row.map(|r| UserCredentials {
            user: User {
                id: r.id,
                username: r.username,
            },
            password_hash: r.password_hash,
        }))
    }

    async fn find_by_id(&mut self, id: i64) -> Result<Option<User>, DomainError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, username
            FROM user
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *self)
        .await
        .map_err(|err| DomainError::Unexpected(err.to_string()))?;

        Ok(row.map(|r| User {
            id: r.id,
            username: r.username,
        }))
    }
}

fn map_user_db_error(err: sqlx::Error, username: &str) -> DomainError {
    if let sqlx::Error::Database(db_err) = &err
        && db_err.is_unique_violation()
    {
        return DomainError::AlreadyExists(format!("User {username} is already registered."));
    }
    DomainError::Unexpected(err.to_string())
}
