use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqliteConnection;

use crate::data::post_repository::{NewPost, PostPatch, PostRepository};
use crate::domain::error::DomainError;
use crate::domain::post::Post;

#[derive(sqlx::FromRow)]
struct PostRow {
    id: i64,
    title: String,
    body: String,
    created: DateTime<Utc>,
    author_id: i64,
    username: String,
}

impl From<PostRow> for Post {
    fn from(row: PostRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            body: row.body,
            created: row.created,
            author_id: row.author_id,
            username: row.username,
        }
    }
}

#[async_trait]
impl PostRepository for SqliteConnection {
    async fn list_posts(&mut self) -> Result<Vec<Post>, DomainError> {
        let rows = sqlx::query_as::<_, PostRow>(
            r#"
            SELECT
                p.id AS id,
                p.title AS title,
                p.body AS body,
                p.created AS created,
                p.author_id AS author_id,
                u.username AS username
            FROM post p
            JOIN user u ON p.author_id = u.id
            ORDER BY p.created DESC, p.id DESC
            "#,
        )
        .fetch_all(&mut *self)
        .await
        .map_err(map_post_db_error)?;

        Ok(rows.into_iter().map(Post::from).collect())
    }

    async fn get_post(&mut self, id: i64) -> Result<Option<Post>, DomainError> {
        let row = sqlx::query_as::<_, PostRow>(
            r#"
            SELECT
                p.id AS id,
                p.title AS title,
                p.body AS body,
                p.created AS created,
                p.author_id AS author_id,
                u.username AS username
            FROM post p
            JOIN user u ON p.author_id = u.id
            WHERE p.id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *self)
        .await
        .map_err(map_post_db_error)?;

        Ok(row.map(Post::from))
    }

    async fn create_post(&mut self, input: NewPost) -> Result<i64, DomainError> {
        let result = sqlx::query(
            r#"
            INSERT INTO post (title, body, author_id)
            VALUES (?, ?, ?)
            "#,
        )
        .bind(&input.title)
        .bind(&input.body)
        .bind(input.author_id)
        .execute(&mut *self)
        .await
        .map_err(map_post_db_error)?;

        Ok(result.last_insert_rowid())
    }

    async fn update_post(&mut self, id: i64, patch: PostPatch) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            UPDATE post
            SET title = ?, body = ?
            WHERE id = ?
            "#,
        )
        .bind(&patch.title)
        .bind(&patch.body)
        .bind(id)
        .execute(&mut *self)
        .await
        .map_err(map_post_db_error)?;

        Ok(())
    }

    async fn delete_post(&mut self, id: i64) -> Result<(), DomainError> {
        sqlx::query("DELETE FROM post WHERE id = ?")
            .bind(id)
            .execute(&mut *self)
            .await
            .map_err(map_post_db_error)?;

        Ok(())
    }
}

fn map_post_db_error(err: sqlx::Error) -> DomainError {
    if let sqlx::Error::Database(db_err) = &err
        && db_err.is_foreign_key_violation()
    {
        return DomainError::NotFound("author".to_string());
    }
    DomainError::Unexpected(err.to_string())
}

#[cfg(test)]
mod tests {
    use sqlx::SqliteConnection;

    use crate::data::post_repository::{NewPost, PostPatch, PostRepository};
    use crate::data::user_repository::{NewUser, UserRepository};
    use crate::domain::error::DomainError;
    use crate::infrastructure::database::in_memory_pool;

    async fn seed_user(conn: &mut SqliteConnection, username: &str) -> i64 {
        conn.create_user(NewUser {
            username: username.to_string(),
            password_hash: "hash".to_string(),
        })
        .await
        .expect("user must be created")
        .id
    }

    fn new_post(title: &str, body: &str, author_id: i64) -> NewPost {
        NewPost {
            title: title.to_string(),
            body: body.to_string(),
            author_id,
        }
    }

    #[tokio::test]
    async fn create_then_get_joins_author_username() {
        let pool = in_memory_pool().await.expect("pool");
        let mut conn = pool.acquire().await.expect("connection");
        let author_id = seed_user(&mut conn, "alice").await;

        let id = conn
            .create_post(new_post("Hello", "World", author_id))
            .await
            .expect("create must succeed");

        let post = conn
            .get_post(id)
            .await
            .expect("get must succeed")
            .expect("post must exist");
        assert_eq!(post.title, "Hello");
        assert_eq!(post.body, "World");
        assert_eq!(post.author_id, author_id);
        assert_eq!(post.username, "alice");
    }

    #[tokio::test]
    async fn list_posts_is_newest_first() {
        let pool = in_memory_pool().await.expect("pool");
        let mut conn = pool.acquire().await.expect("connection");
        let author_id = seed_user(&mut conn, "alice").await;

        for title in ["first", "second", "third"] {
            conn.create_post(new_post(title, "", author_id))
                .await
                .expect("create must succeed");
        }

        let posts = conn.list_posts().await.expect("list must succeed");
        let titles: Vec<_> = posts.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, ["third", "second", "first"]);
        assert!(posts.windows(2).all(|w| w[0].created >= w[1].created));
    }

    #[tokio::test]
    async fn update_changes_only_title_and_body() {
        let pool = in_memory_pool().await.expect("pool");
        let mut conn = pool.acquire().await.expect("connection");
        let author_id = seed_user(&mut conn, "alice").await;
        let id = conn
            .create_post(new_post("T1", "B1", author_id))
            .await
            .expect("create must succeed");
        let before = conn.get_post(id).await.expect("get").expect("exists");

        conn.update_post(
            id,
            PostPatch {
                title: "T2".to_string(),
                body: "B2".to_string(),
            },
        )
        .await
        .expect("update must succeed");

        let after = conn.get_post(id).await.expect("get").expect("exists");
        assert_eq!(after.title, "T2");
        assert_eq!(after.body, "B2");
        assert_eq!(after.created, before.created);
        assert_eq!(after.author_id, before.author_id);
    }

    #[tokio::test]
    async fn update_and_delete_of_missing_id_are_noops() {
        let pool = in_memory_pool().await.expect("pool");
        let mut conn = pool.acquire().await.expect("connection");
        let author_id = seed_user(&mut conn, "alice").await;
        conn.create_post(new_post("keep", "me", author_id))
            .await
            .expect("create must succeed");

        conn.update_post(
            999,
            PostPatch {
                title: "x".to_string(),
                body: "y".to_string(),
            },
        )
        .await
        .expect("update of missing id must not fail");
        conn.delete_post(999)
            .await
            .expect("delete of missing id must not fail");

        let posts = conn.list_posts().await.expect("list must succeed");
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].title, "keep");
    }

    #[tokio::test]
    async fn delete_removes_row() {
        let pool = in_memory_pool().await.expect("pool");
        let mut conn = pool.acquire().await.expect("connection");
        let author_id = seed_user(&mut conn, "alice").await;
        let id = conn
            .create_post(new_post("gone", "", author_id))
            .await
            .expect("create must succeed");

        conn.delete_post(id).await.expect("delete must succeed");

        assert!(conn.get_post(id).await.expect("get").is_none());
    }

    #[tokio::test]
    async fn create_with_unknown_author_is_not_found() {
        let pool = in_memory_pool().await.expect("pool");
        let mut conn = pool.acquire().await.expect("connection");

        let err = conn
            .create_post(new_post("orphan", "", 42))
            .await
            .expect_err("foreign key must be enforced");
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[tokio::test]
    async fn title_with_sql_metacharacters_is_stored_verbatim() {
        let pool = in_memory_pool().await.expect("pool");
        let mut conn = pool.acquire().await.expect("connection");
        let author_id = seed_user(&mut conn, "alice").await;
        let title = "'); DROP TABLE post; --";

        let id = conn
            .create_post(new_post(title, "", author_id))
            .await
            .expect("create must succeed");

        let post = conn.get_post(id).await.expect("get").expect("exists");
        assert_eq!(post.title, title);
    }
}
