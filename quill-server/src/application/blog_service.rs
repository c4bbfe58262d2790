use tracing::{info, warn};

use crate::data::post_repository::{NewPost, PostPatch, PostRepository};
use crate::domain::error::DomainError;
use crate::domain::post::{Post, PostForm};

pub(crate) struct BlogService<'r, R: PostRepository> {
    repo: &'r mut R,
}

impl<'r, R: PostRepository> BlogService<'r, R> {
    pub(crate) fn new(repo: &'r mut R) -> Self {
        Self { repo }
    }

    pub(crate) async fn list_posts(&mut self) -> Result<Vec<Post>, DomainError> {
        self.repo.list_posts().await
    }

    pub(crate) async fn create_post(
        &mut self,
        author_id: i64,
        form: PostForm,
    ) -> Result<i64, DomainError> {
        let form = form.validate()?;

        let post_id = self
            .repo
            .create_post(NewPost {
                title: form.title,
                body: form.body,
                author_id,
            })
            .await?;
        info!(post_id, author_id, "post created");
        Ok(post_id)
    }

    pub(crate) async fn get_post_checked(
        &mut self,
        id: i64,
        actor_id: i64,
        check_author: bool,
    ) -> Result<Post, DomainError> {
        let post = self
            .repo
            .get_post(id)
            .await?
            .ok_or_else(|| DomainError::post_not_found(id))?;

        if check_author && !post.is_authored_by(actor_id) {
            warn!(post_id = id, actor_id, author_id = post.author_id, "post access forbidden");
            return Err(DomainError::Forbidden);
        }

        Ok(post)
    }

    pub(crate) async fn update_post(
        &mut self,
        actor_id: i64,
        post_id: i64,
        form: PostForm,
    ) -> Result<(), DomainError> {
        self.get_post_checked(post_id, actor_id, true).await?;
        let form = form.validate()?;

        self.repo
            .update_post(
                post_id,
                PostPatch {
                    title: form.title,
                    body: form.body,
                },
            )
            .await?;
        info!(post_id, actor_id, "post updated");
        Ok(())
    }

    pub(crate) async fn delete_post(
        &mut self,
        actor_id: i64,
        post_id: i64,
    ) -> Result<(), DomainError> {
        self.get_post_checked(post_id, actor_id, true).await?;

        self.repo.delete_post(post_id).await?;
        info!(post_id, actor_id, "post deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use chrono::{Duration, Utc};

    use super::BlogService;
    use crate::data::post_repository::{NewPost, PostPatch, PostRepository};
    use crate::domain::error::DomainError;
    use crate::domain::post::{Post, PostForm};

    const ALICE: i64 = 1;
    const BOB: i64 = 2;

    #[derive(Default)]
    struct FakePostRepo {
        posts: Vec<Post>,
        writes: usize,
    }

    impl FakePostRepo {
        fn with_post(id: i64, title: &str, body: &str, author_id: i64) -> Self {
            Self {
                posts: vec![sample_post(id, title, body, author_id)],
                writes: 0,
            }
        }

        fn stored(&self, id: i64) -> Option<&Post> {
            self.posts.iter().find(|p| p.id == id)
        }
    }

    #[async_trait]
    impl PostRepository for FakePostRepo {
        async fn list_posts(&mut self) -> Result<Vec<Post>, DomainError> {
            let mut posts = self.posts.clone();
            posts.sort_by(|a, b| b.created.cmp(&a.created).then(b.id.cmp(&a.id)));
            Ok(posts)
        }

        async fn get_post(&mut self, id: i64) -> Result<Option<Post>, DomainError> {
            Ok(self.stored(id).cloned())
        }

        async fn create_post(&mut self, input: NewPost) -> Result<i64, DomainError> {
            self.writes += 1;
            let id = self.posts.iter().map(|p| p.id).max().unwrap_or(0) + 1;
            self.posts
                .push(sample_post(id, &input.title, &input.body, input.author_id));
            Ok(id)
        }

        async fn update_post(&mut self, id: i64, patch: PostPatch) -> Result<(), DomainError> {
            self.writes += 1;
            if let Some(post) = self.posts.iter_mut().find(|p| p.id == id) {
                post.title = patch.title;
                post.body = patch.body;
            }
            Ok(())
        }

        async fn delete_post(&mut self, id: i64) -> Result<(), DomainError> {
            self.writes += 1;
            self.posts.retain(|p| p.id != id);
            Ok(())
        }
    }

    #[tokio::test]
    async fn create_post_with_empty_title_never_writes() {
        let mut repo = FakePostRepo::default();

        for title in ["", "   "] {
            let err = BlogService::new(&mut repo)
                .create_post(ALICE, PostForm::new(title, "body"))
                .await
                .expect_err("empty title must be rejected");
            assert!(matches!(err, DomainError::Validation { field: "title", .. }));
        }

        assert_eq!(repo.writes, 0);
        assert!(repo.posts.is_empty());
    }

    #[tokio::test]
    async fn create_post_inserts_one_row_owned_by_actor() {
        let mut repo = FakePostRepo::default();

        let id = BlogService::new(&mut repo)
            .create_post(ALICE, PostForm::new("Title", ""))
            .await
            .expect("create must succeed");

        assert_eq!(repo.posts.len(), 1);
        let post = repo.stored(id).expect("post must be stored");
        assert_eq!(post.author_id, ALICE);
        assert_eq!(post.title, "Title");
        assert_eq!(post.body, "");
    }

    #[tokio::test]
    async fn get_post_checked_returns_not_found_when_missing() {
        let mut repo = FakePostRepo::default();

        let err = BlogService::new(&mut repo)
            .get_post_checked(42, ALICE, true)
            .await
            .expect_err("post must be missing");
        match err {
            DomainError::NotFound(msg) => assert_eq!(msg, "Post id 42 doesn't exist."),
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn get_post_checked_skips_ownership_when_not_requested() {
        let mut repo = FakePostRepo::with_post(7, "t", "b", ALICE);

        let post = BlogService::new(&mut repo)
            .get_post_checked(7, BOB, false)
            .await
            .expect("ownership is not enforced");
        assert_eq!(post.id, 7);
    }

    #[tokio::test]
    async fn update_post_by_non_author_is_forbidden_and_leaves_row() {
        let mut repo = FakePostRepo::with_post(7, "T1", "B1", ALICE);

        let err = BlogService::new(&mut repo)
            .update_post(BOB, 7, PostForm::new("hijacked", "x"))
            .await
            .expect_err("must be forbidden");
        assert!(matches!(err, DomainError::Forbidden));

        let post = repo.stored(7).expect("post must remain");
        assert_eq!((post.title.as_str(), post.body.as_str()), ("T1", "B1"));
        assert_eq!(repo.writes, 0);
    }

    #[tokio::test]
    async fn update_post_by_non_author_is_forbidden_even_with_invalid_input() {
        let mut repo = FakePostRepo::with_post(7, "T1", "B1", ALICE);

        let err = BlogService::new(&mut repo)
            .update_post(BOB, 7, PostForm::new("", ""))
            .await
            .expect_err("must be forbidden");
        assert!(matches!(err, DomainError::Forbidden));
    }

    #[tokio::test]
    async fn update_post_with_empty_title_leaves_row_unchanged() {
        let mut repo = FakePostRepo::with_post(7, "T1", "B1", ALICE);

        let err = BlogService::new(&mut repo)
            .update_post(ALICE, 7, PostForm::new("", "B2"))
            .await
            .expect_err("must fail validation");
        assert!(matches!(err, DomainError::Validation { .. }));

        let post = repo.stored(7).expect("post must remain");
        assert_eq!((post.title.as_str(), post.body.as_str()), ("T1", "B1"));
        assert_eq!(repo.writes, 0);
    }

    #[tokio::test]
    async fn update_post_by_author_keeps_id_and_created() {
        let mut repo = FakePostRepo::with_post(7, "T1", "B1", ALICE);
        let created = repo.stored(7).expect("seeded").created;

        BlogService::new(&mut repo)
            .update_post(ALICE, 7, PostForm::new("T2", "B2"))
            .await
            .expect("update must succeed");

        let post = repo.stored(7).expect("post must remain");
        assert_eq!(post.title, "T2");
        assert_eq!(post.body, "B2");
        assert_eq!(post.created, created);
        assert_eq!(post.author_id, ALICE);
    }

    #[tokio::test]
    async fn delete_missing_post_is_not_found_without_writes() {
        let mut repo = FakePostRepo::with_post(7, "t", "b", ALICE);

        let err = BlogService::new(&mut repo)
            .delete_post(ALICE, 8)
            .await
            .expect_err("must be missing");
        assert!(matches!(err, DomainError::NotFound(_)));
        assert_eq!(repo.posts.len(), 1);
        assert_eq!(repo.writes, 0);
    }

    #[tokio::test]
    async fn delete_post_returns_forbidden_for_non_owner() {
        let mut repo = FakePostRepo::with_post(7, "title", "body", BOB);

        let err = BlogService::new(&mut repo)
            .delete_post(ALICE, 7)
            .await
            .expect_err("must be forbidden");
        assert!(matches!(err, DomainError::Forbidden));
        assert_eq!(repo.posts.len(), 1);
    }

    #[tokio::test]
    async fn delete_post_by_author_removes_it() {
        let mut repo = FakePostRepo::with_post(7, "title", "body", ALICE);

        BlogService::new(&mut repo)
            .delete_post(ALICE, 7)
            .await
            .expect("delete must succeed");
        assert!(repo.posts.is_empty());
    }

    #[tokio::test]
    async fn list_posts_passes_through_ordering() {
        let mut repo = FakePostRepo::default();
        let mut older = sample_post(1, "old", "", ALICE);
        older.created = Utc::now() - Duration::seconds(60);
        repo.posts.push(older);
        repo.posts.push(sample_post(2, "new", "", BOB));

        let posts = BlogService::new(&mut repo)
            .list_posts()
            .await
            .expect("list must succeed");

        assert_eq!(posts.len(), 2);
        assert!(posts.windows(2).all(|w| w[0].created >= w[1].created));
        assert_eq!(posts[0].title, "new");
    }

    fn sample_post(id: i64, title: &str, body: &str, author_id: i64) -> Post {
        Post {
            id,
            title: title.to_string(),
            body: body.to_string(),
            created: Utc::now(),
            author_id,
            username: format!("user{author_id}"),
        }
    }
}
