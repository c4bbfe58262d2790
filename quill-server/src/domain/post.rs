use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::error::DomainError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Post {
    pub(crate) id: i64,
    pub(crate) title: String,
    pub(crate) body: String,
    pub(crate) created: DateTime<Utc>,
    pub(crate) author_id: i64,
    pub(crate) username: String,
}

impl Post {
    pub(crate) fn is_authored_by(&self, user_id: i64) -> bool {
        self.author_id == user_id
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct PostForm {
    #[serde(default)]
    pub(crate) title: String,
    #[serde(default)]
    pub(crate) body: String,
}

impl PostForm {
    pub(crate) fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }

    // a blank title is the only rejection; both fields are stored as submitted
    pub(crate) fn validate(self) -> Result<Self, DomainError> {
        if self.title.trim().is_empty() {
            return Err(DomainError::validation("title", "Title is required."));
        }
        Ok(self)
    }
}
