use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum DomainError {
    #[error("{message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    AlreadyExists(String),

    #[error("forbidden")]
    Forbidden,

    #[error("Incorrect username or password.")]
    InvalidCredentials,

    #[error("unexpected domain error: {0}")]
    Unexpected(String),
}

impl DomainError {
    pub(crate) fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }

    pub(crate) fn post_not_found(id: i64) -> Self {
        Self::NotFound(format!("Post id {id} doesn't exist."))
    }
}
