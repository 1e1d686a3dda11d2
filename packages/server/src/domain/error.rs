//! ドメイン層のエラー型

use thiserror::Error;

/// Value Object の検証エラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueObjectError {
    #[error("author name must not be empty")]
    AuthorNameEmpty,

    #[error("author name is too long ({actual} chars, max {max})")]
    AuthorNameTooLong { max: usize, actual: usize },

    #[error("invalid author id: '{0}'")]
    InvalidAuthorId(String),

    #[error("message text must not be empty")]
    MessageTextEmpty,

    #[error("message text is too long ({actual} chars, max {max})")]
    MessageTextTooLong { max: usize, actual: usize },

    #[error("access token must not be empty")]
    AccessTokenEmpty,
}

/// MessageStore のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("message store backend failure: {0}")]
    Backend(String),
}

/// UserRepository のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    #[error("author name '{0}' is already taken")]
    DuplicateName(String),

    #[error("user not found: {0}")]
    UserNotFound(String),

    #[error("user repository backend failure: {0}")]
    Backend(String),
}

/// MessagePusher のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessagePushError {
    #[error("connection '{0}' not found")]
    ConnectionNotFound(String),

    #[error("failed to push message: {0}")]
    PushFailed(String),
}
