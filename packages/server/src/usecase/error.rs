//! UseCase 層のエラー型

use thiserror::Error;

use crate::domain::{RepositoryError, StoreError, ValueObjectError};

/// 参加者接続のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConnectError {
    #[error("invalid or unknown access token")]
    Unauthenticated,

    #[error("failed to load message history: {0}")]
    HistoryUnavailable(StoreError),

    #[error("failed to look up user: {0}")]
    Repository(RepositoryError),
}

/// メッセージ送信のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SendMessageError {
    #[error("message was not persisted: {0}")]
    Store(#[from] StoreError),
}

/// メッセージ履歴取得のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GetMessageHistoryError {
    #[error("failed to load message history: {0}")]
    Store(#[from] StoreError),
}

/// ユーザー登録のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegisterUserError {
    #[error("invalid author name: {0}")]
    InvalidName(#[from] ValueObjectError),

    #[error("author name '{0}' is already taken")]
    DuplicateName(String),

    #[error("failed to store user: {0}")]
    Repository(RepositoryError),
}
