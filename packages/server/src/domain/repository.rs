//! Repository trait 定義
//!
//! ドメイン層が必要とするデータアクセスのインターフェースを定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。

use async_trait::async_trait;

use super::{
    AccessToken, AuthorId, AuthorName, Message, MessageId, NewMessage, RepositoryError,
    StoreError, User,
};

/// メッセージの追記専用ストア
///
/// 採番される `MessageId` は追記順に単調増加する。
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessageStore: Send + Sync {
    /// メッセージを追記し、採番した ID を返す
    async fn append(&self, message: NewMessage) -> Result<MessageId, StoreError>;

    /// 全メッセージを追記順に取得（新規参加者の履歴表示用）
    async fn list_all(&self) -> Result<Vec<Message>, StoreError>;
}

/// ユーザー（本人性とミュートフラグ）のリポジトリ
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// ユーザーを作成（表示名が重複していれば `DuplicateName`）
    async fn create(&self, user: User, token: AccessToken) -> Result<(), RepositoryError>;

    /// トークンを検証し、対応するユーザーを返す
    async fn verify_token(&self, token: &AccessToken) -> Result<Option<User>, RepositoryError>;

    /// 表示名でユーザーを検索
    async fn find_by_name(&self, name: &AuthorName) -> Result<Option<User>, RepositoryError>;

    /// 永続化されたミュートフラグを取得
    async fn is_muted(&self, id: &AuthorId) -> Result<bool, RepositoryError>;

    /// 永続化されたミュートフラグを更新
    async fn set_muted(&self, id: &AuthorId, muted: bool) -> Result<(), RepositoryError>;

    /// 全ユーザーのミュートフラグを解除し、解除した件数を返す（起動時用）
    async fn clear_all_mutes(&self) -> Result<usize, RepositoryError>;
}
