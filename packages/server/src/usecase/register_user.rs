//! UseCase: ユーザー登録
//!
//! 表示名を予約し、作者 ID とアクセストークンを発行する。
//! パスワードは扱わない（トークンの所持が本人性になる）。

use std::sync::Arc;

use murmur_shared::time::Clock;

use crate::domain::{
    AccessToken, AuthorId, AuthorName, RepositoryError, Timestamp, User, UserRepository,
};

use super::error::RegisterUserError;

/// ユーザー登録のユースケース
pub struct RegisterUserUseCase {
    /// UserRepository（本人性とミュートフラグ）
    users: Arc<dyn UserRepository>,
    clock: Arc<dyn Clock>,
}

impl RegisterUserUseCase {
    /// 新しい RegisterUserUseCase を作成
    pub fn new(users: Arc<dyn UserRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { users, clock }
    }

    /// ユーザー登録を実行
    ///
    /// # Returns
    ///
    /// * `Ok((User, AccessToken))` - 作成したユーザーと発行したトークン
    /// * `Err(RegisterUserError)` - 表示名が不正、または使用済み
    pub async fn execute(&self, name: String) -> Result<(User, AccessToken), RegisterUserError> {
        let name = AuthorName::new(name)?;
        let user = User::new(
            AuthorId::generate(),
            name,
            Timestamp::new(self.clock.now_millis()),
        );
        let token = AccessToken::generate();

        self.users
            .create(user.clone(), token.clone())
            .await
            .map_err(|e| match e {
                RepositoryError::DuplicateName(name) => RegisterUserError::DuplicateName(name),
                other => RegisterUserError::Repository(other),
            })?;

        tracing::info!("Registered user '{}' ({})", user.name, user.id.as_str());
        Ok((user, token))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{domain::ValueObjectError, infrastructure::repository::InMemoryUserRepository};
    use murmur_shared::time::FixedClock;

    fn create_usecase() -> (RegisterUserUseCase, Arc<InMemoryUserRepository>) {
        let users = Arc::new(InMemoryUserRepository::new());
        let usecase = RegisterUserUseCase::new(users.clone(), Arc::new(FixedClock::new(42)));
        (usecase, users)
    }

    #[tokio::test]
    async fn test_register_user_issues_working_token() {
        // テスト項目: 登録で発行されたトークンでユーザーを検証できる
        // given (前提条件):
        let (usecase, users) = create_usecase();

        // when (操作):
        let (user, token) = usecase.execute("alice".to_string()).await.unwrap();

        // then (期待する結果):
        assert_eq!(user.name.as_str(), "alice");
        assert_eq!(user.created_at, Timestamp::new(42));
        assert!(!user.muted);
        assert_eq!(users.verify_token(&token).await.unwrap(), Some(user));
    }

    #[tokio::test]
    async fn test_register_duplicate_name() {
        // テスト項目: 同じ表示名での 2 回目の登録は DuplicateName になる
        // given (前提条件):
        let (usecase, _users) = create_usecase();
        usecase.execute("alice".to_string()).await.unwrap();

        // when (操作):
        let result = usecase.execute("alice".to_string()).await;

        // then (期待する結果):
        assert_eq!(
            result.unwrap_err(),
            RegisterUserError::DuplicateName("alice".to_string())
        );
    }

    #[tokio::test]
    async fn test_register_invalid_name() {
        // テスト項目: 不正な表示名は InvalidName になる
        // given (前提条件):
        let (usecase, _users) = create_usecase();

        // when (操作):
        let result = usecase.execute(String::new()).await;

        // then (期待する結果):
        assert_eq!(
            result.unwrap_err(),
            RegisterUserError::InvalidName(ValueObjectError::AuthorNameEmpty)
        );
    }
}
