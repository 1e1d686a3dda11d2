//! InMemory UserRepository 実装
//!
//! ユーザーを ID で保持し、トークンと表示名から引けるようにします。

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{AccessToken, AuthorId, AuthorName, RepositoryError, User, UserRepository};

#[derive(Default)]
struct Users {
    by_id: HashMap<AuthorId, User>,
    /// トークン文字列 → ユーザー ID
    tokens: HashMap<String, AuthorId>,
}

/// インメモリ UserRepository 実装
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Mutex<Users>,
}

impl InMemoryUserRepository {
    /// 新しい InMemoryUserRepository を作成
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: User, token: AccessToken) -> Result<(), RepositoryError> {
        let mut users = self.users.lock().await;
        if users.by_id.values().any(|u| u.name == user.name) {
            return Err(RepositoryError::DuplicateName(user.name.into_string()));
        }
        users
            .tokens
            .insert(token.as_str().to_string(), user.id.clone());
        users.by_id.insert(user.id.clone(), user);
        Ok(())
    }

    async fn verify_token(&self, token: &AccessToken) -> Result<Option<User>, RepositoryError> {
        let users = self.users.lock().await;
        Ok(users
            .tokens
            .get(token.as_str())
            .and_then(|id| users.by_id.get(id))
            .cloned())
    }

    async fn find_by_name(&self, name: &AuthorName) -> Result<Option<User>, RepositoryError> {
        let users = self.users.lock().await;
        Ok(users.by_id.values().find(|u| &u.name == name).cloned())
    }

    async fn is_muted(&self, id: &AuthorId) -> Result<bool, RepositoryError> {
        let users = self.users.lock().await;
        users
            .by_id
            .get(id)
            .map(|u| u.muted)
            .ok_or_else(|| RepositoryError::UserNotFound(id.as_str().to_string()))
    }

    async fn set_muted(&self, id: &AuthorId, muted: bool) -> Result<(), RepositoryError> {
        let mut users = self.users.lock().await;
        let user = users
            .by_id
            .get_mut(id)
            .ok_or_else(|| RepositoryError::UserNotFound(id.as_str().to_string()))?;
        user.muted = muted;
        Ok(())
    }

    async fn clear_all_mutes(&self) -> Result<usize, RepositoryError> {
        let mut users = self.users.lock().await;
        let mut cleared = 0;
        for user in users.by_id.values_mut().filter(|u| u.muted) {
            user.muted = false;
            cleared += 1;
        }
        Ok(cleared)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Timestamp;

    // ========================================
    // テスト作業記録
    // ========================================
    // 【何をテストするか】
    // - ユーザー作成と表示名の一意性
    // - トークン検証
    // - ミュートフラグの更新と起動時の一括解除
    // ========================================

    fn user(name: &str) -> User {
        User::new(
            AuthorId::generate(),
            AuthorName::new(name.to_string()).unwrap(),
            Timestamp::new(1000),
        )
    }

    #[tokio::test]
    async fn test_create_and_verify_token() {
        // テスト項目: 作成したユーザーをトークンで引ける
        // given (前提条件):
        let repo = InMemoryUserRepository::new();
        let alice = user("alice");
        let token = AccessToken::generate();
        repo.create(alice.clone(), token.clone()).await.unwrap();

        // when (操作):
        let found = repo.verify_token(&token).await.unwrap();

        // then (期待する結果):
        assert_eq!(found, Some(alice));
    }

    #[tokio::test]
    async fn test_unknown_token_returns_none() {
        // テスト項目: 未登録のトークンは None になる
        // given (前提条件):
        let repo = InMemoryUserRepository::new();

        // when (操作):
        let found = repo.verify_token(&AccessToken::generate()).await.unwrap();

        // then (期待する結果):
        assert_eq!(found, None);
    }

    #[tokio::test]
    async fn test_duplicate_name_is_rejected() {
        // テスト項目: 同じ表示名のユーザーは作成できない
        // given (前提条件):
        let repo = InMemoryUserRepository::new();
        repo.create(user("alice"), AccessToken::generate())
            .await
            .unwrap();

        // when (操作):
        let result = repo.create(user("alice"), AccessToken::generate()).await;

        // then (期待する結果):
        assert_eq!(
            result,
            Err(RepositoryError::DuplicateName("alice".to_string()))
        );
    }

    #[tokio::test]
    async fn test_set_muted_and_clear_all() {
        // テスト項目: ミュートフラグの更新と一括解除
        // given (前提条件):
        let repo = InMemoryUserRepository::new();
        let alice = user("alice");
        let bob = user("bob");
        repo.create(alice.clone(), AccessToken::generate())
            .await
            .unwrap();
        repo.create(bob.clone(), AccessToken::generate())
            .await
            .unwrap();
        repo.set_muted(&alice.id, true).await.unwrap();

        // when (操作):
        let muted_before = repo.is_muted(&alice.id).await.unwrap();
        let cleared = repo.clear_all_mutes().await.unwrap();

        // then (期待する結果):
        assert!(muted_before);
        assert_eq!(cleared, 1);
        assert!(!repo.is_muted(&alice.id).await.unwrap());
        assert!(!repo.is_muted(&bob.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_set_muted_unknown_user() {
        // テスト項目: 存在しないユーザーのフラグ更新は UserNotFound
        // given (前提条件):
        let repo = InMemoryUserRepository::new();

        // when (操作):
        let result = repo.set_muted(&AuthorId::generate(), true).await;

        // then (期待する結果):
        assert!(matches!(result, Err(RepositoryError::UserNotFound(_))));
    }
}
