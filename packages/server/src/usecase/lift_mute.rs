//! UseCase: ミュートフラグの永続化と解除処理
//!
//! `MuteTracker` から作者のロックを保持したまま呼ばれる。
//! ミュート開始時はフラグを立て、解除時はフラグを下ろして該当作者の接続へ `mute-lifted` を送る。

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::{AuthorName, MessagePusher, MuteObserver, OutboundEvent, UserRepository};

/// ミュート解除のユースケース
pub struct LiftMuteUseCase {
    /// UserRepository（本人性とミュートフラグ）
    users: Arc<dyn UserRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl LiftMuteUseCase {
    /// 新しい LiftMuteUseCase を作成
    pub fn new(users: Arc<dyn UserRepository>, message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self {
            users,
            message_pusher,
        }
    }

    /// 永続化されたミュートフラグを立てる
    pub async fn mark_muted(&self, author: &AuthorName) {
        self.set_flag(author, true).await;
    }

    /// ミュート解除を実行
    ///
    /// # Returns
    ///
    /// `mute-lifted` を配信できた接続数
    pub async fn execute(&self, author: &AuthorName) -> usize {
        // 1. 永続化されたミュートフラグを下ろす
        self.set_flag(author, false).await;

        // 2. 作者の接続へ通知（接続していなければ 0）
        let delivered = self
            .message_pusher
            .push_to_author(author, &OutboundEvent::MuteLifted)
            .await;
        tracing::debug!("Sent mute-lifted to {} connection(s) of '{}'", delivered, author);
        delivered
    }

    async fn set_flag(&self, author: &AuthorName, muted: bool) {
        match self.users.find_by_name(author).await {
            Ok(Some(user)) => {
                if let Err(e) = self.users.set_muted(&user.id, muted).await {
                    tracing::warn!("Failed to set mute flag of '{}' to {}: {}", author, muted, e);
                }
            }
            Ok(None) => {
                tracing::debug!("No registered user named '{}', skipping mute flag", author);
            }
            Err(e) => {
                tracing::warn!("Failed to look up '{}' for its mute flag: {}", author, e);
            }
        }
    }
}

#[async_trait]
impl MuteObserver for LiftMuteUseCase {
    async fn on_muted(&self, author: &AuthorName) {
        self.mark_muted(author).await;
    }

    async fn on_mute_lifted(&self, author: &AuthorName) {
        self.execute(author).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{
            AccessToken, AuthorId, ConnectionId, MockMessagePusher, MockUserRepository,
            RepositoryError, Timestamp, User,
        },
        infrastructure::{
            message_pusher::WebSocketMessagePusher, repository::InMemoryUserRepository,
        },
    };
    use tokio::sync::mpsc;

    fn name(value: &str) -> AuthorName {
        AuthorName::new(value.to_string()).unwrap()
    }

    #[tokio::test]
    async fn test_lift_mute_clears_flag_and_notifies_author_only() {
        // テスト項目: 永続化フラグが解除され、該当作者の接続にだけ mute-lifted が届く
        // given (前提条件):
        let users = Arc::new(InMemoryUserRepository::new());
        let alice = User::new(AuthorId::generate(), name("alice"), Timestamp::new(0));
        users
            .create(alice.clone(), AccessToken::generate())
            .await
            .unwrap();
        users.set_muted(&alice.id, true).await.unwrap();

        let pusher = Arc::new(WebSocketMessagePusher::new());
        let (alice_tx, mut alice_rx) = mpsc::channel(8);
        let (bob_tx, mut bob_rx) = mpsc::channel(8);
        pusher
            .register_client(ConnectionId::generate(), name("alice"), alice_tx)
            .await;
        pusher
            .register_client(ConnectionId::generate(), name("bob"), bob_tx)
            .await;
        let usecase = LiftMuteUseCase::new(users.clone(), pusher);

        // when (操作):
        let delivered = usecase.execute(&name("alice")).await;

        // then (期待する結果):
        assert_eq!(delivered, 1);
        assert!(!users.is_muted(&alice.id).await.unwrap());
        assert_eq!(
            alice_rx.recv().await,
            Some(r#"{"type":"mute-lifted"}"#.to_string())
        );
        assert!(bob_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_mark_muted_sets_flag_without_notifying() {
        // テスト項目: ミュート開始時はフラグだけが立ち、接続には何も送らない
        // given (前提条件):
        let users = Arc::new(InMemoryUserRepository::new());
        let alice = User::new(AuthorId::generate(), name("alice"), Timestamp::new(0));
        users
            .create(alice.clone(), AccessToken::generate())
            .await
            .unwrap();
        let mut pusher = MockMessagePusher::new();
        pusher.expect_push_to_author().never();
        let usecase = LiftMuteUseCase::new(users.clone(), Arc::new(pusher));

        // when (操作):
        usecase.on_muted(&name("alice")).await;

        // then (期待する結果):
        assert!(users.is_muted(&alice.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_lift_mute_still_notifies_when_repository_fails() {
        // テスト項目: リポジトリが失敗しても接続への通知は行われる
        // given (前提条件):
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_name()
            .returning(|_| Err(RepositoryError::Backend("disk full".to_string())));
        let pusher = Arc::new(WebSocketMessagePusher::new());
        let (tx, mut rx) = mpsc::channel(8);
        pusher
            .register_client(ConnectionId::generate(), name("alice"), tx)
            .await;
        let usecase = LiftMuteUseCase::new(Arc::new(users), pusher);

        // when (操作):
        let delivered = usecase.execute(&name("alice")).await;

        // then (期待する結果):
        assert_eq!(delivered, 1);
        assert!(rx.recv().await.is_some());
    }
}
