//! UseCase: 参加者接続処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - ConnectParticipantUseCase::authenticate() / execute() メソッド
//!
//! ### なぜこのテストが必要か
//! - トークンを持たない接続を拒否する
//! - 新規参加者に履歴とミュート状態を渡す
//! - 履歴の取得に失敗した接続を配信対象に残さない
//!
//! ### どのような状況を想定しているか
//! - 正常系：認証と接続、履歴の取得
//! - 異常系：不正なトークン、ストア障害

use std::sync::Arc;

use crate::domain::{
    AccessToken, ConnectionId, Message, MessagePusher, MessageStore, PusherChannel, User,
    UserRepository,
};

use super::error::ConnectError;

/// 接続が確立した参加者のセッション情報
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectedSession {
    pub connection_id: ConnectionId,
    pub user: User,
    /// 永続化されたミュートフラグ
    pub muted: bool,
    /// 追記順のメッセージ履歴
    pub history: Vec<Message>,
}

/// 参加者接続のユースケース
pub struct ConnectParticipantUseCase {
    /// MessageStore（履歴の取得）
    store: Arc<dyn MessageStore>,
    /// UserRepository（本人性の検証）
    users: Arc<dyn UserRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl ConnectParticipantUseCase {
    /// 新しい ConnectParticipantUseCase を作成
    pub fn new(
        store: Arc<dyn MessageStore>,
        users: Arc<dyn UserRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            store,
            users,
            message_pusher,
        }
    }

    /// トークンを検証し、ユーザーを返す
    pub async fn authenticate(&self, token: &AccessToken) -> Result<User, ConnectError> {
        self.users
            .verify_token(token)
            .await
            .map_err(ConnectError::Repository)?
            .ok_or(ConnectError::Unauthenticated)
    }

    /// 参加者接続を実行
    ///
    /// 接続を先に登録してから履歴を読むため、その間に追記されたメッセージは
    /// 履歴とライブ配信の両方に現れることがある（ID で重複を除ける）。
    ///
    /// # Arguments
    ///
    /// * `user` - 認証済みユーザー
    /// * `sender` - クライアントへのメッセージ送信用チャンネル
    pub async fn execute(
        &self,
        user: User,
        sender: PusherChannel,
    ) -> Result<ConnectedSession, ConnectError> {
        let connection_id = ConnectionId::generate();

        // 1. MessagePusher に接続を登録（作者と結び付ける）
        self.message_pusher
            .register_client(connection_id, user.name.clone(), sender)
            .await;

        // 2. 履歴を取得
        let history = match self.store.list_all().await {
            Ok(history) => history,
            Err(e) => {
                self.message_pusher.unregister_client(&connection_id).await;
                return Err(ConnectError::HistoryUnavailable(e));
            }
        };

        // 3. 永続化されたミュートフラグ
        let muted = match self.users.is_muted(&user.id).await {
            Ok(muted) => muted,
            Err(e) => {
                tracing::warn!("Failed to read mute flag for '{}': {}", user.name, e);
                false
            }
        };

        tracing::info!(
            "Connection '{}' opened for '{}' ({} message(s) in history)",
            connection_id,
            user.name,
            history.len()
        );

        Ok(ConnectedSession {
            connection_id,
            user,
            muted,
            history,
        })
    }
}
