//! UseCase: 参加者切断処理

use std::sync::Arc;

use crate::domain::{ConnectionId, MessagePusher};

/// 参加者切断のユースケース
pub struct DisconnectParticipantUseCase {
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl DisconnectParticipantUseCase {
    /// 新しい DisconnectParticipantUseCase を作成
    pub fn new(message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self { message_pusher }
    }

    /// 参加者切断を実行
    ///
    /// すでに登録解除されている接続（送信失敗で外れたものなど）に対しても安全に呼べる。
    ///
    /// # Returns
    ///
    /// 残りの接続数
    pub async fn execute(&self, connection_id: &ConnectionId) -> usize {
        self.message_pusher.unregister_client(connection_id).await;
        let remaining = self.message_pusher.connected_count().await;
        tracing::info!(
            "Connection '{}' closed ({} connection(s) remaining)",
            connection_id,
            remaining
        );
        remaining
    }
}
