//! UseCase: 入力中通知（handleTyping / handleStopTyping）
//!
//! 永続化もスロットル判定も行わず、そのまま配信する。

use std::sync::Arc;

use crate::domain::{AuthorName, ConnectionId, MessagePusher, OutboundEvent};

/// 入力中通知のユースケース
pub struct NotifyTypingUseCase {
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl NotifyTypingUseCase {
    /// 新しい NotifyTypingUseCase を作成
    pub fn new(message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self { message_pusher }
    }

    /// `typing` を送信者以外の全接続へ配信
    pub async fn typing(&self, origin: &ConnectionId, author: AuthorName) -> usize {
        let delivered = self
            .message_pusher
            .broadcast_except(origin, &OutboundEvent::Typing(author))
            .await;
        tracing::debug!("Broadcasted typing from '{}' to {} connection(s)", origin, delivered);
        delivered
    }

    /// `stop-typing` を送信者を含む全接続へ配信
    pub async fn stop_typing(&self, origin: &ConnectionId) -> usize {
        let delivered = self
            .message_pusher
            .broadcast_all(&OutboundEvent::StopTyping)
            .await;
        tracing::debug!(
            "Broadcasted stop-typing from '{}' to {} connection(s)",
            origin,
            delivered
        );
        delivered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::message_pusher::WebSocketMessagePusher;
    use tokio::sync::mpsc;

    async fn connect(
        pusher: &WebSocketMessagePusher,
        name: &str,
    ) -> (ConnectionId, mpsc::Receiver<String>) {
        let (tx, rx) = mpsc::channel(8);
        let connection_id = ConnectionId::generate();
        pusher
            .register_client(
                connection_id,
                AuthorName::new(name.to_string()).unwrap(),
                tx,
            )
            .await;
        (connection_id, rx)
    }

    #[tokio::test]
    async fn test_typing_is_not_echoed_to_sender() {
        // テスト項目: typing は送信者には届かず、他の全員に作者名付きで届く
        // given (前提条件):
        let pusher = Arc::new(WebSocketMessagePusher::new());
        let (alice, mut alice_rx) = connect(&pusher, "alice").await;
        let (_bob, mut bob_rx) = connect(&pusher, "bob").await;
        let (_charlie, mut charlie_rx) = connect(&pusher, "charlie").await;
        let usecase = NotifyTypingUseCase::new(pusher);

        // when (操作):
        let delivered = usecase
            .typing(&alice, AuthorName::new("alice".to_string()).unwrap())
            .await;

        // then (期待する結果):
        let expected = r#"{"type":"typing","authorName":"alice"}"#.to_string();
        assert_eq!(delivered, 2);
        assert_eq!(bob_rx.recv().await, Some(expected.clone()));
        assert_eq!(charlie_rx.recv().await, Some(expected));
        assert!(alice_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_stop_typing_reaches_everyone_including_sender() {
        // テスト項目: stop-typing は送信者を含む全員に届く
        // given (前提条件):
        let pusher = Arc::new(WebSocketMessagePusher::new());
        let (alice, mut alice_rx) = connect(&pusher, "alice").await;
        let (_bob, mut bob_rx) = connect(&pusher, "bob").await;
        let usecase = NotifyTypingUseCase::new(pusher);

        // when (操作):
        let delivered = usecase.stop_typing(&alice).await;

        // then (期待する結果):
        let expected = r#"{"type":"stop-typing"}"#.to_string();
        assert_eq!(delivered, 2);
        assert_eq!(alice_rx.recv().await, Some(expected.clone()));
        assert_eq!(bob_rx.recv().await, Some(expected));
    }
}
