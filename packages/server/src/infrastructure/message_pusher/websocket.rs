//! WebSocket を使った MessagePusher 実装（接続レジストリ）
//!
//! ## 責務
//!
//! - 接続ごとの有界キュー（`mpsc::Sender`）と作者の対応を管理
//! - クライアントへのイベント送信（push_to, broadcast_all, broadcast_except）
//!
//! ## 設計ノート
//!
//! キューの生成と WebSocket への書き込みは UI 層（`ui/handler/websocket.rs`）が行う。
//! ここでは `try_send` だけを使うため、遅い受信者がいても配信処理はブロックしない。
//!
//! - キューが満杯：その受信者への今回のイベントだけを破棄（接続は残す）
//! - キューが閉じている：接続を登録解除

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::{Mutex, mpsc::error::TrySendError};

use crate::{
    domain::{
        AuthorName, ConnectionId, MessagePushError, MessagePusher, OutboundEvent, PusherChannel,
    },
    infrastructure::dto::websocket::ServerEvent,
};

struct ConnectionEntry {
    author: AuthorName,
    sender: PusherChannel,
}

enum Delivery {
    Sent,
    /// キューが満杯で破棄した
    Dropped,
    /// 受信側が閉じている
    Closed,
}

fn deliver(connection_id: &ConnectionId, entry: &ConnectionEntry, payload: &str) -> Delivery {
    match entry.sender.try_send(payload.to_string()) {
        Ok(()) => Delivery::Sent,
        Err(TrySendError::Full(_)) => {
            tracing::warn!(
                "Outbound queue of connection '{}' ({}) is full, dropping event",
                connection_id,
                entry.author
            );
            Delivery::Dropped
        }
        Err(TrySendError::Closed(_)) => Delivery::Closed,
    }
}

fn serialize(event: &OutboundEvent) -> Option<String> {
    match serde_json::to_string(&ServerEvent::from(event.clone())) {
        Ok(json) => Some(json),
        Err(e) => {
            tracing::error!("Failed to serialize '{}' event: {}", event.kind(), e);
            None
        }
    }
}

/// WebSocket を使った MessagePusher 実装
///
/// ## 使用例
///
/// ```ignore
/// let pusher = WebSocketMessagePusher::new();
/// let (tx, rx) = tokio::sync::mpsc::channel(64);
/// pusher.register_client(connection_id, author, tx).await;
/// pusher.broadcast_all(&OutboundEvent::StopTyping).await;
/// ```
#[derive(Default)]
pub struct WebSocketMessagePusher {
    /// 接続中のクライアント
    clients: Mutex<HashMap<ConnectionId, ConnectionEntry>>,
}

impl WebSocketMessagePusher {
    /// 新しい WebSocketMessagePusher を作成
    pub fn new() -> Self {
        Self::default()
    }

    /// `filter` を満たす接続へ配信し、閉じていた接続を登録解除する
    async fn fan_out<F>(&self, event: &OutboundEvent, filter: F) -> usize
    where
        F: Fn(&ConnectionId, &ConnectionEntry) -> bool,
    {
        let Some(payload) = serialize(event) else {
            return 0;
        };

        let mut clients = self.clients.lock().await;
        let mut delivered = 0;
        let mut closed = Vec::new();

        for (connection_id, entry) in clients.iter() {
            if !filter(connection_id, entry) {
                continue;
            }
            match deliver(connection_id, entry, &payload) {
                Delivery::Sent => delivered += 1,
                Delivery::Dropped => {}
                Delivery::Closed => closed.push(*connection_id),
            }
        }

        for connection_id in closed {
            clients.remove(&connection_id);
            tracing::debug!(
                "Connection '{}' was closed, removed during '{}' fan-out",
                connection_id,
                event.kind()
            );
        }

        delivered
    }
}

#[async_trait]
impl MessagePusher for WebSocketMessagePusher {
    async fn register_client(
        &self,
        connection_id: ConnectionId,
        author: AuthorName,
        sender: PusherChannel,
    ) {
        let mut clients = self.clients.lock().await;
        tracing::debug!(
            "Connection '{}' registered to MessagePusher as '{}'",
            connection_id,
            author
        );
        clients.insert(connection_id, ConnectionEntry { author, sender });
    }

    async fn unregister_client(&self, connection_id: &ConnectionId) {
        let mut clients = self.clients.lock().await;
        if clients.remove(connection_id).is_some() {
            tracing::debug!(
                "Connection '{}' unregistered from MessagePusher",
                connection_id
            );
        }
    }

    async fn push_to(
        &self,
        connection_id: &ConnectionId,
        event: &OutboundEvent,
    ) -> Result<(), MessagePushError> {
        let payload = serialize(event)
            .ok_or_else(|| MessagePushError::PushFailed("serialization failed".to_string()))?;

        let mut clients = self.clients.lock().await;
        let entry = clients
            .get(connection_id)
            .ok_or_else(|| MessagePushError::ConnectionNotFound(connection_id.to_string()))?;

        match deliver(connection_id, entry, &payload) {
            Delivery::Sent => {
                tracing::debug!("Pushed '{}' to connection '{}'", event.kind(), connection_id);
                Ok(())
            }
            Delivery::Dropped => Err(MessagePushError::PushFailed(
                "outbound queue is full".to_string(),
            )),
            Delivery::Closed => {
                clients.remove(connection_id);
                Err(MessagePushError::PushFailed(
                    "connection is closed".to_string(),
                ))
            }
        }
    }

    async fn push_to_author(&self, author: &AuthorName, event: &OutboundEvent) -> usize {
        self.fan_out(event, |_, entry| &entry.author == author).await
    }

    async fn broadcast_all(&self, event: &OutboundEvent) -> usize {
        self.fan_out(event, |_, _| true).await
    }

    async fn broadcast_except(&self, sender: &ConnectionId, event: &OutboundEvent) -> usize {
        self.fan_out(event, |connection_id, _| connection_id != sender)
            .await
    }

    async fn connected_count(&self) -> usize {
        self.clients.lock().await.len()
    }
}
