//! MessagePusher trait 定義
//!
//! 接続中クライアントの管理と、イベントの配信（fan-out）を抽象化する。
//! 配信は受信者ごとのベストエフォートで、1 接続の失敗が他の接続への配信を妨げない。

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{AuthorName, ConnectionId, MessagePushError, OutboundEvent};

/// クライアントごとの送信キュー（有界）
pub type PusherChannel = mpsc::Sender<String>;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// 接続を登録し、作者と結び付ける
    async fn register_client(
        &self,
        connection_id: ConnectionId,
        author: AuthorName,
        sender: PusherChannel,
    );

    /// 接続の登録を解除
    async fn unregister_client(&self, connection_id: &ConnectionId);

    /// 特定の接続へ送信
    async fn push_to(
        &self,
        connection_id: &ConnectionId,
        event: &OutboundEvent,
    ) -> Result<(), MessagePushError>;

    /// 指定した作者に結び付いた全接続へ送信し、配信できた接続数を返す
    async fn push_to_author(&self, author: &AuthorName, event: &OutboundEvent) -> usize;

    /// 全接続へ送信し、配信できた接続数を返す
    async fn broadcast_all(&self, event: &OutboundEvent) -> usize;

    /// 送信元以外の全接続へ送信し、配信できた接続数を返す
    async fn broadcast_except(&self, sender: &ConnectionId, event: &OutboundEvent) -> usize;

    /// 接続数
    async fn connected_count(&self) -> usize;
}
