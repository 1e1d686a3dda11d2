//! UseCase: メッセージ送信処理（handleMessage）
//!
//! ## 処理の流れ
//!
//! 1. `MuteTracker` で連投判定
//! 2. スパム判定なら送信者にだけ `spam` を送って終了
//!    （永続化されたミュートフラグは `MuteTracker` の通知先が立てる）
//! 3. 受理ならストアへ追記し、追記が成功してから全接続（送信者を含む）へ配信
//!
//! ストアへの追記が失敗した場合はその 1 通だけを破棄し、送信者にだけエラーを返す。
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - SendMessageUseCase::execute() メソッド
//!
//! ### どのような状況を想定しているか
//! - 正常系：メッセージの永続化と全員への配信
//! - 異常系：ストア障害（送信者にだけエラー、配信なし）
//! - エッジケース：連投によるスパム判定、ミュート中の送信、作者ごとの ID の単調増加、
//!   複数作者の同時送信で ID 順と配信順が入れ替わる場合

use std::sync::Arc;

use murmur_shared::time::Clock;

use crate::domain::{
    AttemptOutcome, AuthorId, AuthorName, ConnectionId, Message, MessagePusher, MessageStore,
    MessageText, NewMessage, OutboundEvent, Timestamp,
};

use super::{error::SendMessageError, mute_tracker::MuteTracker};

/// ストア障害時に送信者へ返す理由
const STORE_FAILURE_REASON: &str = "message could not be saved";

/// メッセージ送信の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    /// 永続化して配信した
    Delivered { message: Message, recipients: usize },
    /// 連投の閾値を超えたためミュートを開始した
    RejectedSpam,
    /// ミュート中のため破棄した
    RejectedMuted,
}

/// メッセージ送信のユースケース
pub struct SendMessageUseCase {
    /// MessageStore（追記専用のメッセージストア）
    store: Arc<dyn MessageStore>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
    /// MuteTracker（連投判定）
    mute_tracker: Arc<MuteTracker>,
    clock: Arc<dyn Clock>,
}

impl SendMessageUseCase {
    /// 新しい SendMessageUseCase を作成
    pub fn new(
        store: Arc<dyn MessageStore>,
        message_pusher: Arc<dyn MessagePusher>,
        mute_tracker: Arc<MuteTracker>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            message_pusher,
            mute_tracker,
            clock,
        }
    }

    /// メッセージ送信を実行
    ///
    /// # Arguments
    ///
    /// * `origin` - メッセージを受信した接続
    /// * `author_name` - 作者の表示名（スロットルのキー）
    /// * `author_id` - 作者の ID
    /// * `text` - 本文
    ///
    /// # Returns
    ///
    /// * `Ok(SendOutcome)` - 配信した、またはスパム判定で破棄した
    /// * `Err(SendMessageError)` - 永続化に失敗した（配信していない）
    pub async fn execute(
        &self,
        origin: &ConnectionId,
        author_name: AuthorName,
        author_id: AuthorId,
        text: MessageText,
    ) -> Result<SendOutcome, SendMessageError> {
        match self.mute_tracker.record_attempt(&author_name).await {
            AttemptOutcome::RejectedSpam => {
                tracing::warn!("Spam detected from '{}', muting", author_name);
                self.notify_origin(origin, &OutboundEvent::Spam).await;
                Ok(SendOutcome::RejectedSpam)
            }
            AttemptOutcome::RejectedMuted => {
                tracing::debug!("Dropped message from muted author '{}'", author_name);
                Ok(SendOutcome::RejectedMuted)
            }
            AttemptOutcome::Accepted => {
                let new_message = NewMessage::new(
                    text,
                    author_name,
                    author_id,
                    Timestamp::new(self.clock.now_millis()),
                );

                // 1. 永続化（配信より先）
                let id = match self.store.append(new_message.clone()).await {
                    Ok(id) => id,
                    Err(e) => {
                        tracing::error!(
                            "Failed to append message from '{}': {}",
                            new_message.author_name,
                            e
                        );
                        self.notify_origin(
                            origin,
                            &OutboundEvent::Error(STORE_FAILURE_REASON.to_string()),
                        )
                        .await;
                        return Err(e.into());
                    }
                };
                let message = new_message.into_message(id);

                // 2. 全接続へ配信
                let recipients = self
                    .message_pusher
                    .broadcast_all(&OutboundEvent::Message(message.clone()))
                    .await;
                tracing::info!(
                    "Message {} from '{}' delivered to {} connection(s)",
                    message.id.value(),
                    message.author_name,
                    recipients
                );

                Ok(SendOutcome::Delivered {
                    message,
                    recipients,
                })
            }
        }
    }

    async fn notify_origin(&self, origin: &ConnectionId, event: &OutboundEvent) {
        if let Err(e) = self.message_pusher.push_to(origin, event).await {
            tracing::warn!(
                "Failed to send '{}' to connection '{}': {}",
                event.kind(),
                origin,
                e
            );
        }
    }
}
