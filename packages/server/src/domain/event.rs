//! クライアントへ送る出力イベント
//!
//! ワイヤ形式への変換は Infrastructure 層（DTO）が行う。

use super::{AuthorName, Message};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutboundEvent {
    /// 永続化済みメッセージ（送信者を含む全員へ）
    Message(Message),
    /// スパム判定（送信者のみへ）
    Spam,
    /// 入力中通知（送信者以外へ）
    Typing(AuthorName),
    /// 入力終了通知（全員へ）
    StopTyping,
    /// ミュート解除（該当作者の接続へ）
    MuteLifted,
    /// 単一接続へのエラー通知
    Error(String),
}

impl OutboundEvent {
    /// ログ出力用のイベント名
    pub fn kind(&self) -> &'static str {
        match self {
            OutboundEvent::Message(_) => "message",
            OutboundEvent::Spam => "spam",
            OutboundEvent::Typing(_) => "typing",
            OutboundEvent::StopTyping => "stop-typing",
            OutboundEvent::MuteLifted => "mute-lifted",
            OutboundEvent::Error(_) => "error",
        }
    }
}
