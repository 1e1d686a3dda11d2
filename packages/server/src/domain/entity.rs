//! Entity 定義

use serde::Serialize;

use super::{AuthorId, AuthorName, MessageId, MessageText, Timestamp};

/// 永続化済みのチャットメッセージ（不変）
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    pub id: MessageId,
    pub text: MessageText,
    pub author_name: AuthorName,
    pub author_id: AuthorId,
    pub created_at: Timestamp,
}

/// ストアに追加する前のメッセージ（ID はストアが採番する）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMessage {
    pub text: MessageText,
    pub author_name: AuthorName,
    pub author_id: AuthorId,
    pub created_at: Timestamp,
}

impl NewMessage {
    pub fn new(
        text: MessageText,
        author_name: AuthorName,
        author_id: AuthorId,
        created_at: Timestamp,
    ) -> Self {
        Self {
            text,
            author_name,
            author_id,
            created_at,
        }
    }

    /// ストアが採番した ID を付与して永続化済みメッセージにする
    pub fn into_message(self, id: MessageId) -> Message {
        Message {
            id,
            text: self.text,
            author_name: self.author_name,
            author_id: self.author_id,
            created_at: self.created_at,
        }
    }
}

/// チャット参加者（認証済みユーザー）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: AuthorId,
    pub name: AuthorName,
    /// 永続化されたミュートフラグ
    pub muted: bool,
    pub created_at: Timestamp,
}

impl User {
    pub fn new(id: AuthorId, name: AuthorName, created_at: Timestamp) -> Self {
        Self {
            id,
            name,
            muted: false,
            created_at,
        }
    }
}
