//! Conversion logic between DTOs and domain types.

use murmur_shared::time::timestamp_to_rfc3339;

use crate::domain::{
    AuthorId, AuthorName, Message, MessageText, OutboundEvent, User, ValueObjectError,
};
use crate::infrastructure::dto::{http, websocket as dto};

/// A client event whose fields passed value-object validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundCommand {
    Message {
        text: MessageText,
        author_name: AuthorName,
        author_id: AuthorId,
    },
    Typing {
        author_name: AuthorName,
    },
    StopTyping,
}

impl InboundCommand {
    /// Whether the identity carried by the event matches the authenticated user.
    pub fn is_sent_by(&self, user: &User) -> bool {
        match self {
            Self::Message {
                author_name,
                author_id,
                ..
            } => author_name == &user.name && author_id == &user.id,
            Self::Typing { author_name } => author_name == &user.name,
            Self::StopTyping => true,
        }
    }
}

// ========================================
// DTO → Domain
// ========================================

impl TryFrom<dto::ClientEvent> for InboundCommand {
    type Error = ValueObjectError;

    fn try_from(event: dto::ClientEvent) -> Result<Self, Self::Error> {
        match event {
            dto::ClientEvent::Message {
                text,
                author_name,
                author_id,
            } => Ok(Self::Message {
                text: MessageText::new(text)?,
                author_name: AuthorName::new(author_name)?,
                author_id: AuthorId::new(author_id)?,
            }),
            dto::ClientEvent::Typing { author_name } => Ok(Self::Typing {
                author_name: AuthorName::new(author_name)?,
            }),
            dto::ClientEvent::StopTyping => Ok(Self::StopTyping),
        }
    }
}

// ========================================
// Domain → DTO
// ========================================

impl From<Message> for dto::MessageDto {
    fn from(model: Message) -> Self {
        Self {
            id: model.id.value(),
            text: model.text.into_string(),
            author_name: model.author_name.into_string(),
            created_at: model.created_at.value(),
        }
    }
}

impl From<Message> for http::MessageDetailDto {
    fn from(model: Message) -> Self {
        Self {
            id: model.id.value(),
            text: model.text.into_string(),
            author_name: model.author_name.into_string(),
            author_id: model.author_id.into_string(),
            created_at: timestamp_to_rfc3339(model.created_at.value()),
        }
    }
}

impl From<OutboundEvent> for dto::ServerEvent {
    fn from(event: OutboundEvent) -> Self {
        match event {
            OutboundEvent::Message(message) => Self::Message(message.into()),
            OutboundEvent::Spam => Self::Spam,
            OutboundEvent::Typing(author_name) => Self::Typing {
                author_name: author_name.into_string(),
            },
            OutboundEvent::StopTyping => Self::StopTyping,
            OutboundEvent::MuteLifted => Self::MuteLifted,
            OutboundEvent::Error(reason) => Self::Error { reason },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{MessageId, Timestamp};

    const ALICE_ID: &str = "0123456789abcdef0123456789abcdef";

    fn alice() -> User {
        User::new(
            AuthorId::new(ALICE_ID.to_string()).unwrap(),
            AuthorName::new("alice".to_string()).unwrap(),
            Timestamp::new(0),
        )
    }

    #[test]
    fn test_client_message_to_command() {
        // テスト項目: 妥当な message イベントはコマンドに変換される
        // given (前提条件):
        let event = dto::ClientEvent::Message {
            text: "hello".to_string(),
            author_name: "alice".to_string(),
            author_id: ALICE_ID.to_string(),
        };

        // when (操作):
        let command = InboundCommand::try_from(event).unwrap();

        // then (期待する結果):
        assert!(command.is_sent_by(&alice()));
        assert!(matches!(command, InboundCommand::Message { .. }));
    }

    #[test]
    fn test_blank_text_is_rejected() {
        // テスト項目: 空白のみのテキストは変換に失敗する
        // given (前提条件):
        let event = dto::ClientEvent::Message {
            text: "   ".to_string(),
            author_name: "alice".to_string(),
            author_id: ALICE_ID.to_string(),
        };

        // when (操作):
        let result = InboundCommand::try_from(event);

        // then (期待する結果):
        assert_eq!(result, Err(ValueObjectError::MessageTextEmpty));
    }

    #[test]
    fn test_impersonation_is_detected() {
        // テスト項目: 認証済みユーザーと異なる名前を名乗るイベントを検出できる
        // given (前提条件):
        let event = dto::ClientEvent::Typing {
            author_name: "mallory".to_string(),
        };

        // when (操作):
        let command = InboundCommand::try_from(event).unwrap();

        // then (期待する結果):
        assert!(!command.is_sent_by(&alice()));
    }

    #[test]
    fn test_domain_message_to_http_dto() {
        // テスト項目: HTTP 用 DTO では作成日時が RFC 3339 になる
        // given (前提条件):
        let message = Message {
            id: MessageId::new(3),
            text: MessageText::new("hi".to_string()).unwrap(),
            author_name: AuthorName::new("alice".to_string()).unwrap(),
            author_id: AuthorId::new(ALICE_ID.to_string()).unwrap(),
            created_at: Timestamp::new(0),
        };

        // when (操作):
        let dto: http::MessageDetailDto = message.into();

        // then (期待する結果):
        assert_eq!(dto.id, 3);
        assert_eq!(dto.author_id, ALICE_ID);
        assert!(dto.created_at.starts_with("1970-01-01T00:00:00"));
    }

    #[test]
    fn test_outbound_error_event_to_dto() {
        // テスト項目: エラーイベントは理由付きで変換される
        // when (操作):
        let event: dto::ServerEvent = OutboundEvent::Error("boom".to_string()).into();

        // then (期待する結果):
        assert_eq!(
            event,
            dto::ServerEvent::Error {
                reason: "boom".to_string()
            }
        );
    }
}
