//! WebSocket event DTOs.
//!
//! Every frame is a JSON object tagged by `type` (kebab-case) with camelCase fields.

use serde::{Deserialize, Serialize};

/// Events sent by the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum ClientEvent {
    /// `{"type":"message","text":..,"authorName":..,"authorId":..}`
    Message {
        text: String,
        author_name: String,
        author_id: String,
    },
    /// `{"type":"typing","authorName":..}`
    Typing { author_name: String },
    /// `{"type":"stop-typing"}`
    StopTyping,
}

/// A persisted message as carried over the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageDto {
    pub id: i64,
    pub text: String,
    pub author_name: String,
    /// Unix epoch milliseconds (UTC)
    pub created_at: i64,
}

/// Events sent by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum ServerEvent {
    /// First frame of every connection: who you are plus the full history.
    Connected {
        connection_id: String,
        author_name: String,
        author_id: String,
        muted: bool,
        history: Vec<MessageDto>,
    },
    Message(MessageDto),
    Spam,
    Typing { author_name: String },
    StopTyping,
    MuteLifted,
    Error { reason: String },
}
