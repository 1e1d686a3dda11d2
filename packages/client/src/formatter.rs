//! Event formatting utilities for client display.

use murmur_server::infrastructure::dto::websocket::MessageDto;
use murmur_shared::time::timestamp_to_clock_time;

const RULE: &str = "============================================================";

/// Event formatter for client display
pub struct MessageFormatter;

impl MessageFormatter {
    /// Format the banner printed once the server confirms the connection
    ///
    /// # Arguments
    ///
    /// * `author_name` - The name this connection speaks as
    /// * `muted` - Whether the author is currently muted
    /// * `history` - Messages not shown yet, in append order
    pub fn format_connected(author_name: &str, muted: bool, history: &[MessageDto]) -> String {
        let mut output = String::new();
        output.push_str(&format!("\n\n{}\n", RULE));
        output.push_str(&format!(
            "You are '{}'. Type messages and press Enter to send.\n",
            author_name
        ));
        output.push_str("Commands: /typing, /stop-typing, /quit\n");
        if muted {
            output.push_str("You are currently muted for spamming.\n");
        }
        output.push_str(&format!("{}\n", RULE));

        for message in history {
            output.push_str(&Self::format_message(message, author_name));
        }
        output
    }

    /// Format a chat message
    ///
    /// # Arguments
    ///
    /// * `message` - The message as received from the server
    /// * `current_author` - The current author's name (to mark as "me")
    pub fn format_message(message: &MessageDto, current_author: &str) -> String {
        let me_suffix = if message.author_name == current_author {
            " (me)"
        } else {
            ""
        };
        format!(
            "[{}] @{}{}: {}\n",
            timestamp_to_clock_time(message.created_at),
            message.author_name,
            me_suffix,
            message.text
        )
    }

    pub fn format_typing(author_name: &str) -> String {
        format!("\n… {} is typing\n", author_name)
    }

    pub fn format_spam() -> String {
        "\n! You are sending messages too fast and have been muted.\n".to_string()
    }

    pub fn format_mute_lifted() -> String {
        "\n! Your mute has been lifted. You can send messages again.\n".to_string()
    }

    pub fn format_error(reason: &str) -> String {
        format!("\n! Server error: {}\n", reason)
    }

    /// Format a raw text frame (when parsing fails)
    pub fn format_raw_message(text: &str) -> String {
        format!("\n← Received: {}\n", text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(id: i64, author: &str, text: &str) -> MessageDto {
        MessageDto {
            id,
            text: text.to_string(),
            author_name: author.to_string(),
            created_at: 1672498800000,
        }
    }

    #[test]
    fn test_format_connected_with_empty_history() {
        // テスト項目: 履歴が空の場合、バナーだけが表示される
        // given (前提条件):
        let history = vec![];

        // when (操作):
        let result = MessageFormatter::format_connected("alice", false, &history);

        // then (期待する結果):
        assert!(result.contains("You are 'alice'"));
        assert!(result.contains("/quit"));
        assert!(!result.contains("muted"));
        assert!(!result.contains('@'));
    }

    #[test]
    fn test_format_connected_with_history_and_mute() {
        // テスト項目: 履歴が順に表示され、ミュート中であることが分かる
        // given (前提条件):
        let history = vec![message(1, "alice", "first"), message(2, "bob", "second")];

        // when (操作):
        let result = MessageFormatter::format_connected("alice", true, &history);

        // then (期待する結果):
        assert!(result.contains("currently muted"));
        let first = result.find("first").unwrap();
        let second = result.find("second").unwrap();
        assert!(first < second);
        assert!(result.contains("@alice (me): first"));
        assert!(result.contains("@bob: second"));
    }

    #[test]
    fn test_format_message() {
        // テスト項目: チャットメッセージが時刻付きでフォーマットされる
        // given (前提条件):
        let message = message(1, "bob", "Hello, world!");

        // when (操作):
        let result = MessageFormatter::format_message(&message, "alice");

        // then (期待する結果):
        assert_eq!(result, "[15:00:00] @bob: Hello, world!\n");
    }

    #[test]
    fn test_format_notices() {
        // テスト項目: 通知系のイベントがフォーマットされる
        // when (操作):
        let typing = MessageFormatter::format_typing("bob");
        let spam = MessageFormatter::format_spam();
        let lifted = MessageFormatter::format_mute_lifted();
        let error = MessageFormatter::format_error("message could not be saved");

        // then (期待する結果):
        assert!(typing.contains("bob is typing"));
        assert!(spam.contains("muted"));
        assert!(lifted.contains("lifted"));
        assert!(error.contains("message could not be saved"));
    }

    #[test]
    fn test_format_raw_message() {
        // テスト項目: 生メッセージが正しくフォーマットされる
        // given (前提条件):
        let text = "unknown message format";

        // when (操作):
        let result = MessageFormatter::format_raw_message(text);

        // then (期待する結果):
        assert!(result.contains("unknown message format"));
        assert!(result.contains("Received:"));
    }
}
