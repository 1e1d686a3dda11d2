//! Domain logic for client-side operations.
//!
//! This module contains pure functions that implement client behavior
//! without side effects, making them easy to test.

use std::collections::BTreeSet;

use crate::error::ClientError;

/// One line typed by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Message(String),
    Typing,
    StopTyping,
    Quit,
    /// A `/command` the client does not know
    Unknown(String),
}

/// Interpret a trimmed, non-empty input line.
pub fn parse_input(line: &str) -> Input {
    match line {
        "/quit" => Input::Quit,
        "/typing" => Input::Typing,
        "/stop-typing" => Input::StopTyping,
        command if command.starts_with('/') => Input::Unknown(command.to_string()),
        text => Input::Message(text.to_string()),
    }
}

/// Decides which messages still need printing, across reconnects.
///
/// Every message with an id up to `history_bound` arrived in a `connected`
/// history and was printed then. Live messages are not broadcast in id order
/// across authors, so ids above the bound are tracked one by one until a later
/// history covers them.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MessageCursor {
    history_bound: Option<i64>,
    live_seen: BTreeSet<i64>,
}

impl MessageCursor {
    /// Keep the history entries not shown yet, then raise the bound to the
    /// newest history id.
    pub fn unseen_history<T>(&mut self, history: Vec<T>, id_of: impl Fn(&T) -> i64) -> Vec<T> {
        let newest = history.iter().map(&id_of).max();
        let unseen: Vec<T> = history
            .into_iter()
            .filter(|message| self.is_unseen(id_of(message)))
            .collect();

        if let Some(newest) = newest {
            self.history_bound = Some(self.history_bound.map_or(newest, |b| b.max(newest)));
        }
        if let Some(bound) = self.history_bound {
            self.live_seen = self.live_seen.split_off(&(bound + 1));
        }
        unseen
    }

    /// Record a live message and report whether it should be printed.
    pub fn observe_live(&mut self, id: i64) -> bool {
        self.is_unseen(id) && self.live_seen.insert(id)
    }

    fn is_unseen(&self, id: i64) -> bool {
        let above_bound = self.history_bound.is_none_or(|bound| id > bound);
        above_bound && !self.live_seen.contains(&id)
    }
}

/// Append the access token to the WebSocket URL.
pub fn websocket_url(url: &str, token: &str) -> String {
    let separator = if url.contains('?') { '&' } else { '?' };
    format!("{}{}token={}", url, separator, token)
}

/// Derive the HTTP base URL (`http://host:port`) from the WebSocket URL.
pub fn http_base_url(ws_url: &str) -> Result<String, ClientError> {
    let (scheme, rest) = if let Some(rest) = ws_url.strip_prefix("ws://") {
        ("http", rest)
    } else if let Some(rest) = ws_url.strip_prefix("wss://") {
        ("https", rest)
    } else {
        return Err(ClientError::ConnectionError(format!(
            "URL must start with ws:// or wss://: {}",
            ws_url
        )));
    };

    let authority = rest.split(['/', '?']).next().unwrap_or_default();
    if authority.is_empty() {
        return Err(ClientError::ConnectionError(format!(
            "URL has no host: {}",
            ws_url
        )));
    }
    Ok(format!("{}://{}", scheme, authority))
}

/// Check if the client should exit immediately based on the error type.
///
/// # Returns
///
/// `true` if retrying cannot help (bad token or name), `false` otherwise
pub fn should_exit_immediately(error: &ClientError) -> bool {
    matches!(
        error,
        ClientError::Unauthorized | ClientError::NameTaken(_) | ClientError::InvalidName(_)
    )
}

/// Check if the client should attempt to reconnect.
///
/// # Arguments
///
/// * `error` - The client error that occurred
/// * `current_attempt` - The current reconnection attempt count (0-indexed)
/// * `max_attempts` - The maximum number of reconnection attempts allowed
pub fn should_attempt_reconnect(
    error: &ClientError,
    current_attempt: u32,
    max_attempts: u32,
) -> bool {
    // Don't reconnect if the error requires immediate exit
    if should_exit_immediately(error) {
        return false;
    }

    // Don't reconnect if we've exhausted all attempts
    current_attempt < max_attempts
}
