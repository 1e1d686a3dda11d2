//! WebSocket client session management.

use futures_util::{SinkExt, StreamExt};
use murmur_server::infrastructure::dto::websocket::{ClientEvent, ServerEvent};
use tokio::sync::mpsc;
use tokio_tungstenite::{
    connect_async,
    tungstenite::{self, http::StatusCode, protocol::Message},
};

use crate::error::ClientError;

use super::{
    domain::{Input, MessageCursor, parse_input, websocket_url},
    formatter::MessageFormatter,
    ui::redisplay_prompt,
};

/// Who this connection speaks as, as confirmed by the server
struct Identity {
    author_name: String,
    author_id: String,
}

/// Run one WebSocket client session until the user quits or the connection drops
///
/// # Arguments
///
/// * `url` - WebSocket endpoint without the token
/// * `token` - Access token issued at registration
/// * `input_rx` - Lines typed by the user
/// * `cursor` - Which messages were already printed, kept across reconnects
pub async fn run_client_session(
    url: &str,
    token: &str,
    input_rx: &mut mpsc::UnboundedReceiver<String>,
    cursor: &mut MessageCursor,
) -> Result<(), ClientError> {
    let (ws_stream, _response) = match connect_async(websocket_url(url, token)).await {
        Ok(result) => result,
        Err(tungstenite::Error::Http(response))
            if response.status() == StatusCode::UNAUTHORIZED =>
        {
            return Err(ClientError::Unauthorized);
        }
        Err(e) => return Err(ClientError::ConnectionError(e.to_string())),
    };

    tracing::info!("Connected to chat server!");

    let (mut write, mut read) = ws_stream.split();

    // The first frame is always `connected`
    let identity = loop {
        match read.next().await {
            Some(Ok(Message::Text(text))) => {
                match serde_json::from_str::<ServerEvent>(text.as_str()) {
                    Ok(ServerEvent::Connected {
                        author_name,
                        author_id,
                        muted,
                        history,
                        ..
                    }) => {
                        let unseen = cursor.unseen_history(history, |message| message.id);
                        print!(
                            "{}",
                            MessageFormatter::format_connected(&author_name, muted, &unseen)
                        );
                        redisplay_prompt();
                        break Identity {
                            author_name,
                            author_id,
                        };
                    }
                    _ => {
                        return Err(ClientError::Protocol(format!(
                            "expected a connected frame, got: {}",
                            text
                        )));
                    }
                }
            }
            Some(Ok(_)) => continue,
            Some(Err(e)) => return Err(ClientError::ConnectionError(e.to_string())),
            None => {
                return Err(ClientError::ConnectionError(
                    "Connection closed before handshake".to_string(),
                ));
            }
        }
    };

    loop {
        tokio::select! {
            frame = read.next() => match frame {
                Some(Ok(Message::Text(text))) => {
                    print_server_event(text.as_str(), &identity, cursor);
                }
                Some(Ok(Message::Close(_))) | None => {
                    tracing::info!("Server closed the connection");
                    return Err(ClientError::ConnectionError("Connection lost".to_string()));
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    tracing::warn!("WebSocket read error: {}", e);
                    return Err(ClientError::ConnectionError(e.to_string()));
                }
            },
            line = input_rx.recv() => {
                // Input thread ended (Ctrl+C / Ctrl+D)
                let Some(line) = line else {
                    let _ = write.send(Message::Close(None)).await;
                    return Ok(());
                };

                let event = match parse_input(&line) {
                    Input::Message(text) => ClientEvent::Message {
                        text,
                        author_name: identity.author_name.clone(),
                        author_id: identity.author_id.clone(),
                    },
                    Input::Typing => ClientEvent::Typing {
                        author_name: identity.author_name.clone(),
                    },
                    Input::StopTyping => ClientEvent::StopTyping,
                    Input::Quit => {
                        let _ = write.send(Message::Close(None)).await;
                        return Ok(());
                    }
                    Input::Unknown(command) => {
                        println!("Unknown command: {}", command);
                        redisplay_prompt();
                        continue;
                    }
                };

                let json = match serde_json::to_string(&event) {
                    Ok(json) => json,
                    Err(e) => {
                        tracing::error!("Failed to serialize event: {}", e);
                        continue;
                    }
                };

                if let Err(e) = write.send(Message::Text(json.into())).await {
                    tracing::warn!("Failed to send event: {}", e);
                    return Err(ClientError::ConnectionError(e.to_string()));
                }
            }
        }
    }
}

fn print_server_event(text: &str, identity: &Identity, cursor: &mut MessageCursor) {
    let formatted = match serde_json::from_str::<ServerEvent>(text) {
        Ok(ServerEvent::Message(message)) => {
            if !cursor.observe_live(message.id) {
                return;
            }
            format!(
                "\n{}",
                MessageFormatter::format_message(&message, &identity.author_name)
            )
        }
        Ok(ServerEvent::Typing { author_name }) => MessageFormatter::format_typing(&author_name),
        // Nothing to show once typing stops
        Ok(ServerEvent::StopTyping) => String::new(),
        Ok(ServerEvent::Spam) => MessageFormatter::format_spam(),
        Ok(ServerEvent::MuteLifted) => MessageFormatter::format_mute_lifted(),
        Ok(ServerEvent::Error { reason }) => MessageFormatter::format_error(&reason),
        Ok(ServerEvent::Connected { .. }) | Err(_) => MessageFormatter::format_raw_message(text),
    };

    if formatted.is_empty() {
        return;
    }
    print!("{}", formatted);
    redisplay_prompt();
}
