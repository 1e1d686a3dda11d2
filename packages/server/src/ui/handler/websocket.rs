//! WebSocket connection handlers.

use std::sync::Arc;

use axum::{
    extract::{
        Query, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    http::StatusCode,
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use serde::Deserialize;
use tokio::sync::mpsc;

use crate::{
    domain::{AccessToken, ConnectionId, User},
    infrastructure::dto::{
        conversion::InboundCommand,
        websocket::{ClientEvent, MessageDto, ServerEvent},
    },
    ui::state::AppState,
    usecase::{ConnectError, ConnectedSession, SendOutcome},
};

/// Query parameters for WebSocket connection
#[derive(Debug, Deserialize)]
pub struct ConnectQuery {
    #[serde(default)]
    pub token: String,
}

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Query(query): Query<ConnectQuery>,
) -> Result<impl IntoResponse, StatusCode> {
    let Ok(token) = AccessToken::new(query.token) else {
        tracing::warn!("WebSocket connection without access token rejected");
        return Err(StatusCode::UNAUTHORIZED);
    };

    let user = match state.connect_participant_usecase.authenticate(&token).await {
        Ok(user) => user,
        Err(ConnectError::Unauthenticated) => {
            tracing::warn!("WebSocket connection with unknown access token rejected");
            return Err(StatusCode::UNAUTHORIZED);
        }
        Err(e) => {
            tracing::error!("Failed to authenticate WebSocket connection: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    // Create a bounded queue for this connection's outbound events
    let (tx, rx) = mpsc::channel(state.queue_capacity);

    // (register_client is called inside the UseCase)
    match state.connect_participant_usecase.execute(user, tx).await {
        Ok(session) => Ok(ws.on_upgrade(move |socket| handle_socket(socket, state, session, rx))),
        Err(ConnectError::HistoryUnavailable(e)) => {
            tracing::error!("Rejecting connection, history is unavailable: {}", e);
            Err(StatusCode::SERVICE_UNAVAILABLE)
        }
        Err(e) => {
            tracing::error!("Failed to connect participant: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Spawns a task that drains the connection's queue into the WebSocket sender.
///
/// # Arguments
///
/// * `rx` - Queue filled by the MessagePusher
/// * `sender` - WebSocket sink to send messages to this client
fn pusher_loop(
    mut rx: mpsc::Receiver<String>,
    mut sender: futures_util::stream::SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
    })
}

fn connected_frame(session: &ConnectedSession) -> Result<String, serde_json::Error> {
    let event = ServerEvent::Connected {
        connection_id: session.connection_id.to_string(),
        author_name: session.user.name.as_str().to_string(),
        author_id: session.user.id.as_str().to_string(),
        muted: session.muted,
        history: session
            .history
            .iter()
            .cloned()
            .map(MessageDto::from)
            .collect(),
    };
    serde_json::to_string(&event)
}

async fn handle_socket(
    socket: WebSocket,
    state: Arc<AppState>,
    session: ConnectedSession,
    rx: mpsc::Receiver<String>,
) {
    let (mut sender, mut receiver) = socket.split();
    let connection_id = session.connection_id;

    // The connected frame goes out before anything queued in rx
    let sent = match connected_frame(&session) {
        Ok(json) => sender.send(Message::Text(json.into())).await.is_ok(),
        Err(e) => {
            tracing::error!("Failed to serialize connected frame: {}", e);
            false
        }
    };
    if !sent {
        tracing::error!("Failed to send connected frame to '{}'", connection_id);
        state
            .disconnect_participant_usecase
            .execute(&connection_id)
            .await;
        return;
    }

    let user = session.user;
    let state_clone = Arc::clone(&state);

    // Spawn a task to receive events from this client
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::error!("WebSocket error: {}", e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    handle_client_event(&state_clone, &connection_id, &user, text.as_str()).await;
                }
                Message::Close(_) => {
                    tracing::info!("Connection '{}' requested close", connection_id);
                    break;
                }
                _ => {}
            }
        }
    });

    // Spawn a task to push queued events to this client
    let mut send_task = pusher_loop(rx, sender);

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    // Use DisconnectParticipantUseCase to handle disconnection
    state
        .disconnect_participant_usecase
        .execute(&connection_id)
        .await;
}

/// Validate one inbound frame and dispatch it. Malformed events are dropped.
async fn handle_client_event(
    state: &AppState,
    connection_id: &ConnectionId,
    user: &User,
    text: &str,
) {
    let event = match serde_json::from_str::<ClientEvent>(text) {
        Ok(event) => event,
        Err(e) => {
            tracing::warn!("Malformed event from '{}' dropped: {}", user.name, e);
            return;
        }
    };

    let command = match InboundCommand::try_from(event) {
        Ok(command) => command,
        Err(e) => {
            tracing::warn!("Invalid event from '{}' dropped: {}", user.name, e);
            return;
        }
    };

    if !command.is_sent_by(user) {
        tracing::warn!(
            "Event on connection '{}' claims an identity other than '{}', dropped",
            connection_id,
            user.name
        );
        return;
    }

    match command {
        InboundCommand::Message {
            text,
            author_name,
            author_id,
        } => {
            match state
                .send_message_usecase
                .execute(connection_id, author_name, author_id, text)
                .await
            {
                Ok(SendOutcome::Delivered {
                    message,
                    recipients,
                }) => {
                    tracing::debug!(
                        "Message {} delivered to {} connection(s)",
                        message.id.value(),
                        recipients
                    );
                }
                Ok(_) => {}
                Err(e) => tracing::warn!("Failed to send message: {}", e),
            }
        }
        InboundCommand::Typing { author_name } => {
            state
                .notify_typing_usecase
                .typing(connection_id, author_name)
                .await;
        }
        InboundCommand::StopTyping => {
            state.notify_typing_usecase.stop_typing(connection_id).await;
        }
    }
}
