//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode};

use crate::{
    infrastructure::dto::http::{
        HealthDto, MessageListDto, RegisterUserRequest, RegisterUserResponse,
    },
    ui::{error::ApiError, state::AppState},
};

/// Health check endpoint
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthDto> {
    Json(HealthDto {
        status: "ok".to_string(),
        connections: state.message_pusher.connected_count().await,
    })
}

/// Get the full message history in append order
pub async fn get_messages(
    State(state): State<Arc<AppState>>,
) -> Result<Json<MessageListDto>, ApiError> {
    let messages = state.get_message_history_usecase.execute().await?;

    // Domain Model から DTO への変換
    Ok(Json(MessageListDto {
        messages: messages.into_iter().map(Into::into).collect(),
    }))
}

/// Register a new user and hand out its access token
pub async fn register_user(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RegisterUserRequest>,
) -> Result<(StatusCode, Json<RegisterUserResponse>), ApiError> {
    let (user, token) = state.register_user_usecase.execute(request.name).await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterUserResponse {
            author_id: user.id.into_string(),
            author_name: user.name.into_string(),
            token: token.as_str().to_string(),
        }),
    ))
}
