//! User registration over the HTTP API.

use murmur_server::infrastructure::dto::http::{
    ErrorDto, RegisterUserRequest, RegisterUserResponse,
};
use reqwest::StatusCode;

use crate::error::ClientError;

/// Register `name` and return the issued identity and access token
pub async fn register_user(
    http_base: &str,
    name: &str,
) -> Result<RegisterUserResponse, ClientError> {
    let url = format!("{}/api/users", http_base);
    let response = reqwest::Client::new()
        .post(&url)
        .json(&RegisterUserRequest {
            name: name.to_string(),
        })
        .send()
        .await
        .map_err(|e| ClientError::ConnectionError(e.to_string()))?;

    match response.status() {
        StatusCode::CREATED => response
            .json::<RegisterUserResponse>()
            .await
            .map_err(|e| ClientError::Registration(e.to_string())),
        StatusCode::CONFLICT => Err(ClientError::NameTaken(name.to_string())),
        StatusCode::BAD_REQUEST => {
            let reason = response
                .json::<ErrorDto>()
                .await
                .map(|body| body.error)
                .unwrap_or_else(|_| "invalid name".to_string());
            Err(ClientError::InvalidName(reason))
        }
        status => Err(ClientError::Registration(format!(
            "unexpected status {}",
            status
        ))),
    }
}
