//! HTTP API errors.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::{
    infrastructure::dto::http::ErrorDto,
    usecase::{GetMessageHistoryError, RegisterUserError},
};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<RegisterUserError> for ApiError {
    fn from(e: RegisterUserError) -> Self {
        match e {
            RegisterUserError::InvalidName(_) => Self::BadRequest(e.to_string()),
            RegisterUserError::DuplicateName(_) => Self::Conflict(e.to_string()),
            RegisterUserError::Repository(_) => Self::Internal(e.to_string()),
        }
    }
}

impl From<GetMessageHistoryError> for ApiError {
    fn from(e: GetMessageHistoryError) -> Self {
        Self::Internal(e.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            ApiError::Conflict(_) => (StatusCode::CONFLICT, self.to_string()),
            ApiError::Internal(detail) => {
                tracing::error!("Request failed: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        (status, Json(ErrorDto { error: message })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ValueObjectError;

    #[test]
    fn test_register_errors_map_to_status_codes() {
        // テスト項目: ユーザー登録のエラーが適切なステータスコードになる
        // given (前提条件):
        let invalid: ApiError =
            RegisterUserError::InvalidName(ValueObjectError::AuthorNameEmpty).into();
        let duplicate: ApiError = RegisterUserError::DuplicateName("alice".to_string()).into();

        // when (操作):
        let invalid = invalid.into_response();
        let duplicate = duplicate.into_response();

        // then (期待する結果):
        assert_eq!(invalid.status(), StatusCode::BAD_REQUEST);
        assert_eq!(duplicate.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_internal_error_hides_detail() {
        // テスト項目: 内部エラーは 500 になる
        // given (前提条件):
        let error = ApiError::Internal("disk I/O error".to_string());

        // when (操作):
        let response = error.into_response();

        // then (期待する結果):
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
