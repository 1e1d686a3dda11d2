//! Error types for the chat client.

use thiserror::Error;

/// Client-specific errors
#[derive(Debug, Error)]
pub enum ClientError {
    /// The server rejected the access token
    #[error("Access token was rejected by the server")]
    Unauthorized,

    /// The requested display name is already registered
    #[error("Name '{0}' is already taken")]
    NameTaken(String),

    /// The requested display name is not acceptable
    #[error("Name was rejected: {0}")]
    InvalidName(String),

    /// Registration request failed for another reason
    #[error("Registration failed: {0}")]
    Registration(String),

    /// The server sent something other than the expected frame
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// Connection error
    #[error("Connection error: {0}")]
    ConnectionError(String),
}
