use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Message substituted when the backend could not be reached at all.
pub const CONNECTION_ERROR_MESSAGE: &str = "connection error";

#[derive(Error, Debug)]
pub enum ApiError {
    /// HTTP 401. The stored session has already been cleared when this is returned.
    #[error("Not authenticated: {0}")]
    Unauthorized(String),

    #[error("The API request returned an error ({status}): {message}")]
    Server { status: u16, message: String },

    #[error("Failed to reach the API: {0}")]
    Connection(#[from] reqwest::Error),

    #[error("Failed to deserialize the API response: {0}")]
    Deserialization(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Session storage error: {0}")]
    Session(#[from] SessionError),
}

impl ApiError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized(_))
    }

    /// The user-facing message: the backend's own text when it sent one,
    /// a generic connection message otherwise.
    pub fn message(&self) -> String {
        match self {
            ApiError::Unauthorized(message) | ApiError::Server { message, .. } => message.clone(),
            ApiError::Connection(_) => CONNECTION_ERROR_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }
}

/// The uniform `{ "error": "..." }` shape every failed call is reported as.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorPayload {
    pub error: String,
}

impl From<&ApiError> for ErrorPayload {
    fn from(err: &ApiError) -> Self {
        Self { error: err.message() }
    }
}

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Failed to read or write the session file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to encode the session: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_messages_are_forwarded() {
        let err = ApiError::Server {
            status: 404,
            message: "Equipa não encontrada.".to_string(),
        };
        assert_eq!(
            ErrorPayload::from(&err),
            ErrorPayload { error: "Equipa não encontrada.".to_string() }
        );
    }

    #[test]
    fn unauthorized_is_recognised() {
        let err = ApiError::Unauthorized("Token has expired".to_string());
        assert!(err.is_unauthorized());
        assert_eq!(err.message(), "Token has expired");
        assert!(!ApiError::InvalidRequest("x".to_string()).is_unauthorized());
    }
}
