//! Server error types

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use spy_sdk::SdkError;
use std::fmt;

/// Message shown when the learner's statements cannot be fetched
pub const INVALID_IDENTIFIER_MESSAGE: &str = "Identifiant invalide.";

/// Message shown when the login form is submitted blank
pub const EMPTY_IDENTIFIER_MESSAGE: &str = "Veuillez entrer un identifiant.";

/// Server error type
#[derive(Debug)]
pub enum ServerError {
    /// Statements of the identifier could not be fetched
    InvalidIdentifier,

    /// Blank identifier
    EmptyIdentifier,

    /// Invalid request
    InvalidRequest(String),

    /// Internal server error
    InternalError(String),
}

impl fmt::Display for ServerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServerError::InvalidIdentifier => write!(f, "{}", INVALID_IDENTIFIER_MESSAGE),
            ServerError::EmptyIdentifier => write!(f, "{}", EMPTY_IDENTIFIER_MESSAGE),
            ServerError::InvalidRequest(msg) => write!(f, "Invalid request: {}", msg),
            ServerError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ServerError {}

impl ServerError {
    pub fn status(&self) -> StatusCode {
        match self {
            ServerError::InvalidIdentifier => StatusCode::NOT_FOUND,
            ServerError::EmptyIdentifier | ServerError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ServerError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error_message = match self {
            ServerError::InvalidRequest(msg) | ServerError::InternalError(msg) => msg,
            other => other.to_string(),
        };

        let body = Json(json!({
            "error": error_message,
            "status": status.as_u16(),
        }));

        (status, body).into_response()
    }
}

impl From<SdkError> for ServerError {
    fn from(err: SdkError) -> Self {
        match err {
            SdkError::EmptyIdentifier => ServerError::EmptyIdentifier,
            ref e if e.is_source_error() => {
                tracing::warn!("Statements unavailable: {}", e);
                ServerError::InvalidIdentifier
            }
            other => ServerError::InternalError(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_messages() {
        assert_eq!(ServerError::InvalidIdentifier.to_string(), "Identifiant invalide.");
        assert_eq!(
            ServerError::EmptyIdentifier.to_string(),
            "Veuillez entrer un identifiant."
        );
    }

    #[test]
    fn test_invalid_request_display() {
        let err = ServerError::InvalidRequest("missing field".to_string());
        assert_eq!(err.to_string(), "Invalid request: missing field");
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(ServerError::InvalidIdentifier.status(), StatusCode::NOT_FOUND);
        assert_eq!(ServerError::EmptyIdentifier.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ServerError::InternalError("crash".to_string()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ServerError>();
    }
}
