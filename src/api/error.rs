use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

/// Uniform failure envelope: every handler error surfaces to the client
/// as `{"error": message}` with HTTP 500, without distinguishing
/// validation, upstream-API, or authorization failures.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Database(#[from] crate::db::DatabaseError),
    #[error("{0}")]
    Auth(#[from] crate::auth::AuthError),
    #[error("{0}")]
    Platform(#[from] crate::platforms::PlatformError),
    #[error("{0}")]
    OAuth(#[from] crate::oauth::OAuthError),
    #[error("{0}")]
    Ai(#[from] crate::ai::AiError),
    #[error("{0}")]
    Sync(#[from] crate::sync::SyncError),
    #[error("{0}")]
    Message(String),
}

impl ApiError {
    pub fn message(message: impl Into<String>) -> Self {
        ApiError::Message(message.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "request failed");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": self.to_string() })),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_error_kind_maps_to_the_same_envelope() {
        let response = ApiError::message("No authorization header").into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn display_carries_the_underlying_message() {
        let err = ApiError::from(crate::ai::AiError::InvalidAction);
        assert_eq!(err.to_string(), "Invalid action");
    }
}
