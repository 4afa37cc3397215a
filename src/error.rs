use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Failure taxonomy for the HTTP surface. Every handler converts whatever
/// goes wrong into one of these at its own boundary; nothing propagates past
/// a handler.
#[derive(Debug, Error)]
pub enum ApiError {
    /// A required request field is missing or empty.
    #[error("{0}")]
    Validation(String),
    /// A record with the same unique identity already exists.
    #[error("{0}")]
    Conflict(String),
    /// Bad credentials or a missing bearer token.
    #[error("{0}")]
    Auth(String),
    /// A presented token failed signature or expiry checks.
    #[error("{0}")]
    Forbidden(String),
    /// The referenced record no longer exists.
    #[error("{0}")]
    NotFound(String),
    /// Anything unexpected. The cause is logged, never sent to the client.
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::Conflict(_) => StatusCode::BAD_REQUEST,
            ApiError::Auth(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        ApiError::Internal(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            ApiError::Internal(err) => {
                error!(error = %err, "internal error");
                "Server error".to_string()
            }
            other => other.to_string(),
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}
