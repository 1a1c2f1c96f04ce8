use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use super::auth::{HashError, TokenError};
use super::repository::RepositoryError;
use super::uploads::UploadError;
use super::validation::ValidationErrors;

/// Error raised at the operation boundary of every records service.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationErrors),
    #[error("{0}")]
    BadRequest(String),
    #[error(transparent)]
    Upload(#[from] UploadError),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Hashing(#[from] HashError),
    #[error(transparent)]
    Signing(#[from] TokenError),
}

impl ServiceError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::Validation(_) | ServiceError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ServiceError::Upload(error) if error.is_client_error() => StatusCode::BAD_REQUEST,
            ServiceError::NotFound(_) | ServiceError::Repository(RepositoryError::NotFound) => {
                StatusCode::NOT_FOUND
            }
            ServiceError::Conflict(_) | ServiceError::Repository(RepositoryError::Conflict(_)) => {
                StatusCode::CONFLICT
            }
            ServiceError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ServiceError::Upload(_)
            | ServiceError::Repository(RepositoryError::Unavailable(_))
            | ServiceError::Hashing(_)
            | ServiceError::Signing(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable machine-readable label placed in the `error` field of the envelope.
    pub fn label(&self) -> &'static str {
        if self.status_code().is_server_error() {
            return "internal_error";
        }
        match self {
            ServiceError::Validation(_) => "validation_error",
            ServiceError::Upload(_) => "upload_error",
            ServiceError::NotFound(_) | ServiceError::Repository(RepositoryError::NotFound) => {
                "not_found"
            }
            ServiceError::Conflict(_) | ServiceError::Repository(_) => "conflict",
            ServiceError::Unauthorized(_) => "unauthorized",
            _ => "bad_request",
        }
    }

    /// Caller-facing message. Server-side failures never expose their cause.
    pub fn public_message(&self) -> String {
        match self {
            ServiceError::Repository(RepositoryError::Conflict(_)) => {
                "Record already exists".to_string()
            }
            ServiceError::Repository(RepositoryError::NotFound) => "Record not found".to_string(),
            other if other.status_code().is_server_error() => "Internal Server Error".to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::warn!(error = %self, code = status.as_u16(), "request rejected");
        }

        let mut body = json!({
            "message": self.public_message(),
            "success": false,
            "code": status.as_u16(),
            "error": self.label(),
        });
        if let ServiceError::Validation(errors) = &self {
            body["errors"] = json!(errors.violations());
        }

        (status, Json(body)).into_response()
    }
}
