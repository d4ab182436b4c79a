use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;
use tracing::error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("{0}")]
    Validation(String),
    #[error("user with this email already exists")]
    DuplicateEmail,
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("authentication failed")]
    Unauthenticated,
    #[error("authorization denied")]
    Forbidden,
    #[error("listing not found")]
    ListingNotFound(Uuid),
    #[error("internal error: {0}")]
    Internal(String),
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
}

impl ResponseError for DomainError {
    fn status_code(&self) -> StatusCode {
        match self {
            DomainError::Validation(_) | DomainError::DuplicateEmail => StatusCode::BAD_REQUEST,
            DomainError::InvalidCredentials | DomainError::Unauthenticated => {
                StatusCode::UNAUTHORIZED
            }
            DomainError::Forbidden => StatusCode::FORBIDDEN,
            DomainError::ListingNotFound(_) => StatusCode::NOT_FOUND,
            DomainError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            DomainError::Internal(cause) => {
                error!(%cause, "request failed");
                "internal server error".to_string()
            }
            other => other.to_string(),
        };
        let details = match self {
            DomainError::ListingNotFound(resource) => Some(json!({ "resource": resource })),
            _ => None,
        };
        let body = ErrorBody {
            message: message.as_str(),
            details,
        };
        HttpResponse::build(self.status_code()).json(body)
    }
}
