use actix_web::{HttpResponse, http::StatusCode};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Business and infrastructure failures. The repository raises `NotFound`,
/// `Conflict` and `Database`; the handlers add `Validation` and
/// `Unauthorized`. The `ResponseError` impl below is the only place error
/// kinds are mapped to HTTP status codes.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error(transparent)]
    Database(#[from] sqlx::Error),
    #[error("{0}")]
    Internal(String),
}

impl actix_web::ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Database(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            // Log the detail, return a generic message.
            ApiError::Database(e) => {
                error!(error = %e, "database failure");
                HttpResponse::InternalServerError().json(json!({"error": "Internal server error"}))
            }
            ApiError::Internal(msg) => {
                error!(error = %msg, "internal failure");
                HttpResponse::InternalServerError().json(json!({"error": "Internal server error"}))
            }
            _ => HttpResponse::build(self.status_code()).json(json!({"error": self.to_string()})),
        }
    }
}
