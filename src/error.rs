use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

/// A single field that failed request validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// The JSON name of the offending field.
    pub field: String,
    /// A human-readable description of the failed rule.
    pub message: String,
}

/// The application's error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// A database error.
    #[error("Database error: {0}")]
    Database(#[from] tokio_postgres::Error),

    /// A connection pool error.
    #[error("Pool error: {0}")]
    Pool(#[from] deadpool_postgres::PoolError),

    /// A Redis error.
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    /// Password hashing or verification could not run.
    #[error("Password hash error: {0}")]
    PasswordHash(String),

    /// A token could not be signed.
    #[error("Token error: {0}")]
    Token(String),

    /// An authentication error.
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// A validation error.
    #[error("Validation error: {0}")]
    Validation(String),

    /// One or more request fields broke their rules.
    #[error("Validation failed on {} field(s)", .0.len())]
    InvalidFields(Vec<FieldError>),

    /// The request body could not be understood.
    #[error("Unprocessable entity: {0}")]
    UnprocessableEntity(String),

    /// A resource not found error.
    ///
    /// Existing clients expect `400` here, not `404`.
    #[error("Not found: {0}")]
    NotFound(String),

    /// A unique constraint would be violated.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// An internal server error.
    #[error("Internal server error: {0}")]
    Internal(String),
}

/// A `Result` type that uses `AppError` as the error type.
pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    fields: Option<&'a [FieldError]>,
}

impl AppError {
    /// The HTTP status this error is reported with.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Database(_)
            | AppError::Pool(_)
            | AppError::Redis(_)
            | AppError::PasswordHash(_)
            | AppError::Token(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Authentication(_) => StatusCode::UNAUTHORIZED,
            AppError::Validation(_) | AppError::InvalidFields(_) | AppError::NotFound(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::UnprocessableEntity(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Conflict(_) => StatusCode::CONFLICT,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let message = match self {
            AppError::Database(ref e) => {
                tracing::error!("Database error: {}", e);
                "Database error".to_string()
            }

            AppError::Pool(ref e) => {
                tracing::error!("Pool error: {}", e);
                "Database error".to_string()
            }

            AppError::Redis(ref e) => {
                tracing::error!("Redis error: {}", e);
                "Failed to store session".to_string()
            }

            AppError::PasswordHash(ref msg) => {
                tracing::error!("Password hash error: {}", msg);
                "Failed to hash password".to_string()
            }

            AppError::Token(ref msg) => {
                tracing::error!("Token error: {}", msg);
                "Could not create token".to_string()
            }

            AppError::Authentication(ref msg) => {
                tracing::warn!("Authentication failed: {}", msg);
                msg.clone()
            }

            AppError::Validation(ref msg) => {
                tracing::debug!("Validation error: {}", msg);
                msg.clone()
            }

            AppError::InvalidFields(ref fields) => {
                tracing::debug!("Validation failed: {:?}", fields);
                "Validation failed".to_string()
            }

            AppError::UnprocessableEntity(ref msg) => {
                tracing::debug!("Unprocessable entity: {}", msg);
                msg.clone()
            }

            AppError::NotFound(ref msg) => {
                tracing::debug!("Resource not found: {}", msg);
                msg.clone()
            }

            AppError::Conflict(ref msg) => {
                tracing::info!("Conflict: {}", msg);
                msg.clone()
            }

            AppError::Internal(ref msg) => {
                tracing::error!("Internal error: {}", msg);
                "Internal server error".to_string()
            }
        };

        let fields = match self {
            AppError::InvalidFields(ref fields) => Some(fields.as_slice()),
            _ => None,
        };

        let body = sonic_rs::to_string(&ErrorBody {
            error: &message,
            fields,
        })
        .unwrap_or_else(|_| r#"{"error":"Internal server error"}"#.to_string());

        (status, [(header::CONTENT_TYPE, "application/json")], body).into_response()
    }
}
