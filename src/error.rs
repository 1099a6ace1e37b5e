use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde_json::json;
use thiserror::Error;

/// Errors surfaced by the HTTP handlers and the repositories behind them.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Parse(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    Internal(String),

    #[error("database error: {0}")]
    Store(#[from] sqlx::Error),
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        AppError::Validation(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        AppError::NotFound(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        AppError::Conflict(message.into())
    }
}

/// SQLSTATE for `unique_violation`.
pub const UNIQUE_VIOLATION: &str = "23505";

/// SQLSTATE for `foreign_key_violation`.
pub const FOREIGN_KEY_VIOLATION: &str = "23503";

fn has_sqlstate(err: &sqlx::Error, code: &str) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.code().as_deref() == Some(code),
        _ => false,
    }
}

/// True when the error is a unique-constraint violation reported by the database.
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    has_sqlstate(err, UNIQUE_VIOLATION)
}

/// True when a referenced row is gone, e.g. an employee deleted mid-request.
pub fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    has_sqlstate(err, FOREIGN_KEY_VIOLATION)
}

/// Name of the constraint a database error reports, if any.
pub fn violated_constraint(err: &sqlx::Error) -> Option<&str> {
    match err {
        sqlx::Error::Database(db_err) => db_err.constraint(),
        _ => None,
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::Parse(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Internal(_) | AppError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            AppError::Store(e) => {
                tracing::error!(error = %e, "Store operation failed");
                "Internal Server Error".to_string()
            }
            other => other.to_string(),
        };

        HttpResponse::build(self.status_code()).json(json!({ "error": message }))
    }
}
