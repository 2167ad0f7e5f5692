//! Failure taxonomy for Homebranch server
//!
//! Every fallible operation returns [`AppResult<T>`]. Expected business
//! failures (not-found, conflicts, validation, permission denial) are plain
//! values of [`AppError`]; infrastructure errors are folded into
//! [`AppError::Unexpected`] at the point where they cross into the core.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Main application error type
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    #[error("Book not found")]
    BookNotFound,

    #[error("Book shelf not found")]
    BookShelfNotFound,

    #[error("Role not found")]
    RoleNotFound,

    #[error("User not found")]
    UserNotFound,

    #[error("Saved position not found")]
    SavedPositionNotFound,

    #[error("Author not found")]
    AuthorNotFound,

    #[error("A role with this name already exists")]
    DuplicateRoleName,

    #[error("Role is assigned to one or more users")]
    RoleHasUsers,

    #[error("Already exists: {0}")]
    AlreadyExists(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("{0}")]
    Unexpected(String),
}

impl AppError {
    /// Stable machine-readable code for this failure
    pub fn code(&self) -> &'static str {
        match self {
            AppError::BookNotFound => "BOOK_NOT_FOUND",
            AppError::BookShelfNotFound => "BOOKSHELF_NOT_FOUND",
            AppError::RoleNotFound => "ROLE_NOT_FOUND",
            AppError::UserNotFound => "USER_NOT_FOUND",
            AppError::SavedPositionNotFound => "SAVED_POSITION_NOT_FOUND",
            AppError::AuthorNotFound => "AUTHOR_NOT_FOUND",
            AppError::DuplicateRoleName => "DUPLICATE_ROLE_NAME",
            AppError::RoleHasUsers => "ROLE_HAS_USERS",
            AppError::AlreadyExists(_) => "ALREADY_EXISTS",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::Authentication(_) => "UNAUTHORIZED",
            AppError::Forbidden(_) => "FORBIDDEN",
            AppError::Unexpected(_) => "UNEXPECTED_ERROR",
        }
    }

    /// Human-readable message
    pub fn message(&self) -> String {
        self.to_string()
    }

    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            AppError::BookNotFound
                | AppError::BookShelfNotFound
                | AppError::RoleNotFound
                | AppError::UserNotFound
                | AppError::SavedPositionNotFound
                | AppError::AuthorNotFound
        )
    }

    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            AppError::DuplicateRoleName | AppError::RoleHasUsers | AppError::AlreadyExists(_)
        )
    }

    fn status(&self) -> StatusCode {
        match self {
            e if e.is_not_found() => StatusCode::NOT_FOUND,
            e if e.is_conflict() => StatusCode::CONFLICT,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Authentication(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        tracing::error!("Database error: {:?}", e);
        AppError::Unexpected(format!("Database error: {}", e))
    }
}

impl From<std::io::Error> for AppError {
    fn from(e: std::io::Error) -> Self {
        tracing::error!("I/O error: {:?}", e);
        AppError::Unexpected(format!("I/O error: {}", e))
    }
}

impl From<reqwest::Error> for AppError {
    fn from(e: reqwest::Error) -> Self {
        AppError::Unexpected(format!("HTTP error: {}", e))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(e: validator::ValidationErrors) -> Self {
        AppError::Validation(e.to_string())
    }
}

/// Error response body
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub code: String,
    pub error: String,
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        let message = match &self {
            AppError::Unexpected(msg) => {
                tracing::error!("Internal error: {}", msg);
                "Internal server error".to_string()
            }
            other => other.message(),
        };

        let body = Json(ErrorResponse {
            code: self.code().to_string(),
            error: status
                .canonical_reason()
                .unwrap_or("Error")
                .to_string(),
            message,
        });

        (status, body).into_response()
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
