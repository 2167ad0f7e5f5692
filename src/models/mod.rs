//! Domain entities, factories and request types for Homebranch

pub mod author;
pub mod book;
pub mod bookshelf;
pub mod pagination;
pub mod permission;
pub mod role;
pub mod saved_position;
pub mod user;

// Re-export commonly used types
pub use author::Author;
pub use book::Book;
pub use bookshelf::BookShelf;
pub use pagination::{Page, PaginatedQuery};
pub use permission::Permission;
pub use role::Role;
pub use saved_position::SavedPosition;
pub use user::User;

use crate::error::{AppError, AppResult};

/// Fails with `message` unless every value has non-whitespace content
pub(crate) fn require_non_empty(values: &[&str], message: &str) -> AppResult<()> {
    if values.iter().any(|v| v.trim().is_empty()) {
        return Err(AppError::Validation(message.to_string()));
    }
    Ok(())
}

/// Generate a fresh opaque identifier for a new entity
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
