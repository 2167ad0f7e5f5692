//! Offset pagination shared by every listing

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use super::{Author, Book, BookShelf, Role, User};

pub const DEFAULT_LIMIT: i64 = 20;
pub const MAX_LIMIT: i64 = 100;

/// Listing parameters, forwarded untouched from controller to repository
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PaginatedQuery {
    /// Free-text filter (only honored by listings that support it)
    pub query: Option<String>,
    /// Page size (default 20, max 100)
    pub limit: Option<i64>,
    /// Number of records to skip
    pub offset: Option<i64>,
}

impl PaginatedQuery {
    pub fn new(limit: Option<i64>, offset: Option<i64>) -> Self {
        Self {
            query: None,
            limit,
            offset,
        }
    }
}

/// Apply defaults and bounds to raw limit/offset values
pub fn resolve_bounds(limit: Option<i64>, offset: Option<i64>) -> (i64, i64) {
    let limit = limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
    let offset = offset.unwrap_or(0).max(0);
    (limit, offset)
}

/// One page of results
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[aliases(
    BookPage = Page<Book>,
    BookShelfPage = Page<BookShelf>,
    RolePage = Page<Role>,
    UserPage = Page<User>,
    AuthorPage = Page<Author>
)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub limit: i64,
    pub offset: i64,
    pub total: i64,
    /// Offset of the next page, `null` on the last page
    pub next_cursor: Option<i64>,
}

impl<T> Page<T> {
    pub fn new(data: Vec<T>, limit: i64, offset: i64, total: i64) -> Self {
        let next_cursor = offset.checked_add(limit).filter(|next| *next < total);
        Self {
            data,
            limit,
            offset,
            total,
            next_cursor,
        }
    }

    pub fn empty(limit: i64, offset: i64) -> Self {
        Self::new(Vec::new(), limit, offset, 0)
    }
}
