//! Book shelf model and related types

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::{require_non_empty, Book};
use crate::error::AppResult;

/// A named, ordered collection of books. A book appears at most once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookShelf {
    pub id: String,
    pub title: String,
    pub books: Vec<Book>,
}

impl BookShelf {
    /// Build a shelf; repeated book ids keep their first occurrence
    pub fn create(
        id: impl Into<String>,
        title: impl Into<String>,
        books: Vec<Book>,
    ) -> AppResult<Self> {
        let title = title.into();
        require_non_empty(&[&title], "Title is required to create a bookshelf.")?;

        let mut unique: Vec<Book> = Vec::with_capacity(books.len());
        for book in books {
            if !unique.iter().any(|b| b.id == book.id) {
                unique.push(book);
            }
        }

        Ok(Self {
            id: id.into(),
            title,
            books: unique,
        })
    }

    pub fn contains_book(&self, book_id: &str) -> bool {
        self.books.iter().any(|b| b.id == book_id)
    }
}

/// Create book shelf request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookShelfRequest {
    #[validate(length(min = 1))]
    pub title: String,
}

/// Update book shelf request
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBookShelfRequest {
    #[serde(skip)]
    pub id: String,
    #[validate(length(min = 1))]
    pub title: Option<String>,
}

/// Add a book to a shelf
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddBookToBookShelfRequest {
    #[serde(skip)]
    pub book_shelf_id: String,
    #[validate(length(min = 1))]
    pub book_id: String,
}

/// Remove a book from a shelf
#[derive(Debug, Clone)]
pub struct RemoveBookFromBookShelfRequest {
    pub book_shelf_id: String,
    pub book_id: String,
}
