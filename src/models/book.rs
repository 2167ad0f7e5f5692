//! Book model and related types

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use super::require_non_empty;
use crate::{error::AppResult, storage::is_plain_file_name};

/// A book in the library
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: String,
    pub title: String,
    pub author: String,
    /// File name of the e-book inside `<uploads>/books`
    pub file_name: String,
    pub is_favorite: bool,
    pub published_year: Option<i32>,
    /// File name of the cover inside `<uploads>/cover-images`
    pub cover_image_file_name: Option<String>,
    pub summary: Option<String>,
}

impl Book {
    /// Build a new book, rejecting an empty title or author.
    ///
    /// Optional attributes start unset and `is_favorite` starts `false`;
    /// use the chained setters to fill them in.
    pub fn create(
        id: impl Into<String>,
        title: impl Into<String>,
        author: impl Into<String>,
        file_name: impl Into<String>,
    ) -> AppResult<Self> {
        let title = title.into();
        let author = author.into();
        require_non_empty(
            &[&title, &author],
            "Title and author are required to create a book.",
        )?;

        Ok(Self {
            id: id.into(),
            title,
            author,
            file_name: file_name.into(),
            is_favorite: false,
            published_year: None,
            cover_image_file_name: None,
            summary: None,
        })
    }

    pub fn favorite(mut self, is_favorite: bool) -> Self {
        self.is_favorite = is_favorite;
        self
    }

    pub fn published_in(mut self, year: Option<i32>) -> Self {
        self.published_year = year;
        self
    }

    pub fn with_cover(mut self, cover_image_file_name: Option<String>) -> Self {
        self.cover_image_file_name = cover_image_file_name;
        self
    }

    pub fn with_summary(mut self, summary: Option<String>) -> Self {
        self.summary = summary;
        self
    }
}

/// Parse a user-supplied publication year. Anything unparsable is dropped.
pub fn parse_published_year(raw: Option<&str>) -> Option<i32> {
    raw.and_then(|s| s.trim().parse::<i32>().ok())
}

/// Uploaded file names must name a file directly inside their upload
/// directory. Empty names are left to the length checks.
fn validate_file_name(name: &str) -> Result<(), ValidationError> {
    if name.is_empty() || is_plain_file_name(name) {
        Ok(())
    } else {
        let mut error = ValidationError::new("file_name");
        error.message = Some("File names must not contain path separators".into());
        Err(error)
    }
}

fn validate_update_files(request: &UpdateBookRequest) -> Result<(), ValidationError> {
    match &request.cover_image_file_name {
        Some(Some(cover)) => validate_file_name(cover),
        _ => Ok(()),
    }
}

/// Create book request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookRequest {
    #[validate(length(min = 1))]
    pub title: String,
    #[validate(length(min = 1))]
    pub author: String,
    #[validate(length(min = 1), custom(function = "validate_file_name"))]
    pub file_name: String,
    pub is_favorite: Option<bool>,
    /// Publication year as submitted by the upload form
    pub published_year: Option<String>,
    #[validate(custom(function = "validate_file_name"))]
    pub cover_image_file_name: Option<String>,
    pub summary: Option<String>,
}

/// Update book request; absent fields keep their current value
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_update_files"))]
pub struct UpdateBookRequest {
    #[serde(skip)]
    pub id: String,
    #[validate(length(min = 1))]
    pub title: Option<String>,
    #[validate(length(min = 1))]
    pub author: Option<String>,
    pub is_favorite: Option<bool>,
    /// `null` clears the year
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<i32>)]
    pub published_year: Option<Option<i32>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<String>)]
    pub cover_image_file_name: Option<Option<String>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<String>)]
    pub summary: Option<Option<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;

    const MESSAGE: &str = "Title and author are required to create a book.";

    #[test]
    fn test_create_with_all_fields() {
        let book = Book::create("book-1", "Test Book", "Test Author", "test.epub")
            .unwrap()
            .favorite(false)
            .published_in(Some(2023))
            .with_cover(Some("cover.jpg".into()));

        assert_eq!(book.id, "book-1");
        assert_eq!(book.title, "Test Book");
        assert_eq!(book.author, "Test Author");
        assert_eq!(book.file_name, "test.epub");
        assert!(!book.is_favorite);
        assert_eq!(book.published_year, Some(2023));
        assert_eq!(book.cover_image_file_name.as_deref(), Some("cover.jpg"));
    }

    #[test]
    fn test_create_minimal_defaults() {
        let book = Book::create("book-2", "Another Book", "Another Author", "another.epub").unwrap();
        assert!(!book.is_favorite);
        assert_eq!(book.published_year, None);
        assert_eq!(book.cover_image_file_name, None);
        assert_eq!(book.summary, None);
    }

    #[test]
    fn test_missing_title_or_author_fails() {
        for (title, author) in [("", "Author"), ("Title", ""), ("", ""), ("   ", "Author")] {
            let err = Book::create("book-x", title, author, "test.epub").unwrap_err();
            assert_eq!(err, AppError::Validation(MESSAGE.to_string()));
        }
    }

    #[test]
    fn test_parse_published_year() {
        assert_eq!(parse_published_year(Some("2015")), Some(2015));
        assert_eq!(parse_published_year(Some(" 1999 ")), Some(1999));
        assert_eq!(parse_published_year(Some("not-a-number")), None);
        assert_eq!(parse_published_year(Some("")), None);
        assert_eq!(parse_published_year(None), None);
    }

    #[test]
    fn test_update_request_distinguishes_null_from_absent() {
        let req: UpdateBookRequest =
            serde_json::from_str(r#"{"publishedYear": null, "isFavorite": false}"#).unwrap();
        assert_eq!(req.published_year, Some(None));
        assert_eq!(req.summary, None);
        assert_eq!(req.is_favorite, Some(false));
    }

    fn create_request(file_name: &str, cover: Option<&str>) -> CreateBookRequest {
        CreateBookRequest {
            title: "Title".into(),
            author: "Author".into(),
            file_name: file_name.into(),
            is_favorite: None,
            published_year: None,
            cover_image_file_name: cover.map(str::to_string),
            summary: None,
        }
    }

    #[test]
    fn test_create_request_rejects_path_file_names() {
        assert!(create_request("book.epub", Some("cover.jpg")).validate().is_ok());
        assert!(create_request("../../etc/passwd", None).validate().is_err());
        assert!(create_request("/srv/library/book.epub", None).validate().is_err());
        assert!(create_request("book.epub", Some("../cover.jpg")).validate().is_err());
        assert!(create_request("", None).validate().is_err());
    }

    #[test]
    fn test_update_request_rejects_path_cover() {
        let mut request = UpdateBookRequest {
            cover_image_file_name: Some(Some("/etc/shadow".into())),
            ..Default::default()
        };
        let err = AppError::from(request.validate().unwrap_err());
        assert!(matches!(err, AppError::Validation(_)));

        request.cover_image_file_name = Some(None);
        assert!(request.validate().is_ok());
        request.cover_image_file_name = Some(Some("cover.jpg".into()));
        assert!(request.validate().is_ok());
    }
}
