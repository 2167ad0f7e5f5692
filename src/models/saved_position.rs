//! Reading positions saved per (book, user)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::require_non_empty;
use crate::error::AppResult;

/// Last reading location of a user in a book. Identified by `(book_id, user_id)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SavedPosition {
    pub book_id: String,
    pub user_id: String,
    /// Opaque location token, e.g. an EPUB CFI
    pub position: String,
    pub device_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SavedPosition {
    /// Build a position; missing timestamps default to now
    pub fn create(
        book_id: impl Into<String>,
        user_id: impl Into<String>,
        position: impl Into<String>,
        device_name: impl Into<String>,
        created_at: Option<DateTime<Utc>>,
        updated_at: Option<DateTime<Utc>>,
    ) -> AppResult<Self> {
        let book_id = book_id.into();
        let user_id = user_id.into();
        require_non_empty(
            &[&book_id, &user_id],
            "Book ID and User ID are required to create a saved position.",
        )?;

        let now = Utc::now();
        Ok(Self {
            book_id,
            user_id,
            position: position.into(),
            device_name: device_name.into(),
            created_at: created_at.unwrap_or(now),
            updated_at: updated_at.unwrap_or(now),
        })
    }
}

/// Save (create or replace) a reading position
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SavePositionRequest {
    #[serde(skip)]
    pub book_id: String,
    #[serde(skip)]
    pub user_id: String,
    #[validate(length(min = 1))]
    pub position: String,
    #[validate(length(min = 1))]
    pub device_name: String,
}

/// Composite key of a saved position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedPositionKey {
    pub book_id: String,
    pub user_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use chrono::TimeZone;

    #[test]
    fn test_create_with_timestamps() {
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let pos = SavedPosition::create(
            "book-1",
            "user-1",
            "epubcfi(/6/4!/4/2/1:0)",
            "Desktop Browser",
            Some(at),
            Some(at),
        )
        .unwrap();
        assert_eq!(pos.position, "epubcfi(/6/4!/4/2/1:0)");
        assert_eq!(pos.created_at, at);
        assert_eq!(pos.updated_at, at);
    }

    #[test]
    fn test_timestamps_default_to_now() {
        let before = Utc::now();
        let pos =
            SavedPosition::create("book-3", "user-3", "epubcfi(/6/4!/4/2/1:25)", "Tablet", None, None)
                .unwrap();
        let after = Utc::now();
        assert!(pos.created_at >= before && pos.created_at <= after);
        assert!(pos.updated_at >= before && pos.updated_at <= after);
    }

    #[test]
    fn test_missing_ids_fail() {
        for (book, user) in [("", "user-5"), ("book-5", ""), ("", "")] {
            assert_eq!(
                SavedPosition::create(book, user, "cfi", "Device", None, None).unwrap_err(),
                AppError::Validation(
                    "Book ID and User ID are required to create a saved position.".into()
                )
            );
        }
    }
}
