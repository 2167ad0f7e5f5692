//! Author model

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::require_non_empty;
use crate::error::AppResult;

/// Author known to the library, optionally enriched from an external catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Author {
    pub id: String,
    pub name: String,
    pub biography: Option<String>,
    pub profile_picture_url: Option<String>,
}

impl Author {
    pub fn create(
        id: impl Into<String>,
        name: impl Into<String>,
        biography: Option<String>,
        profile_picture_url: Option<String>,
    ) -> AppResult<Self> {
        let name = name.into();
        require_non_empty(&[&name], "Name is required to create an author.")?;

        Ok(Self {
            id: id.into(),
            name,
            biography,
            profile_picture_url,
        })
    }

    /// True when the author has an identity and neither enrichment field is set
    pub fn needs_enrichment(&self) -> bool {
        !self.id.is_empty() && self.biography.is_none() && self.profile_picture_url.is_none()
    }
}

/// Data returned by an enrichment source for an author name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthorEnrichment {
    pub biography: Option<String>,
    pub photo_url: Option<String>,
}

impl AuthorEnrichment {
    pub fn is_empty(&self) -> bool {
        self.biography.is_none() && self.photo_url.is_none()
    }
}
