//! Open Library client used to enrich authors with a biography and portrait

use async_trait::async_trait;
use serde::Deserialize;

use crate::{
    config::EnrichmentConfig,
    error::{AppError, AppResult},
    models::author::AuthorEnrichment,
};

const USER_AGENT: &str = concat!("homebranch-server/", env!("CARGO_PKG_VERSION"));

/// Source of author biography and photo, looked up by display name
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthorEnrichmentGateway: Send + Sync {
    async fn find_author_enrichment(&self, name: &str) -> AppResult<AuthorEnrichment>;
}

#[derive(Debug, Deserialize)]
struct AuthorSearchResponse {
    #[serde(default)]
    docs: Vec<AuthorSearchDoc>,
}

#[derive(Debug, Deserialize)]
struct AuthorSearchDoc {
    key: Option<String>,
}

/// `bio` is either a bare string or a typed text object
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Bio {
    Text(String),
    Typed { value: String },
}

#[derive(Debug, Deserialize)]
struct AuthorDetails {
    bio: Option<Bio>,
    #[serde(default)]
    photos: Vec<i64>,
}

impl AuthorSearchResponse {
    fn first_key(&self) -> Option<&str> {
        self.docs
            .iter()
            .filter_map(|d| d.key.as_deref())
            .map(|k| k.trim_start_matches("/authors/"))
            .find(|k| !k.is_empty())
    }
}

impl AuthorDetails {
    fn into_enrichment(self, covers_url: &str) -> AuthorEnrichment {
        let biography = self
            .bio
            .map(|bio| match bio {
                Bio::Text(text) => text,
                Bio::Typed { value } => value,
            })
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty());

        // Open Library uses -1 as a placeholder photo id
        let photo_url = self
            .photos
            .into_iter()
            .find(|id| *id > 0)
            .map(|id| format!("{}/a/id/{}-L.jpg", covers_url.trim_end_matches('/'), id));

        AuthorEnrichment {
            biography,
            photo_url,
        }
    }
}

/// HTTP gateway to the Open Library authors API
#[derive(Clone)]
pub struct OpenLibraryGateway {
    http_client: reqwest::Client,
    base_url: String,
    covers_url: String,
}

impl OpenLibraryGateway {
    pub fn new(config: &EnrichmentConfig) -> AppResult<Self> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.timeout())
            .build()?;

        Ok(Self {
            http_client,
            base_url: config.open_library_url.trim_end_matches('/').to_string(),
            covers_url: config.covers_url.clone(),
        })
    }

    async fn get_json<T: for<'de> Deserialize<'de>>(&self, url: &str) -> AppResult<T> {
        tracing::debug!(url = %url, "Querying Open Library");

        let response = self.http_client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Unexpected(format!(
                "Open Library returned {} for {}",
                status, url
            )));
        }

        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl AuthorEnrichmentGateway for OpenLibraryGateway {
    async fn find_author_enrichment(&self, name: &str) -> AppResult<AuthorEnrichment> {
        let search_url = reqwest::Url::parse_with_params(
            &format!("{}/search/authors.json", self.base_url),
            &[("q", name), ("limit", "1")],
        )
        .map_err(|e| AppError::Unexpected(format!("Invalid Open Library URL: {}", e)))?;

        let search: AuthorSearchResponse = self.get_json(search_url.as_str()).await?;
        let Some(key) = search.first_key() else {
            tracing::debug!(author = %name, "No Open Library match");
            return Ok(AuthorEnrichment::default());
        };

        let details: AuthorDetails = self
            .get_json(&format!("{}/authors/{}.json", self.base_url, key))
            .await?;

        Ok(details.into_enrichment(&self.covers_url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const COVERS: &str = "https://covers.openlibrary.org";

    #[test]
    fn test_first_key_strips_prefix() {
        let search: AuthorSearchResponse =
            serde_json::from_str(r#"{"numFound":1,"docs":[{"key":"OL23919A","name":"J. K. Rowling"}]}"#)
                .unwrap();
        assert_eq!(search.first_key(), Some("OL23919A"));

        let prefixed: AuthorSearchResponse =
            serde_json::from_str(r#"{"docs":[{"key":"/authors/OL1A"}]}"#).unwrap();
        assert_eq!(prefixed.first_key(), Some("OL1A"));
    }

    #[test]
    fn test_no_docs_means_no_key() {
        let search: AuthorSearchResponse = serde_json::from_str(r#"{"numFound":0,"docs":[]}"#).unwrap();
        assert_eq!(search.first_key(), None);
    }

    #[test]
    fn test_bio_as_string() {
        let details: AuthorDetails =
            serde_json::from_str(r#"{"bio":"British author.","photos":[5543033]}"#).unwrap();
        let enrichment = details.into_enrichment(COVERS);
        assert_eq!(enrichment.biography.as_deref(), Some("British author."));
        assert_eq!(
            enrichment.photo_url.as_deref(),
            Some("https://covers.openlibrary.org/a/id/5543033-L.jpg")
        );
    }

    #[test]
    fn test_bio_as_typed_object_and_placeholder_photo_skipped() {
        let details: AuthorDetails = serde_json::from_str(
            r#"{"bio":{"type":"/type/text","value":"Novelist."},"photos":[-1, 42]}"#,
        )
        .unwrap();
        let enrichment = details.into_enrichment("https://covers.example/");
        assert_eq!(enrichment.biography.as_deref(), Some("Novelist."));
        assert_eq!(enrichment.photo_url.as_deref(), Some("https://covers.example/a/id/42-L.jpg"));
    }

    #[test]
    fn test_missing_fields_give_empty_enrichment() {
        let details: AuthorDetails = serde_json::from_str(r#"{"name":"Someone"}"#).unwrap();
        assert!(details.into_enrichment(COVERS).is_empty());
    }
}
