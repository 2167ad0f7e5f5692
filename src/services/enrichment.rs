//! Background author enrichment
//!
//! Listing authors must not wait on the external catalog. Authors without a
//! biography or portrait are handed to an [`EnrichmentScheduler`], which runs
//! one detached task per author. Failures inside a task are logged and dropped;
//! the next listing retries since the fields are still empty.

use std::sync::Arc;

use tokio::task::JoinHandle;

use super::open_library::AuthorEnrichmentGateway;
use crate::{error::AppResult, models::Author, repository::AuthorRepository};

/// Submits authors for enrichment without waiting for the outcome
#[cfg_attr(test, mockall::automock)]
pub trait EnrichmentScheduler: Send + Sync {
    fn schedule(&self, authors: Vec<Author>) -> Vec<JoinHandle<()>>;
}

#[derive(Clone)]
pub struct AuthorEnricher {
    gateway: Arc<dyn AuthorEnrichmentGateway>,
    authors: Arc<dyn AuthorRepository>,
}

impl AuthorEnricher {
    pub fn new(gateway: Arc<dyn AuthorEnrichmentGateway>, authors: Arc<dyn AuthorRepository>) -> Self {
        Self { gateway, authors }
    }

    /// Task boundary: errors end here as warnings
    async fn enrich_logged(self, author: Author) {
        let name = author.name.clone();
        if let Err(e) = self.enrich(author).await {
            tracing::warn!(author = %name, error = %e, "Background enrichment failed");
        }
    }

    async fn enrich(&self, author: Author) -> AppResult<()> {
        let enrichment = self.gateway.find_author_enrichment(&author.name).await?;
        if enrichment.is_empty() {
            tracing::debug!(author = %author.name, "Nothing found to enrich author");
            return Ok(());
        }

        let updated = Author::create(
            author.id,
            author.name.as_str(),
            enrichment.biography,
            enrichment.photo_url,
        )?;
        self.authors.update_by_name(&author.name, &updated).await?;

        tracing::info!(author = %author.name, "Author enriched");
        Ok(())
    }
}

impl EnrichmentScheduler for AuthorEnricher {
    fn schedule(&self, authors: Vec<Author>) -> Vec<JoinHandle<()>> {
        authors
            .into_iter()
            .map(|author| tokio::spawn(self.clone().enrich_logged(author)))
            .collect()
    }
}
