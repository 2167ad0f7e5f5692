//! Author use-cases

use std::sync::Arc;

use async_trait::async_trait;

use super::{enrichment::EnrichmentScheduler, UseCase};
use crate::{
    error::AppResult,
    models::{Author, Page, PaginatedQuery},
    repository::{AuthorRepository, Repository},
};

/// Lists authors and queues the unenriched ones for background enrichment
pub struct GetAuthorsUseCase {
    authors: Arc<dyn AuthorRepository>,
    enrichment: Arc<dyn EnrichmentScheduler>,
}

impl GetAuthorsUseCase {
    pub fn new(authors: Arc<dyn AuthorRepository>, enrichment: Arc<dyn EnrichmentScheduler>) -> Self {
        Self {
            authors,
            enrichment,
        }
    }
}

#[async_trait]
impl UseCase<PaginatedQuery, Page<Author>> for GetAuthorsUseCase {
    async fn execute(&self, query: PaginatedQuery) -> AppResult<Page<Author>> {
        let page = self
            .authors
            .find_all(query.query, query.limit, query.offset)
            .await?;

        let pending: Vec<Author> = page
            .data
            .iter()
            .filter(|a| a.needs_enrichment())
            .cloned()
            .collect();
        if !pending.is_empty() {
            tracing::debug!(count = pending.len(), "Scheduling author enrichment");
            // Handles are dropped: the tasks keep running detached
            drop(self.enrichment.schedule(pending));
        }

        Ok(page)
    }
}

pub struct GetAuthorByIdUseCase {
    authors: Arc<dyn AuthorRepository>,
}

impl GetAuthorByIdUseCase {
    pub fn new(authors: Arc<dyn AuthorRepository>) -> Self {
        Self { authors }
    }
}

#[async_trait]
impl UseCase<String, Author> for GetAuthorByIdUseCase {
    async fn execute(&self, id: String) -> AppResult<Author> {
        self.authors.find_by_id(&id).await
    }
}

#[derive(Clone)]
pub struct AuthorUseCases {
    pub list: Arc<GetAuthorsUseCase>,
    pub get_by_id: Arc<GetAuthorByIdUseCase>,
}

impl AuthorUseCases {
    pub fn new(repository: &Repository, enrichment: Arc<dyn EnrichmentScheduler>) -> Self {
        Self {
            list: Arc::new(GetAuthorsUseCase::new(repository.authors.clone(), enrichment)),
            get_by_id: Arc::new(GetAuthorByIdUseCase::new(repository.authors.clone())),
        }
    }
}
