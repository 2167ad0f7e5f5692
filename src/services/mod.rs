//! Business operations, one use-case per operation

pub mod authors;
pub mod books;
pub mod bookshelves;
pub mod enrichment;
pub mod open_library;
pub mod roles;
pub mod saved_positions;
pub mod users;

use std::sync::Arc;

use async_trait::async_trait;

use crate::{error::AppResult, repository::Repository};
use enrichment::AuthorEnricher;
use open_library::AuthorEnrichmentGateway;

/// A single application operation
#[async_trait]
pub trait UseCase<Req: Send, Res>: Send + Sync {
    async fn execute(&self, request: Req) -> AppResult<Res>;
}

/// Container for all use-cases, wired from the repositories
#[derive(Clone)]
pub struct Services {
    pub books: books::BookUseCases,
    pub book_shelves: bookshelves::BookShelfUseCases,
    pub roles: roles::RoleUseCases,
    pub users: users::UserUseCases,
    pub saved_positions: saved_positions::SavedPositionUseCases,
    pub authors: authors::AuthorUseCases,
    repository: Repository,
}

impl Services {
    /// Create all use-cases with the given repository and enrichment gateway
    pub fn new(repository: Repository, gateway: Arc<dyn AuthorEnrichmentGateway>) -> Self {
        let enricher = Arc::new(AuthorEnricher::new(gateway, repository.authors.clone()));

        Self {
            books: books::BookUseCases::new(&repository),
            book_shelves: bookshelves::BookShelfUseCases::new(&repository),
            roles: roles::RoleUseCases::new(&repository),
            users: users::UserUseCases::new(&repository),
            saved_positions: saved_positions::SavedPositionUseCases::new(&repository),
            authors: authors::AuthorUseCases::new(&repository, enricher),
            repository,
        }
    }

    /// Check that the backing store answers
    pub async fn ping(&self) -> AppResult<()> {
        self.repository.ping().await
    }
}
