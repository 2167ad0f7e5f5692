//! Repository layer for database operations

pub mod authors;
pub mod books;
pub mod bookshelves;
pub mod roles;
pub mod saved_positions;
pub mod users;

use std::sync::Arc;

use sqlx::{Pool, Postgres};

pub use authors::AuthorRepository;
pub use books::BookRepository;
pub use bookshelves::BookShelfRepository;
pub use roles::RoleRepository;
pub use saved_positions::SavedPositionRepository;
pub use users::UserRepository;

use crate::storage::FileStorage;

/// Main repository struct holding the database pool and every entity repository
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub books: Arc<dyn BookRepository>,
    pub book_shelves: Arc<dyn BookShelfRepository>,
    pub roles: Arc<dyn RoleRepository>,
    pub users: Arc<dyn UserRepository>,
    pub saved_positions: Arc<dyn SavedPositionRepository>,
    pub authors: Arc<dyn AuthorRepository>,
}

impl Repository {
    /// Create the PostgreSQL-backed repositories over one pool
    pub fn new(pool: Pool<Postgres>, storage: FileStorage) -> Self {
        Self {
            books: Arc::new(books::PgBookRepository::new(pool.clone(), storage)),
            book_shelves: Arc::new(bookshelves::PgBookShelfRepository::new(pool.clone())),
            roles: Arc::new(roles::PgRoleRepository::new(pool.clone())),
            users: Arc::new(users::PgUserRepository::new(pool.clone())),
            saved_positions: Arc::new(saved_positions::PgSavedPositionRepository::new(pool.clone())),
            authors: Arc::new(authors::PgAuthorRepository::new(pool.clone())),
            pool,
        }
    }

    /// Check database connectivity
    pub async fn ping(&self) -> crate::error::AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
