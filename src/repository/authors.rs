//! Authors repository

use async_trait::async_trait;
use sqlx::{FromRow, Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::{
        pagination::{resolve_bounds, Page},
        Author,
    },
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthorRepository: Send + Sync {
    /// Page through authors, optionally filtered by a case-insensitive name fragment
    async fn find_all(
        &self,
        query: Option<String>,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> AppResult<Page<Author>>;
    async fn find_by_id(&self, id: &str) -> AppResult<Author>;
    /// Overwrite biography and picture of the author called `name`
    async fn update_by_name(&self, name: &str, author: &Author) -> AppResult<Author>;
}

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct AuthorRow {
    pub id: String,
    pub name: String,
    pub biography: Option<String>,
    pub profile_picture_url: Option<String>,
}

impl From<AuthorRow> for Author {
    fn from(row: AuthorRow) -> Self {
        Author {
            id: row.id,
            name: row.name,
            biography: row.biography,
            profile_picture_url: row.profile_picture_url,
        }
    }
}

impl From<&Author> for AuthorRow {
    fn from(author: &Author) -> Self {
        AuthorRow {
            id: author.id.clone(),
            name: author.name.clone(),
            biography: author.biography.clone(),
            profile_picture_url: author.profile_picture_url.clone(),
        }
    }
}

/// Lowercased `LIKE` pattern matching names that contain `fragment` literally
fn contains_pattern(fragment: &str) -> String {
    let mut pattern = String::with_capacity(fragment.len() + 2);
    pattern.push('%');
    for c in fragment.to_lowercase().chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

#[derive(Clone)]
pub struct PgAuthorRepository {
    pool: Pool<Postgres>,
}

impl PgAuthorRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuthorRepository for PgAuthorRepository {
    async fn find_all(
        &self,
        query: Option<String>,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> AppResult<Page<Author>> {
        let (limit, offset) = resolve_bounds(limit, offset);
        let pattern = query
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map(contains_pattern);

        let total: i64 = sqlx::query_scalar(
            r"SELECT COUNT(*) FROM authors WHERE ($1::text IS NULL OR LOWER(name) LIKE $1 ESCAPE '\')",
        )
        .bind(&pattern)
        .fetch_one(&self.pool)
        .await?;

        let rows = sqlx::query_as::<_, AuthorRow>(
            r#"
            SELECT * FROM authors
            WHERE ($1::text IS NULL OR LOWER(name) LIKE $1 ESCAPE '\')
            ORDER BY name
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(&pattern)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(Page::new(
            rows.into_iter().map(Author::from).collect(),
            limit,
            offset,
            total,
        ))
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Author> {
        sqlx::query_as::<_, AuthorRow>("SELECT * FROM authors WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(Author::from)
            .ok_or(AppError::AuthorNotFound)
    }

    async fn update_by_name(&self, name: &str, author: &Author) -> AppResult<Author> {
        let row = AuthorRow::from(author);
        sqlx::query_as::<_, AuthorRow>(
            r#"
            UPDATE authors
            SET biography = $2, profile_picture_url = $3
            WHERE name = $1
            RETURNING *
            "#,
        )
        .bind(name)
        .bind(&row.biography)
        .bind(&row.profile_picture_url)
        .fetch_optional(&self.pool)
        .await?
        .map(Author::from)
        .ok_or(AppError::AuthorNotFound)
    }
}
