//! Books repository

use async_trait::async_trait;
use sqlx::{FromRow, Pool, Postgres, Transaction};

use crate::{
    error::{AppError, AppResult},
    models::{
        new_id,
        pagination::{resolve_bounds, Page},
        Book, BookShelf,
    },
    storage::FileStorage,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookRepository: Send + Sync {
    async fn find_all(&self, limit: Option<i64>, offset: Option<i64>) -> AppResult<Page<Book>>;
    async fn find_by_id(&self, id: &str) -> AppResult<Book>;
    async fn create(&self, book: &Book) -> AppResult<Book>;
    async fn update(&self, id: &str, book: &Book) -> AppResult<Book>;
    /// Delete the book and its uploaded files
    async fn delete(&self, id: &str) -> AppResult<Book>;
    async fn find_by_author(
        &self,
        author: &str,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> AppResult<Page<Book>>;
    async fn find_favorites(&self, limit: Option<i64>, offset: Option<i64>) -> AppResult<Page<Book>>;
    async fn find_by_title(&self, title: &str) -> AppResult<Book>;
    async fn find_by_book_shelf(
        &self,
        book_shelf: &BookShelf,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> AppResult<Page<Book>>;
}

/// Persistence shape of a book
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct BookRow {
    pub id: String,
    pub title: String,
    pub author: String,
    pub file_name: String,
    pub is_favorite: bool,
    pub published_year: Option<i32>,
    pub cover_image_file_name: Option<String>,
    pub summary: Option<String>,
}

impl From<BookRow> for Book {
    fn from(row: BookRow) -> Self {
        Book {
            id: row.id,
            title: row.title,
            author: row.author,
            file_name: row.file_name,
            is_favorite: row.is_favorite,
            published_year: row.published_year,
            cover_image_file_name: row.cover_image_file_name,
            summary: row.summary,
        }
    }
}

impl From<&Book> for BookRow {
    fn from(book: &Book) -> Self {
        BookRow {
            id: book.id.clone(),
            title: book.title.clone(),
            author: book.author.clone(),
            file_name: book.file_name.clone(),
            is_favorite: book.is_favorite,
            published_year: book.published_year,
            cover_image_file_name: book.cover_image_file_name.clone(),
            summary: book.summary.clone(),
        }
    }
}

/// Authors are listed independently of books; add `name` unless it is known
async fn register_author(tx: &mut Transaction<'_, Postgres>, name: &str) -> AppResult<()> {
    sqlx::query("INSERT INTO authors (id, name) VALUES ($1, $2) ON CONFLICT (name) DO NOTHING")
        .bind(new_id())
        .bind(name)
        .execute(&mut **tx)
        .await?;
    Ok(())
}

#[derive(Clone)]
pub struct PgBookRepository {
    pool: Pool<Postgres>,
    storage: FileStorage,
}

impl PgBookRepository {
    pub fn new(pool: Pool<Postgres>, storage: FileStorage) -> Self {
        Self { pool, storage }
    }

    /// Page through books matching an optional `WHERE` fragment bound to one text parameter
    async fn page_where(
        &self,
        condition: Option<(&str, &str)>,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> AppResult<Page<Book>> {
        let (limit, offset) = resolve_bounds(limit, offset);
        let where_clause = condition
            .map(|(clause, _)| format!("WHERE {}", clause))
            .unwrap_or_default();

        let count_query = format!("SELECT COUNT(*) FROM books {}", where_clause);
        let mut count_builder = sqlx::query_scalar::<_, i64>(&count_query);
        if let Some((_, param)) = condition {
            count_builder = count_builder.bind(param);
        }
        let total = count_builder.fetch_one(&self.pool).await?;

        let (limit_idx, offset_idx) = if condition.is_some() { (2, 3) } else { (1, 2) };
        let select_query = format!(
            "SELECT * FROM books {} ORDER BY title, id LIMIT ${} OFFSET ${}",
            where_clause, limit_idx, offset_idx
        );
        let mut builder = sqlx::query_as::<_, BookRow>(&select_query);
        if let Some((_, param)) = condition {
            builder = builder.bind(param);
        }
        let rows = builder.bind(limit).bind(offset).fetch_all(&self.pool).await?;

        Ok(Page::new(
            rows.into_iter().map(Book::from).collect(),
            limit,
            offset,
            total,
        ))
    }
}

#[async_trait]
impl BookRepository for PgBookRepository {
    async fn find_all(&self, limit: Option<i64>, offset: Option<i64>) -> AppResult<Page<Book>> {
        self.page_where(None, limit, offset).await
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Book> {
        sqlx::query_as::<_, BookRow>("SELECT * FROM books WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(Book::from)
            .ok_or(AppError::BookNotFound)
    }

    async fn create(&self, book: &Book) -> AppResult<Book> {
        let row = BookRow::from(book);
        let mut tx = self.pool.begin().await?;

        let saved = sqlx::query_as::<_, BookRow>(
            r#"
            INSERT INTO books (id, title, author, file_name, is_favorite,
                               published_year, cover_image_file_name, summary)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(&row.id)
        .bind(&row.title)
        .bind(&row.author)
        .bind(&row.file_name)
        .bind(row.is_favorite)
        .bind(row.published_year)
        .bind(&row.cover_image_file_name)
        .bind(&row.summary)
        .fetch_one(&mut *tx)
        .await?;

        register_author(&mut tx, &row.author).await?;

        tx.commit().await?;
        Ok(saved.into())
    }

    async fn update(&self, id: &str, book: &Book) -> AppResult<Book> {
        let row = BookRow::from(book);
        let mut tx = self.pool.begin().await?;

        let saved = sqlx::query_as::<_, BookRow>(
            r#"
            UPDATE books
            SET title = $2, author = $3, file_name = $4, is_favorite = $5,
                published_year = $6, cover_image_file_name = $7, summary = $8
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&row.title)
        .bind(&row.author)
        .bind(&row.file_name)
        .bind(row.is_favorite)
        .bind(row.published_year)
        .bind(&row.cover_image_file_name)
        .bind(&row.summary)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(AppError::BookNotFound)?;

        register_author(&mut tx, &row.author).await?;

        tx.commit().await?;
        Ok(saved.into())
    }

    async fn delete(&self, id: &str) -> AppResult<Book> {
        let book = self.find_by_id(id).await?;

        self.storage.remove_book_files(&book).await?;

        sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(book)
    }

    async fn find_by_author(
        &self,
        author: &str,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> AppResult<Page<Book>> {
        self.page_where(Some(("author = $1", author)), limit, offset).await
    }

    async fn find_favorites(&self, limit: Option<i64>, offset: Option<i64>) -> AppResult<Page<Book>> {
        let (limit, offset) = resolve_bounds(limit, offset);

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books WHERE is_favorite")
            .fetch_one(&self.pool)
            .await?;

        let rows = sqlx::query_as::<_, BookRow>(
            "SELECT * FROM books WHERE is_favorite ORDER BY title, id LIMIT $1 OFFSET $2",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(Page::new(
            rows.into_iter().map(Book::from).collect(),
            limit,
            offset,
            total,
        ))
    }

    async fn find_by_title(&self, title: &str) -> AppResult<Book> {
        sqlx::query_as::<_, BookRow>("SELECT * FROM books WHERE title = $1 LIMIT 1")
            .bind(title)
            .fetch_optional(&self.pool)
            .await?
            .map(Book::from)
            .ok_or(AppError::BookNotFound)
    }

    async fn find_by_book_shelf(
        &self,
        book_shelf: &BookShelf,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> AppResult<Page<Book>> {
        let (limit, offset) = resolve_bounds(limit, offset);

        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM book_shelf_books WHERE book_shelf_id = $1")
                .bind(&book_shelf.id)
                .fetch_one(&self.pool)
                .await?;

        let rows = sqlx::query_as::<_, BookRow>(
            r#"
            SELECT b.*
            FROM books b
            JOIN book_shelf_books sb ON sb.book_id = b.id
            WHERE sb.book_shelf_id = $1
            ORDER BY sb.seq
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(&book_shelf.id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(Page::new(
            rows.into_iter().map(Book::from).collect(),
            limit,
            offset,
            total,
        ))
    }
}
