//! Book shelves repository

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::{FromRow, Pool, Postgres};

use super::books::BookRow;
use crate::{
    error::{AppError, AppResult},
    models::{
        pagination::{resolve_bounds, Page},
        Book, BookShelf,
    },
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookShelfRepository: Send + Sync {
    async fn find_all(&self, limit: Option<i64>, offset: Option<i64>)
        -> AppResult<Page<BookShelf>>;
    async fn find_by_id(&self, id: &str) -> AppResult<BookShelf>;
    async fn create(&self, book_shelf: &BookShelf) -> AppResult<BookShelf>;
    /// Rename a shelf; membership is managed through `add_book`/`remove_book`
    async fn update(&self, id: &str, book_shelf: &BookShelf) -> AppResult<BookShelf>;
    async fn delete(&self, id: &str) -> AppResult<BookShelf>;
    async fn find_by_title(&self, title: &str) -> AppResult<BookShelf>;
    async fn add_book(&self, book_shelf_id: &str, book_id: &str) -> AppResult<()>;
    async fn remove_book(&self, book_shelf_id: &str, book_id: &str) -> AppResult<()>;
    async fn find_by_book_id(&self, book_id: &str) -> AppResult<Vec<BookShelf>>;
}

/// Persistence shape of a shelf, without its members
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct BookShelfRow {
    pub id: String,
    pub title: String,
}

#[derive(Debug, FromRow)]
struct MemberRow {
    book_shelf_id: String,
    #[sqlx(flatten)]
    book: BookRow,
}

/// Assemble a shelf from its row and ordered member rows
pub fn to_domain(row: BookShelfRow, books: Vec<BookRow>) -> BookShelf {
    BookShelf {
        id: row.id,
        title: row.title,
        books: books.into_iter().map(Book::from).collect(),
    }
}

/// Split a shelf into its row and member rows
pub fn to_persistence(book_shelf: &BookShelf) -> (BookShelfRow, Vec<BookRow>) {
    (
        BookShelfRow {
            id: book_shelf.id.clone(),
            title: book_shelf.title.clone(),
        },
        book_shelf.books.iter().map(BookRow::from).collect(),
    )
}

#[derive(Clone)]
pub struct PgBookShelfRepository {
    pool: Pool<Postgres>,
}

impl PgBookShelfRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Resolve members for a set of shelves in one query
    async fn attach_books(&self, rows: Vec<BookShelfRow>) -> AppResult<Vec<BookShelf>> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<String> = rows.iter().map(|r| r.id.clone()).collect();
        let members = sqlx::query_as::<_, MemberRow>(
            r#"
            SELECT sb.book_shelf_id, b.*
            FROM book_shelf_books sb
            JOIN books b ON b.id = sb.book_id
            WHERE sb.book_shelf_id = ANY($1)
            ORDER BY sb.seq
            "#,
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;

        let mut by_shelf: HashMap<String, Vec<BookRow>> = HashMap::new();
        for member in members {
            by_shelf
                .entry(member.book_shelf_id)
                .or_default()
                .push(member.book);
        }

        Ok(rows
            .into_iter()
            .map(|row| {
                let books = by_shelf.remove(&row.id).unwrap_or_default();
                to_domain(row, books)
            })
            .collect())
    }

    async fn load_one(&self, row: BookShelfRow) -> AppResult<BookShelf> {
        self.attach_books(vec![row])
            .await?
            .pop()
            .ok_or(AppError::BookShelfNotFound)
    }
}

#[async_trait]
impl BookShelfRepository for PgBookShelfRepository {
    async fn find_all(
        &self,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> AppResult<Page<BookShelf>> {
        let (limit, offset) = resolve_bounds(limit, offset);

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM book_shelves")
            .fetch_one(&self.pool)
            .await?;

        let rows = sqlx::query_as::<_, BookShelfRow>(
            "SELECT id, title FROM book_shelves ORDER BY title, id LIMIT $1 OFFSET $2",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(Page::new(self.attach_books(rows).await?, limit, offset, total))
    }

    async fn find_by_id(&self, id: &str) -> AppResult<BookShelf> {
        let row = sqlx::query_as::<_, BookShelfRow>("SELECT id, title FROM book_shelves WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(AppError::BookShelfNotFound)?;

        self.load_one(row).await
    }

    async fn create(&self, book_shelf: &BookShelf) -> AppResult<BookShelf> {
        let (row, books) = to_persistence(book_shelf);
        let mut tx = self.pool.begin().await?;

        sqlx::query("INSERT INTO book_shelves (id, title) VALUES ($1, $2)")
            .bind(&row.id)
            .bind(&row.title)
            .execute(&mut *tx)
            .await?;

        for book in &books {
            sqlx::query(
                "INSERT INTO book_shelf_books (book_shelf_id, book_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
            )
            .bind(&row.id)
            .bind(&book.id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        self.find_by_id(&row.id).await
    }

    async fn update(&self, id: &str, book_shelf: &BookShelf) -> AppResult<BookShelf> {
        let row = sqlx::query_as::<_, BookShelfRow>(
            "UPDATE book_shelves SET title = $2 WHERE id = $1 RETURNING id, title",
        )
        .bind(id)
        .bind(&book_shelf.title)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::BookShelfNotFound)?;

        self.load_one(row).await
    }

    async fn delete(&self, id: &str) -> AppResult<BookShelf> {
        let book_shelf = self.find_by_id(id).await?;

        sqlx::query("DELETE FROM book_shelves WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(book_shelf)
    }

    async fn find_by_title(&self, title: &str) -> AppResult<BookShelf> {
        let row = sqlx::query_as::<_, BookShelfRow>(
            "SELECT id, title FROM book_shelves WHERE title = $1",
        )
        .bind(title)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::BookShelfNotFound)?;

        self.load_one(row).await
    }

    async fn add_book(&self, book_shelf_id: &str, book_id: &str) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO book_shelf_books (book_shelf_id, book_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
        )
        .bind(book_shelf_id)
        .bind(book_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn remove_book(&self, book_shelf_id: &str, book_id: &str) -> AppResult<()> {
        sqlx::query("DELETE FROM book_shelf_books WHERE book_shelf_id = $1 AND book_id = $2")
            .bind(book_shelf_id)
            .bind(book_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn find_by_book_id(&self, book_id: &str) -> AppResult<Vec<BookShelf>> {
        let rows = sqlx::query_as::<_, BookShelfRow>(
            r#"
            SELECT s.id, s.title
            FROM book_shelves s
            JOIN book_shelf_books sb ON sb.book_shelf_id = s.id
            WHERE sb.book_id = $1
            ORDER BY s.title, s.id
            "#,
        )
        .bind(book_id)
        .fetch_all(&self.pool)
        .await?;

        self.attach_books(rows).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_with_books() {
        let books = vec![
            Book::create("b-1", "One", "Author", "one.epub").unwrap(),
            Book::create("b-2", "Two", "Author", "two.epub")
                .unwrap()
                .published_in(Some(2001)),
        ];
        let shelf = BookShelf::create("shelf-1", "Favorites", books).unwrap();

        let (row, members) = to_persistence(&shelf);
        assert_eq!(members.len(), 2);
        assert_eq!(to_domain(row, members), shelf);
    }

    #[test]
    fn test_round_trip_empty() {
        let shelf = BookShelf::create("shelf-2", "Empty Shelf", vec![]).unwrap();
        let (row, members) = to_persistence(&shelf);
        assert_eq!(to_domain(row, members), shelf);
    }
}
