//! Saved reading positions repository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::SavedPosition,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SavedPositionRepository: Send + Sync {
    /// All positions of a user, most recently updated first
    async fn find_all_by_user(&self, user_id: &str) -> AppResult<Vec<SavedPosition>>;
    async fn find_by_book_and_user(&self, book_id: &str, user_id: &str) -> AppResult<SavedPosition>;
    /// Insert or replace the position stored under `(book_id, user_id)`
    async fn upsert(&self, saved_position: &SavedPosition) -> AppResult<SavedPosition>;
    async fn delete(&self, book_id: &str, user_id: &str) -> AppResult<()>;
}

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct SavedPositionRow {
    pub book_id: String,
    pub user_id: String,
    pub position: String,
    pub device_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<SavedPositionRow> for SavedPosition {
    fn from(row: SavedPositionRow) -> Self {
        SavedPosition {
            book_id: row.book_id,
            user_id: row.user_id,
            position: row.position,
            device_name: row.device_name,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

impl From<&SavedPosition> for SavedPositionRow {
    fn from(p: &SavedPosition) -> Self {
        SavedPositionRow {
            book_id: p.book_id.clone(),
            user_id: p.user_id.clone(),
            position: p.position.clone(),
            device_name: p.device_name.clone(),
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

#[derive(Clone)]
pub struct PgSavedPositionRepository {
    pool: Pool<Postgres>,
}

impl PgSavedPositionRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SavedPositionRepository for PgSavedPositionRepository {
    async fn find_all_by_user(&self, user_id: &str) -> AppResult<Vec<SavedPosition>> {
        let rows = sqlx::query_as::<_, SavedPositionRow>(
            "SELECT * FROM saved_positions WHERE user_id = $1 ORDER BY updated_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(SavedPosition::from).collect())
    }

    async fn find_by_book_and_user(&self, book_id: &str, user_id: &str) -> AppResult<SavedPosition> {
        sqlx::query_as::<_, SavedPositionRow>(
            "SELECT * FROM saved_positions WHERE book_id = $1 AND user_id = $2",
        )
        .bind(book_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?
        .map(SavedPosition::from)
        .ok_or(AppError::SavedPositionNotFound)
    }

    async fn upsert(&self, saved_position: &SavedPosition) -> AppResult<SavedPosition> {
        let row = SavedPositionRow::from(saved_position);
        let saved = sqlx::query_as::<_, SavedPositionRow>(
            r#"
            INSERT INTO saved_positions (book_id, user_id, position, device_name, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (book_id, user_id) DO UPDATE
            SET position = EXCLUDED.position,
                device_name = EXCLUDED.device_name,
                updated_at = EXCLUDED.updated_at
            RETURNING *
            "#,
        )
        .bind(&row.book_id)
        .bind(&row.user_id)
        .bind(&row.position)
        .bind(&row.device_name)
        .bind(row.created_at)
        .bind(row.updated_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(saved.into())
    }

    async fn delete(&self, book_id: &str, user_id: &str) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM saved_positions WHERE book_id = $1 AND user_id = $2")
            .bind(book_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::SavedPositionNotFound);
        }
        Ok(())
    }
}
