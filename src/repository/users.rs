//! Users repository

use async_trait::async_trait;
use sqlx::{FromRow, Pool, Postgres};

use super::roles::{decode_permissions, encode_permissions};
use crate::{
    error::{AppError, AppResult},
    models::{
        pagination::{resolve_bounds, Page},
        Role, User,
    },
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_all(&self, limit: Option<i64>, offset: Option<i64>) -> AppResult<Page<User>>;
    async fn find_by_id(&self, id: &str) -> AppResult<User>;
    async fn create(&self, user: &User) -> AppResult<User>;
    async fn update(&self, id: &str, user: &User) -> AppResult<User>;
    async fn delete(&self, id: &str) -> AppResult<User>;
    /// Number of users holding the role
    async fn count_by_role_id(&self, role_id: &str) -> AppResult<i64>;
}

/// Persistence shape of a user joined with its role
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct UserRow {
    pub id: String,
    pub username: String,
    pub email: String,
    pub is_restricted: bool,
    pub role_id: Option<String>,
    pub role_name: Option<String>,
    pub role_permissions: Option<Vec<String>>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        let role = match (row.role_id, row.role_name) {
            (Some(id), Some(name)) => Some(Role {
                id,
                name,
                permissions: decode_permissions(row.role_permissions.unwrap_or_default()),
            }),
            _ => None,
        };

        User {
            id: row.id,
            username: row.username,
            email: row.email,
            is_restricted: row.is_restricted,
            role,
        }
    }
}

impl From<&User> for UserRow {
    fn from(user: &User) -> Self {
        UserRow {
            id: user.id.clone(),
            username: user.username.clone(),
            email: user.email.clone(),
            is_restricted: user.is_restricted,
            role_id: user.role.as_ref().map(|r| r.id.clone()),
            role_name: user.role.as_ref().map(|r| r.name.clone()),
            role_permissions: user.role.as_ref().map(|r| encode_permissions(&r.permissions)),
        }
    }
}

const SELECT_USER: &str = r#"
    SELECT u.id, u.username, u.email, u.is_restricted,
           r.id AS role_id, r.name AS role_name, r.permissions AS role_permissions
    FROM users u
    LEFT JOIN roles r ON r.id = u.role_id
"#;

#[derive(Clone)]
pub struct PgUserRepository {
    pool: Pool<Postgres>,
}

impl PgUserRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn find_all(&self, limit: Option<i64>, offset: Option<i64>) -> AppResult<Page<User>> {
        let (limit, offset) = resolve_bounds(limit, offset);

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;

        let query = format!("{} ORDER BY u.username LIMIT $1 OFFSET $2", SELECT_USER);
        let rows = sqlx::query_as::<_, UserRow>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        Ok(Page::new(
            rows.into_iter().map(User::from).collect(),
            limit,
            offset,
            total,
        ))
    }

    async fn find_by_id(&self, id: &str) -> AppResult<User> {
        let query = format!("{} WHERE u.id = $1", SELECT_USER);
        sqlx::query_as::<_, UserRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(User::from)
            .ok_or(AppError::UserNotFound)
    }

    async fn create(&self, user: &User) -> AppResult<User> {
        let row = UserRow::from(user);
        sqlx::query(
            r#"
            INSERT INTO users (id, username, email, is_restricted, role_id)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(&row.id)
        .bind(&row.username)
        .bind(&row.email)
        .bind(row.is_restricted)
        .bind(&row.role_id)
        .execute(&self.pool)
        .await?;

        self.find_by_id(&row.id).await
    }

    async fn update(&self, id: &str, user: &User) -> AppResult<User> {
        let row = UserRow::from(user);
        let result = sqlx::query(
            r#"
            UPDATE users
            SET username = $2, email = $3, is_restricted = $4, role_id = $5
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(&row.username)
        .bind(&row.email)
        .bind(row.is_restricted)
        .bind(&row.role_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::UserNotFound);
        }

        self.find_by_id(id).await
    }

    async fn delete(&self, id: &str) -> AppResult<User> {
        let user = self.find_by_id(id).await?;

        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(user)
    }

    async fn count_by_role_id(&self, role_id: &str) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE role_id = $1")
            .bind(role_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
