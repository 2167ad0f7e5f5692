//! Roles repository

use async_trait::async_trait;
use sqlx::{FromRow, Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::{
        pagination::{resolve_bounds, Page},
        Permission, Role,
    },
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RoleRepository: Send + Sync {
    async fn find_all(&self, limit: Option<i64>, offset: Option<i64>) -> AppResult<Page<Role>>;
    async fn find_by_id(&self, id: &str) -> AppResult<Role>;
    async fn find_by_name(&self, name: &str) -> AppResult<Role>;
    async fn create(&self, role: &Role) -> AppResult<Role>;
    async fn update(&self, id: &str, role: &Role) -> AppResult<Role>;
    async fn delete(&self, id: &str) -> AppResult<Role>;
}

/// Persistence shape of a role; permissions are stored as a text array
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct RoleRow {
    pub id: String,
    pub name: String,
    pub permissions: Vec<String>,
}

/// Decode stored permission names, dropping any this build does not know
pub(crate) fn decode_permissions(names: Vec<String>) -> Vec<Permission> {
    names
        .into_iter()
        .filter_map(|name| match name.parse::<Permission>() {
            Ok(p) => Some(p),
            Err(_) => {
                tracing::warn!("Ignoring unknown stored permission {:?}", name);
                None
            }
        })
        .collect()
}

pub(crate) fn encode_permissions(permissions: &[Permission]) -> Vec<String> {
    permissions.iter().map(|p| p.as_str().to_string()).collect()
}

impl From<RoleRow> for Role {
    fn from(row: RoleRow) -> Self {
        Role {
            id: row.id,
            name: row.name,
            permissions: decode_permissions(row.permissions),
        }
    }
}

impl From<&Role> for RoleRow {
    fn from(role: &Role) -> Self {
        RoleRow {
            id: role.id.clone(),
            name: role.name.clone(),
            permissions: encode_permissions(&role.permissions),
        }
    }
}

#[derive(Clone)]
pub struct PgRoleRepository {
    pool: Pool<Postgres>,
}

impl PgRoleRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RoleRepository for PgRoleRepository {
    async fn find_all(&self, limit: Option<i64>, offset: Option<i64>) -> AppResult<Page<Role>> {
        let (limit, offset) = resolve_bounds(limit, offset);

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM roles")
            .fetch_one(&self.pool)
            .await?;

        let rows = sqlx::query_as::<_, RoleRow>(
            "SELECT id, name, permissions FROM roles ORDER BY name LIMIT $1 OFFSET $2",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(Page::new(
            rows.into_iter().map(Role::from).collect(),
            limit,
            offset,
            total,
        ))
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Role> {
        sqlx::query_as::<_, RoleRow>("SELECT id, name, permissions FROM roles WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(Role::from)
            .ok_or(AppError::RoleNotFound)
    }

    async fn find_by_name(&self, name: &str) -> AppResult<Role> {
        sqlx::query_as::<_, RoleRow>("SELECT id, name, permissions FROM roles WHERE name = $1")
            .bind(name)
            .fetch_optional(&self.pool)
            .await?
            .map(Role::from)
            .ok_or(AppError::RoleNotFound)
    }

    async fn create(&self, role: &Role) -> AppResult<Role> {
        let row = RoleRow::from(role);
        let saved = sqlx::query_as::<_, RoleRow>(
            "INSERT INTO roles (id, name, permissions) VALUES ($1, $2, $3) RETURNING id, name, permissions",
        )
        .bind(&row.id)
        .bind(&row.name)
        .bind(&row.permissions)
        .fetch_one(&self.pool)
        .await?;
        Ok(saved.into())
    }

    async fn update(&self, id: &str, role: &Role) -> AppResult<Role> {
        let row = RoleRow::from(role);
        sqlx::query_as::<_, RoleRow>(
            "UPDATE roles SET name = $2, permissions = $3 WHERE id = $1 RETURNING id, name, permissions",
        )
        .bind(id)
        .bind(&row.name)
        .bind(&row.permissions)
        .fetch_optional(&self.pool)
        .await?
        .map(Role::from)
        .ok_or(AppError::RoleNotFound)
    }

    async fn delete(&self, id: &str) -> AppResult<Role> {
        let role = self.find_by_id(id).await?;

        sqlx::query("DELETE FROM roles WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_multiple_permissions() {
        let role = Role::create(
            "role-admin",
            "admin",
            vec![
                Permission::ManageBooks,
                Permission::ManageUsers,
                Permission::ManageRoles,
            ],
        )
        .unwrap();
        let row = RoleRow::from(&role);
        assert_eq!(row.permissions, vec!["MANAGE_BOOKS", "MANAGE_USERS", "MANAGE_ROLES"]);
        assert_eq!(Role::from(row), role);
    }

    #[test]
    fn test_round_trip_no_permissions() {
        let role = Role::create("role-viewer", "viewer", vec![]).unwrap();
        assert_eq!(Role::from(RoleRow::from(&role)), role);
    }

    #[test]
    fn test_unknown_stored_permission_is_dropped() {
        let row = RoleRow {
            id: "r".into(),
            name: "legacy".into(),
            permissions: vec!["MANAGE_BOOKS".into(), "MANAGE_COFFEE".into()],
        };
        assert_eq!(Role::from(row).permissions, vec![Permission::ManageBooks]);
    }
}
