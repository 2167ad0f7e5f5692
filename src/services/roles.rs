//! Role use-cases

use std::sync::Arc;

use async_trait::async_trait;

use super::UseCase;
use crate::{
    error::{AppError, AppResult},
    models::{
        new_id,
        role::{CreateRoleRequest, UpdateRoleRequest},
        Page, PaginatedQuery, Role,
    },
    repository::{Repository, RoleRepository, UserRepository},
};

/// Creates a role; names are unique
/// Fails with `DuplicateRoleName` when a role other than `own_id` uses `name`.
/// Only a not-found lookup means the name is free.
async fn ensure_name_free(
    roles: &dyn RoleRepository,
    name: &str,
    own_id: Option<&str>,
) -> AppResult<()> {
    match roles.find_by_name(name).await {
        Ok(existing) if Some(existing.id.as_str()) == own_id => Ok(()),
        Ok(_) => Err(AppError::DuplicateRoleName),
        Err(e) if e.is_not_found() => Ok(()),
        Err(e) => Err(e),
    }
}

pub struct CreateRoleUseCase {
    roles: Arc<dyn RoleRepository>,
}

impl CreateRoleUseCase {
    pub fn new(roles: Arc<dyn RoleRepository>) -> Self {
        Self { roles }
    }
}

#[async_trait]
impl UseCase<CreateRoleRequest, Role> for CreateRoleUseCase {
    async fn execute(&self, request: CreateRoleRequest) -> AppResult<Role> {
        let role = Role::create(new_id(), request.name, request.permissions)?;

        ensure_name_free(self.roles.as_ref(), &role.name, None).await?;

        let created = self.roles.create(&role).await?;
        tracing::info!(role_id = %created.id, name = %created.name, "Role created");
        Ok(created)
    }
}

pub struct GetRoleByIdUseCase {
    roles: Arc<dyn RoleRepository>,
}

impl GetRoleByIdUseCase {
    pub fn new(roles: Arc<dyn RoleRepository>) -> Self {
        Self { roles }
    }
}

#[async_trait]
impl UseCase<String, Role> for GetRoleByIdUseCase {
    async fn execute(&self, id: String) -> AppResult<Role> {
        self.roles.find_by_id(&id).await
    }
}

pub struct GetRolesUseCase {
    roles: Arc<dyn RoleRepository>,
}

impl GetRolesUseCase {
    pub fn new(roles: Arc<dyn RoleRepository>) -> Self {
        Self { roles }
    }
}

#[async_trait]
impl UseCase<PaginatedQuery, Page<Role>> for GetRolesUseCase {
    async fn execute(&self, query: PaginatedQuery) -> AppResult<Page<Role>> {
        self.roles.find_all(query.limit, query.offset).await
    }
}

pub struct UpdateRoleUseCase {
    roles: Arc<dyn RoleRepository>,
}

impl UpdateRoleUseCase {
    pub fn new(roles: Arc<dyn RoleRepository>) -> Self {
        Self { roles }
    }
}

#[async_trait]
impl UseCase<UpdateRoleRequest, Role> for UpdateRoleUseCase {
    async fn execute(&self, request: UpdateRoleRequest) -> AppResult<Role> {
        let current = self.roles.find_by_id(&request.id).await?;
        let renamed = request.name.as_ref().is_some_and(|n| *n != current.name);

        let role = Role::create(
            current.id,
            request.name.unwrap_or(current.name),
            request.permissions.unwrap_or(current.permissions),
        )?;

        if renamed {
            ensure_name_free(self.roles.as_ref(), &role.name, Some(role.id.as_str())).await?;
        }

        self.roles.update(&request.id, &role).await
    }
}

/// Deletes a role that no user holds
pub struct DeleteRoleUseCase {
    roles: Arc<dyn RoleRepository>,
    users: Arc<dyn UserRepository>,
}

impl DeleteRoleUseCase {
    pub fn new(roles: Arc<dyn RoleRepository>, users: Arc<dyn UserRepository>) -> Self {
        Self { roles, users }
    }
}

#[async_trait]
impl UseCase<String, Role> for DeleteRoleUseCase {
    async fn execute(&self, id: String) -> AppResult<Role> {
        self.roles.find_by_id(&id).await?;

        let holders = self.users.count_by_role_id(&id).await?;
        if holders > 0 {
            tracing::debug!(role_id = %id, holders, "Refusing to delete role in use");
            return Err(AppError::RoleHasUsers);
        }

        let deleted = self.roles.delete(&id).await?;
        tracing::info!(role_id = %deleted.id, "Role deleted");
        Ok(deleted)
    }
}

#[derive(Clone)]
pub struct RoleUseCases {
    pub create: Arc<CreateRoleUseCase>,
    pub get_by_id: Arc<GetRoleByIdUseCase>,
    pub list: Arc<GetRolesUseCase>,
    pub update: Arc<UpdateRoleUseCase>,
    pub delete: Arc<DeleteRoleUseCase>,
}

impl RoleUseCases {
    pub fn new(repository: &Repository) -> Self {
        let roles = &repository.roles;
        Self {
            create: Arc::new(CreateRoleUseCase::new(roles.clone())),
            get_by_id: Arc::new(GetRoleByIdUseCase::new(roles.clone())),
            list: Arc::new(GetRolesUseCase::new(roles.clone())),
            update: Arc::new(UpdateRoleUseCase::new(roles.clone())),
            delete: Arc::new(DeleteRoleUseCase::new(roles.clone(), repository.users.clone())),
        }
    }
}
