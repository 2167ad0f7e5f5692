//! User management use-cases

use std::sync::Arc;

use async_trait::async_trait;

use super::UseCase;
use crate::{
    error::AppResult,
    models::{
        user::{AssignRoleRequest, UpdateUserRequest},
        Page, PaginatedQuery, User,
    },
    repository::{Repository, RoleRepository, UserRepository},
};

pub struct GetUsersUseCase {
    users: Arc<dyn UserRepository>,
}

impl GetUsersUseCase {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }
}

#[async_trait]
impl UseCase<PaginatedQuery, Page<User>> for GetUsersUseCase {
    async fn execute(&self, query: PaginatedQuery) -> AppResult<Page<User>> {
        self.users.find_all(query.limit, query.offset).await
    }
}

pub struct GetUserByIdUseCase {
    users: Arc<dyn UserRepository>,
}

impl GetUserByIdUseCase {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }
}

#[async_trait]
impl UseCase<String, User> for GetUserByIdUseCase {
    async fn execute(&self, id: String) -> AppResult<User> {
        self.users.find_by_id(&id).await
    }
}

pub struct UpdateUserUseCase {
    users: Arc<dyn UserRepository>,
}

impl UpdateUserUseCase {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }
}

#[async_trait]
impl UseCase<UpdateUserRequest, User> for UpdateUserUseCase {
    async fn execute(&self, request: UpdateUserRequest) -> AppResult<User> {
        let current = self.users.find_by_id(&request.id).await?;

        let user = User::create(
            current.id,
            request.username.unwrap_or(current.username),
            request.email.unwrap_or(current.email),
        )?
        .restricted(request.is_restricted.unwrap_or(current.is_restricted))
        .with_role(current.role);

        self.users.update(&request.id, &user).await
    }
}

/// Sets the restriction flag of a user
async fn set_restricted(users: &dyn UserRepository, id: &str, restricted: bool) -> AppResult<User> {
    let user = users.find_by_id(id).await?.restricted(restricted);
    let saved = users.update(id, &user).await?;
    tracing::info!(user_id = %id, restricted, "User restriction changed");
    Ok(saved)
}

pub struct RestrictUserUseCase {
    users: Arc<dyn UserRepository>,
}

impl RestrictUserUseCase {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }
}

#[async_trait]
impl UseCase<String, User> for RestrictUserUseCase {
    async fn execute(&self, id: String) -> AppResult<User> {
        set_restricted(self.users.as_ref(), &id, true).await
    }
}

pub struct UnrestrictUserUseCase {
    users: Arc<dyn UserRepository>,
}

impl UnrestrictUserUseCase {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }
}

#[async_trait]
impl UseCase<String, User> for UnrestrictUserUseCase {
    async fn execute(&self, id: String) -> AppResult<User> {
        set_restricted(self.users.as_ref(), &id, false).await
    }
}

pub struct AssignRoleUseCase {
    users: Arc<dyn UserRepository>,
    roles: Arc<dyn RoleRepository>,
}

impl AssignRoleUseCase {
    pub fn new(users: Arc<dyn UserRepository>, roles: Arc<dyn RoleRepository>) -> Self {
        Self { users, roles }
    }
}

#[async_trait]
impl UseCase<AssignRoleRequest, User> for AssignRoleUseCase {
    async fn execute(&self, request: AssignRoleRequest) -> AppResult<User> {
        let user = self.users.find_by_id(&request.user_id).await?;
        let role = self.roles.find_by_id(&request.role_id).await?;

        tracing::info!(user_id = %user.id, role = %role.name, "Assigning role");
        let user = user.with_role(Some(role));
        self.users.update(&request.user_id, &user).await
    }
}

#[derive(Clone)]
pub struct UserUseCases {
    pub list: Arc<GetUsersUseCase>,
    pub get_by_id: Arc<GetUserByIdUseCase>,
    pub update: Arc<UpdateUserUseCase>,
    pub restrict: Arc<RestrictUserUseCase>,
    pub unrestrict: Arc<UnrestrictUserUseCase>,
    pub assign_role: Arc<AssignRoleUseCase>,
}

impl UserUseCases {
    pub fn new(repository: &Repository) -> Self {
        let users = &repository.users;
        Self {
            list: Arc::new(GetUsersUseCase::new(users.clone())),
            get_by_id: Arc::new(GetUserByIdUseCase::new(users.clone())),
            update: Arc::new(UpdateUserUseCase::new(users.clone())),
            restrict: Arc::new(RestrictUserUseCase::new(users.clone())),
            unrestrict: Arc::new(UnrestrictUserUseCase::new(users.clone())),
            assign_role: Arc::new(AssignRoleUseCase::new(users.clone(), repository.roles.clone())),
        }
    }
}
