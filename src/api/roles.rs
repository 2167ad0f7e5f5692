//! Role endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use super::{
    guard::{authorize, RequiredPermissions},
    AuthenticatedUser,
};
use crate::{
    error::AppResult,
    models::{
        role::{CreateRoleRequest, UpdateRoleRequest},
        Page, PaginatedQuery, Permission, Role,
    },
    services::UseCase,
    AppState,
};

pub const MANAGE_ROLES: RequiredPermissions = RequiredPermissions {
    operation: "manageRoles",
    permissions: &[Permission::ManageRoles],
};

/// List roles
#[utoipa::path(
    get,
    path = "/roles",
    tag = "roles",
    security(("bearer_auth" = [])),
    params(PaginatedQuery),
    responses(
        (status = 200, description = "Page of roles", body = crate::models::pagination::RolePage),
        (status = 403, description = "Missing MANAGE_ROLES", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_roles(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Query(query): Query<PaginatedQuery>,
) -> AppResult<Json<Page<Role>>> {
    authorize(&MANAGE_ROLES, &user)?;

    let page = state.services.roles.list.execute(query).await?;
    Ok(Json(page))
}

/// Get role by ID
#[utoipa::path(
    get,
    path = "/roles/{id}",
    tag = "roles",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Role ID")),
    responses(
        (status = 200, description = "Role", body = Role),
        (status = 404, description = "Role not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_role(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<String>,
) -> AppResult<Json<Role>> {
    authorize(&MANAGE_ROLES, &user)?;

    let role = state.services.roles.get_by_id.execute(id).await?;
    Ok(Json(role))
}

/// Create a role
#[utoipa::path(
    post,
    path = "/roles",
    tag = "roles",
    security(("bearer_auth" = [])),
    request_body = CreateRoleRequest,
    responses(
        (status = 201, description = "Role created", body = Role),
        (status = 409, description = "Name already used", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_role(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(request): Json<CreateRoleRequest>,
) -> AppResult<(StatusCode, Json<Role>)> {
    authorize(&MANAGE_ROLES, &user)?;
    request.validate()?;

    let role = state.services.roles.create.execute(request).await?;
    Ok((StatusCode::CREATED, Json(role)))
}

/// Update a role's name or permissions
#[utoipa::path(
    put,
    path = "/roles/{id}",
    tag = "roles",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Role ID")),
    request_body = UpdateRoleRequest,
    responses(
        (status = 200, description = "Role updated", body = Role),
        (status = 404, description = "Role not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_role(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<String>,
    Json(mut request): Json<UpdateRoleRequest>,
) -> AppResult<Json<Role>> {
    authorize(&MANAGE_ROLES, &user)?;
    request.validate()?;
    request.id = id;

    let role = state.services.roles.update.execute(request).await?;
    Ok(Json(role))
}

/// Delete a role that no user holds
#[utoipa::path(
    delete,
    path = "/roles/{id}",
    tag = "roles",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Role ID")),
    responses(
        (status = 200, description = "Deleted role", body = Role),
        (status = 404, description = "Role not found", body = crate::error::ErrorResponse),
        (status = 409, description = "Role still assigned", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_role(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<String>,
) -> AppResult<Json<Role>> {
    authorize(&MANAGE_ROLES, &user)?;

    let role = state.services.roles.delete.execute(id).await?;
    Ok(Json(role))
}
