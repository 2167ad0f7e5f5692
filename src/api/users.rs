//! User management endpoints

use axum::{
    extract::{Path, Query, State},
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
        user::{AssignRoleRequest, UpdateUserRequest},
        Page, PaginatedQuery, Permission, User,
    },
    services::UseCase,
    AppState,
};

pub const MANAGE_USERS: RequiredPermissions = RequiredPermissions {
    operation: "manageUsers",
    permissions: &[Permission::ManageUsers],
};

/// List users
#[utoipa::path(
    get,
    path = "/users",
    tag = "users",
    security(("bearer_auth" = [])),
    params(PaginatedQuery),
    responses(
        (status = 200, description = "Page of users", body = crate::models::pagination::UserPage),
        (status = 403, description = "Missing MANAGE_USERS", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_users(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Query(query): Query<PaginatedQuery>,
) -> AppResult<Json<Page<User>>> {
    authorize(&MANAGE_USERS, &user)?;

    let page = state.services.users.list.execute(query).await?;
    Ok(Json(page))
}

/// Get user details by ID
#[utoipa::path(
    get,
    path = "/users/{id}",
    tag = "users",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "User ID")),
    responses(
        (status = 200, description = "User details", body = User),
        (status = 404, description = "User not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_user(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<String>,
) -> AppResult<Json<User>> {
    authorize(&MANAGE_USERS, &user)?;

    let found = state.services.users.get_by_id.execute(id).await?;
    Ok(Json(found))
}

/// Update a user's profile
#[utoipa::path(
    put,
    path = "/users/{id}",
    tag = "users",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "User ID")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated", body = User),
        (status = 404, description = "User not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_user(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<String>,
    Json(mut request): Json<UpdateUserRequest>,
) -> AppResult<Json<User>> {
    authorize(&MANAGE_USERS, &user)?;
    request.validate()?;
    request.id = id;

    let updated = state.services.users.update.execute(request).await?;
    Ok(Json(updated))
}

/// Restrict a user
#[utoipa::path(
    put,
    path = "/users/{id}/restrict",
    tag = "users",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "User ID")),
    responses(
        (status = 200, description = "User restricted", body = User),
        (status = 404, description = "User not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn restrict_user(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<String>,
) -> AppResult<Json<User>> {
    authorize(&MANAGE_USERS, &user)?;

    let updated = state.services.users.restrict.execute(id).await?;
    Ok(Json(updated))
}

/// Lift a user's restriction
#[utoipa::path(
    put,
    path = "/users/{id}/unrestrict",
    tag = "users",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "User ID")),
    responses(
        (status = 200, description = "User unrestricted", body = User),
        (status = 404, description = "User not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn unrestrict_user(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<String>,
) -> AppResult<Json<User>> {
    authorize(&MANAGE_USERS, &user)?;

    let updated = state.services.users.unrestrict.execute(id).await?;
    Ok(Json(updated))
}

/// Assign a role to a user
#[utoipa::path(
    put,
    path = "/users/{id}/role",
    tag = "users",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "User ID")),
    request_body = AssignRoleRequest,
    responses(
        (status = 200, description = "Role assigned", body = User),
        (status = 404, description = "User or role not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn assign_role(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<String>,
    Json(mut request): Json<AssignRoleRequest>,
) -> AppResult<Json<User>> {
    authorize(&MANAGE_USERS, &user)?;
    request.validate()?;
    request.user_id = id;

    let updated = state.services.users.assign_role.execute(request).await?;
    Ok(Json(updated))
}
