//! Author endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};

use super::{
    guard::{authorize, RequiredPermissions},
    AuthenticatedUser,
};
use crate::{
    error::AppResult,
    models::{Author, Page, PaginatedQuery},
    services::UseCase,
    AppState,
};

pub const GET_AUTHORS: RequiredPermissions = RequiredPermissions::none("getAuthors");

/// List authors; `query` filters by name. Unenriched authors are looked up in the background.
#[utoipa::path(
    get,
    path = "/authors",
    tag = "authors",
    security(("bearer_auth" = [])),
    params(PaginatedQuery),
    responses(
        (status = 200, description = "Page of authors", body = crate::models::pagination::AuthorPage)
    )
)]
pub async fn list_authors(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Query(query): Query<PaginatedQuery>,
) -> AppResult<Json<Page<Author>>> {
    authorize(&GET_AUTHORS, &user)?;

    let page = state.services.authors.list.execute(query).await?;
    Ok(Json(page))
}

/// Get author by ID
#[utoipa::path(
    get,
    path = "/authors/{id}",
    tag = "authors",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Author ID")),
    responses(
        (status = 200, description = "Author", body = Author),
        (status = 404, description = "Author not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_author(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<String>,
) -> AppResult<Json<Author>> {
    authorize(&GET_AUTHORS, &user)?;

    let author = state.services.authors.get_by_id.execute(id).await?;
    Ok(Json(author))
}
