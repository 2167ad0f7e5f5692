//! Reading position endpoints, scoped to the acting user

use axum::{
    extract::{Path, State},
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
        saved_position::{SavePositionRequest, SavedPositionKey},
        SavedPosition,
    },
    services::UseCase,
    AppState,
};

pub const OWN_POSITIONS: RequiredPermissions = RequiredPermissions::none("savedPositions");

/// List the acting user's saved positions, most recent first
#[utoipa::path(
    get,
    path = "/saved-positions",
    tag = "saved-positions",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Saved positions", body = [SavedPosition])
    )
)]
pub async fn list_saved_positions(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> AppResult<Json<Vec<SavedPosition>>> {
    authorize(&OWN_POSITIONS, &user)?;

    let positions = state.services.saved_positions.list.execute(user.id).await?;
    Ok(Json(positions))
}

/// Get the acting user's position in a book
#[utoipa::path(
    get,
    path = "/saved-positions/{book_id}",
    tag = "saved-positions",
    security(("bearer_auth" = [])),
    params(("book_id" = String, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Saved position", body = SavedPosition),
        (status = 404, description = "No position saved", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_saved_position(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(book_id): Path<String>,
) -> AppResult<Json<SavedPosition>> {
    authorize(&OWN_POSITIONS, &user)?;

    let position = state
        .services
        .saved_positions
        .get
        .execute(SavedPositionKey {
            book_id,
            user_id: user.id,
        })
        .await?;
    Ok(Json(position))
}

/// Save or replace the acting user's position in a book
#[utoipa::path(
    put,
    path = "/saved-positions/{book_id}",
    tag = "saved-positions",
    security(("bearer_auth" = [])),
    params(("book_id" = String, Path, description = "Book ID")),
    request_body = SavePositionRequest,
    responses(
        (status = 200, description = "Position saved", body = SavedPosition),
        (status = 400, description = "Invalid input", body = crate::error::ErrorResponse)
    )
)]
pub async fn save_position(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(book_id): Path<String>,
    Json(mut request): Json<SavePositionRequest>,
) -> AppResult<Json<SavedPosition>> {
    authorize(&OWN_POSITIONS, &user)?;
    request.validate()?;
    request.book_id = book_id;
    request.user_id = user.id;

    let position = state.services.saved_positions.save.execute(request).await?;
    Ok(Json(position))
}

/// Forget the acting user's position in a book
#[utoipa::path(
    delete,
    path = "/saved-positions/{book_id}",
    tag = "saved-positions",
    security(("bearer_auth" = [])),
    params(("book_id" = String, Path, description = "Book ID")),
    responses(
        (status = 204, description = "Position deleted"),
        (status = 404, description = "No position saved", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_saved_position(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(book_id): Path<String>,
) -> AppResult<StatusCode> {
    authorize(&OWN_POSITIONS, &user)?;

    state
        .services
        .saved_positions
        .delete
        .execute(SavedPositionKey {
            book_id,
            user_id: user.id,
        })
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
