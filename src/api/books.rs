//! Book endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;
use validator::Validate;

use super::{
    guard::{authorize, RequiredPermissions},
    AuthenticatedUser,
};
use crate::{
    error::AppResult,
    models::{
        book::{CreateBookRequest, UpdateBookRequest},
        Book, Page, PaginatedQuery, Permission,
    },
    services::{books::GetBooksByAuthorRequest, UseCase},
    AppState,
};

pub const GET_BOOKS: RequiredPermissions = RequiredPermissions::none("getBooks");
pub const GET_BOOK: RequiredPermissions = RequiredPermissions::none("getBookById");
pub const CREATE_BOOK: RequiredPermissions = RequiredPermissions {
    operation: "createBook",
    permissions: &[Permission::ManageBooks],
};
pub const UPDATE_BOOK: RequiredPermissions = RequiredPermissions {
    operation: "updateBook",
    permissions: &[Permission::ManageBooks],
};
pub const DELETE_BOOK: RequiredPermissions = RequiredPermissions {
    operation: "deleteBook",
    permissions: &[Permission::ManageBooks],
};

/// Book listing filters
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct BookListQuery {
    /// Only books by this exact author name
    pub author: Option<String>,
    /// Page size (default 20, max 100)
    pub limit: Option<i64>,
    /// Number of records to skip
    pub offset: Option<i64>,
}

/// List books, optionally by author
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    security(("bearer_auth" = [])),
    params(BookListQuery),
    responses(
        (status = 200, description = "Page of books", body = crate::models::pagination::BookPage),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_books(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Query(query): Query<BookListQuery>,
) -> AppResult<Json<Page<Book>>> {
    authorize(&GET_BOOKS, &user)?;

    let page = match query.author {
        Some(author) => {
            state
                .services
                .books
                .by_author
                .execute(GetBooksByAuthorRequest {
                    author,
                    limit: query.limit,
                    offset: query.offset,
                })
                .await?
        }
        None => {
            state
                .services
                .books
                .list
                .execute(PaginatedQuery::new(query.limit, query.offset))
                .await?
        }
    };
    Ok(Json(page))
}

/// List favorite books
#[utoipa::path(
    get,
    path = "/books/favorites",
    tag = "books",
    security(("bearer_auth" = [])),
    params(PaginatedQuery),
    responses(
        (status = 200, description = "Page of favorite books", body = crate::models::pagination::BookPage),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_favorite_books(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Query(query): Query<PaginatedQuery>,
) -> AppResult<Json<Page<Book>>> {
    authorize(&GET_BOOKS, &user)?;

    let page = state.services.books.favorites.execute(query).await?;
    Ok(Json(page))
}

/// Get book by ID
#[utoipa::path(
    get,
    path = "/books/{id}",
    tag = "books",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book details", body = Book),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_book(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<String>,
) -> AppResult<Json<Book>> {
    authorize(&GET_BOOK, &user)?;

    let book = state.services.books.get_by_id.execute(id).await?;
    Ok(Json(book))
}

/// Register an uploaded book
#[utoipa::path(
    post,
    path = "/books",
    tag = "books",
    security(("bearer_auth" = [])),
    request_body = CreateBookRequest,
    responses(
        (status = 201, description = "Book created", body = Book),
        (status = 400, description = "Invalid input", body = crate::error::ErrorResponse),
        (status = 403, description = "Missing MANAGE_BOOKS", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_book(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(request): Json<CreateBookRequest>,
) -> AppResult<(StatusCode, Json<Book>)> {
    authorize(&CREATE_BOOK, &user)?;
    request.validate()?;

    let book = state.services.books.create.execute(request).await?;
    Ok((StatusCode::CREATED, Json(book)))
}

/// Update a book; omitted fields are kept
#[utoipa::path(
    put,
    path = "/books/{id}",
    tag = "books",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Book ID")),
    request_body = UpdateBookRequest,
    responses(
        (status = 200, description = "Book updated", body = Book),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_book(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<String>,
    Json(mut request): Json<UpdateBookRequest>,
) -> AppResult<Json<Book>> {
    authorize(&UPDATE_BOOK, &user)?;
    request.validate()?;
    request.id = id;

    let book = state.services.books.update.execute(request).await?;
    Ok(Json(book))
}

/// Delete a book and its files
#[utoipa::path(
    delete,
    path = "/books/{id}",
    tag = "books",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Deleted book", body = Book),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_book(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<String>,
) -> AppResult<Json<Book>> {
    authorize(&DELETE_BOOK, &user)?;

    let book = state.services.books.delete.execute(id).await?;
    Ok(Json(book))
}
