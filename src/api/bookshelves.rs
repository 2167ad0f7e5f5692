//! Book shelf endpoints

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
        bookshelf::{
            AddBookToBookShelfRequest, CreateBookShelfRequest, RemoveBookFromBookShelfRequest,
            UpdateBookShelfRequest,
        },
        Book, BookShelf, Page, PaginatedQuery, Permission,
    },
    services::{bookshelves::GetBookShelfBooksRequest, UseCase},
    AppState,
};

pub const READ_BOOK_SHELVES: RequiredPermissions = RequiredPermissions::none("getBookShelves");
pub const CREATE_BOOK_SHELF: RequiredPermissions = RequiredPermissions {
    operation: "createBookShelf",
    permissions: &[Permission::ManageBookshelves],
};
pub const UPDATE_BOOK_SHELF: RequiredPermissions = RequiredPermissions {
    operation: "updateBookShelf",
    permissions: &[Permission::ManageBookshelves],
};
pub const DELETE_BOOK_SHELF: RequiredPermissions = RequiredPermissions {
    operation: "deleteBookShelf",
    permissions: &[Permission::ManageBookshelves],
};
pub const EDIT_SHELF_BOOKS: RequiredPermissions = RequiredPermissions {
    operation: "editBookShelfBooks",
    permissions: &[Permission::ManageBookshelves],
};

/// List book shelves
#[utoipa::path(
    get,
    path = "/book-shelves",
    tag = "book-shelves",
    security(("bearer_auth" = [])),
    params(PaginatedQuery),
    responses(
        (status = 200, description = "Page of book shelves", body = crate::models::pagination::BookShelfPage)
    )
)]
pub async fn list_book_shelves(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Query(query): Query<PaginatedQuery>,
) -> AppResult<Json<Page<BookShelf>>> {
    authorize(&READ_BOOK_SHELVES, &user)?;

    let page = state.services.book_shelves.list.execute(query).await?;
    Ok(Json(page))
}

/// Get book shelf by ID, with its books
#[utoipa::path(
    get,
    path = "/book-shelves/{id}",
    tag = "book-shelves",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Book shelf ID")),
    responses(
        (status = 200, description = "Book shelf", body = BookShelf),
        (status = 404, description = "Book shelf not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_book_shelf(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<String>,
) -> AppResult<Json<BookShelf>> {
    authorize(&READ_BOOK_SHELVES, &user)?;

    let book_shelf = state.services.book_shelves.get_by_id.execute(id).await?;
    Ok(Json(book_shelf))
}

/// Create a book shelf
#[utoipa::path(
    post,
    path = "/book-shelves",
    tag = "book-shelves",
    security(("bearer_auth" = [])),
    request_body = CreateBookShelfRequest,
    responses(
        (status = 201, description = "Book shelf created", body = BookShelf),
        (status = 409, description = "Title already used", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_book_shelf(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(request): Json<CreateBookShelfRequest>,
) -> AppResult<(StatusCode, Json<BookShelf>)> {
    authorize(&CREATE_BOOK_SHELF, &user)?;
    request.validate()?;

    let book_shelf = state.services.book_shelves.create.execute(request).await?;
    Ok((StatusCode::CREATED, Json(book_shelf)))
}

/// Rename a book shelf
#[utoipa::path(
    put,
    path = "/book-shelves/{id}",
    tag = "book-shelves",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Book shelf ID")),
    request_body = UpdateBookShelfRequest,
    responses(
        (status = 200, description = "Book shelf updated", body = BookShelf),
        (status = 404, description = "Book shelf not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_book_shelf(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<String>,
    Json(mut request): Json<UpdateBookShelfRequest>,
) -> AppResult<Json<BookShelf>> {
    authorize(&UPDATE_BOOK_SHELF, &user)?;
    request.validate()?;
    request.id = id;

    let book_shelf = state.services.book_shelves.update.execute(request).await?;
    Ok(Json(book_shelf))
}

/// Delete a book shelf; its books are kept
#[utoipa::path(
    delete,
    path = "/book-shelves/{id}",
    tag = "book-shelves",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Book shelf ID")),
    responses(
        (status = 200, description = "Deleted book shelf", body = BookShelf),
        (status = 404, description = "Book shelf not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_book_shelf(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<String>,
) -> AppResult<Json<BookShelf>> {
    authorize(&DELETE_BOOK_SHELF, &user)?;

    let book_shelf = state.services.book_shelves.delete.execute(id).await?;
    Ok(Json(book_shelf))
}

/// Page through the books on a shelf
#[utoipa::path(
    get,
    path = "/book-shelves/{id}/books",
    tag = "book-shelves",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Book shelf ID"), PaginatedQuery),
    responses(
        (status = 200, description = "Page of books", body = crate::models::pagination::BookPage),
        (status = 404, description = "Book shelf not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_book_shelf_books(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<String>,
    Query(query): Query<PaginatedQuery>,
) -> AppResult<Json<Page<Book>>> {
    authorize(&READ_BOOK_SHELVES, &user)?;

    let page = state
        .services
        .book_shelves
        .books
        .execute(GetBookShelfBooksRequest {
            book_shelf_id: id,
            limit: query.limit,
            offset: query.offset,
        })
        .await?;
    Ok(Json(page))
}

/// Put a book on a shelf
#[utoipa::path(
    post,
    path = "/book-shelves/{id}/books",
    tag = "book-shelves",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Book shelf ID")),
    request_body = AddBookToBookShelfRequest,
    responses(
        (status = 200, description = "Updated book shelf", body = BookShelf),
        (status = 404, description = "Book or book shelf not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn add_book_to_book_shelf(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<String>,
    Json(mut request): Json<AddBookToBookShelfRequest>,
) -> AppResult<Json<BookShelf>> {
    authorize(&EDIT_SHELF_BOOKS, &user)?;
    request.validate()?;
    request.book_shelf_id = id;

    let book_shelf = state.services.book_shelves.add_book.execute(request).await?;
    Ok(Json(book_shelf))
}

/// Take a book off a shelf
#[utoipa::path(
    delete,
    path = "/book-shelves/{id}/books/{book_id}",
    tag = "book-shelves",
    security(("bearer_auth" = [])),
    params(
        ("id" = String, Path, description = "Book shelf ID"),
        ("book_id" = String, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Updated book shelf", body = BookShelf),
        (status = 404, description = "Book shelf not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn remove_book_from_book_shelf(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path((id, book_id)): Path<(String, String)>,
) -> AppResult<Json<BookShelf>> {
    authorize(&EDIT_SHELF_BOOKS, &user)?;

    let book_shelf = state
        .services
        .book_shelves
        .remove_book
        .execute(RemoveBookFromBookShelfRequest {
            book_shelf_id: id,
            book_id,
        })
        .await?;
    Ok(Json(book_shelf))
}

/// Shelves holding a given book
#[utoipa::path(
    get,
    path = "/books/{id}/book-shelves",
    tag = "book-shelves",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book shelves containing the book", body = [BookShelf])
    )
)]
pub async fn list_book_shelves_by_book(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<String>,
) -> AppResult<Json<Vec<BookShelf>>> {
    authorize(&READ_BOOK_SHELVES, &user)?;

    let book_shelves = state.services.book_shelves.by_book.execute(id).await?;
    Ok(Json(book_shelves))
}
