//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{authors, books, bookshelves, health, roles, saved_positions, users};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Homebranch API",
        version = "1.0.0",
        description = "Personal e-book library REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Books
        books::list_books,
        books::list_favorite_books,
        books::get_book,
        books::create_book,
        books::update_book,
        books::delete_book,
        // Book shelves
        bookshelves::list_book_shelves,
        bookshelves::get_book_shelf,
        bookshelves::create_book_shelf,
        bookshelves::update_book_shelf,
        bookshelves::delete_book_shelf,
        bookshelves::list_book_shelf_books,
        bookshelves::add_book_to_book_shelf,
        bookshelves::remove_book_from_book_shelf,
        bookshelves::list_book_shelves_by_book,
        // Roles
        roles::list_roles,
        roles::get_role,
        roles::create_role,
        roles::update_role,
        roles::delete_role,
        // Users
        users::list_users,
        users::get_user,
        users::update_user,
        users::restrict_user,
        users::unrestrict_user,
        users::assign_role,
        // Saved positions
        saved_positions::list_saved_positions,
        saved_positions::get_saved_position,
        saved_positions::save_position,
        saved_positions::delete_saved_position,
        // Authors
        authors::list_authors,
        authors::get_author,
    ),
    components(
        schemas(
            // Books
            crate::models::book::Book,
            crate::models::book::CreateBookRequest,
            crate::models::book::UpdateBookRequest,
            crate::models::pagination::BookPage,
            // Book shelves
            crate::models::bookshelf::BookShelf,
            crate::models::bookshelf::CreateBookShelfRequest,
            crate::models::bookshelf::UpdateBookShelfRequest,
            crate::models::bookshelf::AddBookToBookShelfRequest,
            crate::models::pagination::BookShelfPage,
            // Roles
            crate::models::role::Role,
            crate::models::role::CreateRoleRequest,
            crate::models::role::UpdateRoleRequest,
            crate::models::permission::Permission,
            crate::models::pagination::RolePage,
            // Users
            crate::models::user::User,
            crate::models::user::UpdateUserRequest,
            crate::models::user::AssignRoleRequest,
            crate::models::pagination::UserPage,
            // Saved positions
            crate::models::saved_position::SavedPosition,
            crate::models::saved_position::SavePositionRequest,
            // Authors
            crate::models::author::Author,
            crate::models::pagination::AuthorPage,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "books", description = "Book catalog"),
        (name = "book-shelves", description = "Book shelves"),
        (name = "roles", description = "Roles and permissions"),
        (name = "users", description = "User management"),
        (name = "saved-positions", description = "Reading positions"),
        (name = "authors", description = "Authors and their enrichment")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_route_is_documented() {
        let doc = ApiDoc::openapi();
        for path in [
            "/books",
            "/books/{id}",
            "/book-shelves/{id}/books/{book_id}",
            "/users/{id}/role",
            "/saved-positions/{book_id}",
            "/authors",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {}", path);
        }
    }
}
