//! API handlers for Homebranch REST endpoints

pub mod authors;
pub mod books;
pub mod bookshelves;
pub mod guard;
pub mod health;
pub mod openapi;
pub mod roles;
pub mod saved_positions;
pub mod users;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::request::Parts,
    routing::{get, put},
    Router,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{error::AppError, models::User, services::UseCase, AppState};

/// Claims carried by access tokens. `sub` is the user id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
}

impl Claims {
    pub fn from_token(token: &str, secret: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::new(Algorithm::HS256),
        )?;
        Ok(data.claims)
    }
}

/// Extractor for the acting user, resolved from the bearer token
pub struct AuthenticatedUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| AppError::Authentication("Missing or invalid bearer token".to_string()))?;

        let claims = Claims::from_token(bearer.token(), &state.config.auth.jwt_secret)
            .map_err(|e| AppError::Authentication(e.to_string()))?;

        let user = state
            .services
            .users
            .get_by_id
            .execute(claims.sub)
            .await
            .map_err(|e| match e {
                AppError::UserNotFound => AppError::Authentication("Unknown user".to_string()),
                other => other,
            })?;

        Ok(AuthenticatedUser(user))
    }
}

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_v1 = Router::new()
        // Health
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        // Books
        .route("/books", get(books::list_books).post(books::create_book))
        .route("/books/favorites", get(books::list_favorite_books))
        .route(
            "/books/:id",
            get(books::get_book).put(books::update_book).delete(books::delete_book),
        )
        .route("/books/:id/book-shelves", get(bookshelves::list_book_shelves_by_book))
        // Book shelves
        .route(
            "/book-shelves",
            get(bookshelves::list_book_shelves).post(bookshelves::create_book_shelf),
        )
        .route(
            "/book-shelves/:id",
            get(bookshelves::get_book_shelf)
                .put(bookshelves::update_book_shelf)
                .delete(bookshelves::delete_book_shelf),
        )
        .route(
            "/book-shelves/:id/books",
            get(bookshelves::list_book_shelf_books).post(bookshelves::add_book_to_book_shelf),
        )
        .route(
            "/book-shelves/:id/books/:book_id",
            axum::routing::delete(bookshelves::remove_book_from_book_shelf),
        )
        // Roles
        .route("/roles", get(roles::list_roles).post(roles::create_role))
        .route(
            "/roles/:id",
            get(roles::get_role).put(roles::update_role).delete(roles::delete_role),
        )
        // Users
        .route("/users", get(users::list_users))
        .route("/users/:id", get(users::get_user).put(users::update_user))
        .route("/users/:id/restrict", put(users::restrict_user))
        .route("/users/:id/unrestrict", put(users::unrestrict_user))
        .route("/users/:id/role", put(users::assign_role))
        // Saved positions
        .route("/saved-positions", get(saved_positions::list_saved_positions))
        .route(
            "/saved-positions/:book_id",
            get(saved_positions::get_saved_position)
                .put(saved_positions::save_position)
                .delete(saved_positions::delete_saved_position),
        )
        // Authors
        .route("/authors", get(authors::list_authors))
        .route("/authors/:id", get(authors::get_author))
        .with_state(state);

    Router::new()
        .nest("/api/v1", api_v1)
        .merge(openapi::create_openapi_router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}


#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use tower::util::ServiceExt;

    use super::test_support::*;

    #[tokio::test]
    async fn test_health_needs_no_token() {
        let app = Mocks::default().into_router();
        let response = app
            .oneshot(request("GET", "/api/v1/health", None, None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response.into_body()).await;
        assert_eq!(body["status"], "healthy");
    }

    #[tokio::test]
    async fn test_missing_token_is_unauthorized() {
        let app = Mocks::default().into_router();
        let response = app
            .oneshot(request("GET", "/api/v1/books", None, None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = json_body(response.into_body()).await;
        assert_eq!(body["code"], "UNAUTHORIZED");
    }

    #[tokio::test]
    async fn test_token_for_unknown_user_is_unauthorized() {
        let mut mocks = Mocks::default();
        mocks
            .users
            .expect_find_by_id()
            .returning(|_| Err(crate::error::AppError::UserNotFound));

        let response = mocks
            .into_router()
            .oneshot(request("GET", "/api/v1/books", Some("ghost"), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_token_signed_with_other_secret_is_rejected() {
        use axum::{body::Body, http::Request};
        use jsonwebtoken::{encode, EncodingKey, Header};

        let claims = super::Claims {
            sub: "user-admin".into(),
            exp: (chrono::Utc::now().timestamp() + 3600) as usize,
        };
        let forged = encode(&Header::default(), &claims, &EncodingKey::from_secret(b"other")).unwrap();

        let mut mocks = Mocks::default();
        mocks.users.expect_find_by_id().never();

        let response = mocks
            .into_router()
            .oneshot(
                Request::builder()
                    .uri("/api/v1/books")
                    .header("authorization", format!("Bearer {}", forged))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
