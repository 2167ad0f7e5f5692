//! API integration tests
//!
//! Run against a live server with a seeded administrator:
//! `HOMEBRANCH_TEST_USER_ID=<admin id> JWT_SECRET=<secret> cargo test -- --ignored`

use jsonwebtoken::{encode, EncodingKey, Header};
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:8080/api/v1";

/// Sign a token for the seeded administrator
fn admin_token() -> String {
    let user_id = std::env::var("HOMEBRANCH_TEST_USER_ID").expect("HOMEBRANCH_TEST_USER_ID not set");
    let secret = std::env::var("JWT_SECRET").unwrap_or_else(|_| "change-this-secret-in-production".into());

    let claims = json!({
        "sub": user_id,
        "exp": chrono::Utc::now().timestamp() + 3600,
    });
    encode(&Header::default(), &claims, &EncodingKey::from_secret(secret.as_bytes()))
        .expect("Failed to sign token")
}

fn unique(prefix: &str) -> String {
    format!("{}-{}", prefix, uuid::Uuid::new_v4())
}

async fn create_book(client: &Client, token: &str, title: &str) -> Value {
    let response = client
        .post(format!("{}/books", BASE_URL))
        .bearer_auth(token)
        .json(&json!({
            "title": title,
            "author": "Ursula K. Le Guin",
            "fileName": format!("{}.epub", title),
            "publishedYear": "1969"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::CREATED);
    response.json().await.expect("Failed to parse response")
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_ready_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/ready", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore]
async fn test_books_require_token() {
    let client = Client::new();

    let response = client
        .get(format!("{}/books", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["code"], "UNAUTHORIZED");
}

#[tokio::test]
#[ignore]
async fn test_book_lifecycle() {
    let client = Client::new();
    let token = admin_token();
    let title = unique("left-hand-of-darkness");

    let book = create_book(&client, &token, &title).await;
    let id = book["id"].as_str().expect("No id in response").to_string();
    assert_eq!(book["publishedYear"], 1969);
    assert_eq!(book["isFavorite"], false);

    let response = client
        .put(format!("{}/books/{}", BASE_URL, id))
        .bearer_auth(&token)
        .json(&json!({"isFavorite": true, "publishedYear": null}))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);
    let updated: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(updated["isFavorite"], true);
    assert!(updated["publishedYear"].is_null());
    assert_eq!(updated["title"], title.as_str());

    let response = client
        .delete(format!("{}/books/{}", BASE_URL, id))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);

    let response = client
        .get(format!("{}/books/{}", BASE_URL, id))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore]
async fn test_updated_author_is_listed() {
    let client = Client::new();
    let token = admin_token();

    let book = create_book(&client, &token, &unique("earthsea")).await;
    let id = book["id"].as_str().expect("No id in response");
    let author = unique("pen_name%");

    let response = client
        .put(format!("{}/books/{}", BASE_URL, id))
        .bearer_auth(&token)
        .json(&json!({"author": author}))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);

    let response = client
        .get(format!("{}/authors", BASE_URL))
        .query(&[("query", author.as_str())])
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);
    let page: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(page["total"], 1);
    assert_eq!(page["data"][0]["name"], author.as_str());
}

#[tokio::test]
#[ignore]
async fn test_book_shelf_membership_is_idempotent() {
    let client = Client::new();
    let token = admin_token();

    let book = create_book(&client, &token, &unique("dispossessed")).await;
    let book_id = book["id"].as_str().expect("No id in response");

    let response = client
        .post(format!("{}/book-shelves", BASE_URL))
        .bearer_auth(&token)
        .json(&json!({"title": unique("hainish")}))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::CREATED);
    let shelf: Value = response.json().await.expect("Failed to parse response");
    let shelf_id = shelf["id"].as_str().expect("No id in response");

    for _ in 0..2 {
        let response = client
            .post(format!("{}/book-shelves/{}/books", BASE_URL, shelf_id))
            .bearer_auth(&token)
            .json(&json!({"bookId": book_id}))
            .send()
            .await
            .expect("Failed to send request");
        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = response.json().await.expect("Failed to parse response");
        assert_eq!(body["books"].as_array().map(|b| b.len()), Some(1));
    }

    let response = client
        .get(format!("{}/books/{}/book-shelves", BASE_URL, book_id))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");
    let shelves: Value = response.json().await.expect("Failed to parse response");
    assert!(shelves
        .as_array()
        .expect("Expected an array")
        .iter()
        .any(|s| s["id"] == shelf_id));
}

#[tokio::test]
#[ignore]
async fn test_duplicate_role_name() {
    let client = Client::new();
    let token = admin_token();
    let name = unique("readers");

    let first = client
        .post(format!("{}/roles", BASE_URL))
        .bearer_auth(&token)
        .json(&json!({"name": name, "permissions": []}))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(first.status(), StatusCode::CREATED);

    let second = client
        .post(format!("{}/roles", BASE_URL))
        .bearer_auth(&token)
        .json(&json!({"name": name, "permissions": ["MANAGE_BOOKS"]}))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(second.status(), StatusCode::CONFLICT);
    let body: Value = second.json().await.expect("Failed to parse response");
    assert_eq!(body["code"], "DUPLICATE_ROLE_NAME");
}

#[tokio::test]
#[ignore]
async fn test_rename_role_to_existing_name() {
    let client = Client::new();
    let token = admin_token();
    let taken = unique("librarians");

    let mut ids = Vec::new();
    for name in [taken.clone(), unique("archivists")] {
        let response = client
            .post(format!("{}/roles", BASE_URL))
            .bearer_auth(&token)
            .json(&json!({"name": name, "permissions": []}))
            .send()
            .await
            .expect("Failed to send request");
        assert_eq!(response.status(), StatusCode::CREATED);
        let role: Value = response.json().await.expect("Failed to parse response");
        ids.push(role["id"].as_str().expect("No id in response").to_string());
    }

    let response = client
        .put(format!("{}/roles/{}", BASE_URL, ids[1]))
        .bearer_auth(&token)
        .json(&json!({"name": taken}))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["code"], "DUPLICATE_ROLE_NAME");
}

#[tokio::test]
#[ignore]
async fn test_saved_position_upsert() {
    let client = Client::new();
    let token = admin_token();

    let book = create_book(&client, &token, &unique("lathe-of-heaven")).await;
    let book_id = book["id"].as_str().expect("No id in response");
    let url = format!("{}/saved-positions/{}", BASE_URL, book_id);

    for (position, device) in [("epubcfi(/6/2)", "Kobo"), ("epubcfi(/6/8)", "Phone")] {
        let response = client
            .put(&url)
            .bearer_auth(&token)
            .json(&json!({"position": position, "deviceName": device}))
            .send()
            .await
            .expect("Failed to send request");
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = client
        .get(&url)
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");
    let saved: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(saved["position"], "epubcfi(/6/8)");
    assert_eq!(saved["deviceName"], "Phone");

    let response = client
        .delete(&url)
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}
