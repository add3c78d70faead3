//! API integration tests
//!
//! Need a running server on BASE_URL with the seed data loaded
//! (`cargo run --bin seed`). Run with: cargo test --test api_tests -- --ignored

use reqwest::{Client, StatusCode};
use serde_json::{json, Value};

const SERVER_URL: &str = "http://localhost:3000";
const BASE_URL: &str = "http://localhost:3000/api";

fn unique_email(prefix: &str) -> String {
    format!(
        "{}-{}@example.com",
        prefix,
        chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default()
    )
}

async fn login(client: &Client, email: &str, password: &str) -> String {
    let response = client
        .post(format!("{}/usuarios/login", BASE_URL))
        .json(&json!({ "email": email, "password": password }))
        .send()
        .await
        .expect("Failed to send login request");

    let body: Value = response.json().await.expect("Failed to parse login response");
    body["token"].as_str().expect("No token in response").to_string()
}

async fn admin_token(client: &Client) -> String {
    login(client, "admin@biblioteca.com", "admin123").await
}

/// Register a fresh account, returning (id, token)
async fn register(client: &Client, email: &str, password: &str) -> (i64, String) {
    let response = client
        .post(format!("{}/usuarios/registro", BASE_URL))
        .json(&json!({ "nombre": "Lector de prueba", "email": email, "password": password }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::CREATED);

    let body: Value = response.json().await.expect("Failed to parse response");
    (
        body["usuario"]["id"].as_i64().expect("No user id"),
        body["token"].as_str().expect("No token").to_string(),
    )
}

async fn create_book(client: &Client, token: &str, title: &str) -> i64 {
    let response = client
        .post(format!("{}/libros", BASE_URL))
        .bearer_auth(token)
        .json(&json!({
            "nombre": title,
            "autor": "Autora de prueba",
            "genero": "Pruebas",
            "fechaPublicacion": "2020-02-02",
            "editorial": "Editorial de prueba"
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::CREATED);

    let body: Value = response.json().await.expect("Failed to parse response");
    body["libro"]["id"].as_i64().expect("No book id")
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/health", SERVER_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_register_then_login() {
    let client = Client::new();
    let email = unique_email("roundtrip");

    let (id, _) = register(&client, &email, "secret123").await;

    let response = client
        .post(format!("{}/usuarios/login", BASE_URL))
        .json(&json!({ "email": email, "password": "secret123" }))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["usuario"]["id"].as_i64(), Some(id));
    assert!(body["usuario"].get("password").is_none());
    assert!(body["token"].is_string());
}

#[tokio::test]
#[ignore]
async fn test_login_invalid_credentials() {
    let client = Client::new();

    let response = client
        .post(format!("{}/usuarios/login", BASE_URL))
        .json(&json!({ "email": "admin@biblioteca.com", "password": "wrong" }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore]
async fn test_duplicate_email_conflicts() {
    let client = Client::new();
    let email = unique_email("dup");
    register(&client, &email, "secret123").await;

    let response = client
        .post(format!("{}/usuarios/registro", BASE_URL))
        .json(&json!({ "nombre": "Otra", "email": email, "password": "secret123" }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
#[ignore]
async fn test_disabled_user_cannot_log_in() {
    let client = Client::new();
    let email = unique_email("disabled");
    let (id, token) = register(&client, &email, "secret123").await;

    let response = client
        .delete(format!("{}/usuarios/{}", BASE_URL, id))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());

    let response = client
        .post(format!("{}/usuarios/login", BASE_URL))
        .json(&json!({ "email": email, "password": "secret123" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // The old token stops working too
    let response = client
        .post(format!("{}/libros/reservar", BASE_URL))
        .bearer_auth(&token)
        .json(&json!({ "libroId": 1 }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore]
async fn test_user_cannot_modify_someone_else() {
    let client = Client::new();
    let (_, token) = register(&client, &unique_email("a"), "secret123").await;
    let (other_id, _) = register(&client, &unique_email("b"), "secret123").await;

    let response = client
        .put(format!("{}/usuarios/{}", BASE_URL, other_id))
        .bearer_auth(&token)
        .json(&json!({ "nombre": "Cambiado" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = client
        .delete(format!("{}/usuarios/{}", BASE_URL, other_id))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
#[ignore]
async fn test_reserve_lifecycle() {
    let client = Client::new();
    let admin = admin_token(&client).await;
    let book_id = create_book(&client, &admin, &unique_email("libro")).await;
    let (user_id, reader) = register(&client, &unique_email("reader"), "secret123").await;

    let reserve = || {
        client
            .post(format!("{}/libros/reservar", BASE_URL))
            .bearer_auth(&reader)
            .json(&json!({ "libroId": book_id }))
            .send()
    };

    let response = reserve().await.expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::CREATED);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["reserva"]["libroId"].as_i64(), Some(book_id));
    assert!(body["reserva"]["fechaEntrega"].is_null());

    let response = reserve().await.expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let book: Value = client
        .get(format!("{}/libros/{}", BASE_URL, book_id))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    assert_eq!(book["disponible"], false);

    let history: Value = client
        .get(format!("{}/reservas/usuario/{}", BASE_URL, user_id))
        .bearer_auth(&reader)
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    assert_eq!(history["historial"].as_array().map(Vec::len), Some(1));
}

#[tokio::test]
#[ignore]
async fn test_availability_update_needs_no_permission() {
    let client = Client::new();
    let admin = admin_token(&client).await;
    let book_id = create_book(&client, &admin, &unique_email("libro")).await;
    let (_, reader) = register(&client, &unique_email("reader"), "secret123").await;

    let response = client
        .put(format!("{}/libros/{}", BASE_URL, book_id))
        .bearer_auth(&reader)
        .json(&json!({ "disponible": false }))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());

    let response = client
        .put(format!("{}/libros/{}", BASE_URL, book_id))
        .bearer_auth(&reader)
        .json(&json!({ "nombre": "Otro título" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
#[ignore]
async fn test_disabled_book_is_hidden_and_not_reservable() {
    let client = Client::new();
    let admin = admin_token(&client).await;
    let book_id = create_book(&client, &admin, &unique_email("libro")).await;

    let response = client
        .delete(format!("{}/libros/{}", BASE_URL, book_id))
        .bearer_auth(&admin)
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());

    let response = client
        .get(format!("{}/libros/{}", BASE_URL, book_id))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = client
        .get(format!("{}/libros/{}?includeDisabled=true", BASE_URL, book_id))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());

    let response = client
        .post(format!("{}/libros/reservar", BASE_URL))
        .bearer_auth(&admin)
        .json(&json!({ "libroId": book_id }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore]
async fn test_list_books_pagination() {
    let client = Client::new();

    let response = client
        .get(format!("{}/libros?limit=5&page=1", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    let total = body["paginacion"]["totalLibros"].as_i64().unwrap_or_default();
    let max_page = body["paginacion"]["paginaMaxima"].as_i64().unwrap_or_default();
    assert_eq!(max_page, ((total + 4) / 5).max(1));

    let beyond: Value = client
        .get(format!("{}/libros?limit=5&page={}", BASE_URL, max_page + 1))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    assert_eq!(beyond["libros"].as_array().map(Vec::len), Some(0));
}
