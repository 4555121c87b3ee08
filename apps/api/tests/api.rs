//! End-to-end tests against the full router with an in-memory database.

use axum::body::{Body, Bytes};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use tally_api::{build_app, ApiConfig, AppState};
use tally_db::{Database, DbConfig};

async fn test_app() -> Router {
    let db = Database::new(DbConfig::in_memory()).await.unwrap();
    let config = ApiConfig {
        jwt_secret: "integration-test-secret".to_string(),
        ..ApiConfig::default()
    };
    build_app(AppState::new(db, &config))
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Bytes) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, body)
}

fn json_body(bytes: &Bytes) -> Value {
    serde_json::from_slice(bytes).unwrap()
}

fn post_json(uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::empty()).unwrap()
}

fn token_form(username: &str, password: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/token")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(format!("username={}&password={}", username, password)))
        .unwrap()
}

async fn register_and_login(app: &Router, username: &str) -> String {
    let (status, _) = send(
        app,
        post_json("/register", None, json!({"username": username, "password": "secret123"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(app, token_form(username, "secret123")).await;
    assert_eq!(status, StatusCode::OK);
    json_body(&body)["access_token"].as_str().unwrap().to_string()
}

fn groceries(payment: Value) -> Value {
    json!({
        "products": [
            {"name": "bread", "price": 2.50, "quantity": 2},
            {"name": "milk", "price": 1.75, "quantity": 1}
        ],
        "payment": payment
    })
}

async fn create(app: &Router, token: &str, body: Value) -> Value {
    let (status, bytes) = send(app, post_json("/create_receipt", Some(token), body)).await;
    assert_eq!(status, StatusCode::OK, "{}", String::from_utf8_lossy(&bytes));
    json_body(&bytes)
}

// =============================================================================
// Accounts
// =============================================================================

#[tokio::test]
async fn test_register_returns_user() {
    let app = test_app().await;

    let (status, body) = send(
        &app,
        post_json("/register", None, json!({"username": "alice", "password": "secret123"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let user = json_body(&body);
    assert_eq!(user["username"], "alice");
    assert!(user["id"].as_str().is_some_and(|id| !id.is_empty()));
    assert!(user.get("password_hash").is_none());
}

#[tokio::test]
async fn test_register_duplicate_username() {
    let app = test_app().await;
    register_and_login(&app, "alice").await;

    let (status, body) = send(
        &app,
        post_json("/register", None, json!({"username": "alice", "password": "other-pass"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json_body(&body)["code"], "ALREADY_EXISTS");
}

#[tokio::test]
async fn test_register_rejects_blank_username() {
    let app = test_app().await;

    let (status, body) = send(
        &app,
        post_json("/register", None, json!({"username": "   ", "password": "secret123"})),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json_body(&body)["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_token_issues_bearer() {
    let app = test_app().await;
    send(
        &app,
        post_json("/register", None, json!({"username": "alice", "password": "secret123"})),
    )
    .await;

    let (status, body) = send(&app, token_form("alice", "secret123")).await;

    assert_eq!(status, StatusCode::OK);
    let token = json_body(&body);
    assert_eq!(token["token_type"], "bearer");
    assert!(token["access_token"].as_str().is_some_and(|t| t.split('.').count() == 3));
}

#[tokio::test]
async fn test_token_wrong_password() {
    let app = test_app().await;
    register_and_login(&app, "alice").await;

    let (status, body) = send(&app, token_form("alice", "wrong-pass")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json_body(&body)["code"], "UNAUTHORIZED");

    let (status, _) = send(&app, token_form("nobody", "secret123")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

// =============================================================================
// Authentication guard
// =============================================================================

#[tokio::test]
async fn test_protected_routes_require_token() {
    let app = test_app().await;

    let response = app
        .clone()
        .oneshot(post_json("/create_receipt", None, groceries(json!({"type": "card"}))))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(response.headers()[header::WWW_AUTHENTICATE], "Bearer");

    let (status, _) = send(&app, get("/receipts", None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, get("/receipts", Some("not-a-jwt"))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_token_from_other_secret_rejected() {
    let app = test_app().await;
    register_and_login(&app, "alice").await;

    let other = tally_api::auth::JwtManager::new("some-other-secret", 600);
    let forged = other.generate_access_token("anything", "alice").unwrap();

    let (status, _) = send(&app, get("/receipts", Some(&forged))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

// =============================================================================
// Receipts
// =============================================================================

#[tokio::test]
async fn test_create_cash_receipt() {
    let app = test_app().await;
    let token = register_and_login(&app, "alice").await;

    let receipt = create(&app, &token, groceries(json!({"type": "cash", "amount": 10.00}))).await;

    assert_eq!(receipt["total"], 6.75);
    assert_eq!(receipt["rest"], 3.25);
    assert_eq!(receipt["payment"]["type"], "cash");
    assert_eq!(receipt["payment"]["amount"], 10.0);
    assert_eq!(receipt["products"][0]["name"], "bread");
    assert_eq!(receipt["products"][0]["total"], 5.0);
    assert_eq!(receipt["products"][1]["total"], 1.75);
}

#[tokio::test]
async fn test_create_card_receipt_ignores_amount() {
    let app = test_app().await;
    let token = register_and_login(&app, "alice").await;

    let receipt = create(&app, &token, groceries(json!({"type": "card", "amount": 99.0}))).await;

    assert_eq!(receipt["total"], 6.75);
    assert_eq!(receipt["rest"], 0.0);
    assert!(receipt["payment"].get("amount").is_none());
}

#[tokio::test]
async fn test_create_keeps_sub_cent_prices_exact() {
    let app = test_app().await;
    let token = register_and_login(&app, "alice").await;

    let body = json!({
        "products": [
            {"name": "nails", "price": 0.005, "quantity": 1000},
            {"name": "washer", "price": 0.01, "quantity": 0.5},
            {"name": "washer", "price": 0.01, "quantity": 0.5}
        ],
        "payment": {"type": "cash", "amount": 10}
    });
    let receipt = create(&app, &token, body).await;

    assert_eq!(receipt["total"], 5.01);
    assert_eq!(receipt["rest"], 4.99);
    assert_eq!(receipt["products"][0]["total"], 5.0);
    assert_eq!(receipt["products"][1]["total"], 0.005);

    let (_, body) = send(&app, get("/receipts?min_total_amount=5.015", Some(&token))).await;
    assert_eq!(json_body(&body).as_array().unwrap().len(), 0);
    let (_, body) = send(&app, get("/receipts?min_total_amount=5.01", Some(&token))).await;
    assert_eq!(json_body(&body).as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_create_empty_receipt() {
    let app = test_app().await;
    let token = register_and_login(&app, "alice").await;

    let receipt = create(
        &app,
        &token,
        json!({"products": [], "payment": {"type": "cash", "amount": 5.00}}),
    )
    .await;

    assert_eq!(receipt["total"], 0.0);
    assert_eq!(receipt["rest"], 5.0);
}

#[tokio::test]
async fn test_create_rejects_bad_payment() {
    let app = test_app().await;
    let token = register_and_login(&app, "alice").await;

    let (status, body) = send(
        &app,
        post_json("/create_receipt", Some(&token), groceries(json!({"type": "crypto"}))),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json_body(&body)["code"], "PAYMENT_ERROR");

    // Case-sensitive tag
    let (status, _) = send(
        &app,
        post_json("/create_receipt", Some(&token), groceries(json!({"type": "Card"}))),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = send(
        &app,
        post_json("/create_receipt", Some(&token), groceries(json!({"type": "cash"}))),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_create_rejects_invalid_items() {
    let app = test_app().await;
    let token = register_and_login(&app, "alice").await;

    let body = json!({
        "products": [{"name": "bread", "price": -1.0, "quantity": 1}],
        "payment": {"type": "card"}
    });
    let (status, bytes) = send(&app, post_json("/create_receipt", Some(&token), body)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json_body(&bytes)["code"], "VALIDATION_ERROR");

    let body = json!({
        "products": [{"name": "bread", "price": 1.0, "quantity": 0}],
        "payment": {"type": "card"}
    });
    let (status, _) = send(&app, post_json("/create_receipt", Some(&token), body)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_create_rejects_malformed_json() {
    let app = test_app().await;
    let token = register_and_login(&app, "alice").await;

    let request = Request::builder()
        .method("POST")
        .uri("/create_receipt")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::from("{not json"))
        .unwrap();

    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json_body(&body)["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_list_is_scoped_and_ordered() {
    let app = test_app().await;
    let alice = register_and_login(&app, "alice").await;
    let bob = register_and_login(&app, "bob").await;

    let first = create(&app, &alice, groceries(json!({"type": "cash", "amount": 10.0}))).await;
    std::thread::sleep(std::time::Duration::from_millis(5));
    let second = create(&app, &alice, groceries(json!({"type": "card"}))).await;
    create(&app, &bob, groceries(json!({"type": "card"}))).await;

    let (status, body) = send(&app, get("/receipts", Some(&alice))).await;
    assert_eq!(status, StatusCode::OK);

    let list = json_body(&body);
    let ids: Vec<&str> = list.as_array().unwrap().iter().map(|r| r["id"].as_str().unwrap()).collect();
    assert_eq!(ids, vec![first["id"].as_str().unwrap(), second["id"].as_str().unwrap()]);
}

#[tokio::test]
async fn test_list_filters() {
    let app = test_app().await;
    let token = register_and_login(&app, "alice").await;

    create(&app, &token, groceries(json!({"type": "cash", "amount": 10.0}))).await;
    create(&app, &token, groceries(json!({"type": "card"}))).await;
    create(
        &app,
        &token,
        json!({"products": [{"name": "tea", "price": 1.0, "quantity": 1}], "payment": {"type": "card"}}),
    )
    .await;

    let count = |body: &Bytes| json_body(body).as_array().unwrap().len();

    let (_, body) = send(&app, get("/receipts?payment_type=card", Some(&token))).await;
    assert_eq!(count(&body), 2);

    let (_, body) = send(&app, get("/receipts?payment_type=cash", Some(&token))).await;
    assert_eq!(count(&body), 1);

    let (_, body) = send(&app, get("/receipts?min_total_amount=5", Some(&token))).await;
    assert_eq!(count(&body), 2);

    let (_, body) = send(&app, get("/receipts?min_total_amount=5&payment_type=card", Some(&token))).await;
    assert_eq!(count(&body), 1);

    let (_, body) = send(&app, get("/receipts?start_date=2999-01-01", Some(&token))).await;
    assert_eq!(count(&body), 0);

    let (_, body) = send(&app, get("/receipts?end_date=2000-01-01T00:00:00Z", Some(&token))).await;
    assert_eq!(count(&body), 0);

    let (_, body) = send(
        &app,
        get("/receipts?start_date=2000-01-01&end_date=2999-12-31", Some(&token)),
    )
    .await;
    assert_eq!(count(&body), 3);
}

#[tokio::test]
async fn test_list_rejects_bad_date() {
    let app = test_app().await;
    let token = register_and_login(&app, "alice").await;

    let (status, body) = send(&app, get("/receipts?start_date=yesterday", Some(&token))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json_body(&body)["code"], "VALIDATION_ERROR");
}

// =============================================================================
// Rendering
// =============================================================================

#[tokio::test]
async fn test_view_renders_text() {
    let app = test_app().await;
    let token = register_and_login(&app, "alice").await;
    let receipt = create(&app, &token, groceries(json!({"type": "cash", "amount": 10.0}))).await;
    let id = receipt["id"].as_str().unwrap();

    // Public: no token
    let (status, body) = send(&app, get(&format!("/receipts/{}/view", id), None)).await;
    assert_eq!(status, StatusCode::OK);

    let text = String::from_utf8(body.to_vec()).unwrap();
    let lines: Vec<&str> = text.split('\n').collect();
    assert_eq!(lines.len(), 8);
    assert!(lines.iter().all(|l| l.chars().count() == 50));
    assert!(lines[2].contains("6.75"));
    assert!(lines[4].contains("3.25"));

    let (status, body) = send(&app, get(&format!("/receipts/{}/view?chars=10", id), None)).await;
    assert_eq!(status, StatusCode::OK);
    let text = String::from_utf8(body.to_vec()).unwrap();
    assert_eq!(text.split('\n').next(), Some("      ФОП "));
    assert!(text.split('\n').all(|l| l.chars().count() == 10));
}

#[tokio::test]
async fn test_view_width_bounds() {
    let app = test_app().await;
    let token = register_and_login(&app, "alice").await;
    let receipt = create(&app, &token, groceries(json!({"type": "card"}))).await;
    let id = receipt["id"].as_str().unwrap();

    let (status, body) = send(&app, get(&format!("/receipts/{}/view?chars=5", id), None)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json_body(&body)["code"], "VALIDATION_ERROR");

    let (status, _) = send(&app, get(&format!("/receipts/{}/view?chars=201", id), None)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = send(&app, get(&format!("/receipts/{}/view?chars=200", id), None)).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_view_unknown_receipt() {
    let app = test_app().await;

    let (status, body) = send(&app, get("/receipts/does-not-exist/view", None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json_body(&body)["code"], "NOT_FOUND");
}

// =============================================================================
// Health
// =============================================================================

#[tokio::test]
async fn test_health() {
    let app = test_app().await;

    let (status, body) = send(&app, get("/health", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(&body[..], b"OK");
}
