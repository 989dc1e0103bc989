//! HTTP adapter tests driven through the router.

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use domain::Argon2PasswordHasher;
use registration_service_lib::http::{create_router, AppState};
use registration_service_lib::repository::InMemoryUserStore;
use registration_service_lib::service::UserRegistrar;

fn app() -> Router {
    let store = Arc::new(InMemoryUserStore::new());
    let hasher = Arc::new(Argon2PasswordHasher::new(1024, 1, 1).unwrap());
    let registrar = Arc::new(UserRegistrar::new(store.clone(), hasher));
    create_router(AppState::new(registrar, store))
}

fn register_request(body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/auth/register")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn valid_body() -> Value {
    json!({
        "email": "a@b.com",
        "password": "Abcdef1!",
        "firstName": "Jane",
        "lastName": "Doe"
    })
}

#[tokio::test]
async fn test_register_returns_created() {
    let response = app().oneshot(register_request(valid_body())).await.unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = json_body(response).await;
    assert_eq!(body["email"], "a@b.com");
    assert_eq!(body["firstName"], "Jane");
    assert_eq!(body["roles"], json!(["USER"]));
    assert_eq!(body["validated"], false);
    assert!(body.get("passwordHash").is_none());
    assert!(!body.to_string().contains("argon2"));
}

#[tokio::test]
async fn test_invalid_name_returns_field_details() {
    let mut body = valid_body();
    body["firstName"] = json!("John3");

    let response = app().oneshot(register_request(body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert_eq!(body["error"]["fields"][0]["field"], "firstName");
    assert_eq!(body["error"]["fields"][0]["code"], "name_characters");
}

#[tokio::test]
async fn test_malformed_json_rejected() {
    let request = Request::builder()
        .method("POST")
        .uri("/auth/register")
        .header("content-type", "application/json")
        .body(Body::from("{\"email\":"))
        .unwrap();

    let response = app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_duplicate_returns_conflict() {
    let app = app();

    let first = app
        .clone()
        .oneshot(register_request(valid_body()))
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::CREATED);

    let mut upper = valid_body();
    upper["email"] = json!("A@B.com");
    let second = app.oneshot(register_request(upper)).await.unwrap();

    assert_eq!(second.status(), StatusCode::CONFLICT);
    let body = json_body(second).await;
    assert_eq!(body["error"]["code"], "CONFLICT");
}

#[tokio::test]
async fn test_health_reports_store() {
    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();

    let response = app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["store"]["status"], "healthy");
}
