//! Router-level authentication and authorization
//!
//! Drives the assembled axum app with oneshot requests.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use http::{Request, StatusCode, header};
use serde_json::{Value, json};
use surrealdb::Surreal;
use surrealdb::engine::local::RocksDb;
use tempfile::TempDir;
use tower::util::ServiceExt;

use catalog_server::db::models::UserCreate;
use catalog_server::db::repository::UserRepository;
use catalog_server::{Config, JwtService, ServerState, api};

async fn test_app() -> (Router, ServerState, TempDir) {
    let tmp = tempfile::tempdir().unwrap();
    let db = Surreal::new::<RocksDb>(tmp.path()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();

    let users = UserRepository::new(db.clone());
    users
        .create(UserCreate {
            username: "admin".to_string(),
            password: "secret".to_string(),
            is_staff: Some(true),
        })
        .await
        .unwrap();
    users
        .create(UserCreate {
            username: "viewer".to_string(),
            password: "secret".to_string(),
            is_staff: Some(false),
        })
        .await
        .unwrap();

    let state = ServerState::new(Config::from_env(), db, Arc::new(JwtService::new()));
    let app = api::build_app(&state).with_state(state.clone());
    (app, state, tmp)
}

fn json_request(method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let body = match body {
        Some(value) => Body::from(serde_json::to_vec(&value).unwrap()),
        None => Body::empty(),
    };
    builder.body(body).unwrap()
}

async fn response_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn login(app: &Router, username: &str, password: &str) -> axum::response::Response {
    app.clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/login",
            None,
            Some(json!({"username": username, "password": password})),
        ))
        .await
        .unwrap()
}

#[tokio::test]
async fn health_is_public() {
    let (app, _state, _tmp) = test_app().await;
    let response = app
        .oneshot(json_request("GET", "/api/health", None, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn catalog_requires_token() {
    let (app, _state, _tmp) = test_app().await;
    let response = app
        .oneshot(json_request("GET", "/api/categories", None, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn login_rejects_bad_credentials() {
    let (app, _state, _tmp) = test_app().await;
    let response = login(&app, "admin", "wrong").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn login_rejects_non_staff() {
    let (app, _state, _tmp) = test_app().await;
    let response = login(&app, "viewer", "secret").await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn admin_token_grants_catalog_access() {
    let (app, _state, _tmp) = test_app().await;

    let response = login(&app, "admin", "secret").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    let token = body["token"].as_str().unwrap().to_string();
    assert_eq!(body["user"]["username"], "admin");

    // Create then list a category through the HTTP surface
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/categories",
            Some(&token),
            Some(json!({"name": "Garden", "parent": null})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let created = response_json(response).await;
    assert_eq!(created["name"], "Garden");

    let response = app
        .oneshot(json_request("GET", "/api/categories", Some(&token), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let listed = response_json(response).await;
    assert_eq!(listed.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn non_staff_token_is_forbidden() {
    let (app, state, _tmp) = test_app().await;

    // A non-staff token never comes out of login; forge one directly
    let token = state
        .get_jwt_service()
        .generate_token("user:viewer", "viewer", false)
        .unwrap();

    let response = app
        .oneshot(json_request("GET", "/api/categories", Some(&token), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn garbage_token_is_invalid() {
    let (app, _state, _tmp) = test_app().await;
    let response = app
        .oneshot(json_request(
            "GET",
            "/api/categories",
            Some("not-a-token"),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
