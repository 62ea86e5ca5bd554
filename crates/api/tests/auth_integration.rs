//! Integration tests for authentication endpoints.
//!
//! Requires a PostgreSQL database. Set TEST_DATABASE_URL or use the default
//! test database.

mod common;

use axum::http::{Method, StatusCode};
use tower::ServiceExt;

use common::*;

#[tokio::test]
async fn test_register_returns_user_and_tokens() {
    let (app, _pool) = create_test_app().await;

    let user = TestUser::new();
    let response = app
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/api/v1/auth/register",
            serde_json::json!({
                "email": user.email,
                "password": user.password,
                "display_name": user.display_name,
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = parse_response_body(response).await;
    assert_eq!(json["user"]["email"], user.email);
    assert_eq!(json["user"]["display_name"], user.display_name);
    assert_eq!(json["tokens"]["token_type"], "Bearer");
    assert!(json["tokens"]["access_token"].as_str().is_some());
    assert!(json["tokens"]["refresh_token"].as_str().is_some());
}

#[tokio::test]
async fn test_register_duplicate_email_conflicts() {
    let (app, _pool) = create_test_app().await;

    let user = TestUser::new();
    create_authenticated_user(&app, &user).await;

    let response = app
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/api/v1/auth/register",
            serde_json::json!({
                "email": user.email,
                "password": user.password,
                "display_name": "Second Account",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_register_rejects_weak_password() {
    let (app, _pool) = create_test_app().await;

    let response = app
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/api/v1/auth/register",
            serde_json::json!({
                "email": unique_test_email(),
                "password": "short",
                "display_name": "Test User",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_login_with_valid_credentials() {
    let (app, _pool) = create_test_app().await;

    let user = TestUser::new();
    create_authenticated_user(&app, &user).await;

    let response = app
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/api/v1/auth/login",
            serde_json::json!({
                "email": user.email,
                "password": user.password,
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = parse_response_body(response).await;
    assert_eq!(json["user"]["email"], user.email);
    assert!(json["tokens"]["access_token"].as_str().is_some());
}

#[tokio::test]
async fn test_login_with_wrong_password_is_unauthorized() {
    let (app, _pool) = create_test_app().await;

    let user = TestUser::new();
    create_authenticated_user(&app, &user).await;

    let response = app
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/api/v1/auth/login",
            serde_json::json!({
                "email": user.email,
                "password": "WrongP@ssword99!",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_with_unknown_email_is_unauthorized() {
    let (app, _pool) = create_test_app().await;

    let response = app
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/api/v1/auth/login",
            serde_json::json!({
                "email": unique_test_email(),
                "password": "SecureP@ss123!",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_refresh_issues_new_access_token() {
    let (app, _pool) = create_test_app().await;

    let auth = create_authenticated_user(&app, &TestUser::new()).await;

    let response = app
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/api/v1/auth/refresh",
            serde_json::json!({ "refresh_token": auth.refresh_token }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = parse_response_body(response).await;
    let new_access = json["access_token"].as_str().unwrap();

    // The new token works against a protected endpoint
    let response = app
        .clone()
        .oneshot(get_request_with_auth("/api/v1/characters", new_access))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_refresh_rejects_garbage_token() {
    let (app, _pool) = create_test_app().await;

    let response = app
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/api/v1/auth/refresh",
            serde_json::json!({ "refresh_token": "not.a.jwt" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_protected_route_rejects_missing_token() {
    let (app, _pool) = create_test_app().await;

    let response = app
        .clone()
        .oneshot(get_request("/api/v1/characters"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_health_endpoints_are_public() {
    let (app, _pool) = create_test_app().await;

    for uri in ["/api/health", "/api/health/ready", "/api/health/live"] {
        let response = app.clone().oneshot(get_request(uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK, "uri: {}", uri);
    }
}
