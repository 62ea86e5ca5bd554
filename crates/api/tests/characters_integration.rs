//! Integration tests for character CRUD, play state, and downtime.
//!
//! Requires a PostgreSQL database. Set TEST_DATABASE_URL or use the default
//! test database.

mod common;

use axum::http::{Method, StatusCode};
use tower::ServiceExt;

use common::*;

#[tokio::test]
async fn test_create_character_with_defaults() {
    let (app, _pool) = create_test_app().await;

    let auth = create_authenticated_user(&app, &TestUser::new()).await;

    let response = app
        .clone()
        .oneshot(json_request_with_auth(
            Method::POST,
            "/api/v1/characters",
            serde_json::json!({ "name": "Fresh Hero" }),
            &auth.access_token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = parse_response_body(response).await;
    assert_eq!(json["name"], "Fresh Hero");
    assert_eq!(json["level"], 1);
    assert_eq!(json["max_hp"], 10);
    // A fresh character starts at full health with no experience
    assert_eq!(json["hp"], 10);
    assert_eq!(json["xp"], 0);
}

#[tokio::test]
async fn test_character_crud() {
    let (app, _pool) = create_test_app().await;

    let auth = create_authenticated_user(&app, &TestUser::new()).await;
    let character_id = create_test_character(&app, &auth, "Karlach").await;

    // Get
    let response = app
        .clone()
        .oneshot(get_request_with_auth(
            &format!("/api/v1/characters/{}", character_id),
            &auth.access_token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = parse_response_body(response).await;
    assert_eq!(json["name"], "Karlach");
    assert_eq!(json["class"], "Fighter");

    // Update descriptive fields
    let response = app
        .clone()
        .oneshot(json_request_with_auth(
            Method::PUT,
            &format!("/api/v1/characters/{}", character_id),
            serde_json::json!({ "class": "Barbarian", "level": 5 }),
            &auth.access_token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = parse_response_body(response).await;
    assert_eq!(json["name"], "Karlach");
    assert_eq!(json["class"], "Barbarian");
    assert_eq!(json["level"], 5);

    // List
    let response = app
        .clone()
        .oneshot(get_request_with_auth(
            "/api/v1/characters",
            &auth.access_token,
        ))
        .await
        .unwrap();
    let list = parse_response_body(response).await;
    assert_eq!(list["data"].as_array().unwrap().len(), 1);

    // Delete
    let response = app
        .clone()
        .oneshot(delete_request_with_auth(
            &format!("/api/v1/characters/{}", character_id),
            &auth.access_token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .clone()
        .oneshot(get_request_with_auth(
            &format!("/api/v1/characters/{}", character_id),
            &auth.access_token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_character_explicit_null_clears_class() {
    let (app, _pool) = create_test_app().await;

    let auth = create_authenticated_user(&app, &TestUser::new()).await;
    let character_id = create_test_character(&app, &auth, "Durge").await;

    // Leaving the field out keeps the class
    let response = app
        .clone()
        .oneshot(json_request_with_auth(
            Method::PUT,
            &format!("/api/v1/characters/{}", character_id),
            serde_json::json!({ "name": "The Dark Urge" }),
            &auth.access_token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let kept = parse_response_body(response).await;
    assert_eq!(kept["class"], "Fighter");

    // Sending null clears it
    let response = app
        .clone()
        .oneshot(json_request_with_auth(
            Method::PUT,
            &format!("/api/v1/characters/{}", character_id),
            serde_json::json!({ "class": null }),
            &auth.access_token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let cleared = parse_response_body(response).await;
    assert!(cleared["class"].is_null());
    assert_eq!(cleared["name"], "The Dark Urge");
}

#[tokio::test]
async fn test_update_character_state_patch() {
    let (app, _pool) = create_test_app().await;

    let auth = create_authenticated_user(&app, &TestUser::new()).await;
    let character_id = create_test_character(&app, &auth, "Gale").await;

    let response = app
        .clone()
        .oneshot(json_request_with_auth(
            Method::PATCH,
            &format!("/api/v1/characters/{}/state", character_id),
            serde_json::json!({
                "hp": 12,
                "xp": 900,
                "conditions": ["poisoned", "exhausted"],
            }),
            &auth.access_token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = parse_response_body(response).await;
    assert_eq!(json["hp"], 12);
    assert_eq!(json["xp"], 900);
    assert_eq!(
        json["conditions"],
        serde_json::json!(["poisoned", "exhausted"])
    );
    // Untouched fields survive the patch
    assert_eq!(json["max_hp"], 28);
    assert_eq!(json["level"], 3);
}

#[tokio::test]
async fn test_characters_are_isolated_between_owners() {
    let (app, _pool) = create_test_app().await;

    let owner = create_authenticated_user(&app, &TestUser::new()).await;
    let character_id = create_test_character(&app, &owner, "Private Hero").await;

    let stranger = create_authenticated_user(&app, &TestUser::new()).await;

    // Foreign characters read as not found, never forbidden
    let response = app
        .clone()
        .oneshot(get_request_with_auth(
            &format!("/api/v1/characters/{}", character_id),
            &stranger.access_token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .clone()
        .oneshot(json_request_with_auth(
            Method::PATCH,
            &format!("/api/v1/characters/{}/state", character_id),
            serde_json::json!({ "hp": 0 }),
            &stranger.access_token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .clone()
        .oneshot(delete_request_with_auth(
            &format!("/api/v1/characters/{}", character_id),
            &stranger.access_token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_character_limit_per_account() {
    let (app, _pool) = create_test_app().await;

    let auth = create_authenticated_user(&app, &TestUser::new()).await;

    for i in 0..50 {
        let response = app
            .clone()
            .oneshot(json_request_with_auth(
                Method::POST,
                "/api/v1/characters",
                serde_json::json!({ "name": format!("Hero {}", i) }),
                &auth.access_token,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = app
        .clone()
        .oneshot(json_request_with_auth(
            Method::POST,
            "/api/v1/characters",
            serde_json::json!({ "name": "One Too Many" }),
            &auth.access_token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_downtime_create_and_list() {
    let (app, _pool) = create_test_app().await;

    let auth = create_authenticated_user(&app, &TestUser::new()).await;
    let character_id = create_test_character(&app, &auth, "Shadowheart").await;

    let response = app
        .clone()
        .oneshot(json_request_with_auth(
            Method::POST,
            &format!("/api/v1/characters/{}/downtime", character_id),
            serde_json::json!({
                "activity": "Researching the Nightsong",
                "days": 7,
                "notes": "Library of Candlekeep",
            }),
            &auth.access_token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = parse_response_body(response).await;
    assert_eq!(json["activity"], "Researching the Nightsong");
    assert_eq!(json["days"], 7);

    let response = app
        .clone()
        .oneshot(json_request_with_auth(
            Method::POST,
            &format!("/api/v1/characters/{}/downtime", character_id),
            serde_json::json!({ "activity": "Carousing", "days": 2 }),
            &auth.access_token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .clone()
        .oneshot(get_request_with_auth(
            &format!("/api/v1/characters/{}/downtime", character_id),
            &auth.access_token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let list = parse_response_body(response).await;
    let entries = list["data"].as_array().unwrap();
    assert_eq!(entries.len(), 2);
    // Newest first
    assert_eq!(entries[0]["activity"], "Carousing");
}

#[tokio::test]
async fn test_downtime_rejects_zero_days() {
    let (app, _pool) = create_test_app().await;

    let auth = create_authenticated_user(&app, &TestUser::new()).await;
    let character_id = create_test_character(&app, &auth, "Wyll").await;

    let response = app
        .clone()
        .oneshot(json_request_with_auth(
            Method::POST,
            &format!("/api/v1/characters/{}/downtime", character_id),
            serde_json::json!({ "activity": "Loafing", "days": 0 }),
            &auth.access_token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_mint_passport_returns_simulated_outcome() {
    let (app, _pool) = create_test_app().await;

    let auth = create_authenticated_user(&app, &TestUser::new()).await;
    let character_id = create_test_character(&app, &auth, "Astarion").await;

    // Chain minting is disabled in the test config, so the outcome is simulated
    let response = app
        .clone()
        .oneshot(json_request_with_auth(
            Method::POST,
            &format!("/api/v1/characters/{}/passport/mint", character_id),
            serde_json::json!({}),
            &auth.access_token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::ACCEPTED);

    let json = parse_response_body(response).await;
    assert_eq!(json["status"], "simulated");
    assert!(json["tx_hash"].is_null());
    assert!(json["token_id"].as_str().unwrap().starts_with("sim-"));
    assert!(json["token_uri"]
        .as_str()
        .unwrap()
        .starts_with("tavern://passport/"));
}
