//! Integration tests for campaign-scoped content: session logs, quests, NPCs.
//!
//! Requires a PostgreSQL database. Set TEST_DATABASE_URL or use the default
//! test database.

mod common;

use axum::http::{Method, StatusCode};
use tower::ServiceExt;

use common::*;

#[tokio::test]
async fn test_session_log_crud() {
    let (app, _pool) = create_test_app().await;

    let owner = create_authenticated_user(&app, &TestUser::new()).await;
    let campaign_id = create_test_campaign(&app, &owner, "Session Chronicle").await;

    // Create with an explicit date
    let response = app
        .clone()
        .oneshot(json_request_with_auth(
            Method::POST,
            &format!("/api/v1/campaigns/{}/sessions", campaign_id),
            serde_json::json!({
                "title": "Session 1: The Goblin Ambush",
                "summary": "The caravan was attacked on the Triboar Trail.",
                "session_date": "2026-08-20",
            }),
            &owner.access_token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = parse_response_body(response).await;
    let session_id = created["id"].as_str().unwrap().to_string();
    assert_eq!(created["session_date"], "2026-08-20");

    // Create without a date defaults to today
    let response = app
        .clone()
        .oneshot(json_request_with_auth(
            Method::POST,
            &format!("/api/v1/campaigns/{}/sessions", campaign_id),
            serde_json::json!({ "title": "Session 2: Cragmaw Hideout" }),
            &owner.access_token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let second = parse_response_body(response).await;
    assert!(!second["session_date"].is_null());

    // Update
    let response = app
        .clone()
        .oneshot(json_request_with_auth(
            Method::PUT,
            &format!("/api/v1/campaigns/{}/sessions/{}", campaign_id, session_id),
            serde_json::json!({ "summary": "Revised: the ambush was a setup." }),
            &owner.access_token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let updated = parse_response_body(response).await;
    assert_eq!(updated["title"], "Session 1: The Goblin Ambush");
    assert_eq!(updated["summary"], "Revised: the ambush was a setup.");

    // List
    let response = app
        .clone()
        .oneshot(get_request_with_auth(
            &format!("/api/v1/campaigns/{}/sessions", campaign_id),
            &owner.access_token,
        ))
        .await
        .unwrap();
    let list = parse_response_body(response).await;
    assert_eq!(list["data"].as_array().unwrap().len(), 2);

    // Delete
    let response = app
        .clone()
        .oneshot(delete_request_with_auth(
            &format!("/api/v1/campaigns/{}/sessions/{}", campaign_id, session_id),
            &owner.access_token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_quest_lifecycle() {
    let (app, _pool) = create_test_app().await;

    let owner = create_authenticated_user(&app, &TestUser::new()).await;
    let campaign_id = create_test_campaign(&app, &owner, "Quest Board").await;

    // New quests start open
    let response = app
        .clone()
        .oneshot(json_request_with_auth(
            Method::POST,
            &format!("/api/v1/campaigns/{}/quests", campaign_id),
            serde_json::json!({
                "title": "Find the lost mine",
                "description": "Gundren's map points east of Phandalin.",
            }),
            &owner.access_token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = parse_response_body(response).await;
    let quest_id = created["id"].as_str().unwrap().to_string();
    assert_eq!(created["status"], "open");

    // Advance the status
    let response = app
        .clone()
        .oneshot(json_request_with_auth(
            Method::PUT,
            &format!("/api/v1/campaigns/{}/quests/{}", campaign_id, quest_id),
            serde_json::json!({ "status": "completed" }),
            &owner.access_token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let updated = parse_response_body(response).await;
    assert_eq!(updated["status"], "completed");
    assert_eq!(updated["title"], "Find the lost mine");

    // Unknown statuses are rejected at deserialization
    let response = app
        .clone()
        .oneshot(json_request_with_auth(
            Method::PUT,
            &format!("/api/v1/campaigns/{}/quests/{}", campaign_id, quest_id),
            serde_json::json!({ "status": "abandoned" }),
            &owner.access_token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    // Delete
    let response = app
        .clone()
        .oneshot(delete_request_with_auth(
            &format!("/api/v1/campaigns/{}/quests/{}", campaign_id, quest_id),
            &owner.access_token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_npc_crud() {
    let (app, _pool) = create_test_app().await;

    let owner = create_authenticated_user(&app, &TestUser::new()).await;
    let campaign_id = create_test_campaign(&app, &owner, "NPC Roster").await;

    let response = app
        .clone()
        .oneshot(json_request_with_auth(
            Method::POST,
            &format!("/api/v1/campaigns/{}/npcs", campaign_id),
            serde_json::json!({
                "name": "Sildar Hallwinter",
                "description": "Lords' Alliance agent, captured by goblins.",
                "location": "Cragmaw Hideout",
            }),
            &owner.access_token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = parse_response_body(response).await;
    let npc_id = created["id"].as_str().unwrap().to_string();
    assert_eq!(created["is_alive"], true);

    let response = app
        .clone()
        .oneshot(json_request_with_auth(
            Method::PUT,
            &format!("/api/v1/campaigns/{}/npcs/{}", campaign_id, npc_id),
            serde_json::json!({ "location": "Phandalin", "is_alive": false }),
            &owner.access_token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let updated = parse_response_body(response).await;
    assert_eq!(updated["name"], "Sildar Hallwinter");
    assert_eq!(updated["location"], "Phandalin");
    assert_eq!(updated["is_alive"], false);

    let response = app
        .clone()
        .oneshot(get_request_with_auth(
            &format!("/api/v1/campaigns/{}/npcs", campaign_id),
            &owner.access_token,
        ))
        .await
        .unwrap();
    let list = parse_response_body(response).await;
    assert_eq!(list["data"].as_array().unwrap().len(), 1);

    let response = app
        .clone()
        .oneshot(delete_request_with_auth(
            &format!("/api/v1/campaigns/{}/npcs/{}", campaign_id, npc_id),
            &owner.access_token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_seated_player_can_read_content_but_not_mutate() {
    let (app, _pool) = create_test_app().await;

    let owner = create_authenticated_user(&app, &TestUser::new()).await;
    let campaign_id = create_test_campaign(&app, &owner, "Reader's Table").await;
    let (_invite_id, token) =
        create_test_invite(&app, &owner, campaign_id, serde_json::json!({})).await;

    let response = app
        .clone()
        .oneshot(json_request_with_auth(
            Method::POST,
            &format!("/api/v1/campaigns/{}/quests", campaign_id),
            serde_json::json!({ "title": "Clear the cellar" }),
            &owner.access_token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let quest = parse_response_body(response).await;
    let quest_id = quest["id"].as_str().unwrap().to_string();

    let player = create_authenticated_user(&app, &TestUser::new()).await;
    let character_id = create_test_character(&app, &player, "Reader").await;

    let response = app
        .clone()
        .oneshot(json_request_with_auth(
            Method::POST,
            "/api/v1/join",
            serde_json::json!({ "token": token, "character_id": character_id }),
            &player.access_token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    // A seated player reads quests, sessions, and NPCs
    for uri in [
        format!("/api/v1/campaigns/{}/quests", campaign_id),
        format!("/api/v1/campaigns/{}/sessions", campaign_id),
        format!("/api/v1/campaigns/{}/npcs", campaign_id),
    ] {
        let response = app
            .clone()
            .oneshot(get_request_with_auth(&uri, &player.access_token))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK, "uri: {}", uri);
    }

    // But mutations remain owner-only
    let response = app
        .clone()
        .oneshot(json_request_with_auth(
            Method::PUT,
            &format!("/api/v1/campaigns/{}/quests/{}", campaign_id, quest_id),
            serde_json::json!({ "status": "completed" }),
            &player.access_token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_content_is_scoped_to_its_campaign() {
    let (app, _pool) = create_test_app().await;

    let owner = create_authenticated_user(&app, &TestUser::new()).await;
    let campaign_a = create_test_campaign(&app, &owner, "Campaign A").await;
    let campaign_b = create_test_campaign(&app, &owner, "Campaign B").await;

    let response = app
        .clone()
        .oneshot(json_request_with_auth(
            Method::POST,
            &format!("/api/v1/campaigns/{}/quests", campaign_a),
            serde_json::json!({ "title": "A-side quest" }),
            &owner.access_token,
        ))
        .await
        .unwrap();
    let quest = parse_response_body(response).await;
    let quest_id = quest["id"].as_str().unwrap().to_string();

    // The quest belongs to campaign A; addressing it through B reads as not found
    let response = app
        .clone()
        .oneshot(json_request_with_auth(
            Method::PUT,
            &format!("/api/v1/campaigns/{}/quests/{}", campaign_b, quest_id),
            serde_json::json!({ "status": "active" }),
            &owner.access_token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .clone()
        .oneshot(delete_request_with_auth(
            &format!("/api/v1/campaigns/{}/quests/{}", campaign_b, quest_id),
            &owner.access_token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
