//! Integration tests for the invite preview and party join flow.
//!
//! Requires a PostgreSQL database. Set TEST_DATABASE_URL or use the default
//! test database.

mod common;

use axum::http::{Method, StatusCode};
use tower::ServiceExt;

use common::*;

#[tokio::test]
async fn test_preview_invite_anonymous() {
    let (app, _pool) = create_test_app().await;

    let owner = create_authenticated_user(&app, &TestUser::new()).await;
    let campaign_id = create_test_campaign(&app, &owner, "The Amber Throne").await;
    let (_invite_id, token) =
        create_test_invite(&app, &owner, campaign_id, serde_json::json!({})).await;

    // Anonymous preview: campaign info plus a login URL, no character list
    let response = app
        .clone()
        .oneshot(get_request(&format!("/api/v1/join/{}", token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = parse_response_body(response).await;
    assert_eq!(json["campaign"]["name"], "The Amber Throne");
    assert_eq!(json["is_valid"], true);
    assert!(json["available_characters"].is_null());
    let login_url = json["login_url"].as_str().unwrap();
    assert!(login_url.contains(&format!("/login?callback=/join/{}", token)));
}

#[tokio::test]
async fn test_preview_invite_authenticated_lists_unseated_characters() {
    let (app, _pool) = create_test_app().await;

    let owner = create_authenticated_user(&app, &TestUser::new()).await;
    let campaign_id = create_test_campaign(&app, &owner, "Curse of the Weald").await;
    let (_invite_id, token) =
        create_test_invite(&app, &owner, campaign_id, serde_json::json!({})).await;

    let player = create_authenticated_user(&app, &TestUser::new()).await;
    let seated = create_test_character(&app, &player, "Karlach").await;
    let free = create_test_character(&app, &player, "Gale").await;

    // Seat the first character
    let response = app
        .clone()
        .oneshot(json_request_with_auth(
            Method::POST,
            "/api/v1/join",
            serde_json::json!({ "token": token, "character_id": seated }),
            &player.access_token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    // The preview now offers only the unseated character
    let response = app
        .clone()
        .oneshot(get_request_with_auth(
            &format!("/api/v1/join/{}", token),
            &player.access_token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = parse_response_body(response).await;
    assert!(json["login_url"].is_null());
    let available = json["available_characters"].as_array().unwrap();
    assert_eq!(available.len(), 1);
    assert_eq!(available[0]["id"], free.to_string());
    assert_eq!(available[0]["name"], "Gale");
}

#[tokio::test]
async fn test_preview_malformed_token_is_not_found() {
    let (app, _pool) = create_test_app().await;

    let response = app
        .clone()
        .oneshot(get_request("/api/v1/join/not-a-real-token"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_preview_unknown_token_is_not_found() {
    let (app, _pool) = create_test_app().await;

    // Well-formed but nonexistent
    let token = "A".repeat(40);
    let response = app
        .clone()
        .oneshot(get_request(&format!("/api/v1/join/{}", token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_join_is_idempotent_per_character() {
    let (app, _pool) = create_test_app().await;

    let owner = create_authenticated_user(&app, &TestUser::new()).await;
    let campaign_id = create_test_campaign(&app, &owner, "Rime of the Frostmaiden").await;
    let (_invite_id, token) =
        create_test_invite(&app, &owner, campaign_id, serde_json::json!({ "max_uses": 5 })).await;

    let player = create_authenticated_user(&app, &TestUser::new()).await;
    let character_id = create_test_character(&app, &player, "Shadowheart").await;

    // First join creates the seat
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
    let first = parse_response_body(response).await;
    assert_eq!(first["already_member"], false);
    let member_id = first["membership"]["id"].as_str().unwrap().to_string();
    assert!(first["player_view_url"]
        .as_str()
        .unwrap()
        .contains(&format!("/campaigns/{}/play?character={}", campaign_id, character_id)));

    // Second join returns the same seat without consuming a use
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
    assert_eq!(response.status(), StatusCode::OK);
    let second = parse_response_body(response).await;
    assert_eq!(second["already_member"], true);
    assert_eq!(second["membership"]["id"], member_id);

    // used_count reflects exactly one consumed use
    let response = app
        .clone()
        .oneshot(get_request_with_auth(
            &format!("/api/v1/campaigns/{}/invites", campaign_id),
            &owner.access_token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let invites = parse_response_body(response).await;
    assert_eq!(invites["data"][0]["used_count"], 1);
}

#[tokio::test]
async fn test_join_exhausts_invite_at_max_uses() {
    let (app, _pool) = create_test_app().await;

    let owner = create_authenticated_user(&app, &TestUser::new()).await;
    let campaign_id = create_test_campaign(&app, &owner, "Tomb of Annihilation").await;
    let (_invite_id, token) =
        create_test_invite(&app, &owner, campaign_id, serde_json::json!({ "max_uses": 2 })).await;

    // Two distinct players take the two available uses
    for _ in 0..2 {
        let player = create_authenticated_user(&app, &TestUser::new()).await;
        let character_id = create_test_character(&app, &player, "Adventurer").await;

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
    }

    // The third attempt finds the invite spent
    let late = create_authenticated_user(&app, &TestUser::new()).await;
    let late_character = create_test_character(&app, &late, "Latecomer").await;

    let response = app
        .clone()
        .oneshot(json_request_with_auth(
            Method::POST,
            "/api/v1/join",
            serde_json::json!({ "token": token, "character_id": late_character }),
            &late.access_token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::GONE);
    let json = parse_response_body(response).await;
    assert_eq!(json["error"], "invalid_invite");

    // The roster holds exactly max_uses seats
    let response = app
        .clone()
        .oneshot(get_request_with_auth(
            &format!("/api/v1/campaigns/{}/party", campaign_id),
            &owner.access_token,
        ))
        .await
        .unwrap();
    let roster = parse_response_body(response).await;
    assert_eq!(roster["data"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_join_revoked_invite_is_gone() {
    let (app, _pool) = create_test_app().await;

    let owner = create_authenticated_user(&app, &TestUser::new()).await;
    let campaign_id = create_test_campaign(&app, &owner, "Storm King's Thunder").await;
    let (invite_id, token) =
        create_test_invite(&app, &owner, campaign_id, serde_json::json!({})).await;

    let response = app
        .clone()
        .oneshot(delete_request_with_auth(
            &format!("/api/v1/campaigns/{}/invites/{}", campaign_id, invite_id),
            &owner.access_token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let player = create_authenticated_user(&app, &TestUser::new()).await;
    let character_id = create_test_character(&app, &player, "Wyll").await;

    // Revoked and expired invites get the same terminal response
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
    assert_eq!(response.status(), StatusCode::GONE);
    let json = parse_response_body(response).await;
    assert_eq!(json["error"], "invalid_invite");
}

#[tokio::test]
async fn test_join_expired_invite_is_gone() {
    let (app, pool) = create_test_app().await;

    let owner = create_authenticated_user(&app, &TestUser::new()).await;
    let campaign_id = create_test_campaign(&app, &owner, "Descent into Avernus").await;
    let (invite_id, token) =
        create_test_invite(&app, &owner, campaign_id, serde_json::json!({ "expires_in_hours": 24 }))
            .await;

    // Push the expiry into the past
    sqlx::query("UPDATE campaign_invites SET expires_at = NOW() - INTERVAL '1 hour' WHERE id = $1")
        .bind(invite_id)
        .execute(&pool)
        .await
        .unwrap();

    // Preview still resolves, but flags the invite as unusable
    let response = app
        .clone()
        .oneshot(get_request(&format!("/api/v1/join/{}", token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = parse_response_body(response).await;
    assert_eq!(json["is_valid"], false);

    let player = create_authenticated_user(&app, &TestUser::new()).await;
    let character_id = create_test_character(&app, &player, "Astarion").await;

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
    assert_eq!(response.status(), StatusCode::GONE);
    let json = parse_response_body(response).await;
    assert_eq!(json["error"], "invalid_invite");
}

#[tokio::test]
async fn test_join_with_malformed_token_is_validation_error() {
    let (app, _pool) = create_test_app().await;

    let player = create_authenticated_user(&app, &TestUser::new()).await;
    let character_id = create_test_character(&app, &player, "Lae'zel").await;

    let response = app
        .clone()
        .oneshot(json_request_with_auth(
            Method::POST,
            "/api/v1/join",
            serde_json::json!({ "token": "too-short", "character_id": character_id }),
            &player.access_token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_join_unknown_token_is_gone() {
    let (app, _pool) = create_test_app().await;

    let player = create_authenticated_user(&app, &TestUser::new()).await;
    let character_id = create_test_character(&app, &player, "Jaheira").await;

    // A token nobody issued is indistinguishable from a revoked or spent one
    let response = app
        .clone()
        .oneshot(json_request_with_auth(
            Method::POST,
            "/api/v1/join",
            serde_json::json!({ "token": "A".repeat(40), "character_id": character_id }),
            &player.access_token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::GONE);
    let json = parse_response_body(response).await;
    assert_eq!(json["error"], "invalid_invite");
}

#[tokio::test]
async fn test_join_rolls_back_when_invite_spends_before_commit() {
    use persistence::repositories::{JoinOutcome, PartyMemberRepository};

    let (app, pool) = create_test_app().await;

    let owner = create_authenticated_user(&app, &TestUser::new()).await;
    let campaign_id = create_test_campaign(&app, &owner, "Dragon of Icespire Peak").await;
    let (invite_id, _token) =
        create_test_invite(&app, &owner, campaign_id, serde_json::json!({ "max_uses": 1 })).await;

    let player = create_authenticated_user(&app, &TestUser::new()).await;
    let character_id = create_test_character(&app, &player, "Halsin").await;

    // The last use goes to a concurrent join after the invite was read but
    // before this join's transaction commits
    sqlx::query("UPDATE campaign_invites SET used_count = max_uses WHERE id = $1")
        .bind(invite_id)
        .execute(&pool)
        .await
        .unwrap();

    let party = PartyMemberRepository::new(pool.clone());
    let outcome = party
        .join_campaign(
            campaign_id,
            character_id,
            invite_id,
            uuid::Uuid::parse_str(&player.user_id).unwrap(),
            &player.email,
        )
        .await
        .unwrap();
    assert_eq!(outcome, JoinOutcome::InviteExhausted);

    // The membership insert was rolled back with the failed increment
    let seats: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM party_members WHERE campaign_id = $1")
            .bind(campaign_id)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(seats, 0);

    // The counter never passed max_uses
    let used: i32 = sqlx::query_scalar("SELECT used_count FROM campaign_invites WHERE id = $1")
        .bind(invite_id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(used, 1);
}

#[tokio::test]
async fn test_join_with_foreign_character_is_not_found() {
    let (app, _pool) = create_test_app().await;

    let owner = create_authenticated_user(&app, &TestUser::new()).await;
    let campaign_id = create_test_campaign(&app, &owner, "Waterdeep Heist").await;
    let (_invite_id, token) =
        create_test_invite(&app, &owner, campaign_id, serde_json::json!({})).await;

    let victim = create_authenticated_user(&app, &TestUser::new()).await;
    let stolen_character = create_test_character(&app, &victim, "Minsc").await;

    let attacker = create_authenticated_user(&app, &TestUser::new()).await;

    // A character owned by someone else reads as not found
    let response = app
        .clone()
        .oneshot(json_request_with_auth(
            Method::POST,
            "/api/v1/join",
            serde_json::json!({ "token": token, "character_id": stolen_character }),
            &attacker.access_token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // No seat was created and no use was consumed
    let response = app
        .clone()
        .oneshot(get_request_with_auth(
            &format!("/api/v1/campaigns/{}/party", campaign_id),
            &owner.access_token,
        ))
        .await
        .unwrap();
    let roster = parse_response_body(response).await;
    assert!(roster["data"].as_array().unwrap().is_empty());

    let response = app
        .clone()
        .oneshot(get_request_with_auth(
            &format!("/api/v1/campaigns/{}/invites", campaign_id),
            &owner.access_token,
        ))
        .await
        .unwrap();
    let invites = parse_response_body(response).await;
    assert_eq!(invites["data"][0]["used_count"], 0);
}

#[tokio::test]
async fn test_join_requires_authentication() {
    let (app, _pool) = create_test_app().await;

    let response = app
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/api/v1/join",
            serde_json::json!({
                "token": "A".repeat(40),
                "character_id": uuid::Uuid::new_v4(),
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
