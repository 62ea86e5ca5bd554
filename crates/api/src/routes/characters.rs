//! Character routes: CRUD, play-state patches, and passport minting.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserAuth;
use crate::services::{ChainService, MintOutcome};
use domain::models::character::{
    Character, CreateCharacterRequest, UpdateCharacterRequest, UpdateCharacterStateRequest,
};
use domain::models::owner::Identity;
use persistence::entities::CharacterEntity;
use persistence::repositories::CharacterRepository;

/// Response for listing a user's characters.
#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ListCharactersResponse {
    pub data: Vec<Character>,
}

/// Load a character and confirm the caller owns it.
///
/// A character owned by someone else reads as not found.
async fn owned_character(
    characters: &CharacterRepository,
    character_id: Uuid,
    auth: &UserAuth,
) -> Result<CharacterEntity, ApiError> {
    let character = characters
        .find_by_id(character_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Character not found".to_string()))?;

    let identity = Identity {
        user_id: auth.user_id,
        email: auth.email.clone(),
    };
    if !character.owner_ref().authorizes(&identity) {
        return Err(ApiError::NotFound("Character not found".to_string()));
    }

    Ok(character)
}

/// Create a new character.
///
/// POST /api/v1/characters
pub async fn create_character(
    State(state): State<AppState>,
    auth: UserAuth,
    Json(request): Json<CreateCharacterRequest>,
) -> Result<(StatusCode, Json<Character>), ApiError> {
    request.validate()?;

    let characters = CharacterRepository::new(state.pool.clone());

    let owned = characters.list_owned_by(auth.user_id, &auth.email).await?;
    if owned.len() >= state.config.limits.max_characters_per_user {
        return Err(ApiError::Conflict(
            "Character limit reached for this account".to_string(),
        ));
    }

    let level = request.level.unwrap_or(1);
    let max_hp = request.max_hp.unwrap_or(10);

    let character = characters
        .create_character(
            &request.name,
            request.class.as_deref(),
            level,
            max_hp, // a fresh character starts at full health
            max_hp,
            0,
            auth.user_id,
            &auth.email,
        )
        .await?;

    info!(character_id = %character.id, "Character created");

    Ok((StatusCode::CREATED, Json(character.into())))
}

/// List the caller's characters.
///
/// GET /api/v1/characters
pub async fn list_characters(
    State(state): State<AppState>,
    auth: UserAuth,
) -> Result<Json<ListCharactersResponse>, ApiError> {
    let characters = CharacterRepository::new(state.pool.clone());

    let data = characters
        .list_owned_by(auth.user_id, &auth.email)
        .await?
        .into_iter()
        .map(Character::from)
        .collect();

    Ok(Json(ListCharactersResponse { data }))
}

/// Get a character by ID.
///
/// GET /api/v1/characters/:id
pub async fn get_character(
    State(state): State<AppState>,
    auth: UserAuth,
    Path(character_id): Path<Uuid>,
) -> Result<Json<Character>, ApiError> {
    let characters = CharacterRepository::new(state.pool.clone());
    let character = owned_character(&characters, character_id, &auth).await?;
    Ok(Json(character.into()))
}

/// Update a character's descriptive fields.
///
/// PUT /api/v1/characters/:id
pub async fn update_character(
    State(state): State<AppState>,
    auth: UserAuth,
    Path(character_id): Path<Uuid>,
    Json(request): Json<UpdateCharacterRequest>,
) -> Result<Json<Character>, ApiError> {
    request.validate()?;

    let characters = CharacterRepository::new(state.pool.clone());
    let current = owned_character(&characters, character_id, &auth).await?;

    // An absent class keeps the stored value; an explicit null clears it
    let class = match &request.class {
        Some(class) => class.as_deref(),
        None => current.class.as_deref(),
    };

    let updated = characters
        .update_character(
            current.id,
            request.name.as_deref().unwrap_or(&current.name),
            class,
            request.level.unwrap_or(current.level),
        )
        .await?;

    Ok(Json(updated.into()))
}

/// Patch a character's play state (HP, XP, conditions).
///
/// PATCH /api/v1/characters/:id/state
pub async fn update_character_state(
    State(state): State<AppState>,
    auth: UserAuth,
    Path(character_id): Path<Uuid>,
    Json(request): Json<UpdateCharacterStateRequest>,
) -> Result<Json<Character>, ApiError> {
    request.validate()?;

    let characters = CharacterRepository::new(state.pool.clone());
    let current = owned_character(&characters, character_id, &auth).await?;

    let updated = characters
        .update_state(
            current.id,
            request.hp,
            request.max_hp,
            request.xp,
            request.conditions,
        )
        .await?;

    Ok(Json(updated.into()))
}

/// Delete a character.
///
/// DELETE /api/v1/characters/:id
pub async fn delete_character(
    State(state): State<AppState>,
    auth: UserAuth,
    Path(character_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let characters = CharacterRepository::new(state.pool.clone());
    let character = owned_character(&characters, character_id, &auth).await?;

    characters.delete_character(character.id).await?;
    info!(character_id = %character.id, "Character deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// Response for a mint request.
#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct MintResponse {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tx_hash: Option<String>,
    pub token_id: String,
    pub token_uri: String,
}

impl MintResponse {
    pub fn from_outcome(outcome: MintOutcome, token_uri: String) -> Self {
        match outcome {
            MintOutcome::Submitted { tx_hash, token_id } => Self {
                status: "submitted".to_string(),
                tx_hash: Some(tx_hash),
                token_id,
                token_uri,
            },
            MintOutcome::Simulated { token_id } => Self {
                status: "simulated".to_string(),
                tx_hash: None,
                token_id,
                token_uri,
            },
        }
    }
}

/// Mint a character passport keepsake.
///
/// POST /api/v1/characters/:id/passport/mint
///
/// Simulated outcomes are placeholders; clients must not treat them as an
/// on-chain record.
pub async fn mint_passport(
    State(state): State<AppState>,
    auth: UserAuth,
    Path(character_id): Path<Uuid>,
) -> Result<(StatusCode, Json<MintResponse>), ApiError> {
    let characters = CharacterRepository::new(state.pool.clone());
    let character = owned_character(&characters, character_id, &auth).await?;

    let metadata = serde_json::json!({
        "name": character.name,
        "class": character.class,
        "level": character.level,
        "xp": character.xp,
    });
    let token_uri = ChainService::token_uri("passport", &metadata);

    let chain = ChainService::new(state.config.chain.clone());
    let outcome = chain
        .mint(&auth.user_id.to_string(), &token_uri)
        .await
        .map_err(|e| ApiError::ServiceUnavailable(format!("Minting gateway error: {}", e)))?;

    info!(character_id = %character.id, ?outcome, "Passport mint requested");

    Ok((
        StatusCode::ACCEPTED,
        Json(MintResponse::from_outcome(outcome, token_uri)),
    ))
}
