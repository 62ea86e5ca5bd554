//! Downtime activity routes, scoped under a character.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserAuth;
use domain::models::downtime::{CreateDowntimeRequest, DowntimeActivity, ListDowntimeResponse};
use domain::models::owner::Identity;
use persistence::repositories::{CharacterRepository, DowntimeRepository};

/// Confirm the caller owns the character, reading foreign ones as not found.
async fn check_character_owner(
    characters: &CharacterRepository,
    character_id: Uuid,
    auth: &UserAuth,
) -> Result<Uuid, ApiError> {
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

    Ok(character.id)
}

/// Record a downtime activity for a character.
///
/// POST /api/v1/characters/:id/downtime
pub async fn create_downtime(
    State(state): State<AppState>,
    auth: UserAuth,
    Path(character_id): Path<Uuid>,
    Json(request): Json<CreateDowntimeRequest>,
) -> Result<(StatusCode, Json<DowntimeActivity>), ApiError> {
    request.validate()?;

    let characters = CharacterRepository::new(state.pool.clone());
    let character_id = check_character_owner(&characters, character_id, &auth).await?;

    let downtime = DowntimeRepository::new(state.pool.clone());
    let activity = downtime
        .create_activity(
            character_id,
            &request.activity,
            request.days,
            request.notes.as_deref(),
        )
        .await?;

    info!(
        character_id = %character_id,
        activity_id = %activity.id,
        days = activity.days,
        "Downtime activity recorded"
    );

    Ok((StatusCode::CREATED, Json(activity.into())))
}

/// List a character's downtime activities, newest first.
///
/// GET /api/v1/characters/:id/downtime
pub async fn list_downtime(
    State(state): State<AppState>,
    auth: UserAuth,
    Path(character_id): Path<Uuid>,
) -> Result<Json<ListDowntimeResponse>, ApiError> {
    let characters = CharacterRepository::new(state.pool.clone());
    let character_id = check_character_owner(&characters, character_id, &auth).await?;

    let downtime = DowntimeRepository::new(state.pool.clone());
    let data = downtime
        .list_by_character(character_id)
        .await?
        .into_iter()
        .map(DowntimeActivity::from)
        .collect();

    Ok(Json(ListDowntimeResponse { data }))
}
