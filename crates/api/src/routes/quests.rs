//! Quest routes, scoped under a campaign.

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
use crate::routes::campaigns::{owned_campaign, readable_campaign};
use domain::models::quest::{CreateQuestRequest, Quest, UpdateQuestRequest};
use persistence::repositories::{CampaignRepository, QuestRepository};

/// Response for listing a campaign's quests.
#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ListQuestsResponse {
    pub data: Vec<Quest>,
}

/// Create a quest.
///
/// POST /api/v1/campaigns/:campaign_id/quests
pub async fn create_quest(
    State(state): State<AppState>,
    auth: UserAuth,
    Path(campaign_id): Path<Uuid>,
    Json(request): Json<CreateQuestRequest>,
) -> Result<(StatusCode, Json<Quest>), ApiError> {
    request.validate()?;

    let campaigns = CampaignRepository::new(state.pool.clone());
    let campaign = owned_campaign(&campaigns, campaign_id, &auth).await?;

    let quests = QuestRepository::new(state.pool.clone());
    let quest = quests
        .create_quest(campaign.id, &request.title, request.description.as_deref())
        .await?;

    info!(campaign_id = %campaign.id, quest_id = %quest.id, "Quest created");

    Ok((StatusCode::CREATED, Json(quest.into())))
}

/// List a campaign's quests.
///
/// GET /api/v1/campaigns/:campaign_id/quests
pub async fn list_quests(
    State(state): State<AppState>,
    auth: UserAuth,
    Path(campaign_id): Path<Uuid>,
) -> Result<Json<ListQuestsResponse>, ApiError> {
    let campaign = readable_campaign(&state.pool, campaign_id, &auth).await?;

    let quests = QuestRepository::new(state.pool.clone());
    let data = quests
        .list_by_campaign(campaign.id)
        .await?
        .into_iter()
        .map(Quest::from)
        .collect();

    Ok(Json(ListQuestsResponse { data }))
}

/// Update a quest. Absent fields are left unchanged.
///
/// PUT /api/v1/campaigns/:campaign_id/quests/:quest_id
pub async fn update_quest(
    State(state): State<AppState>,
    auth: UserAuth,
    Path((campaign_id, quest_id)): Path<(Uuid, Uuid)>,
    Json(request): Json<UpdateQuestRequest>,
) -> Result<Json<Quest>, ApiError> {
    request.validate()?;

    let campaigns = CampaignRepository::new(state.pool.clone());
    let campaign = owned_campaign(&campaigns, campaign_id, &auth).await?;

    let quests = QuestRepository::new(state.pool.clone());
    let current = quests
        .find_by_id(quest_id)
        .await?
        .filter(|q| q.campaign_id == campaign.id)
        .ok_or_else(|| ApiError::NotFound("Quest not found".to_string()))?;

    let updated = quests
        .update_quest(
            current.id,
            request.title.as_deref(),
            request.description.as_deref(),
            request.status.map(|s| s.as_str()),
        )
        .await?;

    Ok(Json(updated.into()))
}

/// Delete a quest.
///
/// DELETE /api/v1/campaigns/:campaign_id/quests/:quest_id
pub async fn delete_quest(
    State(state): State<AppState>,
    auth: UserAuth,
    Path((campaign_id, quest_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, ApiError> {
    let campaigns = CampaignRepository::new(state.pool.clone());
    let campaign = owned_campaign(&campaigns, campaign_id, &auth).await?;

    let quests = QuestRepository::new(state.pool.clone());
    let quest = quests
        .find_by_id(quest_id)
        .await?
        .filter(|q| q.campaign_id == campaign.id)
        .ok_or_else(|| ApiError::NotFound("Quest not found".to_string()))?;

    quests.delete_quest(quest.id).await?;
    info!(campaign_id = %campaign.id, quest_id = %quest.id, "Quest deleted");

    Ok(StatusCode::NO_CONTENT)
}
