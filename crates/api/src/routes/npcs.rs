//! NPC routes, scoped under a campaign.

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
use domain::models::npc::{CreateNpcRequest, Npc, UpdateNpcRequest};
use persistence::repositories::{CampaignRepository, NpcRepository};

/// Response for listing a campaign's NPCs.
#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ListNpcsResponse {
    pub data: Vec<Npc>,
}

/// Create an NPC.
///
/// POST /api/v1/campaigns/:campaign_id/npcs
pub async fn create_npc(
    State(state): State<AppState>,
    auth: UserAuth,
    Path(campaign_id): Path<Uuid>,
    Json(request): Json<CreateNpcRequest>,
) -> Result<(StatusCode, Json<Npc>), ApiError> {
    request.validate()?;

    let campaigns = CampaignRepository::new(state.pool.clone());
    let campaign = owned_campaign(&campaigns, campaign_id, &auth).await?;

    let npcs = NpcRepository::new(state.pool.clone());
    let npc = npcs
        .create_npc(
            campaign.id,
            &request.name,
            request.description.as_deref(),
            request.location.as_deref(),
        )
        .await?;

    info!(campaign_id = %campaign.id, npc_id = %npc.id, "NPC created");

    Ok((StatusCode::CREATED, Json(npc.into())))
}

/// List a campaign's NPCs.
///
/// GET /api/v1/campaigns/:campaign_id/npcs
pub async fn list_npcs(
    State(state): State<AppState>,
    auth: UserAuth,
    Path(campaign_id): Path<Uuid>,
) -> Result<Json<ListNpcsResponse>, ApiError> {
    let campaign = readable_campaign(&state.pool, campaign_id, &auth).await?;

    let npcs = NpcRepository::new(state.pool.clone());
    let data = npcs
        .list_by_campaign(campaign.id)
        .await?
        .into_iter()
        .map(Npc::from)
        .collect();

    Ok(Json(ListNpcsResponse { data }))
}

/// Update an NPC. Absent fields are left unchanged.
///
/// PUT /api/v1/campaigns/:campaign_id/npcs/:npc_id
pub async fn update_npc(
    State(state): State<AppState>,
    auth: UserAuth,
    Path((campaign_id, npc_id)): Path<(Uuid, Uuid)>,
    Json(request): Json<UpdateNpcRequest>,
) -> Result<Json<Npc>, ApiError> {
    request.validate()?;

    let campaigns = CampaignRepository::new(state.pool.clone());
    let campaign = owned_campaign(&campaigns, campaign_id, &auth).await?;

    let npcs = NpcRepository::new(state.pool.clone());
    let current = npcs
        .find_by_id(npc_id)
        .await?
        .filter(|n| n.campaign_id == campaign.id)
        .ok_or_else(|| ApiError::NotFound("NPC not found".to_string()))?;

    let updated = npcs
        .update_npc(
            current.id,
            request.name.as_deref(),
            request.description.as_deref(),
            request.location.as_deref(),
            request.is_alive,
        )
        .await?;

    Ok(Json(updated.into()))
}

/// Delete an NPC.
///
/// DELETE /api/v1/campaigns/:campaign_id/npcs/:npc_id
pub async fn delete_npc(
    State(state): State<AppState>,
    auth: UserAuth,
    Path((campaign_id, npc_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, ApiError> {
    let campaigns = CampaignRepository::new(state.pool.clone());
    let campaign = owned_campaign(&campaigns, campaign_id, &auth).await?;

    let npcs = NpcRepository::new(state.pool.clone());
    let npc = npcs
        .find_by_id(npc_id)
        .await?
        .filter(|n| n.campaign_id == campaign.id)
        .ok_or_else(|| ApiError::NotFound("NPC not found".to_string()))?;

    npcs.delete_npc(npc.id).await?;
    info!(campaign_id = %campaign.id, npc_id = %npc.id, "NPC deleted");

    Ok(StatusCode::NO_CONTENT)
}
