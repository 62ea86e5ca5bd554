//! Campaign routes: CRUD, party roster, and badge minting.

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
use crate::routes::characters::MintResponse;
use crate::services::ChainService;
use domain::models::campaign::{Campaign, CreateCampaignRequest, UpdateCampaignRequest};
use domain::models::owner::Identity;
use domain::models::party_member::{PartyRosterEntry, PartyRosterResponse};
use persistence::entities::CampaignEntity;
use persistence::repositories::{CampaignRepository, PartyMemberRepository};

/// Response for listing a user's campaigns.
#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ListCampaignsResponse {
    pub data: Vec<Campaign>,
}

/// Load a campaign and confirm the caller owns it.
///
/// A campaign owned by someone else reads as not found.
pub(crate) async fn owned_campaign(
    campaigns: &CampaignRepository,
    campaign_id: Uuid,
    auth: &UserAuth,
) -> Result<CampaignEntity, ApiError> {
    let campaign = campaigns
        .find_by_id(campaign_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Campaign not found".to_string()))?;

    let identity = Identity {
        user_id: auth.user_id,
        email: auth.email.clone(),
    };
    if !campaign.owner_ref().authorizes(&identity) {
        return Err(ApiError::NotFound("Campaign not found".to_string()));
    }

    Ok(campaign)
}

/// Load a campaign for reading: the owner or anyone holding a seat in the
/// party may read. Everyone else gets not found.
pub(crate) async fn readable_campaign(
    pool: &sqlx::PgPool,
    campaign_id: Uuid,
    auth: &UserAuth,
) -> Result<CampaignEntity, ApiError> {
    let campaigns = CampaignRepository::new(pool.clone());
    let campaign = campaigns
        .find_by_id(campaign_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Campaign not found".to_string()))?;

    let identity = Identity {
        user_id: auth.user_id,
        email: auth.email.clone(),
    };
    if campaign.owner_ref().authorizes(&identity) {
        return Ok(campaign);
    }

    let party = PartyMemberRepository::new(pool.clone());
    if party
        .has_member_owned_by(campaign.id, auth.user_id, &auth.email)
        .await?
    {
        return Ok(campaign);
    }

    Err(ApiError::NotFound("Campaign not found".to_string()))
}

/// Create a new campaign.
///
/// POST /api/v1/campaigns
pub async fn create_campaign(
    State(state): State<AppState>,
    auth: UserAuth,
    Json(request): Json<CreateCampaignRequest>,
) -> Result<(StatusCode, Json<Campaign>), ApiError> {
    request.validate()?;

    let campaigns = CampaignRepository::new(state.pool.clone());
    let campaign = campaigns
        .create_campaign(
            &request.name,
            request.description.as_deref(),
            auth.user_id,
            &auth.email,
        )
        .await?;

    info!(campaign_id = %campaign.id, "Campaign created");

    Ok((StatusCode::CREATED, Json(campaign.into())))
}

/// List the caller's campaigns.
///
/// GET /api/v1/campaigns
pub async fn list_campaigns(
    State(state): State<AppState>,
    auth: UserAuth,
) -> Result<Json<ListCampaignsResponse>, ApiError> {
    let campaigns = CampaignRepository::new(state.pool.clone());

    let data = campaigns
        .list_owned_by(auth.user_id, &auth.email)
        .await?
        .into_iter()
        .map(Campaign::from)
        .collect();

    Ok(Json(ListCampaignsResponse { data }))
}

/// Get a campaign by ID.
///
/// GET /api/v1/campaigns/:id
pub async fn get_campaign(
    State(state): State<AppState>,
    auth: UserAuth,
    Path(campaign_id): Path<Uuid>,
) -> Result<Json<Campaign>, ApiError> {
    let campaign = readable_campaign(&state.pool, campaign_id, &auth).await?;
    Ok(Json(campaign.into()))
}

/// Update a campaign.
///
/// PUT /api/v1/campaigns/:id
///
/// Setting `is_archived: true` archives the campaign; archived campaigns are
/// purged after the retention window.
pub async fn update_campaign(
    State(state): State<AppState>,
    auth: UserAuth,
    Path(campaign_id): Path<Uuid>,
    Json(request): Json<UpdateCampaignRequest>,
) -> Result<Json<Campaign>, ApiError> {
    request.validate()?;

    let campaigns = CampaignRepository::new(state.pool.clone());
    let current = owned_campaign(&campaigns, campaign_id, &auth).await?;

    // An absent description keeps the stored value; an explicit null clears it
    let description = match &request.description {
        Some(description) => description.as_deref(),
        None => current.description.as_deref(),
    };

    let updated = campaigns
        .update_campaign(
            current.id,
            request.name.as_deref().unwrap_or(&current.name),
            description,
        )
        .await?;

    let updated = if request.is_archived == Some(true) && !updated.is_archived {
        campaigns.archive_campaign(updated.id).await?;
        info!(campaign_id = %updated.id, "Campaign archived");
        campaigns
            .find_by_id(updated.id)
            .await?
            .ok_or_else(|| ApiError::NotFound("Campaign not found".to_string()))?
    } else {
        updated
    };

    Ok(Json(updated.into()))
}

/// Archive a campaign (soft delete).
///
/// DELETE /api/v1/campaigns/:id
pub async fn archive_campaign(
    State(state): State<AppState>,
    auth: UserAuth,
    Path(campaign_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let campaigns = CampaignRepository::new(state.pool.clone());
    let campaign = owned_campaign(&campaigns, campaign_id, &auth).await?;

    campaigns.archive_campaign(campaign.id).await?;
    info!(campaign_id = %campaign.id, "Campaign archived");

    Ok(StatusCode::NO_CONTENT)
}

/// List the campaign's party roster.
///
/// GET /api/v1/campaigns/:id/party
pub async fn list_party(
    State(state): State<AppState>,
    auth: UserAuth,
    Path(campaign_id): Path<Uuid>,
) -> Result<Json<PartyRosterResponse>, ApiError> {
    let campaign = readable_campaign(&state.pool, campaign_id, &auth).await?;

    let party = PartyMemberRepository::new(state.pool.clone());
    let data = party
        .list_party(campaign.id)
        .await?
        .into_iter()
        .map(|m| PartyRosterEntry {
            member_id: m.id,
            character_id: m.character_id,
            character_name: m.character_name,
            class: m.character_class,
            level: m.character_level,
            joined_at: m.created_at,
        })
        .collect();

    Ok(Json(PartyRosterResponse { data }))
}

/// Remove a seat from the party.
///
/// DELETE /api/v1/campaigns/:id/party/:member_id
///
/// Only the campaign owner can remove seats. Removing a seat does not
/// restore invite uses.
pub async fn remove_party_member(
    State(state): State<AppState>,
    auth: UserAuth,
    Path((campaign_id, member_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, ApiError> {
    let campaigns = CampaignRepository::new(state.pool.clone());
    let campaign = owned_campaign(&campaigns, campaign_id, &auth).await?;

    let party = PartyMemberRepository::new(state.pool.clone());
    let removed = party.remove_member_by_id(campaign.id, member_id).await?;
    if removed == 0 {
        return Err(ApiError::NotFound("Party member not found".to_string()));
    }

    info!(
        campaign_id = %campaign.id,
        member_id = %member_id,
        "Party member removed"
    );

    Ok(StatusCode::NO_CONTENT)
}

/// Mint a campaign badge keepsake.
///
/// POST /api/v1/campaigns/:id/badge/mint
pub async fn mint_badge(
    State(state): State<AppState>,
    auth: UserAuth,
    Path(campaign_id): Path<Uuid>,
) -> Result<(StatusCode, Json<MintResponse>), ApiError> {
    let campaigns = CampaignRepository::new(state.pool.clone());
    let campaign = owned_campaign(&campaigns, campaign_id, &auth).await?;

    let party = PartyMemberRepository::new(state.pool.clone());
    let party_size = party.count_party(campaign.id).await?;

    let metadata = serde_json::json!({
        "name": campaign.name,
        "description": campaign.description,
        "party_size": party_size,
    });
    let token_uri = ChainService::token_uri("badge", &metadata);

    let chain = ChainService::new(state.config.chain.clone());
    let outcome = chain
        .mint(&auth.user_id.to_string(), &token_uri)
        .await
        .map_err(|e| ApiError::ServiceUnavailable(format!("Minting gateway error: {}", e)))?;

    info!(campaign_id = %campaign.id, ?outcome, "Badge mint requested");

    Ok((
        StatusCode::ACCEPTED,
        Json(MintResponse::from_outcome(outcome, token_uri)),
    ))
}
