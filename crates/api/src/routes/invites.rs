//! Invite routes for managing campaign invitations.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{Duration, Utc};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserAuth;
use crate::middleware::metrics::record_invite_created;
use domain::models::invite::{
    CreateInviteRequest, CreateInviteResponse, InviteSummary, ListInvitesResponse,
};
use crate::routes::campaigns::owned_campaign;
use persistence::repositories::{CampaignRepository, InviteRepository};
use shared::token::generate_invite_token;

/// Create a new invite for a campaign.
///
/// POST /api/v1/campaigns/:campaign_id/invites
///
/// Only the campaign owner can create invites.
pub async fn create_invite(
    State(state): State<AppState>,
    auth: UserAuth,
    Path(campaign_id): Path<Uuid>,
    Json(request): Json<CreateInviteRequest>,
) -> Result<(StatusCode, Json<CreateInviteResponse>), ApiError> {
    request.validate()?;

    let campaigns = CampaignRepository::new(state.pool.clone());
    let invites = InviteRepository::new(state.pool.clone());

    let campaign = owned_campaign(&campaigns, campaign_id, &auth).await?;

    let existing = invites.list_by_campaign(campaign.id).await?;
    let active = existing
        .iter()
        .filter(|i| !i.is_revoked)
        .count();
    if active >= state.config.limits.max_invites_per_campaign {
        return Err(ApiError::Conflict(
            "Invite limit reached for this campaign".to_string(),
        ));
    }

    let token = invites.generate_unique_token(generate_invite_token).await?;

    let expires_at = request
        .expires_in_hours
        .map(|hours| Utc::now() + Duration::hours(hours as i64));

    let invite = invites
        .create_invite(campaign.id, &token, expires_at, request.max_uses, auth.user_id)
        .await?;

    info!(
        campaign_id = %campaign.id,
        invite_id = %invite.id,
        max_uses = ?invite.max_uses,
        expires_at = ?invite.expires_at,
        "Invite created"
    );
    record_invite_created();

    let join_url = format!(
        "{}/join/{}",
        state.config.server.app_base_url, invite.token
    );

    Ok((
        StatusCode::CREATED,
        Json(CreateInviteResponse {
            id: invite.id,
            campaign_id: invite.campaign_id,
            token: invite.token,
            max_uses: invite.max_uses,
            used_count: invite.used_count,
            expires_at: invite.expires_at,
            created_at: invite.created_at,
            join_url,
        }),
    ))
}

/// List all invites for a campaign.
///
/// GET /api/v1/campaigns/:campaign_id/invites
pub async fn list_invites(
    State(state): State<AppState>,
    auth: UserAuth,
    Path(campaign_id): Path<Uuid>,
) -> Result<Json<ListInvitesResponse>, ApiError> {
    let campaigns = CampaignRepository::new(state.pool.clone());
    let invites = InviteRepository::new(state.pool.clone());

    let campaign = owned_campaign(&campaigns, campaign_id, &auth).await?;

    let data = invites
        .list_by_campaign(campaign.id)
        .await?
        .into_iter()
        .map(|i| InviteSummary {
            id: i.id,
            token: i.token,
            max_uses: i.max_uses,
            used_count: i.used_count,
            expires_at: i.expires_at,
            is_revoked: i.is_revoked,
            created_at: i.created_at,
        })
        .collect();

    Ok(Json(ListInvitesResponse { data }))
}

/// Revoke an invite.
///
/// DELETE /api/v1/campaigns/:campaign_id/invites/:invite_id
///
/// Revocation is permanent; a revoked invite never becomes usable again.
pub async fn revoke_invite(
    State(state): State<AppState>,
    auth: UserAuth,
    Path((campaign_id, invite_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, ApiError> {
    let campaigns = CampaignRepository::new(state.pool.clone());
    let invites = InviteRepository::new(state.pool.clone());

    let campaign = owned_campaign(&campaigns, campaign_id, &auth).await?;

    // The invite must belong to the campaign in the path
    let invite = invites
        .find_by_id(invite_id)
        .await?
        .filter(|i| i.campaign_id == campaign.id)
        .ok_or_else(|| ApiError::NotFound("Invite not found".to_string()))?;

    if invite.is_revoked {
        // Idempotent: revoking twice is fine
        return Ok(StatusCode::NO_CONTENT);
    }

    invites.revoke_invite(invite.id).await?;
    info!(campaign_id = %campaign.id, invite_id = %invite.id, "Invite revoked");

    Ok(StatusCode::NO_CONTENT)
}
