//! Invite preview and party join endpoints.
//!
//! The join flow is the seam between the public invite link and the
//! authenticated party roster. The preview endpoint never discloses why an
//! invite is unusable, only whether it is; the join endpoint collapses every
//! rejection reason into the same "no longer valid" response.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use tracing::info;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::{OptionalUserAuth, UserAuth};
use crate::middleware::metrics::record_join_attempt;
use domain::models::invite::{
    AvailableCharacter, JoinCampaignRequest, JoinCampaignResponse, JoinMembershipInfo, JoinPreview,
    PublicCampaignInfo,
};
use domain::models::owner::Identity;
use persistence::repositories::{
    CharacterRepository, InviteRepository, JoinOutcome, PartyMemberRepository,
};
use shared::token::is_invite_token_format;

/// Preview an invite before joining.
///
/// GET /api/v1/join/:token
///
/// Public, but tailored to the caller: authenticated players get the list of
/// their characters not already seated in this party, anonymous visitors get
/// a login URL that returns them to this join link.
pub async fn preview_invite(
    State(state): State<AppState>,
    OptionalUserAuth(auth): OptionalUserAuth,
    Path(token): Path<String>,
) -> Result<Json<JoinPreview>, ApiError> {
    if !is_invite_token_format(&token) {
        return Err(ApiError::NotFound("Invite not found".to_string()));
    }

    let invites = InviteRepository::new(state.pool.clone());

    // The lookup joins on a live campaign, so dangling or archived invites
    // read as not found
    let row = invites
        .find_by_token_with_campaign(&token)
        .await?
        .ok_or_else(|| ApiError::NotFound("Invite not found".to_string()))?;

    let invite = row.invite();
    let is_valid = invite.is_usable_at(Utc::now());

    let (available_characters, login_url) = match auth {
        Some(auth) => {
            let characters = CharacterRepository::new(state.pool.clone());
            let party = PartyMemberRepository::new(state.pool.clone());

            let seated: Vec<uuid::Uuid> = party
                .list_party(row.campaign_id)
                .await?
                .into_iter()
                .map(|m| m.character_id)
                .collect();

            let available: Vec<AvailableCharacter> = characters
                .list_owned_by(auth.user_id, &auth.email)
                .await?
                .into_iter()
                .filter(|c| !seated.contains(&c.id))
                .map(|c| AvailableCharacter {
                    id: c.id,
                    name: c.name,
                    class: c.class,
                    level: c.level,
                })
                .collect();

            (Some(available), None)
        }
        None => {
            let login_url = format!(
                "{}/login?callback=/join/{}",
                state.config.server.app_base_url, token
            );
            (None, Some(login_url))
        }
    };

    Ok(Json(JoinPreview {
        campaign: PublicCampaignInfo {
            name: row.campaign_name,
            description: row.campaign_description,
            party_size: row.party_size,
        },
        expires_at: row.expires_at,
        is_valid,
        available_characters,
        login_url,
    }))
}

/// Join a campaign with one of the caller's characters.
///
/// POST /api/v1/join
///
/// Consumes one use of the invite inside the same transaction that seats the
/// character. A repeat join with the same character returns the existing seat
/// without consuming a use.
pub async fn join_campaign(
    State(state): State<AppState>,
    auth: UserAuth,
    Json(request): Json<JoinCampaignRequest>,
) -> Result<(StatusCode, Json<JoinCampaignResponse>), ApiError> {
    request.validate()?;

    let invites = InviteRepository::new(state.pool.clone());
    let characters = CharacterRepository::new(state.pool.clone());
    let party = PartyMemberRepository::new(state.pool.clone());

    let row = invites
        .find_by_token_with_campaign(&request.token)
        .await?
        .ok_or_else(|| {
            // A token nobody issued gets the same answer as a revoked or
            // exhausted one
            record_join_attempt("not_found");
            ApiError::InviteInvalid
        })?;

    let invite = row.invite();
    if let Some(reason) = invite.rejection_at(Utc::now()) {
        // The reason stays in the logs; the response is the same for all three
        info!(invite_id = %invite.id, ?reason, "Join rejected: invite not usable");
        record_join_attempt("rejected");
        return Err(ApiError::InviteInvalid);
    }

    let identity = Identity {
        user_id: auth.user_id,
        email: auth.email.clone(),
    };

    // A character that exists but belongs to someone else must be
    // indistinguishable from one that does not exist
    let character = characters
        .find_by_id(request.character_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Character not found".to_string()))?;
    if !character.owner_ref().authorizes(&identity) {
        return Err(ApiError::NotFound("Character not found".to_string()));
    }

    let outcome = party
        .join_campaign(
            row.campaign_id,
            character.id,
            invite.id,
            auth.user_id,
            &auth.email,
        )
        .await?;

    let (member, already_member, status) = match outcome {
        JoinOutcome::Joined(member) => {
            info!(
                campaign_id = %row.campaign_id,
                character_id = %character.id,
                "Character joined party"
            );
            record_join_attempt("joined");
            (member, false, StatusCode::CREATED)
        }
        JoinOutcome::AlreadyMember(member) => {
            record_join_attempt("already_member");
            (member, true, StatusCode::OK)
        }
        JoinOutcome::InviteExhausted => {
            info!(invite_id = %invite.id, "Join rejected: invite exhausted at commit");
            record_join_attempt("exhausted");
            return Err(ApiError::InviteInvalid);
        }
    };

    let player_view_url = format!(
        "{}/campaigns/{}/play?character={}",
        state.config.server.app_base_url, row.campaign_id, character.id
    );

    Ok((
        status,
        Json(JoinCampaignResponse {
            membership: JoinMembershipInfo {
                id: member.id,
                campaign_id: member.campaign_id,
                character_id: member.character_id,
                joined_at: member.created_at,
            },
            already_member,
            player_view_url,
        }),
    ))
}
