//! Invite domain models for campaign invitations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Represents a campaign invitation.
///
/// An invite is a campaign-scoped, token-addressed grant that allows a
/// limited number of character joins before a deadline. `expires_at` and
/// `max_uses` are both optional: a null field means "no limit of that kind".
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct CampaignInvite {
    pub id: Uuid,
    pub campaign_id: Uuid,
    pub token: String,
    pub expires_at: Option<DateTime<Utc>>,
    pub max_uses: Option<i32>,
    pub used_count: i32,
    pub is_revoked: bool,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// Why an invite does not currently grant join rights.
///
/// Internal only: every variant is surfaced to the end user as the same
/// "invitation is no longer valid" response. The distinction exists for
/// logging and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InviteRejection {
    Revoked,
    Expired,
    Exhausted,
}

impl CampaignInvite {
    /// Pure read-and-decide usability check. No side effects; safe to call
    /// repeatedly.
    ///
    /// Revocation is checked first and overrides everything else.
    pub fn rejection_at(&self, now: DateTime<Utc>) -> Option<InviteRejection> {
        if self.is_revoked {
            return Some(InviteRejection::Revoked);
        }
        if let Some(expires_at) = self.expires_at {
            if expires_at <= now {
                return Some(InviteRejection::Expired);
            }
        }
        if let Some(max_uses) = self.max_uses {
            if self.used_count >= max_uses {
                return Some(InviteRejection::Exhausted);
            }
        }
        None
    }

    /// True iff the invite currently grants join rights.
    pub fn is_usable_at(&self, now: DateTime<Utc>) -> bool {
        self.rejection_at(now).is_none()
    }

    /// Remaining uses, or None when unlimited.
    pub fn remaining_uses(&self) -> Option<i32> {
        self.max_uses.map(|max| (max - self.used_count).max(0))
    }
}

/// Request to create a new invite.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct CreateInviteRequest {
    /// Maximum uses (1-100). Omit for unlimited.
    #[validate(range(min = 1, max = 100, message = "max_uses must be between 1 and 100"))]
    pub max_uses: Option<i32>,

    /// Hours until expiry (1-720). Omit for no expiry.
    #[validate(range(
        min = 1,
        max = 720,
        message = "expires_in_hours must be between 1 and 720"
    ))]
    pub expires_in_hours: Option<i32>,
}

/// Response after creating an invite.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct CreateInviteResponse {
    pub id: Uuid,
    pub campaign_id: Uuid,
    pub token: String,
    pub max_uses: Option<i32>,
    pub used_count: i32,
    pub expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub join_url: String,
}

/// Summary of an invite for listing.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct InviteSummary {
    pub id: Uuid,
    pub token: String,
    pub max_uses: Option<i32>,
    pub used_count: i32,
    pub expires_at: Option<DateTime<Utc>>,
    pub is_revoked: bool,
    pub created_at: DateTime<Utc>,
}

/// Response for listing invites.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ListInvitesResponse {
    pub data: Vec<InviteSummary>,
}

/// Public campaign info for invite preview.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct PublicCampaignInfo {
    pub name: String,
    pub description: Option<String>,
    pub party_size: i64,
}

/// Public invite preview (for GET /join/:token).
///
/// `is_valid` is the only validity signal exposed; the rejection reason is
/// never disclosed.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct JoinPreview {
    pub campaign: PublicCampaignInfo,
    pub expires_at: Option<DateTime<Utc>>,
    pub is_valid: bool,
    /// Caller's characters not already seated in this party. Absent when
    /// unauthenticated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available_characters: Option<Vec<AvailableCharacter>>,
    /// Login URL with this join link as callback. Present only when
    /// unauthenticated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub login_url: Option<String>,
}

/// Character choice offered on the join page.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct AvailableCharacter {
    pub id: Uuid,
    pub name: String,
    pub class: Option<String>,
    pub level: i32,
}

lazy_static::lazy_static! {
    static ref INVITE_TOKEN_REGEX: regex::Regex =
        regex::Regex::new(r"^[A-Za-z0-9_-]{40}$").unwrap();
}

/// Request to join a campaign using an invite token.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct JoinCampaignRequest {
    /// The opaque 40-character invite token.
    #[validate(regex(path = *INVITE_TOKEN_REGEX, message = "Invalid invite token format"))]
    pub token: String,

    /// The character taking the seat. Must be owned by the caller.
    pub character_id: Uuid,
}

/// Membership info in the join response.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct JoinMembershipInfo {
    pub id: Uuid,
    pub campaign_id: Uuid,
    pub character_id: Uuid,
    pub joined_at: DateTime<Utc>,
}

/// Response after joining a campaign.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct JoinCampaignResponse {
    pub membership: JoinMembershipInfo,
    /// True when this request found an existing seat instead of creating one.
    pub already_member: bool,
    /// Player view for this seat, e.g. `/campaigns/{id}/play?character={id}`.
    pub player_view_url: String,
}
