//! Invite entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use domain::models::invite::CampaignInvite;

/// Database row mapping for the campaign_invites table.
#[derive(Debug, Clone, FromRow)]
pub struct CampaignInviteEntity {
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

impl From<CampaignInviteEntity> for CampaignInvite {
    fn from(entity: CampaignInviteEntity) -> Self {
        CampaignInvite {
            id: entity.id,
            campaign_id: entity.campaign_id,
            token: entity.token,
            expires_at: entity.expires_at,
            max_uses: entity.max_uses,
            used_count: entity.used_count,
            is_revoked: entity.is_revoked,
            created_by: entity.created_by,
            created_at: entity.created_at,
        }
    }
}

/// Invite entity with campaign info for the join preview.
///
/// The inner join drops invites whose campaign no longer exists, so a
/// dangling invite reads as "not found".
#[derive(Debug, Clone, FromRow)]
pub struct InviteWithCampaignEntity {
    pub id: Uuid,
    pub campaign_id: Uuid,
    pub token: String,
    pub expires_at: Option<DateTime<Utc>>,
    pub max_uses: Option<i32>,
    pub used_count: i32,
    pub is_revoked: bool,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    // Campaign info
    pub campaign_name: String,
    pub campaign_description: Option<String>,
    pub party_size: i64,
}

impl InviteWithCampaignEntity {
    /// The invite portion of the row as a domain invite.
    pub fn invite(&self) -> CampaignInvite {
        CampaignInvite {
            id: self.id,
            campaign_id: self.campaign_id,
            token: self.token.clone(),
            expires_at: self.expires_at,
            max_uses: self.max_uses,
            used_count: self.used_count,
            is_revoked: self.is_revoked,
            created_by: self.created_by,
            created_at: self.created_at,
        }
    }
}
