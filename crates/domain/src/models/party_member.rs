//! Party membership domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::owner::OwnerRef;

/// A character's seat in a campaign.
///
/// At most one row exists per `(campaign_id, character_id)` pair; the
/// storage layer enforces this with a unique constraint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct PartyMember {
    pub id: Uuid,
    pub campaign_id: Uuid,
    pub character_id: Uuid,
    #[serde(flatten)]
    pub owner: OwnerRef,
    pub created_at: DateTime<Utc>,
}

/// Party roster entry with character info for listing.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct PartyRosterEntry {
    pub member_id: Uuid,
    pub character_id: Uuid,
    pub character_name: String,
    pub class: Option<String>,
    pub level: i32,
    pub joined_at: DateTime<Utc>,
}

/// Response for listing a campaign's party.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct PartyRosterResponse {
    pub data: Vec<PartyRosterEntry>,
}
