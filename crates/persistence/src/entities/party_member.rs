//! Party member entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use domain::models::owner::OwnerRef;
use domain::models::party_member::PartyMember;

/// Database row mapping for the party_members table.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct PartyMemberEntity {
    pub id: Uuid,
    pub campaign_id: Uuid,
    pub character_id: Uuid,
    pub created_by: Option<Uuid>,
    pub owner_email: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl PartyMemberEntity {
    /// The row's recorded owner fields.
    pub fn owner_ref(&self) -> OwnerRef {
        OwnerRef::from_fields(self.created_by, self.owner_email.clone())
    }
}

impl From<PartyMemberEntity> for PartyMember {
    fn from(entity: PartyMemberEntity) -> Self {
        let owner = entity.owner_ref();
        PartyMember {
            id: entity.id,
            campaign_id: entity.campaign_id,
            character_id: entity.character_id,
            owner,
            created_at: entity.created_at,
        }
    }
}

/// Party member with character info for the roster listing.
#[derive(Debug, Clone, FromRow)]
pub struct PartyMemberWithCharacterEntity {
    pub id: Uuid,
    pub campaign_id: Uuid,
    pub character_id: Uuid,
    pub created_at: DateTime<Utc>,
    // Character info
    pub character_name: String,
    pub character_class: Option<String>,
    pub character_level: i32,
}
