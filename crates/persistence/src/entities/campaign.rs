//! Campaign entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use domain::models::campaign::Campaign;
use domain::models::owner::OwnerRef;

/// Database row mapping for the campaigns table.
#[derive(Debug, Clone, FromRow)]
pub struct CampaignEntity {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub is_archived: bool,
    pub created_by: Option<Uuid>,
    pub owner_email: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CampaignEntity {
    /// The row's recorded owner fields.
    pub fn owner_ref(&self) -> OwnerRef {
        OwnerRef::from_fields(self.created_by, self.owner_email.clone())
    }
}

impl From<CampaignEntity> for Campaign {
    fn from(entity: CampaignEntity) -> Self {
        let owner = entity.owner_ref();
        Campaign {
            id: entity.id,
            name: entity.name,
            description: entity.description,
            is_archived: entity.is_archived,
            owner,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}
