//! NPC entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use domain::models::npc::Npc;

/// Database row mapping for the npcs table.
#[derive(Debug, Clone, FromRow)]
pub struct NpcEntity {
    pub id: Uuid,
    pub campaign_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub is_alive: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<NpcEntity> for Npc {
    fn from(entity: NpcEntity) -> Self {
        Npc {
            id: entity.id,
            campaign_id: entity.campaign_id,
            name: entity.name,
            description: entity.description,
            location: entity.location,
            is_alive: entity.is_alive,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}
