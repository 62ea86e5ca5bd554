//! Quest entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use domain::models::quest::{Quest, QuestStatus};

/// Database row mapping for the quests table.
#[derive(Debug, Clone, FromRow)]
pub struct QuestEntity {
    pub id: Uuid,
    pub campaign_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<QuestEntity> for Quest {
    fn from(entity: QuestEntity) -> Self {
        // The status column carries a CHECK constraint, so unknown values
        // cannot reach this mapping.
        let status = entity
            .status
            .parse::<QuestStatus>()
            .unwrap_or(QuestStatus::Open);
        Quest {
            id: entity.id,
            campaign_id: entity.campaign_id,
            title: entity.title,
            description: entity.description,
            status,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}
