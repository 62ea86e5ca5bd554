//! Downtime activity entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use domain::models::downtime::DowntimeActivity;

/// Database row mapping for the downtime_activities table.
#[derive(Debug, Clone, FromRow)]
pub struct DowntimeActivityEntity {
    pub id: Uuid,
    pub character_id: Uuid,
    pub activity: String,
    pub days: i32,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<DowntimeActivityEntity> for DowntimeActivity {
    fn from(entity: DowntimeActivityEntity) -> Self {
        DowntimeActivity {
            id: entity.id,
            character_id: entity.character_id,
            activity: entity.activity,
            days: entity.days,
            notes: entity.notes,
            created_at: entity.created_at,
        }
    }
}
