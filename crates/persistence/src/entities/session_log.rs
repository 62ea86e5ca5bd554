//! Session log entity (database row mapping).

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use domain::models::owner::OwnerRef;
use domain::models::session_log::SessionLog;

/// Database row mapping for the session_logs table.
#[derive(Debug, Clone, FromRow)]
pub struct SessionLogEntity {
    pub id: Uuid,
    pub campaign_id: Uuid,
    pub title: String,
    pub summary: Option<String>,
    pub session_date: NaiveDate,
    pub created_by: Option<Uuid>,
    pub owner_email: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SessionLogEntity {
    /// The row's recorded owner fields.
    pub fn owner_ref(&self) -> OwnerRef {
        OwnerRef::from_fields(self.created_by, self.owner_email.clone())
    }
}

impl From<SessionLogEntity> for SessionLog {
    fn from(entity: SessionLogEntity) -> Self {
        let owner = entity.owner_ref();
        SessionLog {
            id: entity.id,
            campaign_id: entity.campaign_id,
            title: entity.title,
            summary: entity.summary,
            session_date: entity.session_date,
            owner,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}
