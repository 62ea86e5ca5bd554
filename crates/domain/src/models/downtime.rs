//! Downtime activity domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use shared::validation::validate_downtime_days;

/// A downtime activity recorded against a character between sessions
/// (crafting, carousing, research, ...).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct DowntimeActivity {
    pub id: Uuid,
    pub character_id: Uuid,
    pub activity: String,
    pub days: i32,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Request to record a downtime activity.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct CreateDowntimeRequest {
    #[validate(length(min = 1, max = 200, message = "Activity must be 1-200 characters"))]
    pub activity: String,

    #[validate(custom(function = "validate_downtime_days"))]
    pub days: i32,

    #[validate(length(max = 2000, message = "Notes must be at most 2000 characters"))]
    pub notes: Option<String>,
}

/// Response for listing a character's downtime activities.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ListDowntimeResponse {
    pub data: Vec<DowntimeActivity>,
}
