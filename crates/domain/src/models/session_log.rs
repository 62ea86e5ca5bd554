//! Session log domain models.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::owner::OwnerRef;

/// A logged play session within a campaign.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SessionLog {
    pub id: Uuid,
    pub campaign_id: Uuid,
    pub title: String,
    pub summary: Option<String>,
    pub session_date: NaiveDate,
    #[serde(flatten)]
    pub owner: OwnerRef,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request to create a session log.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct CreateSessionLogRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,

    #[validate(length(max = 10000, message = "Summary must be at most 10000 characters"))]
    pub summary: Option<String>,

    /// Defaults to today when omitted.
    pub session_date: Option<NaiveDate>,
}

/// Request to update a session log.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct UpdateSessionLogRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: Option<String>,

    #[validate(length(max = 10000, message = "Summary must be at most 10000 characters"))]
    pub summary: Option<String>,

    pub session_date: Option<NaiveDate>,
}
