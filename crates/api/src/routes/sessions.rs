//! Session log routes, scoped under a campaign.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::Serialize;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserAuth;
use crate::routes::campaigns::{owned_campaign, readable_campaign};
use domain::models::session_log::{
    CreateSessionLogRequest, SessionLog, UpdateSessionLogRequest,
};
use persistence::repositories::{CampaignRepository, SessionLogRepository};

/// Response for listing a campaign's session logs.
#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ListSessionLogsResponse {
    pub data: Vec<SessionLog>,
}

/// Create a session log.
///
/// POST /api/v1/campaigns/:campaign_id/sessions
pub async fn create_session(
    State(state): State<AppState>,
    auth: UserAuth,
    Path(campaign_id): Path<Uuid>,
    Json(request): Json<CreateSessionLogRequest>,
) -> Result<(StatusCode, Json<SessionLog>), ApiError> {
    request.validate()?;

    let campaigns = CampaignRepository::new(state.pool.clone());
    let campaign = owned_campaign(&campaigns, campaign_id, &auth).await?;

    let sessions = SessionLogRepository::new(state.pool.clone());
    let session_date = request
        .session_date
        .unwrap_or_else(|| Utc::now().date_naive());

    let session = sessions
        .create_session(
            campaign.id,
            &request.title,
            request.summary.as_deref(),
            session_date,
            auth.user_id,
            &auth.email,
        )
        .await?;

    info!(campaign_id = %campaign.id, session_id = %session.id, "Session logged");

    Ok((StatusCode::CREATED, Json(session.into())))
}

/// List a campaign's session logs, most recent first.
///
/// GET /api/v1/campaigns/:campaign_id/sessions
pub async fn list_sessions(
    State(state): State<AppState>,
    auth: UserAuth,
    Path(campaign_id): Path<Uuid>,
) -> Result<Json<ListSessionLogsResponse>, ApiError> {
    let campaign = readable_campaign(&state.pool, campaign_id, &auth).await?;

    let sessions = SessionLogRepository::new(state.pool.clone());
    let data = sessions
        .list_by_campaign(campaign.id)
        .await?
        .into_iter()
        .map(SessionLog::from)
        .collect();

    Ok(Json(ListSessionLogsResponse { data }))
}

/// Update a session log.
///
/// PUT /api/v1/campaigns/:campaign_id/sessions/:session_id
pub async fn update_session(
    State(state): State<AppState>,
    auth: UserAuth,
    Path((campaign_id, session_id)): Path<(Uuid, Uuid)>,
    Json(request): Json<UpdateSessionLogRequest>,
) -> Result<Json<SessionLog>, ApiError> {
    request.validate()?;

    let campaigns = CampaignRepository::new(state.pool.clone());
    let campaign = owned_campaign(&campaigns, campaign_id, &auth).await?;

    let sessions = SessionLogRepository::new(state.pool.clone());
    let current = sessions
        .find_by_id(session_id)
        .await?
        .filter(|s| s.campaign_id == campaign.id)
        .ok_or_else(|| ApiError::NotFound("Session log not found".to_string()))?;

    let updated = sessions
        .update_session(
            current.id,
            request.title.as_deref().unwrap_or(&current.title),
            request.summary.as_deref().or(current.summary.as_deref()),
            request.session_date.unwrap_or(current.session_date),
        )
        .await?;

    Ok(Json(updated.into()))
}

/// Delete a session log.
///
/// DELETE /api/v1/campaigns/:campaign_id/sessions/:session_id
pub async fn delete_session(
    State(state): State<AppState>,
    auth: UserAuth,
    Path((campaign_id, session_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, ApiError> {
    let campaigns = CampaignRepository::new(state.pool.clone());
    let campaign = owned_campaign(&campaigns, campaign_id, &auth).await?;

    let sessions = SessionLogRepository::new(state.pool.clone());
    let session = sessions
        .find_by_id(session_id)
        .await?
        .filter(|s| s.campaign_id == campaign.id)
        .ok_or_else(|| ApiError::NotFound("Session log not found".to_string()))?;

    sessions.delete_session(session.id).await?;
    info!(campaign_id = %campaign.id, session_id = %session.id, "Session log deleted");

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_session_request_validation() {
        let valid = CreateSessionLogRequest {
            title: "Session 12: The Siege".to_string(),
            summary: Some("The party held the wall.".to_string()),
            session_date: None,
        };
        assert!(valid.validate().is_ok());

        let empty_title = CreateSessionLogRequest {
            title: String::new(),
            summary: None,
            session_date: None,
        };
        assert!(empty_title.validate().is_err());
    }

    #[test]
    fn test_session_date_defaults_to_today() {
        let request = CreateSessionLogRequest {
            title: "Session 1".to_string(),
            summary: None,
            session_date: None,
        };
        let date = request
            .session_date
            .unwrap_or_else(|| Utc::now().date_naive());
        assert_eq!(date, Utc::now().date_naive());
    }
}
