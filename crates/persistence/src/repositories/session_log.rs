//! Session log repository for database operations.

use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::SessionLogEntity;
use crate::metrics::QueryTimer;

/// Repository for session log database operations.
#[derive(Clone)]
pub struct SessionLogRepository {
    pool: PgPool,
}

impl SessionLogRepository {
    /// Creates a new SessionLogRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Create a session log entry for a campaign.
    pub async fn create_session(
        &self,
        campaign_id: Uuid,
        title: &str,
        summary: Option<&str>,
        session_date: NaiveDate,
        created_by: Uuid,
        owner_email: &str,
    ) -> Result<SessionLogEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_session_log");
        let result = sqlx::query_as::<_, SessionLogEntity>(
            r#"
            INSERT INTO session_logs (campaign_id, title, summary, session_date, created_by, owner_email)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, campaign_id, title, summary, session_date, created_by, owner_email, created_at, updated_at
            "#,
        )
        .bind(campaign_id)
        .bind(title)
        .bind(summary)
        .bind(session_date)
        .bind(created_by)
        .bind(owner_email)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find a session log by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<SessionLogEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_session_log_by_id");
        let result = sqlx::query_as::<_, SessionLogEntity>(
            r#"
            SELECT id, campaign_id, title, summary, session_date, created_by, owner_email, created_at, updated_at
            FROM session_logs
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// List session logs for a campaign, most recent session first.
    pub async fn list_by_campaign(
        &self,
        campaign_id: Uuid,
    ) -> Result<Vec<SessionLogEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_session_logs");
        let result = sqlx::query_as::<_, SessionLogEntity>(
            r#"
            SELECT id, campaign_id, title, summary, session_date, created_by, owner_email, created_at, updated_at
            FROM session_logs
            WHERE campaign_id = $1
            ORDER BY session_date DESC, created_at DESC
            "#,
        )
        .bind(campaign_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Update a session log's title, summary and date.
    pub async fn update_session(
        &self,
        id: Uuid,
        title: &str,
        summary: Option<&str>,
        session_date: NaiveDate,
    ) -> Result<SessionLogEntity, sqlx::Error> {
        let timer = QueryTimer::new("update_session_log");
        let result = sqlx::query_as::<_, SessionLogEntity>(
            r#"
            UPDATE session_logs
            SET title = $2, summary = $3, session_date = $4, updated_at = NOW()
            WHERE id = $1
            RETURNING id, campaign_id, title, summary, session_date, created_by, owner_email, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(title)
        .bind(summary)
        .bind(session_date)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Delete a session log. Returns the number of rows affected.
    pub async fn delete_session(&self, id: Uuid) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("delete_session_log");
        let result = sqlx::query(
            r#"
            DELETE FROM session_logs
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await?;
        timer.record();
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    // Note: SessionLogRepository tests require database connection and are covered by integration tests
}
