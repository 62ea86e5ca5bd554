//! Campaign repository for database operations.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::CampaignEntity;
use crate::metrics::QueryTimer;

/// Repository for campaign-related database operations.
#[derive(Clone)]
pub struct CampaignRepository {
    pool: PgPool,
}

impl CampaignRepository {
    /// Creates a new CampaignRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Create a new campaign with both ownership fields recorded.
    pub async fn create_campaign(
        &self,
        name: &str,
        description: Option<&str>,
        created_by: Uuid,
        owner_email: &str,
    ) -> Result<CampaignEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_campaign");
        let result = sqlx::query_as::<_, CampaignEntity>(
            r#"
            INSERT INTO campaigns (name, description, created_by, owner_email)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, description, is_archived, created_by, owner_email, created_at, updated_at
            "#,
        )
        .bind(name)
        .bind(description)
        .bind(created_by)
        .bind(owner_email)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find a campaign by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<CampaignEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_campaign_by_id");
        let result = sqlx::query_as::<_, CampaignEntity>(
            r#"
            SELECT id, name, description, is_archived, created_by, owner_email, created_at, updated_at
            FROM campaigns
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// List campaigns owned by a user, matching either ownership field.
    pub async fn list_owned_by(
        &self,
        user_id: Uuid,
        email: &str,
    ) -> Result<Vec<CampaignEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_campaigns_owned_by");
        let result = sqlx::query_as::<_, CampaignEntity>(
            r#"
            SELECT id, name, description, is_archived, created_by, owner_email, created_at, updated_at
            FROM campaigns
            WHERE created_by = $1 OR owner_email = $2
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .bind(email)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Update a campaign's name and description.
    pub async fn update_campaign(
        &self,
        id: Uuid,
        name: &str,
        description: Option<&str>,
    ) -> Result<CampaignEntity, sqlx::Error> {
        let timer = QueryTimer::new("update_campaign");
        let result = sqlx::query_as::<_, CampaignEntity>(
            r#"
            UPDATE campaigns
            SET name = $2, description = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, description, is_archived, created_by, owner_email, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(description)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Archive a campaign (soft delete).
    /// Returns the number of rows affected (0 if not found or already archived).
    pub async fn archive_campaign(&self, id: Uuid) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("archive_campaign");
        let result = sqlx::query(
            r#"
            UPDATE campaigns
            SET is_archived = true, updated_at = NOW()
            WHERE id = $1 AND is_archived = false
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await?;
        timer.record();
        Ok(result.rows_affected())
    }

    /// Delete campaigns archived before the cutoff, cascading to their
    /// invites, party members, sessions, quests and NPCs.
    pub async fn purge_archived_before(
        &self,
        cutoff: chrono::DateTime<chrono::Utc>,
    ) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("purge_archived_campaigns");
        let result = sqlx::query(
            r#"
            DELETE FROM campaigns
            WHERE is_archived = true AND updated_at < $1
            "#,
        )
        .bind(cutoff)
        .execute(&self.pool)
        .await?;
        timer.record();
        Ok(result.rows_affected())
    }
}
