//! Quest repository for database operations.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::QuestEntity;
use crate::metrics::QueryTimer;

/// Repository for quest-related database operations.
#[derive(Clone)]
pub struct QuestRepository {
    pool: PgPool,
}

impl QuestRepository {
    /// Creates a new QuestRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Create a quest for a campaign.
    pub async fn create_quest(
        &self,
        campaign_id: Uuid,
        title: &str,
        description: Option<&str>,
    ) -> Result<QuestEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_quest");
        let result = sqlx::query_as::<_, QuestEntity>(
            r#"
            INSERT INTO quests (campaign_id, title, description)
            VALUES ($1, $2, $3)
            RETURNING id, campaign_id, title, description, status, created_at, updated_at
            "#,
        )
        .bind(campaign_id)
        .bind(title)
        .bind(description)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find a quest by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<QuestEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_quest_by_id");
        let result = sqlx::query_as::<_, QuestEntity>(
            r#"
            SELECT id, campaign_id, title, description, status, created_at, updated_at
            FROM quests
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// List quests for a campaign, newest first.
    pub async fn list_by_campaign(
        &self,
        campaign_id: Uuid,
    ) -> Result<Vec<QuestEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_quests");
        let result = sqlx::query_as::<_, QuestEntity>(
            r#"
            SELECT id, campaign_id, title, description, status, created_at, updated_at
            FROM quests
            WHERE campaign_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(campaign_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Update a quest. None fields are left untouched.
    pub async fn update_quest(
        &self,
        id: Uuid,
        title: Option<&str>,
        description: Option<&str>,
        status: Option<&str>,
    ) -> Result<QuestEntity, sqlx::Error> {
        let timer = QueryTimer::new("update_quest");
        let result = sqlx::query_as::<_, QuestEntity>(
            r#"
            UPDATE quests
            SET title = COALESCE($2, title),
                description = COALESCE($3, description),
                status = COALESCE($4, status),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, campaign_id, title, description, status, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(title)
        .bind(description)
        .bind(status)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Delete a quest. Returns the number of rows affected.
    pub async fn delete_quest(&self, id: Uuid) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("delete_quest");
        let result = sqlx::query(
            r#"
            DELETE FROM quests
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
