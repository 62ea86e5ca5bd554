//! NPC repository for database operations.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::NpcEntity;
use crate::metrics::QueryTimer;

/// Repository for NPC-related database operations.
#[derive(Clone)]
pub struct NpcRepository {
    pool: PgPool,
}

impl NpcRepository {
    /// Creates a new NpcRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Create an NPC for a campaign.
    pub async fn create_npc(
        &self,
        campaign_id: Uuid,
        name: &str,
        description: Option<&str>,
        location: Option<&str>,
    ) -> Result<NpcEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_npc");
        let result = sqlx::query_as::<_, NpcEntity>(
            r#"
            INSERT INTO npcs (campaign_id, name, description, location)
            VALUES ($1, $2, $3, $4)
            RETURNING id, campaign_id, name, description, location, is_alive, created_at, updated_at
            "#,
        )
        .bind(campaign_id)
        .bind(name)
        .bind(description)
        .bind(location)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find an NPC by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<NpcEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_npc_by_id");
        let result = sqlx::query_as::<_, NpcEntity>(
            r#"
            SELECT id, campaign_id, name, description, location, is_alive, created_at, updated_at
            FROM npcs
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// List NPCs for a campaign, sorted by name.
    pub async fn list_by_campaign(&self, campaign_id: Uuid) -> Result<Vec<NpcEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_npcs");
        let result = sqlx::query_as::<_, NpcEntity>(
            r#"
            SELECT id, campaign_id, name, description, location, is_alive, created_at, updated_at
            FROM npcs
            WHERE campaign_id = $1
            ORDER BY name ASC
            "#,
        )
        .bind(campaign_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Update an NPC. None fields are left untouched.
    pub async fn update_npc(
        &self,
        id: Uuid,
        name: Option<&str>,
        description: Option<&str>,
        location: Option<&str>,
        is_alive: Option<bool>,
    ) -> Result<NpcEntity, sqlx::Error> {
        let timer = QueryTimer::new("update_npc");
        let result = sqlx::query_as::<_, NpcEntity>(
            r#"
            UPDATE npcs
            SET name = COALESCE($2, name),
                description = COALESCE($3, description),
                location = COALESCE($4, location),
                is_alive = COALESCE($5, is_alive),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, campaign_id, name, description, location, is_alive, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(description)
        .bind(location)
        .bind(is_alive)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Delete an NPC. Returns the number of rows affected.
    pub async fn delete_npc(&self, id: Uuid) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("delete_npc");
        let result = sqlx::query(
            r#"
            DELETE FROM npcs
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
    // Note: NpcRepository tests require database connection and are covered by integration tests
}
