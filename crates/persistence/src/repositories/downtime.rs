//! Downtime activity repository for database operations.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::DowntimeActivityEntity;
use crate::metrics::QueryTimer;

/// Repository for downtime activity database operations.
#[derive(Clone)]
pub struct DowntimeRepository {
    pool: PgPool,
}

impl DowntimeRepository {
    /// Creates a new DowntimeRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Record a downtime activity for a character.
    pub async fn create_activity(
        &self,
        character_id: Uuid,
        activity: &str,
        days: i32,
        notes: Option<&str>,
    ) -> Result<DowntimeActivityEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_downtime_activity");
        let result = sqlx::query_as::<_, DowntimeActivityEntity>(
            r#"
            INSERT INTO downtime_activities (character_id, activity, days, notes)
            VALUES ($1, $2, $3, $4)
            RETURNING id, character_id, activity, days, notes, created_at
            "#,
        )
        .bind(character_id)
        .bind(activity)
        .bind(days)
        .bind(notes)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// List downtime activities for a character, newest first.
    pub async fn list_by_character(
        &self,
        character_id: Uuid,
    ) -> Result<Vec<DowntimeActivityEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_downtime_activities");
        let result = sqlx::query_as::<_, DowntimeActivityEntity>(
            r#"
            SELECT id, character_id, activity, days, notes, created_at
            FROM downtime_activities
            WHERE character_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(character_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }
}

#[cfg(test)]
mod tests {
    // Note: DowntimeRepository tests require database connection and are covered by integration tests
}
