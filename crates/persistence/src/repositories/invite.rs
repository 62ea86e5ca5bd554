//! Invite repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{CampaignInviteEntity, InviteWithCampaignEntity};
use crate::metrics::QueryTimer;

/// Repository for campaign invite database operations.
#[derive(Clone)]
pub struct InviteRepository {
    pool: PgPool,
}

impl InviteRepository {
    /// Creates a new InviteRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Create a new invite.
    pub async fn create_invite(
        &self,
        campaign_id: Uuid,
        token: &str,
        expires_at: Option<DateTime<Utc>>,
        max_uses: Option<i32>,
        created_by: Uuid,
    ) -> Result<CampaignInviteEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_invite");
        let result = sqlx::query_as::<_, CampaignInviteEntity>(
            r#"
            INSERT INTO campaign_invites (campaign_id, token, expires_at, max_uses, created_by)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, campaign_id, token, expires_at, max_uses, used_count, is_revoked, created_by, created_at
            "#,
        )
        .bind(campaign_id)
        .bind(token)
        .bind(expires_at)
        .bind(max_uses)
        .bind(created_by)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find invite by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<CampaignInviteEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_invite_by_id");
        let result = sqlx::query_as::<_, CampaignInviteEntity>(
            r#"
            SELECT id, campaign_id, token, expires_at, max_uses, used_count, is_revoked, created_by, created_at
            FROM campaign_invites
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find invite by token with campaign info (for the join preview).
    pub async fn find_by_token_with_campaign(
        &self,
        token: &str,
    ) -> Result<Option<InviteWithCampaignEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_invite_by_token_with_campaign");
        let result = sqlx::query_as::<_, InviteWithCampaignEntity>(
            r#"
            SELECT
                i.id, i.campaign_id, i.token, i.expires_at, i.max_uses, i.used_count,
                i.is_revoked, i.created_by, i.created_at,
                c.name as campaign_name, c.description as campaign_description,
                (SELECT COUNT(*) FROM party_members WHERE campaign_id = c.id) as party_size
            FROM campaign_invites i
            JOIN campaigns c ON i.campaign_id = c.id
            WHERE i.token = $1 AND c.is_archived = false
            "#,
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// List all invites for a campaign, newest first.
    pub async fn list_by_campaign(
        &self,
        campaign_id: Uuid,
    ) -> Result<Vec<CampaignInviteEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_invites_by_campaign");
        let result = sqlx::query_as::<_, CampaignInviteEntity>(
            r#"
            SELECT id, campaign_id, token, expires_at, max_uses, used_count, is_revoked, created_by, created_at
            FROM campaign_invites
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

    /// Revoke an invite. Already-revoked invites are left untouched.
    /// Returns the number of rows affected (0 if not found or already revoked).
    pub async fn revoke_invite(&self, id: Uuid) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("revoke_invite");
        let result = sqlx::query(
            r#"
            UPDATE campaign_invites
            SET is_revoked = true
            WHERE id = $1 AND is_revoked = false
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await?;
        timer.record();
        Ok(result.rows_affected())
    }

    /// Check if a token already exists.
    pub async fn token_exists(&self, token: &str) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("check_invite_token_exists");
        let result = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(SELECT 1 FROM campaign_invites WHERE token = $1)
            "#,
        )
        .bind(token)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Generate a unique invite token by retrying on collision.
    pub async fn generate_unique_token<F>(&self, generator: F) -> Result<String, sqlx::Error>
    where
        F: Fn() -> String,
    {
        let mut token = generator();
        let mut attempts = 0;

        while self.token_exists(&token).await? {
            token = generator();
            attempts += 1;
            if attempts > 100 {
                return Err(sqlx::Error::Protocol(
                    "Could not generate unique invite token".to_string(),
                ));
            }
        }

        Ok(token)
    }

    /// Delete invites that expired before the cutoff, or were revoked and
    /// have not changed since before the cutoff.
    /// Returns the number of rows deleted.
    pub async fn delete_expired_before(
        &self,
        cutoff: DateTime<Utc>,
    ) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("delete_expired_invites");
        let result = sqlx::query(
            r#"
            DELETE FROM campaign_invites
            WHERE (expires_at IS NOT NULL AND expires_at < $1)
               OR (is_revoked = true AND created_at < $1)
            "#,
        )
        .bind(cutoff)
        .execute(&self.pool)
        .await?;
        timer.record();
        Ok(result.rows_affected())
    }
}
