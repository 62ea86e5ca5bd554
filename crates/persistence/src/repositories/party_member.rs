//! Party member repository for database operations.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{PartyMemberEntity, PartyMemberWithCharacterEntity};
use crate::metrics::QueryTimer;

/// Result of a join attempt inside the membership transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JoinOutcome {
    /// A new membership row was created and the invite use was consumed.
    Joined(PartyMemberEntity),
    /// The character was already in the party; no invite use consumed.
    AlreadyMember(PartyMemberEntity),
    /// The invite had no remaining uses (or was revoked) at commit time.
    InviteExhausted,
}

/// Repository for party membership database operations.
#[derive(Clone)]
pub struct PartyMemberRepository {
    pool: PgPool,
}

impl PartyMemberRepository {
    /// Creates a new PartyMemberRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Join a character to a campaign, consuming one use of the invite.
    ///
    /// Both writes happen in a single transaction:
    /// 1. Insert the membership row. The UNIQUE (campaign_id, character_id)
    ///    constraint plus ON CONFLICT DO NOTHING makes a repeat join a no-op
    ///    rather than an error.
    /// 2. If a row was inserted, increment the invite's used_count, guarded
    ///    in SQL so the counter can never pass max_uses. Zero rows affected
    ///    means the invite was revoked or exhausted by a concurrent join, and
    ///    the whole transaction rolls back.
    ///
    /// An idempotent re-join (conflict on insert) skips the increment and
    /// returns the existing membership.
    pub async fn join_campaign(
        &self,
        campaign_id: Uuid,
        character_id: Uuid,
        invite_id: Uuid,
        created_by: Uuid,
        owner_email: &str,
    ) -> Result<JoinOutcome, sqlx::Error> {
        let timer = QueryTimer::new("join_campaign");

        let mut tx = self.pool.begin().await?;

        let inserted = sqlx::query_as::<_, PartyMemberEntity>(
            r#"
            INSERT INTO party_members (campaign_id, character_id, created_by, owner_email)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (campaign_id, character_id) DO NOTHING
            RETURNING id, campaign_id, character_id, created_by, owner_email, created_at
            "#,
        )
        .bind(campaign_id)
        .bind(character_id)
        .bind(created_by)
        .bind(owner_email)
        .fetch_optional(&mut *tx)
        .await?;

        let outcome = match inserted {
            Some(member) => {
                let updated = sqlx::query(
                    r#"
                    UPDATE campaign_invites
                    SET used_count = used_count + 1
                    WHERE id = $1
                      AND is_revoked = false
                      AND (max_uses IS NULL OR used_count < max_uses)
                    "#,
                )
                .bind(invite_id)
                .execute(&mut *tx)
                .await?;

                if updated.rows_affected() == 0 {
                    tx.rollback().await?;
                    timer.record();
                    return Ok(JoinOutcome::InviteExhausted);
                }

                JoinOutcome::Joined(member)
            }
            None => {
                let existing = sqlx::query_as::<_, PartyMemberEntity>(
                    r#"
                    SELECT id, campaign_id, character_id, created_by, owner_email, created_at
                    FROM party_members
                    WHERE campaign_id = $1 AND character_id = $2
                    "#,
                )
                .bind(campaign_id)
                .bind(character_id)
                .fetch_one(&mut *tx)
                .await?;

                JoinOutcome::AlreadyMember(existing)
            }
        };

        tx.commit().await?;
        timer.record();
        Ok(outcome)
    }

    /// List the party roster for a campaign with character info.
    pub async fn list_party(
        &self,
        campaign_id: Uuid,
    ) -> Result<Vec<PartyMemberWithCharacterEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_party");
        let result = sqlx::query_as::<_, PartyMemberWithCharacterEntity>(
            r#"
            SELECT
                pm.id, pm.campaign_id, pm.character_id, pm.created_at,
                ch.name as character_name, ch.class as character_class,
                ch.level as character_level
            FROM party_members pm
            JOIN characters ch ON pm.character_id = ch.id
            WHERE pm.campaign_id = $1
            ORDER BY pm.created_at ASC
            "#,
        )
        .bind(campaign_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Count members in a campaign's party.
    pub async fn count_party(&self, campaign_id: Uuid) -> Result<i64, sqlx::Error> {
        let timer = QueryTimer::new("count_party");
        let count: Result<(i64,), sqlx::Error> = sqlx::query_as(
            r#"
            SELECT COUNT(*) as count
            FROM party_members
            WHERE campaign_id = $1
            "#,
        )
        .bind(campaign_id)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        count.map(|c| c.0)
    }

    /// Check whether the user holds any seat in the campaign's party,
    /// matching either ownership field on the membership row.
    pub async fn has_member_owned_by(
        &self,
        campaign_id: Uuid,
        user_id: Uuid,
        email: &str,
    ) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("has_party_member_owned_by");
        let result = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM party_members
                WHERE campaign_id = $1 AND (created_by = $2 OR owner_email = $3)
            )
            "#,
        )
        .bind(campaign_id)
        .bind(user_id)
        .bind(email)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Remove a seat by membership ID, scoped to the campaign.
    /// Returns the number of rows affected (0 if not found).
    pub async fn remove_member_by_id(
        &self,
        campaign_id: Uuid,
        member_id: Uuid,
    ) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("remove_party_member_by_id");
        let result = sqlx::query(
            r#"
            DELETE FROM party_members
            WHERE id = $1 AND campaign_id = $2
            "#,
        )
        .bind(member_id)
        .bind(campaign_id)
        .execute(&self.pool)
        .await?;
        timer.record();
        Ok(result.rows_affected())
    }
}
