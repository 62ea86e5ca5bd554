//! Invite and archive cleanup background job.

use chrono::{Duration, Utc};
use sqlx::PgPool;
use tracing::info;

use super::scheduler::{Job, JobFrequency};
use persistence::repositories::{CampaignRepository, InviteRepository};

/// Background job that hard-deletes invites long past their useful life
/// and purges campaigns that have stayed archived past the retention window.
///
/// The join flow itself never deletes invites; expired and revoked invites
/// stay queryable until this job removes them.
pub struct InviteCleanupJob {
    invites: InviteRepository,
    campaigns: CampaignRepository,
    retention_days: u32,
}

impl InviteCleanupJob {
    /// Create a new cleanup job.
    ///
    /// # Arguments
    /// * `pool` - Database connection pool
    /// * `retention_days` - Days an invite stays around after expiry/revocation,
    ///   and days an archived campaign survives before purge
    pub fn new(pool: PgPool, retention_days: u32) -> Self {
        Self {
            invites: InviteRepository::new(pool.clone()),
            campaigns: CampaignRepository::new(pool),
            retention_days,
        }
    }
}

#[async_trait::async_trait]
impl Job for InviteCleanupJob {
    fn name(&self) -> &'static str {
        "invite_cleanup"
    }

    fn frequency(&self) -> JobFrequency {
        JobFrequency::Hourly
    }

    async fn execute(&self) -> Result<(), String> {
        let cutoff = Utc::now() - Duration::days(self.retention_days as i64);

        let invites_deleted = self
            .invites
            .delete_expired_before(cutoff)
            .await
            .map_err(|e| format!("Failed to delete stale invites: {}", e))?;

        if invites_deleted > 0 {
            info!(
                deleted = invites_deleted,
                retention_days = self.retention_days,
                "Cleaned up stale invites"
            );
        }

        let campaigns_purged = self
            .campaigns
            .purge_archived_before(cutoff)
            .await
            .map_err(|e| format!("Failed to purge archived campaigns: {}", e))?;

        if campaigns_purged > 0 {
            info!(
                purged = campaigns_purged,
                retention_days = self.retention_days,
                "Purged long-archived campaigns"
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_frequency() {
        let freq = JobFrequency::Hourly;
        assert_eq!(freq.duration(), std::time::Duration::from_secs(3600));
    }

    #[test]
    fn test_cutoff_is_in_the_past() {
        let cutoff = Utc::now() - Duration::days(90);
        assert!(cutoff < Utc::now());
    }
}
