//! Background job scheduler and job implementations.

mod invite_cleanup;
mod pool_metrics;
mod scheduler;

pub use invite_cleanup::InviteCleanupJob;
pub use pool_metrics::PoolMetricsJob;
pub use scheduler::JobScheduler;
