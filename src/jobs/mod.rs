//! Scheduled Jobs
//!
//! Background jobs for periodic maintenance: session pruning and the
//! nightly reconciliation sweep.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::interval;

use crate::reconcile::{PgMemberLedger, ReconcileReport, ReconcileService};
use crate::session::SessionStore;

/// Configuration for job scheduler
#[derive(Debug, Clone)]
pub struct JobSchedulerConfig {
    /// Interval for expired-session pruning (default: 1 hour)
    pub session_prune_interval: Duration,
    /// Interval for the full reconciliation sweep (default: 24 hours)
    pub reconcile_interval: Duration,
}

impl Default for JobSchedulerConfig {
    fn default() -> Self {
        Self {
            session_prune_interval: Duration::from_secs(3600),
            reconcile_interval: Duration::from_secs(86400),
        }
    }
}

/// Job Scheduler - runs periodic maintenance tasks
pub struct JobScheduler {
    pool: PgPool,
    sessions: Arc<SessionStore>,
    config: JobSchedulerConfig,
}

impl JobScheduler {
    /// Create a new job scheduler
    pub fn new(pool: PgPool, sessions: Arc<SessionStore>) -> Self {
        Self {
            pool,
            sessions,
            config: JobSchedulerConfig::default(),
        }
    }

    /// Create with custom configuration
    pub fn with_config(pool: PgPool, sessions: Arc<SessionStore>, config: JobSchedulerConfig) -> Self {
        Self {
            pool,
            sessions,
            config,
        }
    }

    /// Start the job scheduler in the background.
    /// Returns a handle that can be used to abort the scheduler.
    pub fn start(self) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            self.run().await;
        })
    }

    /// Run the scheduler loop
    async fn run(&self) {
        tracing::info!("Job scheduler started");

        let mut prune_interval = interval(self.config.session_prune_interval);
        let mut reconcile_interval = interval(self.config.reconcile_interval);

        loop {
            tokio::select! {
                _ = prune_interval.tick() => {
                    let pruned = self.sessions.prune_expired().await;
                    if pruned > 0 {
                        tracing::info!(pruned = pruned, "Pruned expired sessions");
                    }
                }
                _ = reconcile_interval.tick() => {
                    match self.run_reconcile_sweep().await {
                        Ok(report) if !report.is_clean() => {
                            tracing::warn!(
                                failed = report.failed.len(),
                                "Reconciliation sweep finished with failures"
                            );
                        }
                        Ok(_) => {}
                        Err(e) => {
                            tracing::error!(error = %e, "Reconciliation sweep failed");
                        }
                    }
                }
            }
        }
    }

    /// Run the full reconciliation sweep once
    async fn run_reconcile_sweep(&self) -> Result<ReconcileReport, crate::reconcile::ReconcileError> {
        let service = ReconcileService::new(PgMemberLedger::new(self.pool.clone()));
        service.reconcile_all().await
    }

    /// Run all maintenance jobs once (for manual trigger or testing)
    pub async fn run_all_once(&self) -> MaintenanceReport {
        let mut errors = Vec::new();

        let sessions_pruned = self.sessions.prune_expired().await;

        let reconcile = match self.run_reconcile_sweep().await {
            Ok(report) => Some(report),
            Err(e) => {
                errors.push(format!("Reconciliation sweep: {}", e));
                None
            }
        };

        MaintenanceReport {
            sessions_pruned,
            reconcile,
            errors,
            completed_at: Utc::now(),
        }
    }
}

/// Report from running maintenance jobs
#[derive(Debug, Clone)]
pub struct MaintenanceReport {
    pub sessions_pruned: usize,
    pub reconcile: Option<ReconcileReport>,
    pub errors: Vec<String>,
    pub completed_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_scheduler_config_default() {
        let config = JobSchedulerConfig::default();
        assert_eq!(config.session_prune_interval, Duration::from_secs(3600));
        assert_eq!(config.reconcile_interval, Duration::from_secs(86400));
    }
}
