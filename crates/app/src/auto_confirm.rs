//! Auto-confirm worker — confirms reports nobody confirmed in time.
//!
//! The worker wakes up on a fixed interval, asks the challenge service to
//! confirm every report past its deadline, and announces each outcome in
//! the channel the report was made in.

use std::sync::Arc;

use tokio::sync::watch;
use tokio::time::MissedTickBehavior;

use ladderbot_domain::error::LadderError;
use ladderbot_domain::time::{self, Timestamp};

use crate::ports::{ChallengeRepository, LadderRepository, Notifier, ReportRepository};
use crate::services::challenge_service::ChallengeService;

/// Periodic sweeper for overdue reports.
pub struct AutoConfirmWorker<LR, CR, RR, N> {
    service: Arc<ChallengeService<LR, CR, RR>>,
    notifier: N,
    interval: std::time::Duration,
}

impl<LR, CR, RR, N> AutoConfirmWorker<LR, CR, RR, N>
where
    LR: LadderRepository,
    CR: ChallengeRepository,
    RR: ReportRepository,
    N: Notifier,
{
    /// Create a worker that sweeps every `interval`.
    pub fn new(
        service: Arc<ChallengeService<LR, CR, RR>>,
        notifier: N,
        interval: std::time::Duration,
    ) -> Self {
        Self {
            service,
            notifier,
            interval,
        }
    }

    /// Confirm everything due at `now` and announce it. Returns how many
    /// reports were confirmed. A failed announcement is logged, not retried.
    ///
    /// # Errors
    ///
    /// Returns a storage error when the due reports cannot be listed.
    pub async fn sweep(&self, now: Timestamp) -> Result<usize, LadderError> {
        let outcomes = self.service.confirm_due(now).await?;
        for (channel_id, outcome) in &outcomes {
            if let Err(err) = self.notifier.announce_outcome(*channel_id, outcome).await {
                tracing::warn!(
                    %channel_id,
                    challenge_id = %outcome.challenge.id,
                    error = %err,
                    "failed to announce auto-confirmed result"
                );
            }
        }
        Ok(outcomes.len())
    }

    /// Sweep on every tick until `shutdown` flips or its sender is dropped.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tracing::info!(interval = ?self.interval, "auto-confirm worker started");

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    match self.sweep(time::now()).await {
                        Ok(0) => {}
                        Ok(count) => tracing::info!(count, "auto-confirmed reports"),
                        Err(err) => tracing::error!(error = %err, "auto-confirm sweep failed"),
                    }
                }
                _ = shutdown.changed() => break,
            }
        }

        tracing::info!("auto-confirm worker stopped");
    }
}
