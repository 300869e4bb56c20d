//! Application services — use-case implementations.
//!
//! Each service accepts port trait implementations via generic parameters
//! (constructor injection), keeping this layer decoupled from concrete adapters.
//! Both services share one [`Store`] so that their writes are serialized.

pub mod challenge_service;
pub mod ladder_service;

use tokio::sync::{Mutex, MutexGuard};

use ladderbot_domain::error::{LadderError, RuleViolation};
use ladderbot_domain::id::{GuildId, UserId};
use ladderbot_domain::ladder::Ladder;

use crate::ports::{ChallengeRepository, LadderRepository, ReportRepository};

/// Repositories shared by the services, plus the lock that serializes
/// read-modify-write sequences across them.
pub struct Store<LR, CR, RR> {
    pub(crate) ladders: LR,
    pub(crate) challenges: CR,
    pub(crate) reports: RR,
    write_lock: Mutex<()>,
}

impl<LR, CR, RR> Store<LR, CR, RR> {
    /// Bundle the three repositories.
    pub fn new(ladders: LR, challenges: CR, reports: RR) -> Self {
        Self {
            ladders,
            challenges,
            reports,
            write_lock: Mutex::new(()),
        }
    }

    pub(crate) async fn lock(&self) -> MutexGuard<'_, ()> {
        self.write_lock.lock().await
    }
}

impl<LR, CR, RR> Store<LR, CR, RR>
where
    LR: LadderRepository,
    CR: ChallengeRepository,
    RR: ReportRepository,
{
    /// Load a guild's ladder or fail with [`RuleViolation::NoLadder`].
    pub(crate) async fn require_ladder(&self, guild_id: GuildId) -> Result<Ladder, LadderError> {
        self.ladders
            .get(guild_id)
            .await?
            .ok_or_else(|| RuleViolation::NoLadder.into())
    }

    /// Load a guild's ladder and check that `user` joined it.
    pub(crate) async fn require_member(
        &self,
        guild_id: GuildId,
        user: UserId,
    ) -> Result<Ladder, LadderError> {
        let ladder = self.require_ladder(guild_id).await?;
        if !ladder.contains(user) {
            return Err(RuleViolation::NotJoined.into());
        }
        Ok(ladder)
    }
}
