//! Ladder service — use-cases for managing a server's ladder.

use std::sync::Arc;

use ladderbot_domain::error::{LadderError, RuleViolation};
use ladderbot_domain::id::{GuildId, UserId};
use ladderbot_domain::ladder::{Ladder, RankingPage};
use ladderbot_domain::player::Player;
use ladderbot_domain::time::Timestamp;

use crate::ports::{ChallengeRepository, LadderRepository, ReportRepository};
use crate::services::Store;

/// Application service for ladder membership and rankings.
pub struct LadderService<LR, CR, RR> {
    store: Arc<Store<LR, CR, RR>>,
}

impl<LR, CR, RR> LadderService<LR, CR, RR>
where
    LR: LadderRepository,
    CR: ChallengeRepository,
    RR: ReportRepository,
{
    /// Create a new service backed by the given store.
    pub fn new(store: Arc<Store<LR, CR, RR>>) -> Self {
        Self { store }
    }

    /// Create an empty ladder, erasing any existing ladder of the guild
    /// together with its challenges and pending reports.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repositories.
    pub async fn create_ladder(
        &self,
        guild_id: GuildId,
        now: Timestamp,
    ) -> Result<Ladder, LadderError> {
        let _guard = self.store.lock().await;
        self.store.reports.delete_by_guild(guild_id).await?;
        self.store.challenges.delete_by_guild(guild_id).await?;
        self.store.ladders.delete(guild_id).await?;
        let ladder = self.store.ladders.save(Ladder::new(guild_id, now)).await?;
        tracing::info!(%guild_id, "ladder created");
        Ok(ladder)
    }

    /// Load the guild's ladder.
    ///
    /// # Errors
    ///
    /// Returns [`RuleViolation::NoLadder`] when the guild has no ladder.
    pub async fn get_ladder(&self, guild_id: GuildId) -> Result<Ladder, LadderError> {
        self.store.require_ladder(guild_id).await
    }

    /// Add `user` at the bottom of the ladder. Returns the new player count.
    ///
    /// # Errors
    ///
    /// Returns [`RuleViolation::NoLadder`], [`RuleViolation::AlreadyJoined`],
    /// a validation error for an empty name, or a storage error.
    pub async fn join(
        &self,
        guild_id: GuildId,
        user: UserId,
        name: &str,
        now: Timestamp,
    ) -> Result<usize, LadderError> {
        let _guard = self.store.lock().await;
        let mut ladder = self.store.require_ladder(guild_id).await?;
        let count = ladder.join(Player::new(user, name, now)?)?;
        self.store.ladders.save(ladder).await?;
        tracing::info!(%guild_id, %user, count, "player joined");
        Ok(count)
    }

    /// Remove `user` from the ladder. Their open challenges, sent or
    /// received, are dropped. Returns the remaining player count.
    ///
    /// # Errors
    ///
    /// Returns [`RuleViolation::NoLadder`], [`RuleViolation::NotJoined`], or
    /// a storage error.
    pub async fn leave(&self, guild_id: GuildId, user: UserId) -> Result<usize, LadderError> {
        let _guard = self.store.lock().await;
        let mut ladder = self.store.require_ladder(guild_id).await?;
        ladder.leave(user)?;
        let count = ladder.len();
        self.store.ladders.save(ladder).await?;

        let challenges = self.store.challenges.find_by_guild(guild_id).await?;
        for challenge in challenges
            .into_iter()
            .filter(|c| c.is_open() && c.involves(user))
        {
            self.store.reports.delete_by_challenge(challenge.id).await?;
            self.store.challenges.delete(challenge.id).await?;
            tracing::debug!(challenge_id = %challenge.id, "dropped open challenge of leaving player");
        }

        tracing::info!(%guild_id, %user, count, "player left");
        Ok(count)
    }

    /// One page of the guild's rankings (0-based, clamped).
    ///
    /// # Errors
    ///
    /// Returns [`RuleViolation::NoLadder`] or a storage error.
    pub async fn rankings(
        &self,
        guild_id: GuildId,
        page: usize,
    ) -> Result<RankingPage, LadderError> {
        let ladder = self.store.require_ladder(guild_id).await?;
        Ok(ladder.page(page))
    }

    /// Mark `user` as active without playing a challenge.
    ///
    /// # Errors
    ///
    /// Returns [`RuleViolation::NoLadder`], [`RuleViolation::NotJoined`], or
    /// a storage error.
    pub async fn activate(
        &self,
        guild_id: GuildId,
        user: UserId,
        now: Timestamp,
    ) -> Result<Player, LadderError> {
        let _guard = self.store.lock().await;
        let mut ladder = self.store.require_ladder(guild_id).await?;
        let player = ladder.player_mut(user).ok_or(RuleViolation::NotJoined)?;
        player.touch(now);
        let player = player.clone();
        self.store.ladders.save(ladder).await?;
        Ok(player)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MemoryStore, store, t0};
    use chrono::Duration;
    use ladderbot_domain::challenge::Challenge;

    const GUILD: GuildId = GuildId::new(1);

    fn service(store: &Arc<MemoryStore>) -> LadderService<
        crate::testing::InMemoryLadderRepo,
        crate::testing::InMemoryChallengeRepo,
        crate::testing::InMemoryReportRepo,
    > {
        LadderService::new(Arc::clone(store))
    }

    #[tokio::test]
    async fn should_fail_with_no_ladder_before_create() {
        let store = store();
        let svc = service(&store);
        let result = svc.join(GUILD, UserId::new(1), "ann", t0()).await;
        assert!(matches!(
            result,
            Err(LadderError::Rule(RuleViolation::NoLadder))
        ));
    }

    #[tokio::test]
    async fn should_join_in_order() {
        let store = store();
        let svc = service(&store);
        svc.create_ladder(GUILD, t0()).await.unwrap();

        assert_eq!(svc.join(GUILD, UserId::new(1), "ann", t0()).await.unwrap(), 1);
        assert_eq!(svc.join(GUILD, UserId::new(2), "bob", t0()).await.unwrap(), 2);

        let ladder = svc.get_ladder(GUILD).await.unwrap();
        assert_eq!(ladder.position(UserId::new(2)), Some(2));
    }

    #[tokio::test]
    async fn should_reject_double_join() {
        let store = store();
        let svc = service(&store);
        svc.create_ladder(GUILD, t0()).await.unwrap();
        svc.join(GUILD, UserId::new(1), "ann", t0()).await.unwrap();

        let result = svc.join(GUILD, UserId::new(1), "ann", t0()).await;
        assert!(matches!(
            result,
            Err(LadderError::Rule(RuleViolation::AlreadyJoined))
        ));
    }

    #[tokio::test]
    async fn should_erase_previous_ladder_and_challenges_on_create() {
        let store = store();
        let svc = service(&store);
        svc.create_ladder(GUILD, t0()).await.unwrap();
        svc.join(GUILD, UserId::new(1), "ann", t0()).await.unwrap();
        let challenge = Challenge::new(GUILD, UserId::new(2), UserId::new(1), t0()).unwrap();
        store.challenges.create(challenge).await.unwrap();

        svc.create_ladder(GUILD, t0()).await.unwrap();

        assert!(svc.get_ladder(GUILD).await.unwrap().is_empty());
        assert!(store.challenges.find_by_guild(GUILD).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn should_drop_open_challenges_when_player_leaves() {
        let store = store();
        let svc = service(&store);
        svc.create_ladder(GUILD, t0()).await.unwrap();
        svc.join(GUILD, UserId::new(1), "ann", t0()).await.unwrap();
        svc.join(GUILD, UserId::new(2), "bob", t0()).await.unwrap();
        let challenge = Challenge::new(GUILD, UserId::new(2), UserId::new(1), t0()).unwrap();
        store.challenges.create(challenge).await.unwrap();

        let remaining = svc.leave(GUILD, UserId::new(1)).await.unwrap();

        assert_eq!(remaining, 1);
        assert!(store.challenges.find_by_guild(GUILD).await.unwrap().is_empty());
        let ladder = svc.get_ladder(GUILD).await.unwrap();
        assert_eq!(ladder.position(UserId::new(2)), Some(1));
    }

    #[tokio::test]
    async fn should_reject_leave_when_not_joined() {
        let store = store();
        let svc = service(&store);
        svc.create_ladder(GUILD, t0()).await.unwrap();
        let result = svc.leave(GUILD, UserId::new(9)).await;
        assert!(matches!(
            result,
            Err(LadderError::Rule(RuleViolation::NotJoined))
        ));
    }

    #[tokio::test]
    async fn should_return_requested_rankings_page() {
        let store = store();
        let svc = service(&store);
        svc.create_ladder(GUILD, t0()).await.unwrap();
        for id in 1..=12 {
            svc.join(GUILD, UserId::new(id), &format!("p{id}"), t0())
                .await
                .unwrap();
        }

        let page = svc.rankings(GUILD, 1).await.unwrap();
        assert_eq!(page.page_count, 2);
        assert_eq!(page.entries.len(), 2);
        assert_eq!(page.entries[0].position, 11);
    }

    #[tokio::test]
    async fn should_reactivate_player() {
        let store = store();
        let svc = service(&store);
        svc.create_ladder(GUILD, t0()).await.unwrap();
        svc.join(GUILD, UserId::new(1), "ann", t0()).await.unwrap();

        let later = t0() + Duration::days(9);
        let player = svc.activate(GUILD, UserId::new(1), later).await.unwrap();

        assert!(player.is_active(later));
        let ladder = svc.get_ladder(GUILD).await.unwrap();
        assert!(ladder.player(UserId::new(1)).unwrap().is_active(later));
    }
}
