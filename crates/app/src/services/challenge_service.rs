//! Challenge service — use-cases for issuing, reporting and confirming challenges.

use std::sync::Arc;

use chrono::Duration;

use ladderbot_domain::challenge::{Challenge, ChallengeOutcome};
use ladderbot_domain::error::{LadderError, NotFoundError, RuleViolation};
use ladderbot_domain::id::{ChallengeId, ChannelId, GuildId, ReportId, UserId};
use ladderbot_domain::player::Player;
use ladderbot_domain::report::{DEFAULT_AUTO_CONFIRM_HOURS, PendingReport};
use ladderbot_domain::score::Score;
use ladderbot_domain::time::Timestamp;

use crate::ports::{ChallengeRepository, LadderRepository, ReportRepository};
use crate::services::Store;

/// A player's open challenges.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OpenChallenges {
    /// Challenges the player issued. At most one.
    pub sent: Vec<Challenge>,
    /// Challenges issued against the player.
    pub received: Vec<Challenge>,
}

/// Application service for the challenge lifecycle.
pub struct ChallengeService<LR, CR, RR> {
    store: Arc<Store<LR, CR, RR>>,
    auto_confirm_after: Duration,
}

fn outstanding(challenges: &[Challenge], challenger: UserId) -> Option<&Challenge> {
    challenges
        .iter()
        .find(|c| c.is_open() && c.challenger_id == challenger)
}

impl<LR, CR, RR> ChallengeService<LR, CR, RR>
where
    LR: LadderRepository,
    CR: ChallengeRepository,
    RR: ReportRepository,
{
    /// Create a new service backed by the given store.
    pub fn new(store: Arc<Store<LR, CR, RR>>) -> Self {
        Self {
            store,
            auto_confirm_after: Duration::hours(DEFAULT_AUTO_CONFIRM_HOURS),
        }
    }

    /// Override how long a report waits before it confirms itself.
    #[must_use]
    pub fn with_auto_confirm_after(mut self, delay: Duration) -> Self {
        self.auto_confirm_after = delay;
        self
    }

    #[must_use]
    pub fn auto_confirm_after(&self) -> Duration {
        self.auto_confirm_after
    }

    /// Players `user` could challenge right now, top to bottom.
    ///
    /// # Errors
    ///
    /// Returns [`RuleViolation::NoLadder`], [`RuleViolation::NotJoined`],
    /// [`RuleViolation::OutstandingChallenge`],
    /// [`RuleViolation::NoChallengeablePlayers`], or a storage error.
    pub async fn challengeable(
        &self,
        guild_id: GuildId,
        user: UserId,
        now: Timestamp,
    ) -> Result<Vec<Player>, LadderError> {
        let ladder = self.store.require_member(guild_id, user).await?;
        let challenges = self.store.challenges.find_by_guild(guild_id).await?;
        if let Some(open) = outstanding(&challenges, user) {
            return Err(RuleViolation::OutstandingChallenge {
                challenged: open.challenged_id,
            }
            .into());
        }

        let players: Vec<Player> = ladder
            .challengeable_players(user, now)
            .into_iter()
            .cloned()
            .collect();
        if players.is_empty() {
            return Err(RuleViolation::NoChallengeablePlayers.into());
        }
        Ok(players)
    }

    /// Issue a challenge from `challenger` to `target`.
    ///
    /// The challenger must have no other outstanding challenge, the target
    /// must be within range, and the pair must not have an open challenge or
    /// one issued within the rematch cooldown. Sending marks the challenger
    /// active.
    ///
    /// # Errors
    ///
    /// Returns the matching [`RuleViolation`] when a rule refuses the
    /// challenge, or a storage error.
    pub async fn send(
        &self,
        guild_id: GuildId,
        challenger: UserId,
        target: UserId,
        now: Timestamp,
    ) -> Result<Challenge, LadderError> {
        let _guard = self.store.lock().await;
        let mut ladder = self.store.require_member(guild_id, challenger).await?;
        if challenger == target {
            return Err(RuleViolation::SelfChallenge.into());
        }
        if !ladder.contains(target) {
            return Err(RuleViolation::TargetNotInLadder.into());
        }

        let challenges = self.store.challenges.find_by_guild(guild_id).await?;
        if let Some(open) = outstanding(&challenges, challenger) {
            return Err(RuleViolation::OutstandingChallenge {
                challenged: open.challenged_id,
            }
            .into());
        }
        if !ladder.can_challenge(challenger, target, now) {
            return Err(RuleViolation::OutOfRange.into());
        }

        let pair: Vec<&Challenge> = challenges
            .iter()
            .filter(|c| c.is_match(challenger, target))
            .collect();
        if let Some(open) = pair.iter().find(|c| c.is_open()) {
            return Err(RuleViolation::AlreadyChallenged {
                issued_at: open.issued_at,
            }
            .into());
        }
        if let Some(recent) = pair
            .iter()
            .filter(|c| c.blocks_rematch(now))
            .max_by_key(|c| c.issued_at)
        {
            return Err(RuleViolation::RematchCooldown {
                available_at: recent.rematch_available_at(),
            }
            .into());
        }

        let challenge = self
            .store
            .challenges
            .create(Challenge::new(guild_id, challenger, target, now)?)
            .await?;
        if let Some(player) = ladder.player_mut(challenger) {
            player.touch(now);
        }
        self.store.ladders.save(ladder).await?;

        tracing::info!(
            %guild_id,
            challenge_id = %challenge.id,
            %challenger,
            challenged = %target,
            "challenge sent"
        );
        Ok(challenge)
    }

    /// Withdraw the caller's outstanding challenge.
    ///
    /// # Errors
    ///
    /// Returns [`RuleViolation::NothingToCancel`] when there is none, a
    /// membership violation, or a storage error.
    pub async fn cancel(
        &self,
        guild_id: GuildId,
        challenger: UserId,
    ) -> Result<Challenge, LadderError> {
        let _guard = self.store.lock().await;
        self.store.require_member(guild_id, challenger).await?;
        let challenges = self.store.challenges.find_by_guild(guild_id).await?;
        let challenge = outstanding(&challenges, challenger)
            .cloned()
            .ok_or(RuleViolation::NothingToCancel)?;

        self.store.reports.delete_by_challenge(challenge.id).await?;
        self.store.challenges.delete(challenge.id).await?;
        tracing::info!(%guild_id, challenge_id = %challenge.id, "challenge cancelled");
        Ok(challenge)
    }

    /// Open challenges sent and received by `user`, oldest first.
    ///
    /// # Errors
    ///
    /// Returns a membership violation or a storage error.
    pub async fn open_challenges(
        &self,
        guild_id: GuildId,
        user: UserId,
    ) -> Result<OpenChallenges, LadderError> {
        self.store.require_member(guild_id, user).await?;
        let challenges = self.store.challenges.find_by_guild(guild_id).await?;

        let mut open = OpenChallenges::default();
        for challenge in challenges.into_iter().filter(Challenge::is_open) {
            if challenge.challenger_id == user {
                open.sent.push(challenge);
            } else if challenge.challenged_id == user {
                open.received.push(challenge);
            }
        }
        Ok(open)
    }

    /// Completed challenges involving `user`, most recently completed first.
    ///
    /// # Errors
    ///
    /// Returns a membership violation or a storage error.
    pub async fn history(
        &self,
        guild_id: GuildId,
        user: UserId,
    ) -> Result<Vec<Challenge>, LadderError> {
        self.store.require_member(guild_id, user).await?;
        let mut past: Vec<Challenge> = self
            .store
            .challenges
            .find_by_guild(guild_id)
            .await?
            .into_iter()
            .filter(|c| !c.is_open() && c.involves(user))
            .collect();
        past.sort_by(|a, b| b.completed_at.cmp(&a.completed_at));
        Ok(past)
    }

    /// Report the result of the open challenge between `reporter` and
    /// `versus`. The report waits for `versus` to confirm it and confirms
    /// itself after [`auto_confirm_after`](Self::auto_confirm_after).
    /// Reporting again replaces the previous report.
    ///
    /// # Errors
    ///
    /// Returns [`RuleViolation::WinnerNotParticipant`],
    /// [`RuleViolation::NoOpenChallenge`], a validation error for a
    /// malformed score, or a storage error.
    #[allow(clippy::too_many_arguments)]
    pub async fn report(
        &self,
        guild_id: GuildId,
        channel_id: ChannelId,
        reporter: UserId,
        versus: UserId,
        winner: UserId,
        score: &str,
        now: Timestamp,
    ) -> Result<PendingReport, LadderError> {
        if winner != reporter && winner != versus {
            return Err(RuleViolation::WinnerNotParticipant.into());
        }
        let score: Score = score.parse()?;

        let _guard = self.store.lock().await;
        self.store.require_ladder(guild_id).await?;
        let challenge = self
            .store
            .challenges
            .find_by_guild(guild_id)
            .await?
            .into_iter()
            .find(|c| c.is_open() && c.is_match(reporter, versus))
            .ok_or(RuleViolation::NoOpenChallenge)?;

        let report = PendingReport::new(
            &challenge,
            channel_id,
            reporter,
            winner,
            score,
            now,
            self.auto_confirm_after,
        )?;
        let report = self.store.reports.upsert(report).await?;
        tracing::info!(
            %guild_id,
            challenge_id = %challenge.id,
            report_id = %report.id,
            %winner,
            %score,
            "result reported"
        );
        Ok(report)
    }

    /// Confirm a pending report on behalf of `user` and apply the result.
    ///
    /// # Errors
    ///
    /// Returns [`RuleViolation::AlreadyCompleted`] when the challenge was
    /// already decided, [`RuleViolation::ReportSuperseded`] when a newer
    /// report replaced this one, [`RuleViolation::NotConfirmer`] when `user`
    /// is not the expected confirmer, or a storage error.
    pub async fn confirm(
        &self,
        challenge_id: ChallengeId,
        report_id: ReportId,
        user: UserId,
        now: Timestamp,
    ) -> Result<ChallengeOutcome, LadderError> {
        let _guard = self.store.lock().await;
        let challenge = self
            .store
            .challenges
            .get_by_id(challenge_id)
            .await?
            .ok_or_else(|| NotFoundError {
                entity: "Challenge",
                id: challenge_id.to_string(),
            })?;
        if !challenge.is_open() {
            return Err(RuleViolation::AlreadyCompleted.into());
        }

        let report = self
            .store
            .reports
            .get_by_id(report_id)
            .await?
            .filter(|r| r.challenge_id == challenge_id)
            .ok_or(RuleViolation::ReportSuperseded)?;
        if report.confirmer_id != user {
            return Err(RuleViolation::NotConfirmer {
                confirmer: report.confirmer_id,
            }
            .into());
        }

        self.complete(challenge, &report, now).await
    }

    /// Confirm every report whose deadline has passed.
    ///
    /// Returns the channel each report was made in together with its
    /// outcome. A report that fails is logged and skipped.
    ///
    /// # Errors
    ///
    /// Returns a storage error when the due reports cannot be listed.
    pub async fn confirm_due(
        &self,
        now: Timestamp,
    ) -> Result<Vec<(ChannelId, ChallengeOutcome)>, LadderError> {
        let due = self.store.reports.find_due(now).await?;
        let mut outcomes = Vec::with_capacity(due.len());

        for report in due {
            match self.confirm_expired(&report, now).await {
                Ok(Some(outcome)) => outcomes.push((report.channel_id, outcome)),
                Ok(None) => {}
                Err(err) => {
                    tracing::warn!(
                        report_id = %report.id,
                        challenge_id = %report.challenge_id,
                        error = %err,
                        "failed to auto-confirm report"
                    );
                }
            }
        }
        Ok(outcomes)
    }

    async fn confirm_expired(
        &self,
        report: &PendingReport,
        now: Timestamp,
    ) -> Result<Option<ChallengeOutcome>, LadderError> {
        let _guard = self.store.lock().await;
        // The report may have been replaced or confirmed since it was listed.
        let Some(report) = self.store.reports.get_by_id(report.id).await? else {
            return Ok(None);
        };
        if !report.is_due(now) {
            return Ok(None);
        }
        let report = &report;
        let challenge = self.store.challenges.get_by_id(report.challenge_id).await?;
        match challenge {
            Some(challenge) if challenge.is_open() => {
                let outcome = self.complete(challenge, report, now).await?;
                tracing::info!(report_id = %report.id, "report auto-confirmed");
                Ok(Some(outcome))
            }
            _ => {
                self.store
                    .reports
                    .delete_by_challenge(report.challenge_id)
                    .await?;
                tracing::debug!(report_id = %report.id, "discarded report of closed challenge");
                Ok(None)
            }
        }
    }

    /// Apply a confirmed report. Callers hold the write lock.
    async fn complete(
        &self,
        mut challenge: Challenge,
        report: &PendingReport,
        now: Timestamp,
    ) -> Result<ChallengeOutcome, LadderError> {
        let mut ladder = self.store.require_ladder(challenge.guild_id).await?;
        let challenger_won = challenge.complete(report.winner_id, report.score, now)?;

        let (from_position, to_position) = if challenger_won {
            match ladder.apply_upset(challenge.challenger_id, challenge.challenged_id)? {
                Some(moved) => moved,
                None => {
                    let stay = ladder.position(challenge.challenger_id).unwrap_or_default();
                    (stay, stay)
                }
            }
        } else {
            let stay = ladder
                .position(challenge.challenged_id)
                .ok_or(RuleViolation::TargetNotInLadder)?;
            (stay, stay)
        };

        for user in [challenge.challenger_id, challenge.challenged_id] {
            if let Some(player) = ladder.player_mut(user) {
                player.touch(now);
            }
        }
        self.store.ladders.save(ladder).await?;
        let challenge = self.store.challenges.update(challenge).await?;
        self.store.reports.delete_by_challenge(challenge.id).await?;

        let winner_id = report.winner_id;
        let loser_id = challenge.opponent_of(winner_id).unwrap_or(report.loser_id());
        tracing::info!(
            challenge_id = %challenge.id,
            %winner_id,
            challenger_won,
            from_position,
            to_position,
            "challenge completed"
        );
        Ok(ChallengeOutcome {
            challenge,
            winner_id,
            loser_id,
            challenger_won,
            from_position,
            to_position,
        })
    }
}
