//! Pending report — a reported result waiting for the opponent's confirmation.

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::challenge::Challenge;
use crate::error::{LadderError, RuleViolation};
use crate::id::{ChannelId, ChallengeId, GuildId, ReportId, UserId};
use crate::score::Score;
use crate::time::Timestamp;

/// Hours after which an unconfirmed report confirms itself.
pub const DEFAULT_AUTO_CONFIRM_HOURS: i64 = 12;

/// A result reported by one participant. The other participant confirms
/// it, or it confirms itself once `confirm_after` has passed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingReport {
    pub id: ReportId,
    pub challenge_id: ChallengeId,
    pub guild_id: GuildId,
    /// Channel the report was made in; auto-confirmations are announced there.
    pub channel_id: ChannelId,
    pub reporter_id: UserId,
    pub confirmer_id: UserId,
    pub winner_id: UserId,
    pub score: Score,
    pub reported_at: Timestamp,
    pub confirm_after: Timestamp,
}

impl PendingReport {
    /// Build a report for `challenge` filed by `reporter`.
    ///
    /// # Errors
    ///
    /// Returns [`RuleViolation::NoOpenChallenge`] when `reporter` is not a
    /// participant and [`RuleViolation::WinnerNotParticipant`] when `winner`
    /// is not.
    pub fn new(
        challenge: &Challenge,
        channel_id: ChannelId,
        reporter: UserId,
        winner: UserId,
        score: Score,
        now: Timestamp,
        auto_confirm_after: Duration,
    ) -> Result<Self, LadderError> {
        let confirmer = challenge
            .opponent_of(reporter)
            .ok_or(RuleViolation::NoOpenChallenge)?;
        if !challenge.involves(winner) {
            return Err(RuleViolation::WinnerNotParticipant.into());
        }

        Ok(Self {
            id: ReportId::new(),
            challenge_id: challenge.id,
            guild_id: challenge.guild_id,
            channel_id,
            reporter_id: reporter,
            confirmer_id: confirmer,
            winner_id: winner,
            score,
            reported_at: now,
            confirm_after: now + auto_confirm_after,
        })
    }

    /// Whether the auto-confirm deadline has passed.
    #[must_use]
    pub fn is_due(&self, now: Timestamp) -> bool {
        self.confirm_after <= now
    }

    #[must_use]
    pub fn loser_id(&self) -> UserId {
        if self.winner_id == self.reporter_id {
            self.confirmer_id
        } else {
            self.reporter_id
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn t0() -> Timestamp {
        Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
    }

    fn challenge() -> Challenge {
        Challenge::new(GuildId::new(1), UserId::new(20), UserId::new(10), t0()).unwrap()
    }

    fn report(reporter: u64, winner: u64) -> Result<PendingReport, LadderError> {
        PendingReport::new(
            &challenge(),
            ChannelId::new(7),
            UserId::new(reporter),
            UserId::new(winner),
            "3-1".parse().unwrap(),
            t0(),
            Duration::hours(DEFAULT_AUTO_CONFIRM_HOURS),
        )
    }

    #[test]
    fn should_make_opponent_the_confirmer() {
        let r = report(10, 10).unwrap();
        assert_eq!(r.confirmer_id, UserId::new(20));
        assert_eq!(r.loser_id(), UserId::new(20));
    }

    #[test]
    fn should_become_due_after_deadline() {
        let r = report(20, 10).unwrap();
        assert!(!r.is_due(t0() + Duration::hours(11)));
        assert!(r.is_due(t0() + Duration::hours(12)));
        assert_eq!(r.loser_id(), UserId::new(20));
    }

    #[test]
    fn should_reject_outsider_reporter() {
        assert!(matches!(
            report(99, 10),
            Err(LadderError::Rule(RuleViolation::NoOpenChallenge))
        ));
    }

    #[test]
    fn should_reject_outsider_winner() {
        assert!(matches!(
            report(20, 99),
            Err(LadderError::Rule(RuleViolation::WinnerNotParticipant))
        ));
    }
}
