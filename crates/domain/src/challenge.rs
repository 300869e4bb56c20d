//! Challenge — a set between a lower-ranked challenger and a player above them.

use serde::{Deserialize, Serialize};

use crate::error::{LadderError, RuleViolation};
use crate::id::{ChallengeId, GuildId, UserId};
use crate::score::Score;
use crate::time::{Timestamp, rematch_cooldown};

/// A challenge. Open until [`Challenge::complete`] records its result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Challenge {
    pub id: ChallengeId,
    pub guild_id: GuildId,
    pub challenger_id: UserId,
    pub challenged_id: UserId,
    pub issued_at: Timestamp,
    pub completed_at: Option<Timestamp>,
    pub challenger_score: Option<u8>,
    pub challenged_score: Option<u8>,
}

/// Result of a completed challenge, as seen by the ladder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChallengeOutcome {
    pub challenge: Challenge,
    pub winner_id: UserId,
    pub loser_id: UserId,
    pub challenger_won: bool,
    /// Winner's rank before the result was applied.
    pub from_position: usize,
    /// Winner's rank after the result was applied.
    pub to_position: usize,
}

impl Challenge {
    /// Issue a new challenge at `now`.
    ///
    /// # Errors
    ///
    /// Returns [`RuleViolation::SelfChallenge`] when both sides are the same user.
    pub fn new(
        guild_id: GuildId,
        challenger_id: UserId,
        challenged_id: UserId,
        now: Timestamp,
    ) -> Result<Self, LadderError> {
        if challenger_id == challenged_id {
            return Err(RuleViolation::SelfChallenge.into());
        }
        Ok(Self {
            id: ChallengeId::new(),
            guild_id,
            challenger_id,
            challenged_id,
            issued_at: now,
            completed_at: None,
            challenger_score: None,
            challenged_score: None,
        })
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.completed_at.is_none()
    }

    /// Whether this challenge is between `a` and `b`, in either direction.
    #[must_use]
    pub fn is_match(&self, a: UserId, b: UserId) -> bool {
        (self.challenger_id == a && self.challenged_id == b)
            || (self.challenger_id == b && self.challenged_id == a)
    }

    #[must_use]
    pub fn involves(&self, user: UserId) -> bool {
        self.challenger_id == user || self.challenged_id == user
    }

    /// The other participant, if `user` is one of them.
    #[must_use]
    pub fn opponent_of(&self, user: UserId) -> Option<UserId> {
        if self.challenger_id == user {
            Some(self.challenged_id)
        } else if self.challenged_id == user {
            Some(self.challenger_id)
        } else {
            None
        }
    }

    /// When the same pair may play again.
    #[must_use]
    pub fn rematch_available_at(&self) -> Timestamp {
        self.issued_at + rematch_cooldown()
    }

    /// Whether the rematch cooldown is still running at `now`.
    #[must_use]
    pub fn blocks_rematch(&self, now: Timestamp) -> bool {
        self.rematch_available_at() > now
    }

    /// Record the result. The winner is credited with `score.high()`.
    ///
    /// Returns `true` when the challenger won.
    ///
    /// # Errors
    ///
    /// Returns [`RuleViolation::AlreadyCompleted`] on a second completion and
    /// [`RuleViolation::WinnerNotParticipant`] when `winner` did not play.
    pub fn complete(
        &mut self,
        winner: UserId,
        score: Score,
        now: Timestamp,
    ) -> Result<bool, LadderError> {
        if !self.is_open() {
            return Err(RuleViolation::AlreadyCompleted.into());
        }
        if !self.involves(winner) {
            return Err(RuleViolation::WinnerNotParticipant.into());
        }

        let challenger_won = winner == self.challenger_id;
        let (challenger_score, challenged_score) = if challenger_won {
            (score.high(), score.low())
        } else {
            (score.low(), score.high())
        };
        self.challenger_score = Some(challenger_score);
        self.challenged_score = Some(challenged_score);
        self.completed_at = Some(now);
        Ok(challenger_won)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn t0() -> Timestamp {
        Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
    }

    fn challenge() -> Challenge {
        Challenge::new(GuildId::new(1), UserId::new(20), UserId::new(10), t0()).unwrap()
    }

    #[test]
    fn should_reject_self_challenge() {
        let result = Challenge::new(GuildId::new(1), UserId::new(5), UserId::new(5), t0());
        assert!(matches!(
            result,
            Err(LadderError::Rule(RuleViolation::SelfChallenge))
        ));
    }

    #[test]
    fn should_match_pair_in_either_order() {
        let c = challenge();
        assert!(c.is_match(UserId::new(20), UserId::new(10)));
        assert!(c.is_match(UserId::new(10), UserId::new(20)));
        assert!(!c.is_match(UserId::new(10), UserId::new(30)));
    }

    #[test]
    fn should_find_opponent() {
        let c = challenge();
        assert_eq!(c.opponent_of(UserId::new(10)), Some(UserId::new(20)));
        assert_eq!(c.opponent_of(UserId::new(99)), None);
    }

    #[test]
    fn should_credit_challenger_when_challenger_wins() {
        let mut c = challenge();
        let won = c
            .complete(UserId::new(20), "1-3".parse().unwrap(), t0())
            .unwrap();
        assert!(won);
        assert_eq!(c.challenger_score, Some(3));
        assert_eq!(c.challenged_score, Some(1));
        assert!(!c.is_open());
    }

    #[test]
    fn should_credit_defender_when_defender_wins() {
        let mut c = challenge();
        let won = c
            .complete(UserId::new(10), "3-2".parse().unwrap(), t0())
            .unwrap();
        assert!(!won);
        assert_eq!(c.challenger_score, Some(2));
        assert_eq!(c.challenged_score, Some(3));
    }

    #[test]
    fn should_reject_second_completion() {
        let mut c = challenge();
        c.complete(UserId::new(10), "3-0".parse().unwrap(), t0())
            .unwrap();
        let again = c.complete(UserId::new(20), "3-0".parse().unwrap(), t0());
        assert!(matches!(
            again,
            Err(LadderError::Rule(RuleViolation::AlreadyCompleted))
        ));
    }

    #[test]
    fn should_reject_outside_winner() {
        let mut c = challenge();
        let result = c.complete(UserId::new(99), "3-0".parse().unwrap(), t0());
        assert!(matches!(
            result,
            Err(LadderError::Rule(RuleViolation::WinnerNotParticipant))
        ));
    }

    #[test]
    fn should_block_rematch_for_one_week() {
        let c = challenge();
        assert!(c.blocks_rematch(t0() + Duration::days(6)));
        assert!(!c.blocks_rematch(t0() + Duration::days(7)));
    }
}
