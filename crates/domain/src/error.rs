//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into [`LadderError`]
//! via `#[from]` (domain) or an explicit `From` impl (adapters).

use crate::id::UserId;
use crate::time::Timestamp;

/// Top-level error returned by domain logic, services and ports.
#[derive(Debug, thiserror::Error)]
pub enum LadderError {
    #[error("validation error")]
    Validation(#[from] ValidationError),

    #[error("not found")]
    NotFound(#[from] NotFoundError),

    #[error("rule violation")]
    Rule(#[from] RuleViolation),

    #[error("storage error")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Malformed input that can never be valid.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("name must not be empty")]
    EmptyName,

    #[error("score {0:?} must look like 3-1")]
    MalformedScore(String),

    #[error("a set cannot end in a tie")]
    TiedScore,
}

/// A record that was expected to exist but does not.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{entity} {id} not found")]
pub struct NotFoundError {
    pub entity: &'static str,
    pub id: String,
}

/// Well-formed input that the ladder rules refuse.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuleViolation {
    #[error("this server has no ladder")]
    NoLadder,

    #[error("player has not joined the ladder")]
    NotJoined,

    #[error("player already joined the ladder")]
    AlreadyJoined,

    #[error("target is not in the ladder")]
    TargetNotInLadder,

    #[error("a player cannot challenge themselves")]
    SelfChallenge,

    #[error("player already has an outstanding challenge against {challenged}")]
    OutstandingChallenge { challenged: UserId },

    #[error("no players are within challenge range")]
    NoChallengeablePlayers,

    #[error("target is outside the challenge range")]
    OutOfRange,

    #[error("pair already has an open challenge issued at {issued_at}")]
    AlreadyChallenged { issued_at: Timestamp },

    #[error("pair played recently, rematch available at {available_at}")]
    RematchCooldown { available_at: Timestamp },

    #[error("player has no outstanding challenge to cancel")]
    NothingToCancel,

    #[error("winner must be one of the two players")]
    WinnerNotParticipant,

    #[error("no open challenge between these players")]
    NoOpenChallenge,

    #[error("challenge already completed")]
    AlreadyCompleted,

    #[error("report was replaced by a newer one")]
    ReportSuperseded,

    #[error("only {confirmer} can confirm this report")]
    NotConfirmer { confirmer: UserId },
}
