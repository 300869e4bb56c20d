//! `custom_id` encoding for message components.
//!
//! Every click carries what it needs in its `custom_id`, so the endpoint
//! keeps no per-message state.

use std::fmt;
use std::str::FromStr;

use ladderbot_domain::id::{ChallengeId, ReportId, UserId};

/// Number of FAQ buttons.
pub const FAQ_COUNT: u8 = 4;

/// A component action decoded from its `custom_id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentAction {
    /// Show this page of the rankings.
    Rankings { page: usize },
    /// Show this page of `user`'s past challenges.
    History { user: UserId, page: usize },
    /// Challenge the player picked in the select menu.
    ChallengeSelect,
    /// Confirm a reported result.
    Confirm {
        challenge_id: ChallengeId,
        report_id: ReportId,
    },
    /// Answer FAQ question `n` (1-based).
    Faq { question: u8 },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown component id {0:?}")]
pub struct UnknownComponent(pub String);

impl fmt::Display for ComponentAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rankings { page } => write!(f, "rankings:{page}"),
            Self::History { user, page } => write!(f, "history:{user}:{page}"),
            Self::ChallengeSelect => f.write_str("challenge:select"),
            Self::Confirm {
                challenge_id,
                report_id,
            } => write!(f, "confirm:{challenge_id}:{report_id}"),
            Self::Faq { question } => write!(f, "faq:{question}"),
        }
    }
}

impl FromStr for ComponentAction {
    type Err = UnknownComponent;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let unknown = || UnknownComponent(raw.to_string());
        let parts: Vec<&str> = raw.split(':').collect();

        match parts.as_slice() {
            ["rankings", page] => Ok(Self::Rankings {
                page: page.parse().map_err(|_| unknown())?,
            }),
            ["history", user, page] => Ok(Self::History {
                user: user.parse().map_err(|_| unknown())?,
                page: page.parse().map_err(|_| unknown())?,
            }),
            ["challenge", "select"] => Ok(Self::ChallengeSelect),
            ["confirm", challenge_id, report_id] => Ok(Self::Confirm {
                challenge_id: challenge_id.parse().map_err(|_| unknown())?,
                report_id: report_id.parse().map_err(|_| unknown())?,
            }),
            ["faq", question] => match question.parse() {
                Ok(question) if (1..=FAQ_COUNT).contains(&question) => Ok(Self::Faq { question }),
                _ => Err(unknown()),
            },
            _ => Err(unknown()),
        }
    }
}
