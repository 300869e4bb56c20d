//! Score of a finished set, e.g. `3-1`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Games won by the winner (`high`) and the loser (`low`).
///
/// Parsing is order-insensitive: `1-3` and `3-1` are the same score. Who
/// won is carried separately, so only the two game counts matter here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    high: u8,
    low: u8,
}

impl Score {
    /// Build a score from two game counts in any order.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::TiedScore`] when both counts are equal.
    pub fn new(a: u8, b: u8) -> Result<Self, ValidationError> {
        if a == b {
            return Err(ValidationError::TiedScore);
        }
        Ok(Self {
            high: a.max(b),
            low: a.min(b),
        })
    }

    #[must_use]
    pub fn high(self) -> u8 {
        self.high
    }

    #[must_use]
    pub fn low(self) -> u8 {
        self.low
    }
}

impl FromStr for Score {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || ValidationError::MalformedScore(s.to_string());
        let &[a, b'-', b] = s.trim().as_bytes() else {
            return Err(malformed());
        };
        if !a.is_ascii_digit() || !b.is_ascii_digit() {
            return Err(malformed());
        }
        Self::new(a - b'0', b - b'0')
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.high, self.low)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_parse_winner_first_score() {
        let score: Score = "3-1".parse().unwrap();
        assert_eq!((score.high(), score.low()), (3, 1));
    }

    #[test]
    fn should_normalize_loser_first_score() {
        let score: Score = "0-3".parse().unwrap();
        assert_eq!(score.to_string(), "3-0");
    }

    #[test]
    fn should_reject_tie() {
        assert_eq!("2-2".parse::<Score>(), Err(ValidationError::TiedScore));
    }

    #[test]
    fn should_reject_malformed_input() {
        for input in ["3:1", "31", "3-10", "a-1", "", "3 - 1"] {
            assert!(
                matches!(input.parse::<Score>(), Err(ValidationError::MalformedScore(_))),
                "{input:?} should be malformed"
            );
        }
    }
}
