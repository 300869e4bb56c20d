//! Player — a Discord user who has joined a server's ladder.

use serde::{Deserialize, Serialize};

use crate::error::{LadderError, ValidationError};
use crate::id::UserId;
use crate::time::{Timestamp, activity_window};

/// A ladder member. The player's rank is their index in the
/// [`Ladder`](crate::ladder::Ladder), not a field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub user_id: UserId,
    /// Display name captured when the player last interacted. Used where
    /// Discord cannot render a mention, such as select-menu labels.
    pub name: String,
    pub joined_at: Timestamp,
    pub last_active_at: Timestamp,
}

impl Player {
    /// Create a player who joins (and is active) at `now`.
    ///
    /// # Errors
    ///
    /// Returns [`LadderError::Validation`] when `name` is empty.
    pub fn new(user_id: UserId, name: impl Into<String>, now: Timestamp) -> Result<Self, LadderError> {
        let player = Self {
            user_id,
            name: name.into(),
            joined_at: now,
            last_active_at: now,
        };
        player.validate()?;
        Ok(player)
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`LadderError::Validation`] when `name` is empty.
    pub fn validate(&self) -> Result<(), LadderError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyName.into());
        }
        Ok(())
    }

    /// A player stays active for one activity window after their last
    /// challenge activity.
    #[must_use]
    pub fn is_active(&self, now: Timestamp) -> bool {
        self.last_active_at + activity_window() > now
    }

    /// Record challenge activity at `now`.
    pub fn touch(&mut self, now: Timestamp) {
        if now > self.last_active_at {
            self.last_active_at = now;
        }
    }
}
