//! Ladder — the ordered ranking of a server's players.
//!
//! Rank 1 is `players[0]`. New players join at the bottom and climb by
//! beating players above them.

use serde::{Deserialize, Serialize};

use crate::error::{LadderError, RuleViolation};
use crate::id::{GuildId, UserId};
use crate::player::Player;
use crate::time::Timestamp;

/// Number of players shown per rankings page.
pub const PLAYERS_PER_PAGE: usize = 10;

/// How many active players above `position` (1-based) may be challenged.
///
/// | position | range |
/// |----------|-------|
/// | 1        | 0     |
/// | 2–4      | 1     |
/// | 5–8      | 2     |
/// | 9–16     | 3     |
/// | 17–32    | 4     |
#[must_use]
pub fn challenge_range(position: usize) -> usize {
    match position {
        0 | 1 => 0,
        p => ((p - 1).ilog2() as usize).max(1),
    }
}

/// A server's ladder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ladder {
    pub guild_id: GuildId,
    pub created_at: Timestamp,
    pub players: Vec<Player>,
}

/// A player together with their 1-based rank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedPlayer {
    pub position: usize,
    pub player: Player,
}

/// One page of the rankings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankingPage {
    /// 0-based page index, clamped to the last page.
    pub index: usize,
    /// Total number of pages; at least 1.
    pub page_count: usize,
    pub entries: Vec<RankedPlayer>,
}

impl RankingPage {
    #[must_use]
    pub fn has_previous(&self) -> bool {
        self.index > 0
    }

    #[must_use]
    pub fn has_next(&self) -> bool {
        self.index + 1 < self.page_count
    }
}

impl Ladder {
    /// Create an empty ladder.
    #[must_use]
    pub fn new(guild_id: GuildId, now: Timestamp) -> Self {
        Self {
            guild_id,
            created_at: now,
            players: Vec::new(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.players.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// 1-based rank of `user`, if they joined.
    #[must_use]
    pub fn position(&self, user: UserId) -> Option<usize> {
        self.players
            .iter()
            .position(|p| p.user_id == user)
            .map(|index| index + 1)
    }

    #[must_use]
    pub fn contains(&self, user: UserId) -> bool {
        self.position(user).is_some()
    }

    #[must_use]
    pub fn player(&self, user: UserId) -> Option<&Player> {
        self.players.iter().find(|p| p.user_id == user)
    }

    pub fn player_mut(&mut self, user: UserId) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.user_id == user)
    }

    /// Append `player` at the bottom and return the new player count.
    ///
    /// # Errors
    ///
    /// Returns [`RuleViolation::AlreadyJoined`] when the user is already in
    /// the ladder.
    pub fn join(&mut self, player: Player) -> Result<usize, LadderError> {
        if self.contains(player.user_id) {
            return Err(RuleViolation::AlreadyJoined.into());
        }
        self.players.push(player);
        Ok(self.players.len())
    }

    /// Remove `user` and return their record. Everyone below moves up one rank.
    ///
    /// # Errors
    ///
    /// Returns [`RuleViolation::NotJoined`] when the user is not in the ladder.
    pub fn leave(&mut self, user: UserId) -> Result<Player, LadderError> {
        let index = self
            .players
            .iter()
            .position(|p| p.user_id == user)
            .ok_or(RuleViolation::NotJoined)?;
        Ok(self.players.remove(index))
    }

    /// Players `user` may challenge, top to bottom.
    ///
    /// Walks upward from the rung directly above `user`. Active players use
    /// up one unit of [`challenge_range`]; inactive players are included
    /// but cost nothing, so they can be skipped over.
    #[must_use]
    pub fn challengeable_players(&self, user: UserId, now: Timestamp) -> Vec<&Player> {
        let Some(position) = self.position(user) else {
            return Vec::new();
        };

        let mut remaining = challenge_range(position);
        let mut found = Vec::new();
        for candidate in self.players[..position - 1].iter().rev() {
            if remaining == 0 {
                break;
            }
            found.push(candidate);
            if candidate.is_active(now) {
                remaining -= 1;
            }
        }
        found.reverse();
        found
    }

    /// Whether `challenger` may challenge `target` right now.
    #[must_use]
    pub fn can_challenge(&self, challenger: UserId, target: UserId, now: Timestamp) -> bool {
        self.challengeable_players(challenger, now)
            .iter()
            .any(|p| p.user_id == target)
    }

    /// Swap `challenger` with `challenged` after an upset.
    ///
    /// Returns the challenger's `(from, to)` ranks, or `None` when the
    /// challenger is already ranked above the challenged player.
    ///
    /// # Errors
    ///
    /// Returns [`RuleViolation::NotJoined`] when either player left the ladder.
    pub fn apply_upset(
        &mut self,
        challenger: UserId,
        challenged: UserId,
    ) -> Result<Option<(usize, usize)>, LadderError> {
        let from = self.position(challenger).ok_or(RuleViolation::NotJoined)?;
        let to = self
            .position(challenged)
            .ok_or(RuleViolation::TargetNotInLadder)?;
        if from <= to {
            return Ok(None);
        }
        self.players.swap(from - 1, to - 1);
        Ok(Some((from, to)))
    }

    /// Number of rankings pages; an empty ladder still has one page.
    #[must_use]
    pub fn page_count(&self) -> usize {
        self.players.len().div_ceil(PLAYERS_PER_PAGE).max(1)
    }

    /// Return page `index` (0-based), clamped to the last page.
    #[must_use]
    pub fn page(&self, index: usize) -> RankingPage {
        let page_count = self.page_count();
        let index = index.min(page_count - 1);
        let entries = self
            .players
            .iter()
            .enumerate()
            .skip(index * PLAYERS_PER_PAGE)
            .take(PLAYERS_PER_PAGE)
            .map(|(i, player)| RankedPlayer {
                position: i + 1,
                player: player.clone(),
            })
            .collect();

        RankingPage {
            index,
            page_count,
            entries,
        }
    }
}
