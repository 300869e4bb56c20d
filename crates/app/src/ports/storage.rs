//! Storage port — repository traits for persistence.

use std::future::Future;

use ladderbot_domain::challenge::Challenge;
use ladderbot_domain::error::LadderError;
use ladderbot_domain::id::{ChallengeId, GuildId, ReportId};
use ladderbot_domain::ladder::Ladder;
use ladderbot_domain::report::PendingReport;
use ladderbot_domain::time::Timestamp;

/// Repository for each server's [`Ladder`], players included.
pub trait LadderRepository {
    /// Get the ladder of a guild, with players in rank order.
    fn get(&self, guild_id: GuildId)
    -> impl Future<Output = Result<Option<Ladder>, LadderError>> + Send;

    /// Insert or replace a ladder and its full player list.
    fn save(&self, ladder: Ladder) -> impl Future<Output = Result<Ladder, LadderError>> + Send;

    /// Delete a guild's ladder and its players. Missing ladders are ignored.
    fn delete(&self, guild_id: GuildId) -> impl Future<Output = Result<(), LadderError>> + Send;
}

/// Repository for persisting and querying [`Challenge`]s.
pub trait ChallengeRepository {
    /// Persist a new challenge.
    fn create(
        &self,
        challenge: Challenge,
    ) -> impl Future<Output = Result<Challenge, LadderError>> + Send;

    /// Get a challenge by its unique identifier.
    fn get_by_id(
        &self,
        id: ChallengeId,
    ) -> impl Future<Output = Result<Option<Challenge>, LadderError>> + Send;

    /// All challenges of a guild, open and completed, oldest first.
    fn find_by_guild(
        &self,
        guild_id: GuildId,
    ) -> impl Future<Output = Result<Vec<Challenge>, LadderError>> + Send;

    /// Update an existing challenge.
    fn update(
        &self,
        challenge: Challenge,
    ) -> impl Future<Output = Result<Challenge, LadderError>> + Send;

    /// Delete a challenge by its unique identifier.
    fn delete(&self, id: ChallengeId) -> impl Future<Output = Result<(), LadderError>> + Send;

    /// Delete every challenge of a guild.
    fn delete_by_guild(
        &self,
        guild_id: GuildId,
    ) -> impl Future<Output = Result<(), LadderError>> + Send;
}

/// Repository for [`PendingReport`]s. At most one report exists per challenge.
pub trait ReportRepository {
    /// Store a report, replacing any earlier report for the same challenge.
    fn upsert(
        &self,
        report: PendingReport,
    ) -> impl Future<Output = Result<PendingReport, LadderError>> + Send;

    /// Get a report by its unique identifier.
    fn get_by_id(
        &self,
        id: ReportId,
    ) -> impl Future<Output = Result<Option<PendingReport>, LadderError>> + Send;

    /// Reports whose `confirm_after` is at or before `now`, oldest deadline first.
    fn find_due(
        &self,
        now: Timestamp,
    ) -> impl Future<Output = Result<Vec<PendingReport>, LadderError>> + Send;

    /// Delete the report of a challenge, if any.
    fn delete_by_challenge(
        &self,
        challenge_id: ChallengeId,
    ) -> impl Future<Output = Result<(), LadderError>> + Send;

    /// Delete every report of a guild.
    fn delete_by_guild(
        &self,
        guild_id: GuildId,
    ) -> impl Future<Output = Result<(), LadderError>> + Send;
}
