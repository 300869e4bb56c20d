//! Notifier port — announcements that are not replies to an interaction.

use std::future::Future;

use ladderbot_domain::challenge::ChallengeOutcome;
use ladderbot_domain::error::LadderError;
use ladderbot_domain::id::ChannelId;

/// Posts messages to a chat channel on the bot's own initiative.
pub trait Notifier {
    /// Announce the outcome of a challenge that confirmed itself.
    fn announce_outcome(
        &self,
        channel_id: ChannelId,
        outcome: &ChallengeOutcome,
    ) -> impl Future<Output = Result<(), LadderError>> + Send;
}
