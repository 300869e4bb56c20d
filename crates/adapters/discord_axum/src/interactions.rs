//! Interaction dispatch: routes commands and component clicks to handlers.
//!
//! Handlers return `Result<InteractionResponse, LadderError>`; errors are
//! turned into ephemeral replies by [`render::error_reply`].

mod challenge;
mod ladder;
mod misc;

use ladderbot_app::ports::{ChallengeRepository, LadderRepository, ReportRepository};
use ladderbot_domain::error::LadderError;
use ladderbot_domain::id::GuildId;

use crate::components::ComponentAction;
use crate::model::{Interaction, InteractionKind, InteractionResponse, User};
use crate::render;
use crate::state::AppState;

/// Answer one verified interaction.
pub async fn handle<LR, CR, RR>(state: &AppState<LR, CR, RR>, interaction: &Interaction) -> InteractionResponse
where
    LR: LadderRepository + Send + Sync + 'static,
    CR: ChallengeRepository + Send + Sync + 'static,
    RR: ReportRepository + Send + Sync + 'static,
{
    let result = match interaction.kind() {
        InteractionKind::Ping => return InteractionResponse::pong(),
        InteractionKind::ApplicationCommand => command(state, interaction).await,
        InteractionKind::MessageComponent => component(state, interaction).await,
        InteractionKind::Other(kind) => {
            tracing::warn!(kind, "unsupported interaction type");
            Ok(unsupported())
        }
    };
    result.unwrap_or_else(|err| render::error_reply(&err))
}

async fn command<LR, CR, RR>(
    state: &AppState<LR, CR, RR>,
    interaction: &Interaction,
) -> Result<InteractionResponse, LadderError>
where
    LR: LadderRepository + Send + Sync + 'static,
    CR: ChallengeRepository + Send + Sync + 'static,
    RR: ReportRepository + Send + Sync + 'static,
{
    let Some(data) = &interaction.data else {
        return Ok(unsupported());
    };
    tracing::debug!(command = ?data.name, "application command");

    match data.name.as_deref() {
        Some("ladder") => ladder::handle(state, interaction, data).await,
        Some("challenge") => challenge::handle(state, interaction, data).await,
        Some("help") => Ok(misc::help(data)),
        Some("faq") => Ok(misc::faq(data)),
        other => {
            tracing::warn!(command = ?other, "unknown command");
            Ok(unsupported())
        }
    }
}

async fn component<LR, CR, RR>(
    state: &AppState<LR, CR, RR>,
    interaction: &Interaction,
) -> Result<InteractionResponse, LadderError>
where
    LR: LadderRepository + Send + Sync + 'static,
    CR: ChallengeRepository + Send + Sync + 'static,
    RR: ReportRepository + Send + Sync + 'static,
{
    let Some(data) = &interaction.data else {
        return Ok(unsupported());
    };
    let action = match data.custom_id.as_deref().unwrap_or_default().parse() {
        Ok(action) => action,
        Err(err) => {
            tracing::warn!(error = %err, "unknown component");
            return Ok(unsupported());
        }
    };

    match action {
        ComponentAction::Rankings { page } => ladder::rankings_page(state, interaction, page).await,
        ComponentAction::History { user, page } => {
            challenge::history_page(state, interaction, user, page).await
        }
        ComponentAction::ChallengeSelect => challenge::select(state, interaction, data).await,
        ComponentAction::Confirm {
            challenge_id,
            report_id,
        } => challenge::confirm(state, interaction, challenge_id, report_id).await,
        ComponentAction::Faq { question } => Ok(misc::faq_answer(question)),
    }
}

/// Guild and invoking user of a guild interaction.
fn guild_context(interaction: &Interaction) -> Option<(GuildId, &User)> {
    Some((interaction.guild_id?, interaction.invoker()?))
}

fn guild_only() -> InteractionResponse {
    InteractionResponse::ephemeral_text("This command can only be used in a server.")
}

fn unsupported() -> InteractionResponse {
    InteractionResponse::ephemeral_text("Sorry, I don't know how to handle that.")
}
