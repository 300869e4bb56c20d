//! `/ladder` subcommands and the rankings pager.

use ladderbot_app::ports::{ChallengeRepository, LadderRepository, ReportRepository};
use ladderbot_domain::error::{LadderError, RuleViolation};
use ladderbot_domain::id::GuildId;
use ladderbot_domain::time::{self, Timestamp};

use crate::model::{
    ADMINISTRATOR, CommandOption, Interaction, InteractionData, InteractionResponse, MANAGE_GUILD,
};
use crate::render;
use crate::state::AppState;

pub(super) async fn handle<LR, CR, RR>(
    state: &AppState<LR, CR, RR>,
    interaction: &Interaction,
    data: &InteractionData,
) -> Result<InteractionResponse, LadderError>
where
    LR: LadderRepository + Send + Sync + 'static,
    CR: ChallengeRepository + Send + Sync + 'static,
    RR: ReportRepository + Send + Sync + 'static,
{
    let Some((guild_id, user)) = super::guild_context(interaction) else {
        return Ok(super::guild_only());
    };
    let Some(sub) = data.subcommand() else {
        return Ok(super::unsupported());
    };
    let now = time::now();

    match sub.name.as_str() {
        "create" => create(state, interaction, guild_id, sub, now).await,
        "join" => {
            let name = interaction
                .invoker_name()
                .unwrap_or_else(|| user.username.clone());
            let count = state
                .ladder_service
                .join(guild_id, user.id, &name, now)
                .await?;
            Ok(InteractionResponse::message(render::player_joined(
                user.id, count,
            )))
        }
        "leave" => match state.ladder_service.leave(guild_id, user.id).await {
            Ok(count) => Ok(InteractionResponse::message(render::player_left(
                user.id, count,
            ))),
            Err(LadderError::Rule(RuleViolation::NotJoined)) => Ok(
                InteractionResponse::ephemeral_text("You are not in this server's ladder."),
            ),
            Err(err) => Err(err),
        },
        "rankings" => {
            let page = state.ladder_service.rankings(guild_id, 0).await?;
            Ok(InteractionResponse::message(render::rankings(&page, now)))
        }
        "activate" => {
            let player = state.ladder_service.activate(guild_id, user.id, now).await?;
            Ok(InteractionResponse::message(render::player_activated(
                &player,
            )))
        }
        _ => Ok(super::unsupported()),
    }
}

async fn create<LR, CR, RR>(
    state: &AppState<LR, CR, RR>,
    interaction: &Interaction,
    guild_id: GuildId,
    sub: &CommandOption,
    now: Timestamp,
) -> Result<InteractionResponse, LadderError>
where
    LR: LadderRepository + Send + Sync + 'static,
    CR: ChallengeRepository + Send + Sync + 'static,
    RR: ReportRepository + Send + Sync + 'static,
{
    if interaction.permissions() & (MANAGE_GUILD | ADMINISTRATOR) == 0 {
        return Ok(InteractionResponse::ephemeral_text(
            "You need the Manage Server permission to create a ladder.",
        ));
    }
    if !sub.bool_option("are_you_sure").unwrap_or(false) {
        return Ok(InteractionResponse::ephemeral_text("Are you sure?"));
    }

    state.ladder_service.create_ladder(guild_id, now).await?;
    Ok(InteractionResponse::message(render::ladder_created()))
}

/// A ⏪/⏩ click on a rankings message.
pub(super) async fn rankings_page<LR, CR, RR>(
    state: &AppState<LR, CR, RR>,
    interaction: &Interaction,
    page: usize,
) -> Result<InteractionResponse, LadderError>
where
    LR: LadderRepository + Send + Sync + 'static,
    CR: ChallengeRepository + Send + Sync + 'static,
    RR: ReportRepository + Send + Sync + 'static,
{
    let Some(guild_id) = interaction.guild_id else {
        return Ok(super::guild_only());
    };
    let page = state.ladder_service.rankings(guild_id, page).await?;
    Ok(InteractionResponse::update(render::rankings(
        &page,
        time::now(),
    )))
}
