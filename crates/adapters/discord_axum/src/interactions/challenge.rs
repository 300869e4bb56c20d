//! `/challenge` subcommands and their components.

use ladderbot_app::ports::{ChallengeRepository, LadderRepository, ReportRepository};
use ladderbot_domain::error::{LadderError, RuleViolation};
use ladderbot_domain::id::{ChallengeId, GuildId, ReportId, UserId};
use ladderbot_domain::time::{self, Timestamp};

use crate::model::{CommandOption, Interaction, InteractionData, InteractionResponse};
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
    let ephemeral = sub.bool_option("ephemeral").unwrap_or(true);

    match sub.name.as_str() {
        "someone" => match sub.user_option("user") {
            Some(target) => send(state, guild_id, user.id, target, now).await,
            None => {
                let players = state
                    .challenge_service
                    .challengeable(guild_id, user.id, now)
                    .await?;
                Ok(InteractionResponse::message(render::challenge_select(
                    &players,
                )))
            }
        },
        "report" => report(state, interaction, data, sub, guild_id, user.id, now).await,
        "list" => {
            let open = state
                .challenge_service
                .open_challenges(guild_id, user.id)
                .await?;
            Ok(InteractionResponse::message(render::open_challenges(
                &open, ephemeral,
            )))
        }
        "history" => {
            let past = state.challenge_service.history(guild_id, user.id).await?;
            Ok(InteractionResponse::message(
                render::history(user.id, &past, 0).ephemeral(ephemeral),
            ))
        }
        "cancel" => {
            let challenge = state.challenge_service.cancel(guild_id, user.id).await?;
            Ok(InteractionResponse::message(render::challenge_cancelled(
                &challenge,
            )))
        }
        _ => Ok(super::unsupported()),
    }
}

async fn send<LR, CR, RR>(
    state: &AppState<LR, CR, RR>,
    guild_id: GuildId,
    challenger: UserId,
    target: UserId,
    now: Timestamp,
) -> Result<InteractionResponse, LadderError>
where
    LR: LadderRepository + Send + Sync + 'static,
    CR: ChallengeRepository + Send + Sync + 'static,
    RR: ReportRepository + Send + Sync + 'static,
{
    let challenge = state
        .challenge_service
        .send(guild_id, challenger, target, now)
        .await?;
    Ok(InteractionResponse::message(render::challenge_issued(
        &challenge,
    )))
}

async fn report<LR, CR, RR>(
    state: &AppState<LR, CR, RR>,
    interaction: &Interaction,
    data: &InteractionData,
    sub: &CommandOption,
    guild_id: GuildId,
    reporter: UserId,
    now: Timestamp,
) -> Result<InteractionResponse, LadderError>
where
    LR: LadderRepository + Send + Sync + 'static,
    CR: ChallengeRepository + Send + Sync + 'static,
    RR: ReportRepository + Send + Sync + 'static,
{
    let (Some(versus), Some(winner), Some(score), Some(channel_id)) = (
        sub.user_option("versus"),
        sub.user_option("winner"),
        sub.str_option("score"),
        interaction.channel_id,
    ) else {
        return Ok(super::unsupported());
    };

    let report = state
        .challenge_service
        .report(guild_id, channel_id, reporter, versus, winner, score, now)
        .await?;
    let confirmer_name = data
        .resolved_name(report.confirmer_id)
        .unwrap_or_else(|| report.confirmer_id.to_string());
    Ok(InteractionResponse::message(render::report_pending(
        &report,
        &confirmer_name,
    )))
}

/// A pick in the challenge select menu.
pub(super) async fn select<LR, CR, RR>(
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
    let Some(target) = data.values.first().and_then(|raw| raw.parse().ok()) else {
        return Ok(super::unsupported());
    };
    send(state, guild_id, user.id, target, time::now()).await
}

/// A ⏪/⏩ click on a history message.
pub(super) async fn history_page<LR, CR, RR>(
    state: &AppState<LR, CR, RR>,
    interaction: &Interaction,
    user: UserId,
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
    let past = state.challenge_service.history(guild_id, user).await?;
    Ok(InteractionResponse::update(render::history(
        user, &past, page,
    )))
}

/// The opponent's click on a report's confirm button.
pub(super) async fn confirm<LR, CR, RR>(
    state: &AppState<LR, CR, RR>,
    interaction: &Interaction,
    challenge_id: ChallengeId,
    report_id: ReportId,
) -> Result<InteractionResponse, LadderError>
where
    LR: LadderRepository + Send + Sync + 'static,
    CR: ChallengeRepository + Send + Sync + 'static,
    RR: ReportRepository + Send + Sync + 'static,
{
    let Some(user) = interaction.invoker() else {
        return Ok(super::unsupported());
    };

    match state
        .challenge_service
        .confirm(challenge_id, report_id, user.id, time::now())
        .await
    {
        Ok(outcome) => Ok(InteractionResponse::update(render::outcome(&outcome))),
        Err(LadderError::Rule(RuleViolation::AlreadyCompleted)) => {
            Ok(InteractionResponse::update(render::already_reported()))
        }
        Err(err) => Err(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::ComponentAction;
    use crate::interactions::handle;
    use crate::testing::{
        app_state, click, content, description, guild_command, join_all, subcommand,
    };
    use serde_json::json;

    const GUILD: GuildId = GuildId::new(10);

    fn report_command(reporter: u64, versus: u64, winner: u64, score: &str) -> Interaction {
        let mut data = subcommand(
            "challenge",
            "report",
            json!([
                {"name": "versus", "type": 6, "value": versus.to_string()},
                {"name": "winner", "type": 6, "value": winner.to_string()},
                {"name": "score", "type": 3, "value": score}
            ]),
        );
        data["resolved"] = json!({
            "users": {versus.to_string(): {"id": versus.to_string(), "username": format!("u{versus}")}}
        });
        guild_command(reporter, data)
    }

    fn confirm_id(response: &InteractionResponse) -> String {
        let components = response.data.as_ref().unwrap().components.as_ref().unwrap();
        components[0].components[0].custom_id.clone().unwrap()
    }

    #[tokio::test]
    async fn should_offer_select_menu_without_target() {
        let state = app_state();
        join_all(&state, &[1, 2, 3]).await;

        let response = handle(
            &state,
            &guild_command(3, subcommand("challenge", "someone", json!([]))),
        )
        .await;

        let data = response.data.unwrap();
        assert!(data.flags.is_some());
        let select = &data.components.unwrap()[0].components[0];
        assert_eq!(select.custom_id.as_deref(), Some("challenge:select"));
        let values: Vec<&str> = select.options.iter().map(|o| o.value.as_str()).collect();
        assert_eq!(values, vec!["2"]);
    }

    #[tokio::test]
    async fn should_challenge_picked_player() {
        let state = app_state();
        join_all(&state, &[1, 2]).await;

        let response = handle(
            &state,
            &click(2, json!({"custom_id": "challenge:select", "values": ["1"]})),
        )
        .await;

        assert_eq!(response.kind, 4);
        assert_eq!(content(&response), "<@1>");
        assert_eq!(description(&response), "You have been challenged by <@2>!");
    }

    #[tokio::test]
    async fn should_explain_outstanding_challenge() {
        let state = app_state();
        join_all(&state, &[1, 2, 3, 4, 5]).await;
        let target = |id: u64| {
            guild_command(
                5,
                subcommand("challenge", "someone", json!([{"name": "user", "type": 6, "value": id.to_string()}])),
            )
        };
        handle(&state, &target(4)).await;

        let response = handle(&state, &target(3)).await;

        assert_eq!(
            content(&response),
            "You have already challenged <@4>. Finish this challenge first!"
        );
    }

    #[tokio::test]
    async fn should_report_and_confirm_upset() {
        let state = app_state();
        join_all(&state, &[1, 2]).await;
        handle(
            &state,
            &guild_command(2, subcommand("challenge", "someone", json!([{"name": "user", "type": 6, "value": "1"}]))),
        )
        .await;

        let reported = handle(&state, &report_command(2, 1, 2, "3-1")).await;
        assert!(description(&reported).starts_with("<@2> has reported: <@2> 3-1 <@1>."));
        let custom_id = confirm_id(&reported);

        let wrong = handle(&state, &click(2, json!({"custom_id": custom_id}))).await;
        assert_eq!(content(&wrong), "Only <@1> can confirm this result.");

        let confirmed = handle(&state, &click(1, json!({"custom_id": custom_id}))).await;
        assert_eq!(confirmed.kind, 7);
        assert_eq!(
            description(&confirmed),
            "<@2> has defeated <@1>!\nThey have climbed from 2nd to 1st."
        );

        let ladder = state.ladder_service.get_ladder(GUILD).await.unwrap();
        assert_eq!(ladder.position(UserId::new(2)), Some(1));

        let again = handle(&state, &click(1, json!({"custom_id": custom_id}))).await;
        assert_eq!(again.kind, 7);
        assert_eq!(description(&again), "This challenge has already been reported!");
    }

    #[tokio::test]
    async fn should_reject_report_with_outside_winner() {
        let state = app_state();
        join_all(&state, &[1, 2]).await;

        let response = handle(&state, &report_command(2, 1, 9, "3-1")).await;

        assert_eq!(
            content(&response),
            "The winner must be one of the two players playing."
        );
    }

    #[tokio::test]
    async fn should_list_and_cancel_challenges() {
        let state = app_state();
        join_all(&state, &[1, 2]).await;
        handle(
            &state,
            &guild_command(2, subcommand("challenge", "someone", json!([{"name": "user", "type": 6, "value": "1"}]))),
        )
        .await;

        let listed = handle(&state, &guild_command(1, subcommand("challenge", "list", json!([])))).await;
        let fields = &listed.data.as_ref().unwrap().embeds[0].fields;
        assert_eq!(fields[0].value, "None");
        assert!(fields[1].value.starts_with("<@2> - <t:"));

        let cancelled = handle(&state, &guild_command(2, subcommand("challenge", "cancel", json!([])))).await;
        assert_eq!(
            description(&cancelled),
            "<@2> has withdrawn their challenge to <@1>."
        );

        let nothing = handle(&state, &guild_command(2, subcommand("challenge", "cancel", json!([])))).await;
        assert_eq!(content(&nothing), "You have no outstanding challenge to cancel.");
    }

    #[tokio::test]
    async fn should_page_history_on_click() {
        let state = app_state();
        join_all(&state, &[1, 2]).await;
        let action = ComponentAction::History {
            user: UserId::new(2),
            page: 0,
        };

        let response = handle(&state, &click(1, json!({"custom_id": action.to_string()}))).await;

        assert_eq!(response.kind, 7);
        assert_eq!(description(&response), "No past challenges.");
    }
}
