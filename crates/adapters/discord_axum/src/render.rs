//! Message rendering: turns service results into Discord messages.

use ladderbot_app::services::challenge_service::OpenChallenges;
use ladderbot_domain::challenge::{Challenge, ChallengeOutcome};
use ladderbot_domain::error::{LadderError, RuleViolation, ValidationError};
use ladderbot_domain::id::UserId;
use ladderbot_domain::ladder::RankingPage;
use ladderbot_domain::player::Player;
use ladderbot_domain::report::PendingReport;
use ladderbot_domain::time::Timestamp;

use crate::components::{ComponentAction, FAQ_COUNT};
use crate::model::{Component, Embed, InteractionResponse, MessagePayload, SelectOption};

/// Past challenges shown per history page.
pub const HISTORY_PER_PAGE: usize = 10;

/// Discord caps select menus at 25 options.
const MAX_SELECT_OPTIONS: usize = 25;

const GENERIC_FAILURE: &str = "Something went wrong. Please try again later.";

#[must_use]
pub fn mention(user: UserId) -> String {
    format!("<@{user}>")
}

/// Discord timestamp markup shown as "in 3 days" / "2 hours ago".
#[must_use]
pub fn relative_time(ts: Timestamp) -> String {
    format!("<t:{}:R>", ts.timestamp())
}

/// `1` → `1st`, `12` → `12th`, `23` → `23rd`.
#[must_use]
pub fn ordinal(n: usize) -> String {
    let suffix = match (n % 10, n % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{n}{suffix}")
}

#[must_use]
pub fn rule_message(rule: &RuleViolation) -> String {
    match rule {
        RuleViolation::NoLadder => {
            "This server does not have a ladder yet. Use the `/ladder create` command!".into()
        }
        RuleViolation::NotJoined => {
            "You have not joined this server's ladder yet. Use the `/ladder join` command!".into()
        }
        RuleViolation::AlreadyJoined => "You have already joined this server's ladder.".into(),
        RuleViolation::TargetNotInLadder => "This user is not in this server's ladder!".into(),
        RuleViolation::SelfChallenge => "You cannot challenge yourself!".into(),
        RuleViolation::OutstandingChallenge { challenged } => format!(
            "You have already challenged {}. Finish this challenge first!",
            mention(*challenged)
        ),
        RuleViolation::NoChallengeablePlayers => "There are no users for you to challenge!".into(),
        RuleViolation::OutOfRange => {
            "This user is not within your challenge range! Use `/faq` to see who you can challenge."
                .into()
        }
        RuleViolation::AlreadyChallenged { issued_at } => format!(
            "You have already challenged this user {}!",
            relative_time(*issued_at)
        ),
        RuleViolation::RematchCooldown { available_at } => format!(
            "You have already played this user in the past week. You can challenge this user again {}!",
            relative_time(*available_at)
        ),
        RuleViolation::NothingToCancel => "You have no outstanding challenge to cancel.".into(),
        RuleViolation::WinnerNotParticipant => {
            "The winner must be one of the two players playing.".into()
        }
        RuleViolation::NoOpenChallenge => "Could not find a challenge for that user!".into(),
        RuleViolation::AlreadyCompleted => "This challenge has already been reported!".into(),
        RuleViolation::ReportSuperseded => {
            "This result was replaced by a newer report. Confirm the latest one instead.".into()
        }
        RuleViolation::NotConfirmer { confirmer } => {
            format!("Only {} can confirm this result.", mention(*confirmer))
        }
    }
}

fn validation_message(err: &ValidationError) -> String {
    match err {
        ValidationError::EmptyName => "Your name could not be read. Please try again.".into(),
        ValidationError::MalformedScore(_) => {
            "Scores must look like `3-1`: the games won by each player.".into()
        }
        ValidationError::TiedScore => "A best of 5 set cannot end in a tie.".into(),
    }
}

/// Ephemeral reply explaining why a request was refused.
///
/// Storage failures are logged and answered with a generic message.
#[must_use]
pub fn error_reply(err: &LadderError) -> InteractionResponse {
    let message = match err {
        LadderError::Rule(rule) => rule_message(rule),
        LadderError::Validation(err) => validation_message(err),
        LadderError::NotFound(err) => {
            tracing::debug!(error = %err, "interaction referenced a missing record");
            "That challenge no longer exists.".into()
        }
        LadderError::Storage(source) => {
            tracing::error!(error = %err, source = %source, "interaction failed");
            GENERIC_FAILURE.into()
        }
    };
    InteractionResponse::ephemeral_text(message)
}

// ---------------------------------------------------------------------------
// Ladder
// ---------------------------------------------------------------------------

#[must_use]
pub fn ladder_created() -> MessagePayload {
    MessagePayload::embed(
        Embed::new("Ladder Created!")
            .description("Use the `/ladder join` command to join this server's ladder!"),
    )
}

#[must_use]
pub fn player_joined(user: UserId, count: usize) -> MessagePayload {
    MessagePayload::embed(Embed::new("New Player!").description(format!(
        "**{} has joined this server's ladder!**\nThere are now {count} players in this ladder.",
        mention(user)
    )))
}

#[must_use]
pub fn player_left(user: UserId, count: usize) -> MessagePayload {
    MessagePayload::embed(Embed::new("Player Left!").description(format!(
        "**{} has left this server's ladder!**\n\nThere are now {count} players in this ladder.",
        mention(user)
    )))
}

#[must_use]
pub fn player_activated(player: &Player) -> MessagePayload {
    MessagePayload::embed(Embed::new("Active!").description(format!(
        "{} is active again. Players below can no longer skip over you.",
        mention(player.user_id)
    )))
    .ephemeral(true)
}

/// Rankings page with ⏪/⏩ pager buttons.
#[must_use]
pub fn rankings(page: &RankingPage, now: Timestamp) -> MessagePayload {
    if page.entries.is_empty() {
        return MessagePayload::embed(
            Embed::new("Rankings")
                .description("This server's ladder is empty.\nUse the `/ladder join` command!"),
        )
        .with_components(Vec::new());
    }

    let mut description = page
        .entries
        .iter()
        .map(|entry| {
            let inactive = if entry.player.is_active(now) {
                ""
            } else {
                " (INACTIVE)"
            };
            format!(
                "**{}.** {}{inactive}",
                entry.position,
                mention(entry.player.user_id)
            )
        })
        .collect::<Vec<_>>()
        .join("\n");
    description.push_str(&format!(
        "\n\nPage {}/{}",
        page.index + 1,
        page.page_count
    ));

    let pager = pager(
        page.index,
        page.has_previous(),
        page.has_next(),
        |page| ComponentAction::Rankings { page },
    );
    MessagePayload::embed(Embed::new("Rankings").description(description))
        .with_components(vec![pager])
}

fn pager(
    index: usize,
    has_previous: bool,
    has_next: bool,
    action: impl Fn(usize) -> ComponentAction,
) -> Component {
    Component::action_row(vec![
        Component::button(action(index.saturating_sub(1)).to_string())
            .emoji("⏪")
            .disabled(!has_previous),
        Component::button(action(index + 1).to_string())
            .emoji("⏩")
            .disabled(!has_next),
    ])
}

// ---------------------------------------------------------------------------
// Challenges
// ---------------------------------------------------------------------------

/// Public announcement pinging the challenged player.
#[must_use]
pub fn challenge_issued(challenge: &Challenge) -> MessagePayload {
    MessagePayload::embed(Embed::new("Challenge!").description(format!(
        "You have been challenged by {}!",
        mention(challenge.challenger_id)
    )))
    .with_content(mention(challenge.challenged_id))
    .mentioning(vec![challenge.challenged_id])
}

/// Ephemeral select menu listing the players the caller may challenge.
#[must_use]
pub fn challenge_select(players: &[Player]) -> MessagePayload {
    let options = players
        .iter()
        .take(MAX_SELECT_OPTIONS)
        .map(|player| SelectOption {
            label: player.name.clone(),
            value: player.user_id.to_string(),
            description: None,
        })
        .collect();
    let select = Component::string_select(
        ComponentAction::ChallengeSelect.to_string(),
        "Select player to challenge",
        options,
    );
    MessagePayload::default()
        .with_components(vec![Component::action_row(vec![select])])
        .ephemeral(true)
}

#[must_use]
pub fn challenge_cancelled(challenge: &Challenge) -> MessagePayload {
    MessagePayload::embed(Embed::new("Challenge Cancelled").description(format!(
        "{} has withdrawn their challenge to {}.",
        mention(challenge.challenger_id),
        mention(challenge.challenged_id)
    )))
}

fn lines_or_none(lines: Vec<String>) -> String {
    if lines.is_empty() {
        "None".into()
    } else {
        lines.join("\n")
    }
}

#[must_use]
pub fn open_challenges(open: &OpenChallenges, ephemeral: bool) -> MessagePayload {
    let sent = open
        .sent
        .iter()
        .map(|c| format!("{} - {}", mention(c.challenged_id), relative_time(c.issued_at)))
        .collect();
    let received = open
        .received
        .iter()
        .map(|c| format!("{} - {}", mention(c.challenger_id), relative_time(c.issued_at)))
        .collect();

    MessagePayload::embed(
        Embed::new("Challenges")
            .field("Challenging:", lines_or_none(sent))
            .field("Challenged by:", lines_or_none(received)),
    )
    .ephemeral(ephemeral)
}

/// One page of `user`'s completed challenges, newest first.
#[must_use]
pub fn history(user: UserId, past: &[Challenge], page: usize) -> MessagePayload {
    let page_count = past.len().div_ceil(HISTORY_PER_PAGE).max(1);
    let index = page.min(page_count - 1);

    let lines: Vec<String> = past
        .iter()
        .skip(index * HISTORY_PER_PAGE)
        .take(HISTORY_PER_PAGE)
        .map(|c| {
            format!(
                "{} {}-{} {} - {}",
                mention(c.challenger_id),
                c.challenger_score.unwrap_or_default(),
                c.challenged_score.unwrap_or_default(),
                mention(c.challenged_id),
                c.completed_at.map(relative_time).unwrap_or_default()
            )
        })
        .collect();

    let description = if lines.is_empty() {
        "No past challenges.".to_string()
    } else {
        format!("{}\n\nPage {}/{page_count}", lines.join("\n"), index + 1)
    };

    let pager = pager(index, index > 0, index + 1 < page_count, |page| {
        ComponentAction::History { user, page }
    });
    MessagePayload::embed(Embed::new("Past challenges").description(description))
        .with_components(vec![pager])
}

/// Report announcement with the confirm button for the opponent.
#[must_use]
pub fn report_pending(report: &PendingReport, confirmer_name: &str) -> MessagePayload {
    let description = format!(
        "{} has reported: {} {} {}.\n\
         Click the button below to confirm, or run this command again to report a different score.\n\
         This challenge will automatically confirm {}.",
        mention(report.reporter_id),
        mention(report.winner_id),
        report.score,
        mention(report.loser_id()),
        relative_time(report.confirm_after),
    );
    let button = Component::button(
        ComponentAction::Confirm {
            challenge_id: report.challenge_id,
            report_id: report.id,
        }
        .to_string(),
    )
    .label(format!("@{confirmer_name}: Click here to confirm!"))
    .emoji("✅");

    MessagePayload::embed(Embed::new("Winner!").description(description))
        .with_components(vec![Component::action_row(vec![button])])
}

#[must_use]
pub fn outcome(outcome: &ChallengeOutcome) -> MessagePayload {
    let description = if outcome.challenger_won && outcome.from_position != outcome.to_position {
        format!(
            "{} has defeated {}!\nThey have climbed from {} to {}.",
            mention(outcome.winner_id),
            mention(outcome.loser_id),
            ordinal(outcome.from_position),
            ordinal(outcome.to_position)
        )
    } else if outcome.challenger_won {
        format!(
            "{} has defeated {}!\nThey remain at {}.",
            mention(outcome.winner_id),
            mention(outcome.loser_id),
            ordinal(outcome.to_position)
        )
    } else {
        format!(
            "{} has defended their spot against {}!\nThey remain at {}.",
            mention(outcome.winner_id),
            mention(outcome.loser_id),
            ordinal(outcome.to_position)
        )
    };
    MessagePayload::embed(Embed::new("Winner!").description(description))
        .with_components(Vec::new())
}

/// Replaces a confirm button whose challenge was already decided.
#[must_use]
pub fn already_reported() -> MessagePayload {
    MessagePayload::embed(
        Embed::new("Winner!").description(rule_message(&RuleViolation::AlreadyCompleted)),
    )
    .with_components(Vec::new())
}

// ---------------------------------------------------------------------------
// Help & FAQ
// ---------------------------------------------------------------------------

#[must_use]
pub fn help(ephemeral: bool) -> MessagePayload {
    let description = "This bot lets you manage a ladder for your server, where players can join and compete against each other.\n\
        Use the `/ladder create` command to set up a ladder for your server, and `/ladder join` to join.\n\
        Then you can use `/challenge someone` to challenge someone above you.\n\
        The two of you then play a best of 5 set. Once you finish, use `/challenge report` to report the result.\n\
        Challenge lots of people and climb as high as you can!";
    MessagePayload::embed(Embed::new("Help").description(description)).ephemeral(ephemeral)
}

fn faq_question(question: u8) -> &'static str {
    match question {
        1 => "Who can I challenge?",
        2 => "What does being inactive mean?",
        3 => "Why can't I send another challenge?",
        _ => "Why can't I challenge someone again?",
    }
}

fn faq_answer_text(question: u8) -> &'static str {
    match question {
        1 => "This depends on your position in the ladder:\n\
            2-4: can challenge 1 above.\n\
            5-8: can challenge 2 above.\n\
            9-16: can challenge 3 above.\n\
            17+: can challenge 4 above, etc.\n\
            Inactive players can be skipped over. For example, if player 2 is inactive, player 3 can skip over them and challenge player 1.",
        2 => "You become inactive if you have not sent a challenge or played a challenge in the last week.\n\
            This is to keep the ladder active and ensure that players are still engaged.\n\
            If you are inactive, players below you in the ladder can skip over you for challenges, increasing the number of people in their challenge range by 1.\n\
            You can become active again by sending a challenge, reporting a challenge, or using the `/ladder activate` command.",
        3 => "You can only send one challenge at a time.\n\
            If you already have a challenge sent, you must either finish it and report it with `/challenge report`, or cancel it with `/challenge cancel`.\n\
            (However, multiple people can challenge you at the same time!)",
        _ => "After finishing a challenge, you must wait one week before you can challenge the same person again. Try challenging someone else!",
    }
}

/// The FAQ question buttons.
#[must_use]
pub fn faq(ephemeral: bool) -> MessagePayload {
    let buttons = (1..=FAQ_COUNT)
        .map(|question| {
            Component::button(ComponentAction::Faq { question }.to_string())
                .label(faq_question(question))
        })
        .collect();
    MessagePayload::default()
        .with_components(vec![Component::action_row(buttons)])
        .ephemeral(ephemeral)
}

#[must_use]
pub fn faq_answer(question: u8) -> MessagePayload {
    MessagePayload::embed(
        Embed::new(faq_question(question)).description(faq_answer_text(question)),
    )
    .ephemeral(true)
}
