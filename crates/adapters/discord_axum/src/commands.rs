//! Slash command definitions registered with Discord.

use serde_json::{Value, json};

use crate::model::option_kind;

/// Contexts in which guild-only commands are offered (guilds only).
const GUILD_ONLY: [u8; 1] = [0];

fn ephemeral_option() -> Value {
    json!({
        "type": option_kind::BOOLEAN,
        "name": "ephemeral",
        "description": "Only show the answer to you (default: true)",
        "required": false
    })
}

fn subcommand(name: &str, description: &str, options: Vec<Value>) -> Value {
    json!({
        "type": option_kind::SUB_COMMAND,
        "name": name,
        "description": description,
        "options": options
    })
}

fn ladder_command() -> Value {
    json!({
        "name": "ladder",
        "description": "Handles the state of the ladder for each server.",
        "contexts": GUILD_ONLY,
        "options": [
            subcommand(
                "create",
                "Create a new ladder for this server. THIS COMMAND WILL ERASE ANY EXISTING LADDER FOR THIS SERVER!",
                vec![json!({
                    "type": option_kind::BOOLEAN,
                    "name": "are_you_sure",
                    "description": "Any existing ladder, with its challenges, is erased",
                    "required": true
                })],
            ),
            subcommand("join", "Join this server's ladder.", vec![]),
            subcommand("leave", "Leave this server's ladder.", vec![]),
            subcommand("rankings", "List the current standings of this server's ladder.", vec![]),
            subcommand("activate", "Mark yourself as active without playing a challenge.", vec![]),
        ]
    })
}

fn challenge_command() -> Value {
    json!({
        "name": "challenge",
        "description": "Handles issuing challenges for a ladder.",
        "contexts": GUILD_ONLY,
        "options": [
            subcommand(
                "someone",
                "Sends a challenge to another user in the ladder.",
                vec![json!({
                    "type": option_kind::USER,
                    "name": "user",
                    "description": "Who to challenge; leave empty to pick from a list",
                    "required": false
                })],
            ),
            subcommand(
                "report",
                "Report the results of a finished challenge. If the challenger wins, they swap places!",
                vec![
                    json!({
                        "type": option_kind::USER,
                        "name": "versus",
                        "description": "Who you played",
                        "required": true
                    }),
                    json!({
                        "type": option_kind::USER,
                        "name": "winner",
                        "description": "Who won the set",
                        "required": true
                    }),
                    json!({
                        "type": option_kind::STRING,
                        "name": "score",
                        "description": "Games won by each player, e.g. 3-1",
                        "required": true,
                        "min_length": 3,
                        "max_length": 3
                    }),
                ],
            ),
            subcommand(
                "list",
                "List all your outstanding challenges in this server.",
                vec![ephemeral_option()],
            ),
            subcommand("history", "View your past challenges.", vec![ephemeral_option()]),
            subcommand("cancel", "Withdraw the challenge you sent.", vec![]),
        ]
    })
}

/// Every command the bot serves, in bulk-overwrite form.
#[must_use]
pub fn definitions() -> Value {
    json!([
        ladder_command(),
        challenge_command(),
        {
            "name": "help",
            "description": "What is this bot?",
            "options": [ephemeral_option()]
        },
        {
            "name": "faq",
            "description": "Frequently asked questions.",
            "options": [ephemeral_option()]
        },
    ])
}
