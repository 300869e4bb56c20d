//! Discord interaction wire model.
//!
//! Only the fields the bot reads or writes are modelled; unknown fields are
//! ignored on the way in and omitted on the way out.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use ladderbot_domain::id::{ChannelId, GuildId, UserId};

/// Message flag hiding a response from everyone but the invoking user.
pub const EPHEMERAL: u64 = 1 << 6;

/// `ADMINISTRATOR` permission bit.
pub const ADMINISTRATOR: u64 = 1 << 3;

/// `MANAGE_GUILD` permission bit.
pub const MANAGE_GUILD: u64 = 1 << 5;

/// Accent colour of every embed the bot sends.
pub const EMBED_COLOR: u32 = 0x0058_65F2;

/// Kind of an incoming interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionKind {
    Ping,
    ApplicationCommand,
    MessageComponent,
    Other(u8),
}

impl From<u8> for InteractionKind {
    fn from(raw: u8) -> Self {
        match raw {
            1 => Self::Ping,
            2 => Self::ApplicationCommand,
            3 => Self::MessageComponent,
            other => Self::Other(other),
        }
    }
}

/// An interaction as posted to the interactions endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct Interaction {
    #[serde(rename = "type")]
    pub kind: u8,
    #[serde(default)]
    pub guild_id: Option<GuildId>,
    #[serde(default)]
    pub channel_id: Option<ChannelId>,
    /// Present when invoked in a guild.
    #[serde(default)]
    pub member: Option<Member>,
    /// Present when invoked in a DM.
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default)]
    pub data: Option<InteractionData>,
}

impl Interaction {
    #[must_use]
    pub fn kind(&self) -> InteractionKind {
        InteractionKind::from(self.kind)
    }

    /// The user who triggered the interaction.
    #[must_use]
    pub fn invoker(&self) -> Option<&User> {
        self.member
            .as_ref()
            .map(|member| &member.user)
            .or(self.user.as_ref())
    }

    /// Name shown for the invoker in this guild.
    #[must_use]
    pub fn invoker_name(&self) -> Option<String> {
        if let Some(member) = &self.member {
            return Some(member.display_name().to_string());
        }
        self.user.as_ref().map(|user| user.display_name().to_string())
    }

    /// Permission bits of the invoking member, `0` outside a guild.
    #[must_use]
    pub fn permissions(&self) -> u64 {
        self.member
            .as_ref()
            .and_then(|member| member.permissions.as_deref())
            .and_then(|raw| raw.parse().ok())
            .unwrap_or(0)
    }
}

/// A Discord user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    #[serde(default)]
    pub global_name: Option<String>,
}

impl User {
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.global_name.as_deref().unwrap_or(&self.username)
    }
}

/// A guild member wrapping a [`User`].
#[derive(Debug, Clone, Deserialize)]
pub struct Member {
    pub user: User,
    #[serde(default)]
    pub nick: Option<String>,
    /// Permission bits as a decimal string.
    #[serde(default)]
    pub permissions: Option<String>,
}

impl Member {
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.nick
            .as_deref()
            .unwrap_or_else(|| self.user.display_name())
    }
}

/// Member data for resolved command options; the user is carried separately.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PartialMember {
    #[serde(default)]
    pub nick: Option<String>,
}

/// Payload of a command or component interaction.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InteractionData {
    /// Command name for application commands.
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub options: Vec<CommandOption>,
    #[serde(default)]
    pub resolved: Resolved,
    /// Component id for component clicks.
    #[serde(default)]
    pub custom_id: Option<String>,
    /// Picked values for select menus.
    #[serde(default)]
    pub values: Vec<String>,
}

impl InteractionData {
    /// The invoked subcommand, if any.
    #[must_use]
    pub fn subcommand(&self) -> Option<&CommandOption> {
        self.options
            .iter()
            .find(|option| option.kind == option_kind::SUB_COMMAND)
    }

    /// A top-level boolean option, for commands without subcommands.
    #[must_use]
    pub fn bool_option(&self, name: &str) -> Option<bool> {
        self.options
            .iter()
            .find(|option| option.name == name)
            .and_then(|option| option.value.as_ref())
            .and_then(serde_json::Value::as_bool)
    }

    /// Name to show for a user passed as an option.
    #[must_use]
    pub fn resolved_name(&self, user: UserId) -> Option<String> {
        let key = user.to_string();
        let nick = self
            .resolved
            .members
            .get(&key)
            .and_then(|member| member.nick.clone());
        nick.or_else(|| {
            self.resolved
                .users
                .get(&key)
                .map(|user| user.display_name().to_string())
        })
    }
}

/// Users and members referenced by command options.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Resolved {
    #[serde(default)]
    pub users: HashMap<String, User>,
    #[serde(default)]
    pub members: HashMap<String, PartialMember>,
}

/// Option kinds used by the bot's commands.
pub mod option_kind {
    pub const SUB_COMMAND: u8 = 1;
    pub const STRING: u8 = 3;
    pub const BOOLEAN: u8 = 5;
    pub const USER: u8 = 6;
}

/// A command option as received, possibly nesting subcommand options.
#[derive(Debug, Clone, Deserialize)]
pub struct CommandOption {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: u8,
    #[serde(default)]
    pub value: Option<serde_json::Value>,
    #[serde(default)]
    pub options: Vec<CommandOption>,
}

impl CommandOption {
    fn value_of(&self, name: &str) -> Option<&serde_json::Value> {
        self.options
            .iter()
            .find(|option| option.name == name)
            .and_then(|option| option.value.as_ref())
    }

    #[must_use]
    pub fn bool_option(&self, name: &str) -> Option<bool> {
        self.value_of(name).and_then(serde_json::Value::as_bool)
    }

    #[must_use]
    pub fn str_option(&self, name: &str) -> Option<&str> {
        self.value_of(name).and_then(serde_json::Value::as_str)
    }

    #[must_use]
    pub fn user_option(&self, name: &str) -> Option<UserId> {
        self.str_option(name).and_then(|raw| raw.parse().ok())
    }
}

/// Response to an interaction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InteractionResponse {
    #[serde(rename = "type")]
    pub kind: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<MessagePayload>,
}

impl InteractionResponse {
    #[must_use]
    pub fn pong() -> Self {
        Self {
            kind: 1,
            data: None,
        }
    }

    /// Reply with a new message.
    #[must_use]
    pub fn message(payload: MessagePayload) -> Self {
        Self {
            kind: 4,
            data: Some(payload),
        }
    }

    /// Edit the message the clicked component belongs to.
    #[must_use]
    pub fn update(payload: MessagePayload) -> Self {
        Self {
            kind: 7,
            data: Some(payload),
        }
    }

    /// Reply only the invoking user can see.
    #[must_use]
    pub fn ephemeral_text(content: impl Into<String>) -> Self {
        Self::message(MessagePayload::text(content).ephemeral(true))
    }
}

/// Message body used both in interaction responses and REST calls.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MessagePayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub embeds: Vec<Embed>,
    /// `Some(vec![])` removes existing components on update.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub components: Option<Vec<Component>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flags: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_mentions: Option<AllowedMentions>,
}

impl MessagePayload {
    #[must_use]
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn embed(embed: Embed) -> Self {
        Self {
            embeds: vec![embed],
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    #[must_use]
    pub fn with_components(mut self, components: Vec<Component>) -> Self {
        self.components = Some(components);
        self
    }

    #[must_use]
    pub fn ephemeral(mut self, ephemeral: bool) -> Self {
        self.flags = ephemeral.then_some(EPHEMERAL);
        self
    }

    /// Only ping the given users.
    #[must_use]
    pub fn mentioning(mut self, users: Vec<UserId>) -> Self {
        self.allowed_mentions = Some(AllowedMentions { parse: Vec::new(), users });
        self
    }
}

/// Restricts which mentions in a message notify anyone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AllowedMentions {
    pub parse: Vec<String>,
    pub users: Vec<UserId>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Embed {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<u32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<EmbedField>,
}

impl Embed {
    /// An embed in the bot's accent colour.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            color: Some(EMBED_COLOR),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push(EmbedField {
            name: name.into(),
            value: value.into(),
            inline: true,
        });
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Emoji {
    pub name: String,
}

/// Component kinds.
pub mod component_kind {
    pub const ACTION_ROW: u8 = 1;
    pub const BUTTON: u8 = 2;
    pub const STRING_SELECT: u8 = 3;
}

/// "blurple" button style.
pub const BUTTON_PRIMARY: u8 = 1;

/// A message component: action row, button or string select.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Component {
    #[serde(rename = "type")]
    pub kind: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emoji: Option<Emoji>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<SelectOption>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub components: Vec<Component>,
}

impl Component {
    fn empty(kind: u8) -> Self {
        Self {
            kind,
            custom_id: None,
            style: None,
            label: None,
            emoji: None,
            disabled: None,
            placeholder: None,
            options: Vec::new(),
            components: Vec::new(),
        }
    }

    #[must_use]
    pub fn action_row(components: Vec<Component>) -> Self {
        Self {
            components,
            ..Self::empty(component_kind::ACTION_ROW)
        }
    }

    #[must_use]
    pub fn button(custom_id: impl Into<String>) -> Self {
        Self {
            custom_id: Some(custom_id.into()),
            style: Some(BUTTON_PRIMARY),
            ..Self::empty(component_kind::BUTTON)
        }
    }

    #[must_use]
    pub fn string_select(
        custom_id: impl Into<String>,
        placeholder: impl Into<String>,
        options: Vec<SelectOption>,
    ) -> Self {
        Self {
            custom_id: Some(custom_id.into()),
            placeholder: Some(placeholder.into()),
            options,
            ..Self::empty(component_kind::STRING_SELECT)
        }
    }

    #[must_use]
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    #[must_use]
    pub fn emoji(mut self, name: impl Into<String>) -> Self {
        self.emoji = Some(Emoji { name: name.into() });
        self
    }

    #[must_use]
    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = Some(disabled);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectOption {
    pub label: String,
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}
