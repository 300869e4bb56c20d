//! Discord REST client: command registration and channel messages.

use std::time::Duration;

use reqwest::{Client, RequestBuilder, Response};
use serde::Serialize;

use ladderbot_app::ports::Notifier;
use ladderbot_domain::challenge::ChallengeOutcome;
use ladderbot_domain::error::LadderError;
use ladderbot_domain::id::{ChannelId, GuildId};

use crate::commands;
use crate::error::DiscordError;
use crate::model::MessagePayload;
use crate::render;

/// Base URL of the public Discord API.
pub const DEFAULT_API_BASE: &str = "https://discord.com/api/v10";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Authenticated client for the endpoints the bot calls itself.
#[derive(Clone)]
pub struct DiscordClient {
    http: Client,
    api_base: String,
    application_id: String,
    bot_token: String,
}

impl DiscordClient {
    /// Create a client talking to `api_base` on behalf of the application.
    ///
    /// # Errors
    ///
    /// Returns [`DiscordError::Http`] when the HTTP client cannot be built.
    pub fn new(
        api_base: impl Into<String>,
        application_id: impl Into<String>,
        bot_token: impl Into<String>,
    ) -> Result<Self, DiscordError> {
        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            http,
            api_base: api_base.into().trim_end_matches('/').to_owned(),
            application_id: application_id.into(),
            bot_token: bot_token.into(),
        })
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        builder.header("Authorization", format!("Bot {}", self.bot_token))
    }

    async fn send(builder: RequestBuilder) -> Result<Response, DiscordError> {
        let response = builder.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(DiscordError::Api {
            status: status.as_u16(),
            body,
        })
    }

    async fn put<T: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<Response, DiscordError> {
        let url = format!("{}{path}", self.api_base);
        Self::send(self.authorized(self.http.put(url)).json(body)).await
    }

    async fn post<T: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<Response, DiscordError> {
        let url = format!("{}{path}", self.api_base);
        Self::send(self.authorized(self.http.post(url)).json(body)).await
    }

    /// Overwrite the bot's slash commands, globally or for one guild.
    /// Returns how many commands Discord now knows.
    ///
    /// # Errors
    ///
    /// Returns a [`DiscordError`] when the request fails or is refused.
    pub async fn register_commands(
        &self,
        guild_id: Option<GuildId>,
    ) -> Result<usize, DiscordError> {
        let path = match guild_id {
            Some(guild_id) => format!(
                "/applications/{}/guilds/{guild_id}/commands",
                self.application_id
            ),
            None => format!("/applications/{}/commands", self.application_id),
        };
        let registered: Vec<serde_json::Value> = self
            .put(&path, &commands::definitions())
            .await?
            .json()
            .await?;
        tracing::info!(count = registered.len(), guild_id = ?guild_id, "registered commands");
        Ok(registered.len())
    }

    /// Post a message to a channel.
    ///
    /// # Errors
    ///
    /// Returns a [`DiscordError`] when the request fails or is refused.
    pub async fn create_message(
        &self,
        channel_id: ChannelId,
        message: &MessagePayload,
    ) -> Result<(), DiscordError> {
        self.post(&format!("/channels/{channel_id}/messages"), message)
            .await?;
        Ok(())
    }
}

impl Notifier for DiscordClient {
    async fn announce_outcome(
        &self,
        channel_id: ChannelId,
        outcome: &ChallengeOutcome,
    ) -> Result<(), LadderError> {
        let message = render::outcome(outcome)
            .with_content(format!(
                "{} {} (confirmed automatically)",
                render::mention(outcome.winner_id),
                render::mention(outcome.loser_id)
            ))
            .mentioning(vec![outcome.winner_id, outcome.loser_id]);
        self.create_message(channel_id, &message).await?;
        Ok(())
    }
}
