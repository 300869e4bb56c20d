//! Configuration loading — TOML file with environment variable overrides.
//!
//! Looks for `ladderbot.toml` in the working directory. Everything but the
//! Discord credentials has a default, so the file is optional when those
//! come from the environment. Environment variables take precedence over
//! file values.

use serde::Deserialize;

use ladderbot_adapter_discord_axum::rest::DEFAULT_API_BASE;
use ladderbot_domain::id::GuildId;
use ladderbot_domain::report::DEFAULT_AUTO_CONFIRM_HOURS;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server settings.
    pub server: ServerConfig,
    /// Database settings.
    pub database: DatabaseConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
    /// Discord application credentials.
    pub discord: DiscordConfig,
    /// Challenge timing.
    pub challenges: ChallengesConfig,
}

/// HTTP listener configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind to (e.g. `0.0.0.0`).
    pub host: String,
    /// TCP port.
    pub port: u16,
}

/// `SQLite` database configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// `SQLite` connection URL or file path.
    pub url: String,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

/// Discord application settings.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DiscordConfig {
    pub application_id: Option<String>,
    /// Hex-encoded Ed25519 key from the developer portal.
    pub public_key: Option<String>,
    pub bot_token: Option<String>,
    pub api_base: String,
    /// Overwrite the slash commands on startup.
    pub register_commands: bool,
    /// Register commands for this guild only instead of globally.
    pub guild_id: Option<u64>,
}

/// Challenge timing.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ChallengesConfig {
    /// Hours before an unconfirmed report confirms itself.
    pub auto_confirm_hours: u32,
    /// Seconds between two auto-confirm sweeps.
    pub sweep_interval_secs: u64,
}

/// Discord settings once the required values are known to be present.
#[derive(Debug)]
pub struct DiscordCredentials<'a> {
    pub application_id: &'a str,
    pub public_key: &'a str,
    pub bot_token: &'a str,
}

impl Config {
    /// Load configuration from `ladderbot.toml` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if the
    /// result fails validation.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::from_file("ladderbot.toml")?;
        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(val) = var("LADDERBOT_HOST") {
            self.server.host = val;
        }
        if let Some(port) = var("LADDERBOT_PORT").and_then(|val| val.parse().ok()) {
            self.server.port = port;
        }
        if let Some(val) = var("LADDERBOT_BIND") {
            if let Some((host, port)) = val.rsplit_once(':') {
                self.server.host = host.to_string();
                if let Ok(port) = port.parse() {
                    self.server.port = port;
                }
            }
        }
        if let Some(val) = var("LADDERBOT_DATABASE_URL") {
            self.database.url = val;
        }
        if let Some(val) = var("LADDERBOT_LOG") {
            self.logging.filter = val;
        }
        if let Some(val) = var("RUST_LOG") {
            self.logging.filter = val;
        }
        if let Some(val) = var("LADDERBOT_APPLICATION_ID") {
            self.discord.application_id = Some(val);
        }
        if let Some(val) = var("LADDERBOT_PUBLIC_KEY") {
            self.discord.public_key = Some(val);
        }
        if let Some(val) = var("LADDERBOT_BOT_TOKEN").or_else(|| var("TOKEN")) {
            self.discord.bot_token = Some(val);
        }
        if let Some(val) = var("LADDERBOT_API_BASE") {
            self.discord.api_base = val;
        }
        if let Some(flag) = var("LADDERBOT_REGISTER_COMMANDS").and_then(|val| val.parse().ok()) {
            self.discord.register_commands = flag;
        }
        if let Some(id) = var("LADDERBOT_GUILD_ID").and_then(|val| val.parse().ok()) {
            self.discord.guild_id = Some(id);
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Validation("port must be non-zero".to_string()));
        }
        if self.challenges.auto_confirm_hours == 0 {
            return Err(ConfigError::Validation(
                "auto_confirm_hours must be non-zero".to_string(),
            ));
        }
        if self.challenges.sweep_interval_secs == 0 {
            return Err(ConfigError::Validation(
                "sweep_interval_secs must be non-zero".to_string(),
            ));
        }
        self.credentials()?;
        Ok(())
    }

    /// Return the `host:port` bind address.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Return the database URL in `sqlx`-compatible format.
    #[must_use]
    pub fn database_url(&self) -> &str {
        &self.database.url
    }

    /// Borrow the Discord credentials.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Missing`] naming the first absent value.
    pub fn credentials(&self) -> Result<DiscordCredentials<'_>, ConfigError> {
        fn require<'a>(value: &'a Option<String>, name: &'static str) -> Result<&'a str, ConfigError> {
            value
                .as_deref()
                .filter(|value| !value.is_empty())
                .ok_or(ConfigError::Missing(name))
        }
        Ok(DiscordCredentials {
            application_id: require(&self.discord.application_id, "discord.application_id")?,
            public_key: require(&self.discord.public_key, "discord.public_key")?,
            bot_token: require(&self.discord.bot_token, "discord.bot_token")?,
        })
    }

    /// Guild to register commands in, if restricted to one.
    #[must_use]
    pub fn command_guild(&self) -> Option<GuildId> {
        self.discord.guild_id.map(GuildId::new)
    }

    #[must_use]
    pub fn auto_confirm_after(&self) -> chrono::Duration {
        chrono::Duration::hours(i64::from(self.challenges.auto_confirm_hours))
    }

    #[must_use]
    pub fn sweep_interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.challenges.sweep_interval_secs)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite:ladderbot.db?mode=rwc".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "ladderbotd=info,ladderbot=info,tower_http=debug".to_string(),
        }
    }
}

impl Default for DiscordConfig {
    fn default() -> Self {
        Self {
            application_id: None,
            public_key: None,
            bot_token: None,
            api_base: DEFAULT_API_BASE.to_string(),
            register_commands: true,
            guild_id: None,
        }
    }
}

impl Default for ChallengesConfig {
    fn default() -> Self {
        Self {
            auto_confirm_hours: u32::try_from(DEFAULT_AUTO_CONFIRM_HOURS).unwrap_or(12),
            sweep_interval_secs: 60,
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// A required value is absent from both file and environment.
    #[error("missing required setting {0}")]
    Missing(&'static str),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}
