//! [`Config`]-related definitions.

use std::{env, time};

use config::{builder::DefaultState, ConfigBuilder, ConfigError};
use secrecy::SecretString;
use serde::{de, Deserialize, Deserializer};
use service::domain::game;
use smart_default::SmartDefault;

/// Application configuration.
#[derive(Clone, Debug, Deserialize)]
pub struct Config {
    /// Server configuration.
    #[serde(default)]
    pub server: Server,

    /// Telegram Bot API configuration.
    pub telegram: Telegram,

    /// Relayed game configuration.
    pub game: Game,

    /// Service configuration.
    #[serde(default)]
    pub service: Service,

    /// Log configuration.
    #[serde(default)]
    pub log: Log,
}

impl Config {
    /// Plain environment variables overriding the configuration, along with
    /// the configuration keys they're mapped to.
    pub const ENV_OVERRIDES: [(&'static str, &'static str); 4] = [
        ("BOT_TOKEN", "telegram.bot_token"),
        ("GAME_URL", "game.url"),
        ("GAME_SHORT_NAME", "game.short_name"),
        ("PORT", "server.port"),
    ];

    /// Creates a new [`Config`] by:
    /// - loading it from the provided `path` (if any);
    /// - merging it with the `CONF`-prefixed environment variables (if any);
    /// - overriding it with the [`Config::ENV_OVERRIDES`] variables (if any);
    /// - using default values for missing optional fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or any of the
    /// required values is missing.
    pub fn new(path: impl AsRef<str>) -> Result<Self, ConfigError> {
        Self::ENV_OVERRIDES
            .into_iter()
            .try_fold(
                ConfigBuilder::<DefaultState>::default()
                    .add_source(
                        config::File::with_name(path.as_ref()).required(false),
                    )
                    .add_source(
                        config::Environment::with_prefix("CONF").separator("."),
                    ),
                |builder, (var, key)| {
                    builder.set_override_option(key, env::var(var).ok())
                },
            )?
            .build()?
            .try_deserialize()
    }
}

/// Server configuration.
#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Server {
    /// Host to bind the server to.
    #[default("0.0.0.0".to_owned())]
    pub host: String,

    /// Port to bind the server to.
    #[default(3000)]
    pub port: u16,

    /// [CORS] configuration.
    ///
    /// [CORS]: https://developer.mozilla.org/en-US/docs/Web/HTTP/CORS
    pub cors: Cors,
}

/// [CORS] configuration.
///
/// [CORS]: https://developer.mozilla.org/en-US/docs/Web/HTTP/CORS
#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Cors {
    /// List of allowed origins.
    ///
    /// `*` allows any origin.
    #[default(vec!["*".to_owned()])]
    pub origins: Vec<String>,
}

/// Telegram Bot API configuration.
#[derive(Clone, Debug, Deserialize)]
pub struct Telegram {
    /// Token the bot is authorized with.
    #[serde(deserialize_with = "non_empty")]
    pub bot_token: SecretString,

    /// Username of the bot.
    ///
    /// If set, chat commands addressed to other bots (`/game@other_bot`) are
    /// ignored.
    #[serde(default)]
    pub bot_username: Option<String>,

    /// Base URL of the Telegram Bot API.
    #[serde(default = "Telegram::default_api_url")]
    pub api_url: String,

    /// Timeout of outgoing HTTP requests.
    #[serde(default = "Telegram::default_timeout", with = "humantime_serde")]
    pub timeout: time::Duration,
}

impl Telegram {
    /// Default [`Telegram::api_url`].
    fn default_api_url() -> String {
        "https://api.telegram.org".to_owned()
    }

    /// Default [`Telegram::timeout`].
    fn default_timeout() -> time::Duration {
        time::Duration::from_secs(60)
    }
}

impl From<Telegram> for service::infra::telegram::client::Config {
    fn from(value: Telegram) -> Self {
        let Telegram {
            bot_token,
            bot_username: _,
            api_url,
            timeout,
        } = value;
        Self {
            api_url,
            bot_token,
            timeout,
        }
    }
}

/// Relayed game configuration.
#[derive(Clone, Debug, Deserialize)]
pub struct Game {
    /// URL the game is hosted at.
    pub url: game::Url,

    /// Short name of the game registered with the bot.
    #[serde(deserialize_with = "non_empty")]
    pub short_name: game::ShortName,
}

/// Deserializes a string value treating an empty one as missing.
fn non_empty<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: From<String>,
{
    let value = String::deserialize(deserializer)?;
    if value.trim().is_empty() {
        return Err(de::Error::invalid_value(
            de::Unexpected::Str(&value),
            &"a non-empty string",
        ));
    }
    Ok(value.into())
}

/// Service configuration.
#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Service {
    /// Service tasks configuration.
    pub tasks: Tasks,
}

impl Service {
    /// Converts this [`Service`] configuration into a [`service::Config`] of
    /// the provided [`Game`] served by the bot with the provided username.
    #[must_use]
    pub fn into_config(
        self,
        game: Game,
        bot_username: Option<String>,
    ) -> service::Config {
        let Self {
            tasks:
                Tasks {
                    poll_updates,
                    clean_stale_sessions,
                },
        } = self;
        let Game { url, short_name } = game;

        service::Config {
            game: game::Config { url, short_name },
            bot_username,
            poll_updates: service::task::poll_updates::Config {
                timeout: poll_updates.timeout,
                retry_delay: poll_updates.retry_delay,
            },
            clean_stale_sessions: clean_stale_sessions.ttl.map(|ttl| {
                service::task::clean_stale_sessions::Config {
                    interval: clean_stale_sessions.interval,
                    ttl,
                }
            }),
        }
    }
}

/// Service tasks configuration.
#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Tasks {
    /// `PollUpdates` task configuration.
    pub poll_updates: PollUpdates,

    /// `CleanStaleSessions` task configuration.
    pub clean_stale_sessions: CleanStaleSessions,
}

/// `PollUpdates` task configuration.
#[derive(Clone, Copy, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct PollUpdates {
    /// Long polling timeout of a single request.
    #[default(time::Duration::from_secs(30))]
    #[serde(with = "humantime_serde")]
    pub timeout: time::Duration,

    /// Delay before polling again after a failure.
    #[default(time::Duration::from_secs(5))]
    #[serde(with = "humantime_serde")]
    pub retry_delay: time::Duration,
}

/// `CleanStaleSessions` task configuration.
#[derive(Clone, Copy, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct CleanStaleSessions {
    /// Task execution interval.
    #[default(time::Duration::from_secs(10 * 60))]
    #[serde(with = "humantime_serde")]
    pub interval: time::Duration,

    /// Age after which a not consumed session is deleted.
    ///
    /// Not set by default, so sessions are never deleted.
    #[serde(with = "humantime_serde")]
    pub ttl: Option<time::Duration>,
}

/// Log configuration.
#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Log {
    /// Log level.
    pub level: LogLevel,
}

/// Log level.
#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LogLevel {
    /// Designates very low priority, often extremely verbose, information.
    Trace,

    /// Designates lower priority information.
    Debug,

    /// Designates useful information.
    #[default]
    Info,

    /// Designates hazardous situations.
    Warn,

    /// Designates very serious errors.
    Error,
}

impl From<LogLevel> for tracing::Level {
    fn from(value: LogLevel) -> Self {
        match value {
            LogLevel::Trace => Self::TRACE,
            LogLevel::Debug => Self::DEBUG,
            LogLevel::Info => Self::INFO,
            LogLevel::Warn => Self::WARN,
            LogLevel::Error => Self::ERROR,
        }
    }
}
