//! [Telegram Bot API] infrastructure.
//!
//! [Telegram Bot API]: https://core.telegram.org/bots/api

#[cfg(feature = "telegram")]
pub mod client;
#[cfg(test)]
pub(crate) mod fake;

use std::time::Duration;

use derive_more::{AsRef, Display, Error as StdError, From};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::domain::{chat, game, user};

#[cfg(feature = "telegram")]
pub use self::client::Client;

/// Telegram Bot API operation.
pub use common::Handler as Telegram;

/// Method of the Telegram Bot API.
pub trait Method: Serialize {
    /// Name of this [`Method`] in the request path.
    const NAME: &'static str;

    /// Type of the `result` returned by this [`Method`].
    type Response: DeserializeOwned;

    /// Overrides the default HTTP request timeout for this [`Method`].
    fn timeout(&self) -> Option<Duration> {
        None
    }
}

/// Incoming update.
#[derive(Clone, Debug, Deserialize)]
pub struct Update {
    /// Sequential identifier of this [`Update`].
    pub update_id: i64,

    /// New incoming [`Message`].
    pub message: Option<Message>,

    /// New incoming [`CallbackQuery`].
    pub callback_query: Option<CallbackQuery>,
}

/// Chat message.
#[derive(Clone, Debug, Deserialize)]
pub struct Message {
    /// ID of this [`Message`] inside its [`Chat`].
    pub message_id: chat::MessageId,

    /// [`Chat`] this [`Message`] belongs to.
    pub chat: Chat,

    /// Text of this [`Message`].
    pub text: Option<String>,
}

/// Chat.
#[derive(Clone, Copy, Debug, Deserialize)]
pub struct Chat {
    /// ID of this [`Chat`].
    pub id: chat::Id,
}

/// User or bot.
#[derive(Clone, Copy, Debug, Deserialize)]
pub struct User {
    /// ID of this [`User`].
    pub id: user::Id,
}

/// Callback query emitted when a user presses an inline button, including
/// the "Play" button of a game.
#[derive(Clone, Debug, Deserialize)]
pub struct CallbackQuery {
    /// ID of this [`CallbackQuery`].
    pub id: CallbackQueryId,

    /// [`User`] who pressed the button.
    pub from: User,

    /// [`Message`] the button was attached to.
    ///
    /// Absent for messages sent in inline mode.
    pub message: Option<Message>,

    /// Short name of the game to be launched.
    pub game_short_name: Option<game::ShortName>,
}

/// ID of a [`CallbackQuery`].
#[derive(AsRef, Clone, Debug, Deserialize, Display, Eq, PartialEq, Serialize)]
#[as_ref(str)]
pub struct CallbackQueryId(String);

impl From<&str> for CallbackQueryId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

/// `getUpdates` [`Method`] long polling for new [`Update`]s.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct GetUpdates {
    /// Identifier of the first [`Update`] to be returned.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<i64>,

    /// Long polling timeout in seconds.
    pub timeout: u64,

    /// Kinds of [`Update`]s to receive.
    pub allowed_updates: &'static [&'static str],
}

impl GetUpdates {
    /// Kinds of [`Update`]s the bot reacts to.
    pub const ALLOWED_UPDATES: &'static [&'static str] =
        &["message", "callback_query"];

    /// Creates a new [`GetUpdates`] polling for at most `timeout`.
    #[must_use]
    pub fn new(offset: Option<i64>, timeout: Duration) -> Self {
        Self {
            offset,
            timeout: timeout.as_secs(),
            allowed_updates: Self::ALLOWED_UPDATES,
        }
    }
}

impl Method for GetUpdates {
    const NAME: &'static str = "getUpdates";
    type Response = Vec<Update>;

    fn timeout(&self) -> Option<Duration> {
        // Server-side wait plus a margin for the response to arrive.
        Some(Duration::from_secs(self.timeout + 10))
    }
}

/// `sendGame` [`Method`] rendering a game with a "Play" button.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SendGame {
    /// ID of the target chat.
    pub chat_id: chat::Id,

    /// Short name of the game.
    pub game_short_name: game::ShortName,
}

impl Method for SendGame {
    const NAME: &'static str = "sendGame";
    type Response = Message;
}

/// `answerCallbackQuery` [`Method`] acknowledging a [`CallbackQuery`].
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AnswerCallbackQuery {
    /// ID of the [`CallbackQuery`] to answer.
    pub callback_query_id: CallbackQueryId,

    /// URL to be opened by the user's client.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl Method for AnswerCallbackQuery {
    const NAME: &'static str = "answerCallbackQuery";
    type Response = bool;
}

/// `setGameScore` [`Method`] recording a user's score in a game message.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct SetGameScore {
    /// ID of the user.
    pub user_id: user::Id,

    /// ID of the chat the game message belongs to.
    pub chat_id: chat::Id,

    /// ID of the game message.
    pub message_id: chat::MessageId,

    /// New score.
    pub score: game::Score,

    /// Whether to set the score even if it's not higher than the current one.
    pub force: bool,
}

impl Method for SetGameScore {
    const NAME: &'static str = "setGameScore";

    /// `setGameScore` is answered with the raw response body.
    type Response = serde_json::Value;
}

/// [`Telegram`] error.
#[derive(Debug, Display, From, StdError)]
pub enum Error {
    /// HTTP transport error.
    #[cfg(feature = "telegram")]
    #[display("HTTP request failed: {_0}")]
    Http(reqwest::Error),

    /// Telegram Bot API rejected the request.
    #[display("Telegram Bot API error {code}: {description}")]
    #[from(ignore)]
    Api {
        /// Error code returned by the API.
        code: i64,

        /// Human-readable description of the error.
        description: String,
    },
}
