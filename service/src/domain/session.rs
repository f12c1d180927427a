//! [`Session`] definitions.

use common::{unit, DateTimeOf};
use derive_more::{AsRef, Display};
use rand::{distributions::Alphanumeric, Rng as _};

use crate::domain::{chat, user};

/// Game session linking a one-time [`Token`] to the chat context its score
/// should be reported into.
#[derive(Clone, Debug)]
pub struct Session {
    /// [`Token`] identifying this [`Session`].
    pub token: Token,

    /// ID of the Telegram user who launched the game.
    pub user_id: user::Id,

    /// ID of the Telegram chat the game was launched from.
    pub chat_id: chat::Id,

    /// ID of the game message whose leaderboard is updated.
    pub message_id: chat::MessageId,

    /// [`DateTime`] when this [`Session`] was created.
    ///
    /// [`DateTime`]: common::DateTime
    pub created_at: CreationDateTime,
}

/// Single-use capability token of a [`Session`].
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[as_ref(str)]
pub struct Token(String);

impl Token {
    /// Number of characters in a generated [`Token`].
    pub const LENGTH: usize = 32;

    /// Generates a new random alphanumeric [`Token`].
    ///
    /// Uniqueness against live [`Session`]s is not checked here.
    #[must_use]
    pub fn generate() -> Self {
        Self(
            rand::thread_rng()
                .sample_iter(&Alphanumeric)
                .take(Self::LENGTH)
                .map(char::from)
                .collect(),
        )
    }

    /// Wraps the provided `token` received from a client.
    ///
    /// [`None`] is returned if the `token` is empty.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Option<Self> {
        let token = token.into();
        (!token.is_empty()).then_some(Self(token))
    }
}

/// [`DateTime`] of a [`Session`] creation.
///
/// [`DateTime`]: common::DateTime
pub type CreationDateTime = DateTimeOf<(Session, unit::Creation)>;
