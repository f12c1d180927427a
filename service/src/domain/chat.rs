//! Telegram chat definitions.

use derive_more::{Display, From, Into};
use serde::{Deserialize, Serialize};

/// ID of a Telegram chat.
#[derive(
    Clone,
    Copy,
    Debug,
    Deserialize,
    Display,
    Eq,
    From,
    Hash,
    Into,
    PartialEq,
    Serialize,
)]
pub struct Id(i64);

/// ID of a message inside a Telegram chat.
///
/// Identifies the game message whose leaderboard gets updated.
#[derive(
    Clone,
    Copy,
    Debug,
    Deserialize,
    Display,
    Eq,
    From,
    Hash,
    Into,
    PartialEq,
    Serialize,
)]
pub struct MessageId(i64);

/// Bot command rendering the game into a chat.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Command {
    /// `/start` command.
    Start,

    /// `/game` command.
    Game,
}

impl Command {
    /// Parses a [`Command`] from the text of a chat message.
    ///
    /// Only the first word is considered. A `@username` suffix addressing
    /// the command to a bot must match the provided `bot` username (compared
    /// case-insensitively), or is accepted as is if the `bot` is unknown.
    #[must_use]
    pub fn parse(text: &str, bot: Option<&str>) -> Option<Self> {
        let word = text.split_whitespace().next()?;
        let name = match word.split_once('@') {
            Some((name, addressee)) => {
                let ours = bot.map_or(true, |bot| {
                    bot.trim_start_matches('@').eq_ignore_ascii_case(addressee)
                });
                ours.then_some(name)?
            }
            None => word,
        };
        match name {
            "/start" => Some(Self::Start),
            "/game" => Some(Self::Game),
            _ => None,
        }
    }
}

#[cfg(test)]
mod spec {
    use super::Command;

    #[test]
    fn parses_game_commands() {
        assert_eq!(Command::parse("/start", None), Some(Command::Start));
        assert_eq!(Command::parse("/game", None), Some(Command::Game));
        assert_eq!(Command::parse("  /game  now", None), Some(Command::Game));
        assert_eq!(
            Command::parse("/game@score_bot", None),
            Some(Command::Game),
        );
    }

    #[test]
    fn parses_commands_addressed_to_bot() {
        let bot = Some("Score_Bot");

        assert_eq!(Command::parse("/game", bot), Some(Command::Game));
        assert_eq!(Command::parse("/game@score_bot", bot), Some(Command::Game));
        assert_eq!(
            Command::parse("/start@Score_Bot", Some("@Score_Bot")),
            Some(Command::Start),
        );
    }

    #[test]
    fn ignores_commands_addressed_to_other_bots() {
        let bot = Some("score_bot");

        assert_eq!(Command::parse("/game@someotherbot", bot), None);
        assert_eq!(Command::parse("/start@", bot), None);
    }

    #[test]
    fn rejects_other_text() {
        assert_eq!(Command::parse("", None), None);
        assert_eq!(Command::parse("hello /game", None), None);
        assert_eq!(Command::parse("/games", None), None);
        assert_eq!(Command::parse("/help", None), None);
    }
}
