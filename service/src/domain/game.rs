//! Game definitions.

use derive_more::{AsRef, Display, Error, From, Into};
use serde::{Deserialize, Serialize};

use crate::domain::session;

/// Game configuration.
#[derive(Clone, Debug)]
pub struct Config {
    /// [`Url`] the game is hosted at.
    pub url: Url,

    /// [`ShortName`] of the game registered with the bot.
    pub short_name: ShortName,
}

/// Short name of a game registered with the bot.
#[derive(
    AsRef, Clone, Debug, Deserialize, Display, Eq, From, PartialEq, Serialize,
)]
#[as_ref(str)]
pub struct ShortName(String);

/// Absolute URL of an externally hosted game page.
#[derive(AsRef, Clone, Debug, Deserialize, Display, Eq, PartialEq)]
#[as_ref(str)]
#[serde(try_from = "String")]
pub struct Url(String);

impl Url {
    /// Name of the query parameter carrying a [`session::Token`].
    pub const TOKEN_PARAM: &'static str = "token";

    /// Builds the launch URL of this game for the provided
    /// [`session::Token`].
    ///
    /// Existing query parameters and fragment are preserved.
    #[must_use]
    pub fn launch(&self, token: &session::Token) -> String {
        let (base, fragment) = match self.0.split_once('#') {
            Some((base, fragment)) => (base, Some(fragment)),
            None => (self.0.as_str(), None),
        };
        let separator = match base.rsplit_once('?') {
            Some((_, "")) => "",
            Some(_) => "&",
            None => "?",
        };

        let mut url =
            format!("{base}{separator}{}={token}", Self::TOKEN_PARAM);
        if let Some(fragment) = fragment {
            url.push('#');
            url.push_str(fragment);
        }
        url
    }
}

impl TryFrom<String> for Url {
    type Error = InvalidUrl;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        let uri = value.parse::<http::Uri>().map_err(|_| InvalidUrl)?;
        match uri.scheme_str() {
            Some("http" | "https") if uri.authority().is_some() => {
                Ok(Self(value))
            }
            _ => Err(InvalidUrl),
        }
    }
}

/// Error of parsing an invalid game [`Url`].
#[derive(Clone, Copy, Debug, Display, Error)]
#[display("game URL must be an absolute `http` or `https` URL")]
pub struct InvalidUrl;

/// Integer score reported to a game leaderboard.
#[derive(
    Clone, Copy, Debug, Display, Eq, Into, Ord, PartialEq, PartialOrd, Serialize,
)]
pub struct Score(i64);

impl Score {
    /// Creates a new [`Score`] by flooring the provided submitted value.
    ///
    /// Out of range values saturate.
    #[expect(
        clippy::cast_possible_truncation,
        reason = "saturating float-to-int cast is intended"
    )]
    #[must_use]
    pub fn floor(value: f64) -> Self {
        Self(value.floor() as i64)
    }
}

#[cfg(test)]
mod spec {
    use crate::domain::session::Token;

    use super::{Score, Url};

    fn url(s: &str) -> Url {
        Url::try_from(s.to_owned()).unwrap()
    }

    fn token() -> Token {
        Token::new("abc123").unwrap()
    }

    #[test]
    fn appends_token_as_query_parameter() {
        assert_eq!(
            url("https://example.github.io/game/").launch(&token()),
            "https://example.github.io/game/?token=abc123",
        );
    }

    #[test]
    fn keeps_existing_query_and_fragment() {
        assert_eq!(
            url("https://example.com/play?lang=en").launch(&token()),
            "https://example.com/play?lang=en&token=abc123",
        );
        assert_eq!(
            url("https://example.com/play?").launch(&token()),
            "https://example.com/play?token=abc123",
        );
        assert_eq!(
            url("https://example.com/play#board").launch(&token()),
            "https://example.com/play?token=abc123#board",
        );
    }

    #[test]
    fn rejects_relative_and_non_http_urls() {
        assert!(Url::try_from("/game".to_owned()).is_err());
        assert!(Url::try_from("ftp://example.com/".to_owned()).is_err());
        assert!(Url::try_from("not a url".to_owned()).is_err());
    }

    #[test]
    fn floors_submitted_score() {
        assert_eq!(i64::from(Score::floor(7.9)), 7);
        assert_eq!(i64::from(Score::floor(7.0)), 7);
        assert_eq!(i64::from(Score::floor(-0.5)), -1);
        assert_eq!(i64::from(Score::floor(f64::MAX)), i64::MAX);
    }
}
