//! HTTP [`Client`] of the Telegram Bot API.

use std::time::Duration;

use derive_more::Debug;
use secrecy::{ExposeSecret as _, SecretString};
use serde::Deserialize;
use tracerr::Traced;

use super::{
    AnswerCallbackQuery, Error, GetUpdates, Method, SendGame, SetGameScore,
    Telegram,
};

/// [`Client`] configuration.
#[derive(Clone, Debug)]
pub struct Config {
    /// Base URL of the Telegram Bot API.
    pub api_url: String,

    /// Token the bot is authorized with.
    pub bot_token: SecretString,

    /// Default timeout of HTTP requests.
    pub timeout: Duration,
}

/// HTTP client of the Telegram Bot API.
#[derive(Clone, Debug)]
pub struct Client {
    /// Underlying HTTP client.
    #[debug(skip)]
    http: reqwest::Client,

    /// Base URL of the Telegram Bot API.
    api_url: String,

    /// Token the bot is authorized with.
    bot_token: SecretString,
}

impl Client {
    /// Creates a new [`Client`] with the provided [`Config`].
    ///
    /// # Errors
    ///
    /// If failed to initialize the underlying HTTP client.
    pub fn new(config: Config) -> Result<Self, Traced<Error>> {
        let Config {
            api_url,
            bot_token,
            timeout,
        } = config;

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(tracerr::from_and_wrap!(=> Error))?;

        Ok(Self {
            http,
            api_url: api_url.trim_end_matches('/').to_owned(),
            bot_token,
        })
    }

    /// Sends the provided [`Method`] and returns the raw HTTP response.
    async fn send<M: Method>(
        &self,
        method: &M,
    ) -> Result<reqwest::Response, Traced<Error>> {
        let url = format!(
            "{}/bot{}/{}",
            self.api_url,
            self.bot_token.expose_secret(),
            M::NAME,
        );

        let mut request = self.http.post(url).json(method);
        if let Some(timeout) = method.timeout() {
            request = request.timeout(timeout);
        }

        // Request URLs contain the bot token, so they're never exposed.
        request
            .send()
            .await
            .map_err(reqwest::Error::without_url)
            .map_err(tracerr::from_and_wrap!(=> Error))
    }

    /// Calls the provided [`Method`] and unwraps its `result`.
    async fn call<M: Method>(
        &self,
        method: &M,
    ) -> Result<M::Response, Traced<Error>> {
        self.send(method)
            .await?
            .json::<Response<M::Response>>()
            .await
            .map_err(reqwest::Error::without_url)
            .map_err(tracerr::from_and_wrap!(=> Error))?
            .into_result()
            .map_err(tracerr::wrap!())
    }
}

impl Telegram<GetUpdates> for Client {
    type Ok = <GetUpdates as Method>::Response;
    type Err = Traced<Error>;

    async fn execute(&self, m: GetUpdates) -> Result<Self::Ok, Self::Err> {
        self.call(&m).await
    }
}

impl Telegram<SendGame> for Client {
    type Ok = <SendGame as Method>::Response;
    type Err = Traced<Error>;

    async fn execute(&self, m: SendGame) -> Result<Self::Ok, Self::Err> {
        self.call(&m).await
    }
}

impl Telegram<AnswerCallbackQuery> for Client {
    type Ok = <AnswerCallbackQuery as Method>::Response;
    type Err = Traced<Error>;

    async fn execute(
        &self,
        m: AnswerCallbackQuery,
    ) -> Result<Self::Ok, Self::Err> {
        self.call(&m).await
    }
}

impl Telegram<SetGameScore> for Client {
    type Ok = <SetGameScore as Method>::Response;
    type Err = Traced<Error>;

    /// Returns the whole response body, not only its `result`.
    async fn execute(&self, m: SetGameScore) -> Result<Self::Ok, Self::Err> {
        let response = self.send(&m).await?;
        let status = response.status();
        let body = response
            .json::<serde_json::Value>()
            .await
            .map_err(reqwest::Error::without_url)
            .map_err(tracerr::from_and_wrap!(=> Error))?;

        if !status.is_success() {
            return Err(tracerr::new!(Error::Api {
                code: i64::from(status.as_u16()),
                description: body
                    .get("description")
                    .and_then(serde_json::Value::as_str)
                    .or_else(|| status.canonical_reason())
                    .unwrap_or("unknown error")
                    .to_owned(),
            }));
        }
        Ok(body)
    }
}

/// Envelope of every Telegram Bot API response.
#[derive(Debug, Deserialize)]
struct Response<T> {
    /// Indicator whether the request was successful.
    ok: bool,

    /// Result of a successful request.
    result: Option<T>,

    /// Description of a failed request.
    description: Option<String>,

    /// Error code of a failed request.
    error_code: Option<i64>,
}

impl<T> Response<T> {
    /// Converts this [`Response`] into a [`Result`].
    fn into_result(self) -> Result<T, Error> {
        let Self {
            ok,
            result,
            description,
            error_code,
        } = self;

        match result {
            Some(result) if ok => Ok(result),
            _ => Err(Error::Api {
                code: error_code.unwrap_or_default(),
                description: description
                    .unwrap_or_else(|| "empty response".to_owned()),
            }),
        }
    }
}
