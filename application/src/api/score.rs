//! Score submission endpoint.

use axum::{extract::rejection::JsonRejection, Extension, Json};
use serde::Serialize;
use serde_json::Value;
use service::{
    command::{submit_score, Command as _, SubmitScore},
    domain::session,
};

use crate::{api::RequestError, AsError, Error, Service};

/// Validated score submission of a game client.
#[derive(Clone, Debug)]
pub struct Submission {
    /// Token the game has been launched with.
    pub token: session::Token,

    /// Submitted score.
    pub score: f64,
}

impl Submission {
    /// Validates the provided JSON request body.
    ///
    /// A `token` that is not a string is looked up by its JSON text, so it
    /// never matches any issued [`session::Token`].
    ///
    /// # Errors
    ///
    /// With [`RequestError::Invalid`] if the `token` is absent, `null`,
    /// `false`, `0` or an empty string, or the `score` is not a number.
    pub fn parse(body: &Value) -> Result<Self, RequestError> {
        let token = match body.get("token") {
            None | Some(Value::Null | Value::Bool(false)) => None,
            Some(Value::Number(n)) if n.as_f64() == Some(0.0) => None,
            Some(Value::String(s)) => session::Token::new(s.as_str()),
            Some(other) => session::Token::new(other.to_string()),
        };
        let score = body
            .get("score")
            .filter(|s| s.is_number())
            .and_then(Value::as_f64);

        match (token, score) {
            (Some(token), Some(score)) => Ok(Self { token, score }),
            _ => Err(RequestError::Invalid),
        }
    }
}

/// Body of a successful score submission response.
#[derive(Debug, Serialize)]
pub struct Submitted {
    /// Always `true`.
    pub ok: bool,

    /// Raw response of the Telegram Bot API.
    pub telegram_response: Value,
}

/// `POST /score` handler reporting the score of a launched game.
///
/// # Errors
///
/// - `400 invalid` if the request body is malformed;
/// - `400 session not found` if the token is unknown or already used;
/// - `500` if the Telegram Bot API call failed.
pub async fn submit(
    Extension(service): Extension<Service>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Submitted>, Error> {
    let Json(body) = body.map_err(AsError::into_error)?;
    let Submission { token, score } = Submission::parse(&body)?;

    let telegram_response = service
        .execute(SubmitScore { token, score })
        .await
        .map_err(AsError::into_error)?;

    Ok(Json(Submitted {
        ok: true,
        telegram_response,
    }))
}

impl AsError for JsonRejection {
    fn try_as_error(&self) -> Option<Error> {
        Some(RequestError::Invalid.into())
    }
}

impl AsError for submit_score::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::SessionNotFound => Some(RequestError::SessionNotFound.into()),
            Self::Db(_) | Self::Telegram(_) => None,
        }
    }
}
