//! [`Command`] for reacting on an incoming [`telegram::Update`].

use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{domain::chat, infra::telegram, Service};

use super::{launch_game, send_game, Command, LaunchGame, SendGame};

/// [`Command`] dispatching an incoming [`telegram::Update`] to the
/// [`Command`] reacting on it.
#[derive(Clone, Debug, From)]
pub struct HandleUpdate {
    /// [`telegram::Update`] to handle.
    pub update: telegram::Update,
}

/// Output of [`HandleUpdate`] [`Command`].
#[derive(Clone, Debug)]
pub enum Output {
    /// [`telegram::Update`] requires no reaction.
    Skipped,

    /// Game has been rendered in reply to a chat command.
    GameSent,

    /// Play request has been processed.
    Launch(launch_game::Output),
}

impl<Db, Tg> Command<HandleUpdate> for Service<Db, Tg>
where
    Self: Command<SendGame, Ok = (), Err = Traced<send_game::ExecutionError>>
        + Command<
            LaunchGame,
            Ok = launch_game::Output,
            Err = Traced<launch_game::ExecutionError>,
        >,
{
    type Ok = Output;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: HandleUpdate) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let telegram::Update {
            update_id: _,
            message,
            callback_query,
        } = cmd.update;

        if let Some(query) = callback_query {
            return self
                .execute(LaunchGame { query })
                .await
                .map(Output::Launch)
                .map_err(tracerr::map_from_and_wrap!(=> E));
        }

        let Some(message) = message else {
            return Ok(Output::Skipped);
        };
        let bot = self.config().bot_username.as_deref();
        let command = message
            .text
            .as_deref()
            .and_then(|text| chat::Command::parse(text, bot));
        if command.is_none() {
            return Ok(Output::Skipped);
        }

        self.execute(SendGame {
            chat_id: message.chat.id,
        })
        .await
        .map_err(tracerr::map_from_and_wrap!(=> E))?;
        Ok(Output::GameSent)
    }
}

/// Error of [`HandleUpdate`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`SendGame`] [`Command`] failed.
    #[display("Failed to render the game: {_0}")]
    SendGame(send_game::ExecutionError),

    /// [`LaunchGame`] [`Command`] failed.
    #[display("Failed to launch the game: {_0}")]
    LaunchGame(launch_game::ExecutionError),
}
