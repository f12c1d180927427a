//! [`Command`] for rendering the game into a chat.

use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::chat,
    infra::{telegram, Telegram},
    Service,
};

use super::Command;

/// [`Command`] for rendering the game with a "Play" button into a chat.
#[derive(Clone, Copy, Debug, From)]
pub struct SendGame {
    /// ID of the chat to render the game into.
    pub chat_id: chat::Id,
}

impl<Db, Tg> Command<SendGame> for Service<Db, Tg>
where
    Tg: Telegram<
        telegram::SendGame,
        Ok = telegram::Message,
        Err = Traced<telegram::Error>,
    >,
{
    type Ok = ();
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: SendGame) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let SendGame { chat_id } = cmd;

        let message = self
            .telegram()
            .execute(telegram::SendGame {
                chat_id,
                game_short_name: self.config().game.short_name.clone(),
            })
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        log::debug!(
            "game rendered as `Message(id: {})` in `Chat(id: {chat_id})`",
            message.message_id,
        );
        Ok(())
    }
}

/// Error of [`SendGame`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Telegram`] error.
    #[display("`Telegram` operation failed: {_0}")]
    Telegram(telegram::Error),
}
