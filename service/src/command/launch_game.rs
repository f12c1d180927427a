//! [`Command`] for launching the game on a play request.

use common::operations::Insert;
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{session, Session},
    infra::{database, telegram, Database, Telegram},
    Service,
};

use super::Command;

/// [`Command`] for launching the game when a user presses its "Play" button.
///
/// Creates a new [`Session`] and answers the [`telegram::CallbackQuery`] with
/// the game URL carrying the [`session::Token`].
#[derive(Clone, Debug, From)]
pub struct LaunchGame {
    /// Play request to react on.
    pub query: telegram::CallbackQuery,
}

/// Output of [`LaunchGame`] [`Command`].
#[derive(Clone, Debug)]
pub enum Output {
    /// Play request is for another game, so it has only been acknowledged.
    Ignored,

    /// New [`Session`] has been started.
    Started {
        /// [`session::Token`] of the started [`Session`].
        token: session::Token,

        /// URL the user's client has been navigated to.
        url: String,
    },
}

impl<Db, Tg> Command<LaunchGame> for Service<Db, Tg>
where
    Db: Database<Insert<Session>, Ok = (), Err = Traced<database::Error>>,
    Tg: Telegram<
        telegram::AnswerCallbackQuery,
        Ok = bool,
        Err = Traced<telegram::Error>,
    >,
{
    type Ok = Output;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: LaunchGame) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let telegram::CallbackQuery {
            id,
            from,
            message,
            game_short_name,
        } = cmd.query;

        let game = &self.config().game;
        if game_short_name.as_ref() != Some(&game.short_name) {
            log::debug!(
                "ignoring play request `{id}` for foreign game {:?}",
                game_short_name.as_ref().map(AsRef::<str>::as_ref),
            );
            _ = self
                .telegram()
                .execute(telegram::AnswerCallbackQuery {
                    callback_query_id: id,
                    url: None,
                })
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?;
            return Ok(Output::Ignored);
        }

        let message = message
            .ok_or(E::MessageMissing)
            .map_err(tracerr::wrap!())?;

        let session = Session {
            token: session::Token::generate(),
            user_id: from.id,
            chat_id: message.chat.id,
            message_id: message.message_id,
            created_at: session::CreationDateTime::now(),
        };
        let token = session.token.clone();
        let (user_id, chat_id) = (session.user_id, session.chat_id);

        self.database()
            .execute(Insert(session))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let url = game.url.launch(&token);
        _ = self
            .telegram()
            .execute(telegram::AnswerCallbackQuery {
                callback_query_id: id,
                url: Some(url.clone()),
            })
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        log::info!(
            "`Session` started for `User(id: {user_id})` \
             in `Chat(id: {chat_id})`",
        );
        Ok(Output::Started { token, url })
    }
}

/// Error of [`LaunchGame`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`Telegram`] error.
    #[display("`Telegram` operation failed: {_0}")]
    Telegram(telegram::Error),

    /// Play request is not attached to a chat message, so there is no
    /// leaderboard to report a score into.
    #[display("Play request has no originating `Message`")]
    MessageMissing,
}

#[cfg(test)]
mod spec {
    use common::operations::{By, Select};

    use crate::{
        command::Command as _,
        domain::{session, Session},
        infra::{
            telegram::{
                self,
                fake::{Call, Fake},
            },
            Database as _,
        },
        spec::{play_request, service},
    };

    use super::{ExecutionError, LaunchGame, Output};

    #[tokio::test]
    async fn starts_session_of_triggering_user() {
        let tg = Fake::default();
        let (svc, _) = service(tg.clone());

        let out = svc
            .execute(LaunchGame {
                query: play_request("q1", Some("devicegame")),
            })
            .await
            .unwrap();

        let Output::Started { token, url } = out else {
            panic!("session is not started: {out:?}");
        };
        assert_eq!(
            url,
            format!("https://example.github.io/game/?token={token}"),
        );

        let stored: Option<Session> = svc
            .database()
            .execute(Select(By::new(&token)))
            .await
            .unwrap();
        let stored = stored.expect("session is not stored");
        assert_eq!(stored.user_id, 1_i64.into());
        assert_eq!(stored.chat_id, 2_i64.into());
        assert_eq!(stored.message_id, 3_i64.into());

        assert_eq!(
            tg.calls(),
            [Call::AnswerCallbackQuery(telegram::AnswerCallbackQuery {
                callback_query_id: "q1".into(),
                url: Some(url),
            })],
        );
    }

    #[tokio::test]
    async fn issues_distinct_tokens_per_launch() {
        let (svc, _) = service(Fake::default());

        let mut tokens = Vec::<session::Token>::new();
        for _ in 0..2 {
            match svc
                .execute(LaunchGame {
                    query: play_request("q", Some("devicegame")),
                })
                .await
                .unwrap()
            {
                Output::Started { token, .. } => tokens.push(token),
                Output::Ignored => panic!("session is not started"),
            }
        }

        assert_ne!(tokens[0], tokens[1]);
        assert_eq!(svc.database().len(), 2);
    }

    #[tokio::test]
    async fn only_acknowledges_foreign_game() {
        let tg = Fake::default();
        let (svc, _) = service(tg.clone());

        for name in [Some("othergame"), None] {
            let out = svc
                .execute(LaunchGame {
                    query: play_request("q2", name),
                })
                .await
                .unwrap();
            assert!(matches!(out, Output::Ignored));
        }

        assert!(svc.database().is_empty());
        assert_eq!(tg.calls().len(), 2);
        assert!(tg.calls().iter().all(|call| {
            *call
                == Call::AnswerCallbackQuery(telegram::AnswerCallbackQuery {
                    callback_query_id: "q2".into(),
                    url: None,
                })
        }));
    }

    #[tokio::test]
    async fn fails_without_originating_message() {
        let tg = Fake::default();
        let (svc, _) = service(tg.clone());
        let mut query = play_request("q3", Some("devicegame"));
        query.message = None;

        let err = svc.execute(LaunchGame { query }).await.unwrap_err();

        assert!(matches!(err.as_ref(), ExecutionError::MessageMissing));
        assert!(svc.database().is_empty());
        assert!(tg.calls().is_empty());
    }

    #[tokio::test]
    async fn reports_platform_failure() {
        let (svc, _) = service(Fake::failing());

        let err = svc
            .execute(LaunchGame {
                query: play_request("q4", Some("devicegame")),
            })
            .await
            .unwrap_err();

        assert!(matches!(err.as_ref(), ExecutionError::Telegram(_)));
    }
}
