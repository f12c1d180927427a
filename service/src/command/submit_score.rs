//! [`Command`] for submitting a game score.

use common::operations::{By, Take};
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{game, session, Session},
    infra::{database, telegram, Database, Telegram},
    Service,
};

use super::Command;

/// [`Command`] for submitting a score of the game launched by a [`Session`].
///
/// The [`Session`] is consumed before the score is reported, so its
/// [`session::Token`] can never be replayed, even if reporting fails.
#[derive(Clone, Debug)]
pub struct SubmitScore {
    /// [`session::Token`] issued on the game launch.
    pub token: session::Token,

    /// Submitted score, floored before being reported.
    pub score: f64,
}

impl<Db, Tg> Command<SubmitScore> for Service<Db, Tg>
where
    Db: for<'t> Database<
        Take<By<Option<Session>, &'t session::Token>>,
        Ok = Option<Session>,
        Err = Traced<database::Error>,
    >,
    Tg: Telegram<
        telegram::SetGameScore,
        Ok = serde_json::Value,
        Err = Traced<telegram::Error>,
    >,
{
    /// Raw response of the Telegram Bot API.
    type Ok = serde_json::Value;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: SubmitScore) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let SubmitScore { token, score } = cmd;

        let session = self
            .database()
            .execute(Take(By::new(&token)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::SessionNotFound)
            .map_err(tracerr::wrap!())?;

        let score = game::Score::floor(score);
        log::info!(
            "`Session` of `User(id: {})` consumed with score {score}",
            session.user_id,
        );

        self.telegram()
            .execute(telegram::SetGameScore {
                user_id: session.user_id,
                chat_id: session.chat_id,
                message_id: session.message_id,
                score,
                force: true,
            })
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
    }
}

/// Error of [`SubmitScore`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`Telegram`] error.
    #[display("`Telegram` operation failed: {_0}")]
    Telegram(telegram::Error),

    /// [`Session`] is unknown, already consumed or expired.
    #[display("`Session` not found")]
    SessionNotFound,
}

#[cfg(test)]
mod spec {
    use common::operations::Insert;
    use serde_json::json;

    use crate::{
        command::Command as _,
        domain::{game, session, Session},
        infra::{
            telegram::{
                self,
                fake::{Call, Fake},
            },
            Database as _, InMemory,
        },
        spec::service,
    };

    use super::{ExecutionError, SubmitScore};

    async fn start_session(db: &InMemory, token: &str) -> session::Token {
        let token = session::Token::new(token).unwrap();
        db.execute(Insert(Session {
            token: token.clone(),
            user_id: 1_i64.into(),
            chat_id: 2_i64.into(),
            message_id: 3_i64.into(),
            created_at: session::CreationDateTime::now(),
        }))
        .await
        .unwrap();
        token
    }

    #[tokio::test]
    async fn reports_floored_score_of_session() {
        let tg = Fake::default();
        let (svc, _) = service(tg.clone());
        let token = start_session(svc.database(), "abc").await;

        let response = svc
            .execute(SubmitScore { token, score: 7.9 })
            .await
            .unwrap();

        assert_eq!(response, json!({"ok": true, "result": true}));
        assert_eq!(
            tg.calls(),
            [Call::SetGameScore(telegram::SetGameScore {
                user_id: 1_i64.into(),
                chat_id: 2_i64.into(),
                message_id: 3_i64.into(),
                score: game::Score::floor(7.0),
                force: true,
            })],
        );
    }

    #[tokio::test]
    async fn rejects_replayed_token() {
        let tg = Fake::default();
        let (svc, _) = service(tg.clone());
        let token = start_session(svc.database(), "abc").await;

        svc.execute(SubmitScore {
            token: token.clone(),
            score: 10.0,
        })
        .await
        .unwrap();
        let err = svc
            .execute(SubmitScore { token, score: 10.0 })
            .await
            .unwrap_err();

        assert!(matches!(err.as_ref(), ExecutionError::SessionNotFound));
        assert_eq!(tg.calls().len(), 1);
    }

    #[tokio::test]
    async fn rejects_unknown_token() {
        let tg = Fake::default();
        let (svc, _) = service(tg.clone());

        let err = svc
            .execute(SubmitScore {
                token: session::Token::new("never-issued").unwrap(),
                score: 1.0,
            })
            .await
            .unwrap_err();

        assert!(matches!(err.as_ref(), ExecutionError::SessionNotFound));
        assert!(tg.calls().is_empty());
    }

    #[tokio::test]
    async fn consumes_session_even_if_reporting_fails() {
        let (svc, _) = service(Fake::failing());
        let token = start_session(svc.database(), "abc").await;

        let err = svc
            .execute(SubmitScore {
                token: token.clone(),
                score: 5.0,
            })
            .await
            .unwrap_err();
        assert!(matches!(err.as_ref(), ExecutionError::Telegram(_)));

        let err = svc
            .execute(SubmitScore { token, score: 5.0 })
            .await
            .unwrap_err();
        assert!(matches!(err.as_ref(), ExecutionError::SessionNotFound));
    }
}
