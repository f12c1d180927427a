//! In-memory [`Database`] implementation.

use std::sync::Arc;

use common::operations::{By, Delete, Insert, Select, Take};
use dashmap::{mapref::entry::Entry, DashMap};
use tracerr::Traced;

use crate::{
    domain::{session, Session},
    infra::{database, Database},
};

/// In-memory [`Database`] keeping [`Session`]s for the process lifetime.
///
/// Clones share the same storage.
#[derive(Clone, Debug, Default)]
pub struct InMemory {
    /// [`Session`]s indexed by their [`session::Token`]s.
    sessions: Arc<DashMap<session::Token, Session>>,
}

impl InMemory {
    /// Returns the number of live [`Session`]s.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Indicates whether there are no live [`Session`]s.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

impl Database<Insert<Session>> for InMemory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(session): Insert<Session>,
    ) -> Result<Self::Ok, Self::Err> {
        match self.sessions.entry(session.token.clone()) {
            Entry::Occupied(_) => {
                Err(tracerr::new!(database::Error::TokenOccupied))
            }
            Entry::Vacant(entry) => {
                drop(entry.insert(session));
                Ok(())
            }
        }
    }
}

impl Database<Select<By<Option<Session>, &session::Token>>> for InMemory {
    type Ok = Option<Session>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Session>, &session::Token>>,
    ) -> Result<Self::Ok, Self::Err> {
        Ok(self
            .sessions
            .get(by.into_inner())
            .map(|entry| entry.value().clone()))
    }
}

impl Database<Take<By<Option<Session>, &session::Token>>> for InMemory {
    type Ok = Option<Session>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Take(by): Take<By<Option<Session>, &session::Token>>,
    ) -> Result<Self::Ok, Self::Err> {
        Ok(self
            .sessions
            .remove(by.into_inner())
            .map(|(_, session)| session))
    }
}

impl Database<Delete<By<Session, &session::Token>>> for InMemory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Session, &session::Token>>,
    ) -> Result<Self::Ok, Self::Err> {
        drop(self.sessions.remove(by.into_inner()));
        Ok(())
    }
}

impl Database<Delete<By<Session, session::CreationDateTime>>> for InMemory {
    /// Number of deleted [`Session`]s.
    type Ok = usize;
    type Err = Traced<database::Error>;

    /// Deletes all [`Session`]s created before the provided deadline.
    async fn execute(
        &self,
        Delete(by): Delete<By<Session, session::CreationDateTime>>,
    ) -> Result<Self::Ok, Self::Err> {
        let deadline = by.into_inner();
        let mut deleted = 0;
        self.sessions.retain(|_, session| {
            let keep = session.created_at >= deadline;
            if !keep {
                deleted += 1;
            }
            keep
        });
        Ok(deleted)
    }
}

#[cfg(test)]
mod spec {
    use std::time::Duration;

    use common::operations::{By, Delete, Insert, Select, Take};

    use crate::{
        domain::{session, Session},
        infra::{database, Database as _},
    };

    use super::InMemory;

    fn session(token: &str, created_at: session::CreationDateTime) -> Session {
        Session {
            token: session::Token::new(token).unwrap(),
            user_id: 1_i64.into(),
            chat_id: 2_i64.into(),
            message_id: 3_i64.into(),
            created_at,
        }
    }

    #[tokio::test]
    async fn takes_session_only_once() {
        let db = InMemory::default();
        let token = session::Token::new("abc").unwrap();
        db.execute(Insert(session("abc", session::CreationDateTime::now())))
            .await
            .unwrap();

        let taken: Option<Session> =
            db.execute(Take(By::new(&token))).await.unwrap();
        assert_eq!(taken.unwrap().token, token);

        let again: Option<Session> =
            db.execute(Take(By::new(&token))).await.unwrap();
        assert!(again.is_none());
        assert!(db.is_empty());
    }

    #[tokio::test]
    async fn refuses_to_overwrite_live_token() {
        let db = InMemory::default();
        let now = session::CreationDateTime::now();
        db.execute(Insert(session("abc", now))).await.unwrap();

        let mut other = session("abc", now);
        other.user_id = 42_i64.into();
        let err = db.execute(Insert(other)).await.unwrap_err();
        assert!(matches!(
            err.as_ref(),
            database::Error::TokenOccupied,
        ));

        let token = session::Token::new("abc").unwrap();
        let kept: Option<Session> =
            db.execute(Select(By::new(&token))).await.unwrap();
        assert_eq!(kept.unwrap().user_id, 1_i64.into());
    }

    #[tokio::test]
    async fn deletes_by_token() {
        let db = InMemory::default();
        let token = session::Token::new("abc").unwrap();
        db.execute(Insert(session("abc", session::CreationDateTime::now())))
            .await
            .unwrap();

        db.execute(Delete(By::<Session, _>::new(&token)))
            .await
            .unwrap();

        assert!(db.is_empty());
    }

    #[tokio::test]
    async fn deletes_sessions_created_before_deadline() {
        let db = InMemory::default();
        let now = session::CreationDateTime::now();
        let hour = Duration::from_secs(60 * 60);
        db.execute(Insert(session("old", now - hour))).await.unwrap();
        db.execute(Insert(session("new", now))).await.unwrap();

        let deleted = db
            .execute(Delete(By::<Session, _>::new(now - hour / 2)))
            .await
            .unwrap();

        assert_eq!(deleted, 1);
        assert_eq!(db.len(), 1);
        let token = session::Token::new("new").unwrap();
        let kept: Option<Session> =
            db.execute(Select(By::new(&token))).await.unwrap();
        assert!(kept.is_some());
    }
}
