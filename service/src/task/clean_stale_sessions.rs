//! [`CleanStaleSessions`] [`Task`].

use std::{convert::Infallible, error::Error, time};

use common::operations::{By, Delete, Perform, Start};
use tokio::time::interval;
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{session, Session},
    infra::{database, Database},
    Service,
};

use super::Task;

/// Configuration for [`CleanStaleSessions`] [`Task`].
#[derive(Clone, Copy, Debug)]
pub struct Config {
    /// Interval between [`Session`]s cleaning.
    pub interval: time::Duration,

    /// Age after which a not consumed [`Session`] is considered abandoned.
    pub ttl: time::Duration,
}

/// [`Task`] for deleting [`Session`]s whose game has never reported a score.
#[derive(Clone, Copy, Debug)]
pub struct CleanStaleSessions<S> {
    /// [`Config`] of this [`Task`].
    config: Config,

    /// [`Service`] instance.
    service: S,
}

impl<Db, Tg> Task<Start<By<CleanStaleSessions<Self>, Config>>>
    for Service<Db, Tg>
where
    CleanStaleSessions<Service<Db, Tg>>:
        Task<Perform<()>, Ok = usize, Err: Error> + 'static,
    Self: Clone,
{
    type Ok = ();
    type Err = Infallible;

    async fn execute(
        &self,
        Start(by): Start<By<CleanStaleSessions<Self>, Config>>,
    ) -> Result<Self::Ok, Self::Err> {
        let task = CleanStaleSessions {
            config: by.into_inner(),
            service: self.clone(),
        };

        let mut interval = interval(task.config.interval);
        loop {
            let _ = interval.tick().await;
            match task.execute(Perform(())).await {
                Ok(0) => {}
                Ok(n) => log::info!("deleted {n} stale `Session`s"),
                Err(e) => {
                    log::error!("`task::CleanStaleSessions` failed: {e}");
                }
            }
        }
    }
}

impl<Db, Tg> Task<Perform<()>> for CleanStaleSessions<Service<Db, Tg>>
where
    Db: Database<
        Delete<By<Session, session::CreationDateTime>>,
        Ok = usize,
        Err = Traced<database::Error>,
    >,
{
    /// Number of deleted [`Session`]s.
    type Ok = usize;
    type Err = ExecutionError;

    async fn execute(&self, _: Perform<()>) -> Result<Self::Ok, Self::Err> {
        let deadline = session::CreationDateTime::now() - self.config.ttl;
        self.service
            .database()
            .execute(Delete(By::new(deadline)))
            .await
            .map_err(tracerr::wrap!())
    }
}

/// Error of [`CleanStaleSessions`] execution.
pub type ExecutionError = Traced<database::Error>;
