//! [`PollUpdates`] [`Task`].

use std::{convert::Infallible, error::Error, time};

use common::operations::{By, Perform, Start};
use futures::{future, FutureExt as _};
use tracerr::Traced;
use tracing as log;

use crate::{
    command::{handle_update, Command, HandleUpdate},
    infra::{telegram, Telegram},
    Service,
};

use super::Task;

/// Configuration for [`PollUpdates`] [`Task`].
#[derive(Clone, Copy, Debug)]
pub struct Config {
    /// Long polling timeout of a single `getUpdates` request.
    pub timeout: time::Duration,

    /// Delay before polling again after a failure.
    pub retry_delay: time::Duration,
}

/// [`Task`] long polling the Telegram Bot API for [`telegram::Update`]s and
/// handling them.
#[derive(Clone, Copy, Debug)]
pub struct PollUpdates<S> {
    /// [`Config`] of this [`Task`].
    config: Config,

    /// [`Service`] instance.
    service: S,
}

impl<Db, Tg> Task<Start<By<PollUpdates<Self>, Config>>> for Service<Db, Tg>
where
    PollUpdates<Service<Db, Tg>>:
        Task<Perform<Option<i64>>, Ok = Option<i64>, Err: Error> + 'static,
    Self: Clone,
{
    type Ok = ();
    type Err = Infallible;

    async fn execute(
        &self,
        Start(by): Start<By<PollUpdates<Self>, Config>>,
    ) -> Result<Self::Ok, Self::Err> {
        let task = PollUpdates {
            config: by.into_inner(),
            service: self.clone(),
        };

        let mut offset = None;
        loop {
            match task.execute(Perform(offset)).await {
                Ok(next) => offset = next,
                Err(e) => {
                    log::error!("`task::PollUpdates` failed: {e}");
                    tokio::time::sleep(task.config.retry_delay).await;
                }
            }
        }
    }
}

/// Polls a single batch of [`telegram::Update`]s starting from the provided
/// offset, and returns the offset of the next batch.
impl<Db, Tg> Task<Perform<Option<i64>>> for PollUpdates<Service<Db, Tg>>
where
    Tg: Telegram<
        telegram::GetUpdates,
        Ok = Vec<telegram::Update>,
        Err = Traced<telegram::Error>,
    >,
    Service<Db, Tg>: Command<
        HandleUpdate,
        Ok = handle_update::Output,
        Err = Traced<handle_update::ExecutionError>,
    >,
{
    type Ok = Option<i64>;
    type Err = ExecutionError;

    async fn execute(
        &self,
        Perform(offset): Perform<Option<i64>>,
    ) -> Result<Self::Ok, Self::Err> {
        let updates = self
            .service
            .telegram()
            .execute(telegram::GetUpdates::new(offset, self.config.timeout))
            .await
            .map_err(tracerr::wrap!())?;

        let next = updates.iter().map(|u| u.update_id + 1).max().or(offset);

        // Failed updates are not retried, the platform treats them as
        // delivered once the offset moves past them.
        _ = future::join_all(updates.into_iter().map(|update| {
            let id = update.update_id;
            self.service.execute(HandleUpdate { update }).map(move |res| {
                if let Err(e) = res {
                    log::error!("failed to handle `Update(id: {id})`: {e}");
                }
            })
        }))
        .await;

        Ok(next)
    }
}

/// Error of [`PollUpdates`] execution.
pub type ExecutionError = Traced<telegram::Error>;
