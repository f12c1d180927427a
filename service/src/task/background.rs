//! Background environment for running [`Task`]s.

use std::{
    error::Error,
    future::{Future, IntoFuture},
    iter,
};

use derive_more::Display;
use futures::{
    future::{self, LocalBoxFuture},
    FutureExt as _, TryFutureExt as _,
};
use tokio::task;

#[cfg(doc)]
use crate::Task;

/// Background environment for running [`Task`]s.
///
/// Spawned [`Task`]s don't need to be [`Send`], as they're all driven on the
/// thread awaiting this [`Background`].
#[derive(Debug, Default)]
pub struct Background {
    /// Local set of tasks.
    set: task::LocalSet,

    /// Names and handles of spawned tasks.
    handles: Vec<(&'static str, task::JoinHandle<Result<(), Box<dyn Error>>>)>,
}

impl Background {
    /// Spawns a new named [`Task`] inside the [`Background`] environment.
    pub fn spawn<F, E>(&mut self, name: &'static str, future: F)
    where
        F: Future<Output = Result<(), E>> + 'static,
        E: Error + 'static,
    {
        let handle = self.set.spawn_local(
            future.map_err(|e| Box::<dyn Error + 'static>::from(Box::new(e))),
        );
        self.handles.push((name, handle));
    }

    /// Returns names of the spawned [`Task`]s.
    #[cfg(test)]
    pub(crate) fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.handles.iter().map(|(name, _)| *name)
    }
}

impl IntoFuture for Background {
    type Output = Result<(), Failure>;
    type IntoFuture = LocalBoxFuture<'static, Self::Output>;

    fn into_future(self) -> Self::IntoFuture {
        let Self { set, handles } = self;
        future::try_join_all(iter::once(set.map(Ok).boxed_local()).chain(
            handles.into_iter().map(|(task, h)| {
                h.map(move |r| match r {
                    Ok(Ok(())) => Ok(()),
                    Ok(Err(source)) => Err(Failure { task, source }),
                    Err(e) => Err(Failure {
                        task,
                        source: Box::new(e),
                    }),
                })
                .boxed_local()
            }),
        ))
        .map_ok(drop)
        .boxed_local()
    }
}

/// Failure of a [`Task`] running in a [`Background`].
#[derive(Debug, Display)]
#[display("`{task}` task failed: {source}")]
pub struct Failure {
    /// Name of the failed [`Task`].
    pub task: &'static str,

    /// Error the [`Task`] failed with.
    pub source: Box<dyn Error>,
}

impl Error for Failure {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&*self.source)
    }
}
