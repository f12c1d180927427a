//! [`Handler`] abstractions.

use std::future::Future;

/// Executable handler.
///
/// Commands, background tasks, storage operations and outbound platform calls
/// are all [`Handler`]s parametrized by the operation they execute, so a
/// single type may handle many different operations.
pub trait Handler<Args = ()> {
    /// Type of successful [`Handler`] result.
    type Ok;

    /// Type of this [`Handler`] error.
    type Err;

    /// Executes this [`Handler`] with the provided arguments.
    fn execute(
        &self,
        args: Args,
    ) -> impl Future<Output = Result<Self::Ok, Self::Err>>;
}
