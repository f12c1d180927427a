//! [`Database`]-related implementations.

pub mod memory;

use derive_more::{Display, Error as StdError};

pub use self::memory::InMemory;

/// Database operation.
pub use common::Handler as Database;

/// [`Database`] error.
#[derive(Clone, Copy, Debug, Display, StdError)]
pub enum Error {
    /// [`Session`] with the same [`Token`] is still live.
    ///
    /// [`Session`]: crate::domain::Session
    /// [`Token`]: crate::domain::session::Token
    #[display("`Session` with the same `Token` already exists")]
    TokenOccupied,
}
