//! Background [`Task`]s definitions.

mod background;
pub mod clean_stale_sessions;
pub mod poll_updates;

pub use common::Handler as Task;

pub use self::{
    background::Background, clean_stale_sessions::CleanStaleSessions,
    poll_updates::PollUpdates,
};
