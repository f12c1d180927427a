//! [`Command`] definition.

pub mod handle_update;
pub mod launch_game;
pub mod send_game;
pub mod submit_score;

/// [`Command`] of the [`Service`].
///
/// [`Service`]: crate::Service
pub use common::Handler as Command;

pub use self::{
    handle_update::HandleUpdate, launch_game::LaunchGame, send_game::SendGame,
    submit_score::SubmitScore,
};
