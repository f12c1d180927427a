//! Domain definitions.

pub mod chat;
pub mod game;
pub mod session;
pub mod user;

pub use self::session::Session;
