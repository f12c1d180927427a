//! Infrastructure layer.

pub mod database;
pub mod telegram;

pub use self::{
    database::{Database, InMemory},
    telegram::Telegram,
};
