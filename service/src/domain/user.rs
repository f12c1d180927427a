//! Telegram user definitions.

use derive_more::{Display, From, Into};
use serde::{Deserialize, Serialize};

/// ID of a Telegram user.
#[derive(
    Clone,
    Copy,
    Debug,
    Deserialize,
    Display,
    Eq,
    From,
    Hash,
    Into,
    PartialEq,
    Serialize,
)]
pub struct Id(i64);
