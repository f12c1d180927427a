//! Service contains the business logic of relaying game scores into
//! Telegram leaderboards.
//!
//! List of available Cargo features:
#![doc = document_features::document_features!()]
#![deny(
    nonstandard_style,
    rust_2018_idioms,
    rustdoc::all,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code
)]
#![forbid(non_ascii_idents)]
#![warn(
    clippy::allow_attributes,
    clippy::allow_attributes_without_reason,
    clippy::pedantic,
    clippy::wildcard_enum_match_arm,
    deprecated_in_future,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    unreachable_pub,
    unused_crate_dependencies,
    unused_import_braces,
    unused_labels,
    unused_lifetimes,
    unused_qualifications,
    unused_results
)]

pub mod command;
pub mod domain;
pub mod infra;
pub mod task;

use std::error::Error;

use common::operations::{By, Start};

#[cfg(doc)]
use infra::{Database, Telegram};

pub use self::{command::Command, task::Task};

/// [`Service`] configuration.
#[derive(Clone, Debug)]
pub struct Config {
    /// Configuration of the relayed game.
    pub game: domain::game::Config,

    /// Username of the bot, addressing chat commands like `/game@username`.
    ///
    /// [`None`] makes the bot react on commands addressed to any username.
    pub bot_username: Option<String>,

    /// [`task::PollUpdates`] configuration.
    pub poll_updates: task::poll_updates::Config,

    /// [`task::CleanStaleSessions`] configuration.
    ///
    /// [`None`] disables the [`task::CleanStaleSessions`], so abandoned
    /// sessions live until the process exits.
    pub clean_stale_sessions: Option<task::clean_stale_sessions::Config>,
}

/// Domain service.
#[derive(Clone, Debug)]
pub struct Service<Db, Tg> {
    /// Configuration of this [`Service`].
    config: Config,

    /// [`Database`] of this [`Service`].
    database: Db,

    /// [`Telegram`] client of this [`Service`].
    telegram: Tg,
}

impl<Db, Tg> Service<Db, Tg> {
    /// Creates a new [`Service`] with the provided parameters, along with
    /// the [`task::Background`] running its [`Task`]s.
    pub fn new(
        config: Config,
        database: Db,
        telegram: Tg,
    ) -> (Self, task::Background)
    where
        Self: Task<
                Start<By<task::PollUpdates<Self>, task::poll_updates::Config>>,
                Ok = (),
                Err: Error,
            > + Task<
                Start<
                    By<
                        task::CleanStaleSessions<Self>,
                        task::clean_stale_sessions::Config,
                    >,
                >,
                Ok = (),
                Err: Error,
            > + Clone
            + 'static,
    {
        let this = Service {
            config,
            database,
            telegram,
        };

        let mut bg = task::Background::default();

        let svc = this.clone();
        bg.spawn("PollUpdates", async move {
            let config = svc.config().poll_updates;
            svc.execute(Start(By::<task::PollUpdates<Self>, _>::new(config)))
                .await
        });

        if let Some(config) = this.config().clean_stale_sessions {
            let svc = this.clone();
            bg.spawn("CleanStaleSessions", async move {
                svc.execute(Start(
                    By::<task::CleanStaleSessions<Self>, _>::new(config),
                ))
                .await
            });
        }

        (this, bg)
    }

    /// Returns [`Config`] of this [`Service`].
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns [`Database`] of this [`Service`].
    #[must_use]
    pub fn database(&self) -> &Db {
        &self.database
    }

    /// Returns [`Telegram`] client of this [`Service`].
    #[must_use]
    pub fn telegram(&self) -> &Tg {
        &self.telegram
    }
}

#[cfg(test)]
mod spec {
    use std::time::Duration;

    use crate::{
        domain::game,
        infra::{
            telegram::{self, fake::Fake},
            InMemory,
        },
        task, Config,
    };

    /// [`crate::Service`] backed by test infrastructure.
    pub(crate) type Service = crate::Service<InMemory, Fake>;

    pub(crate) fn config() -> Config {
        Config {
            game: game::Config {
                url: "https://example.github.io/game/"
                    .to_owned()
                    .try_into()
                    .unwrap(),
                short_name: "devicegame".to_owned().into(),
            },
            bot_username: None,
            poll_updates: task::poll_updates::Config {
                timeout: Duration::from_secs(30),
                retry_delay: Duration::from_secs(1),
            },
            clean_stale_sessions: None,
        }
    }

    pub(crate) fn service(tg: Fake) -> (Service, task::Background) {
        Service::new(config(), InMemory::default(), tg)
    }

    pub(crate) fn chat_message(text: &str) -> telegram::Message {
        telegram::Message {
            message_id: 3_i64.into(),
            chat: telegram::Chat { id: 2_i64.into() },
            text: Some(text.to_owned()),
        }
    }

    pub(crate) fn play_request(
        id: &str,
        game: Option<&str>,
    ) -> telegram::CallbackQuery {
        telegram::CallbackQuery {
            id: id.into(),
            from: telegram::User { id: 1_i64.into() },
            message: Some(telegram::Message {
                text: None,
                ..chat_message("")
            }),
            game_short_name: game.map(|g| g.to_owned().into()),
        }
    }

    #[tokio::test]
    async fn spawns_cleaning_only_when_configured() {
        let (_, bg) = service(Fake::default());
        assert_eq!(bg.names().collect::<Vec<_>>(), ["PollUpdates"]);

        let mut config = config();
        config.clean_stale_sessions =
            Some(task::clean_stale_sessions::Config {
                interval: Duration::from_secs(60),
                ttl: Duration::from_secs(60 * 60),
            });
        let (_, bg) = Service::new(config, InMemory::default(), Fake::default());
        assert_eq!(
            bg.names().collect::<Vec<_>>(),
            ["PollUpdates", "CleanStaleSessions"],
        );
    }

    #[test]
    fn parses_updates_of_bot_api() {
        let update: telegram::Update = serde_json::from_value(
            serde_json::json!({
                "update_id": 7,
                "callback_query": {
                    "id": "4382bfdwdsb323b2d9",
                    "from": {"id": 1, "is_bot": false, "first_name": "A"},
                    "message": {
                        "message_id": 3,
                        "date": 0,
                        "chat": {"id": 2, "type": "private"},
                    },
                    "chat_instance": "-1",
                    "game_short_name": "devicegame",
                },
            }),
        )
        .unwrap();

        let query = update.callback_query.unwrap();
        assert_eq!(query.id.as_ref(), "4382bfdwdsb323b2d9");
        assert_eq!(query.from.id, 1_i64.into());
        assert_eq!(query.message.unwrap().chat.id, 2_i64.into());
        assert_eq!(
            query.game_short_name,
            Some("devicegame".to_owned().into()),
        );
        assert!(update.message.is_none());
    }
}
