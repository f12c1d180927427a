//! Recording [`Telegram`] fake.

use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
};

use serde_json::json;
use tracerr::Traced;

use super::{
    AnswerCallbackQuery, Chat, Error, GetUpdates, Message, SendGame,
    SetGameScore, Telegram, Update,
};

/// Call received by a [`Fake`].
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Call {
    GetUpdates(GetUpdates),
    SendGame(SendGame),
    AnswerCallbackQuery(AnswerCallbackQuery),
    SetGameScore(SetGameScore),
}

/// [`Telegram`] recording every call and answering with canned responses.
#[derive(Clone, Debug, Default)]
pub(crate) struct Fake {
    calls: Arc<Mutex<Vec<Call>>>,
    updates: Arc<Mutex<VecDeque<Vec<Update>>>>,
    failing: bool,
}

impl Fake {
    /// Creates a [`Fake`] rejecting every call.
    pub(crate) fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    /// Queues a batch of [`Update`]s returned by the next `getUpdates`.
    pub(crate) fn push_updates(&self, batch: Vec<Update>) {
        self.updates.lock().unwrap().push_back(batch);
    }

    /// Returns all the calls received so far.
    pub(crate) fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) -> Result<(), Traced<Error>> {
        self.calls.lock().unwrap().push(call);
        if self.failing {
            return Err(tracerr::new!(Error::Api {
                code: 502,
                description: "Bad Gateway".to_owned(),
            }));
        }
        Ok(())
    }
}

impl Telegram<GetUpdates> for Fake {
    type Ok = Vec<Update>;
    type Err = Traced<Error>;

    async fn execute(&self, m: GetUpdates) -> Result<Self::Ok, Self::Err> {
        self.record(Call::GetUpdates(m))?;
        Ok(self.updates.lock().unwrap().pop_front().unwrap_or_default())
    }
}

impl Telegram<SendGame> for Fake {
    type Ok = Message;
    type Err = Traced<Error>;

    async fn execute(&self, m: SendGame) -> Result<Self::Ok, Self::Err> {
        let chat = Chat { id: m.chat_id };
        self.record(Call::SendGame(m))?;
        Ok(Message {
            message_id: 1_i64.into(),
            chat,
            text: None,
        })
    }
}

impl Telegram<AnswerCallbackQuery> for Fake {
    type Ok = bool;
    type Err = Traced<Error>;

    async fn execute(
        &self,
        m: AnswerCallbackQuery,
    ) -> Result<Self::Ok, Self::Err> {
        self.record(Call::AnswerCallbackQuery(m))?;
        Ok(true)
    }
}

impl Telegram<SetGameScore> for Fake {
    type Ok = serde_json::Value;
    type Err = Traced<Error>;

    async fn execute(&self, m: SetGameScore) -> Result<Self::Ok, Self::Err> {
        self.record(Call::SetGameScore(m))?;
        Ok(json!({"ok": true, "result": true}))
    }
}
