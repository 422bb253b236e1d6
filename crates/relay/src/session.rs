//! Conversation sessions for the guided booking flow.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

/// Step of the guided booking flow, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    SelectService,
    EnterName,
    EnterPhone,
    EnterDate,
    EnterTime,
    EnterNote,
    Confirm,
}

/// Fields collected so far.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookingDraft {
    /// Service label, e.g. `Combo VIP - 350K`.
    pub service: Option<String>,
    pub name: Option<String>,
    pub phone: Option<String>,
    /// Display format `dd/mm/yyyy`.
    pub date: Option<String>,
    /// `HH:MM`.
    pub time: Option<String>,
    pub note: Option<String>,
}

/// In-progress booking conversation for one chat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub step: Step,
    pub draft: BookingDraft,
    /// Platform display name of the chat partner.
    pub display_name: String,
}

impl Session {
    /// Fresh session at the first step.
    pub fn start(display_name: impl Into<String>) -> Self {
        Self {
            step: Step::SelectService,
            draft: BookingDraft::default(),
            display_name: display_name.into(),
        }
    }

    /// Same session advanced to `step`.
    pub fn advance(mut self, step: Step) -> Self {
        self.step = step;
        self
    }
}

/// Keyed storage for sessions.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn get(&self, chat_id: &str) -> Option<Session>;

    async fn put(&self, chat_id: &str, session: Session);

    async fn delete(&self, chat_id: &str);

    /// Number of active sessions.
    async fn len(&self) -> usize;

    async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

/// Process-local session map; contents are lost on restart.
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<String, Session>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn get(&self, chat_id: &str) -> Option<Session> {
        self.sessions.read().await.get(chat_id).cloned()
    }

    async fn put(&self, chat_id: &str, session: Session) {
        self.sessions
            .write()
            .await
            .insert(chat_id.to_string(), session);
    }

    async fn delete(&self, chat_id: &str) {
        self.sessions.write().await.remove(chat_id);
    }

    async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}
