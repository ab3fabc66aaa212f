//! Chat sessions per expert, with dashboard metrics.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use consultia_core::{ChatId, ChatSession, Sender, SessionMessage, SessionMetrics};

use crate::error::ClientError;
use crate::store::{load_json, save_json, LocalStore, SESSIONS_KEY};

/// Sessions keyed by expert id, backed by a [`LocalStore`].
pub struct SessionStore<S: LocalStore> {
    store: S,
    sessions: BTreeMap<String, ChatSession>,
}

impl<S: LocalStore> SessionStore<S> {
    /// Load sessions; missing or corrupt data starts empty.
    pub fn load(store: S) -> Self {
        let sessions = load_json(&store, SESSIONS_KEY).unwrap_or_default();
        Self { store, sessions }
    }

    pub fn get(&self, expert_id: &str) -> Option<&ChatSession> {
        self.sessions.get(expert_id)
    }

    /// Store a session, replacing any previous one for the same expert.
    pub fn save(&mut self, session: ChatSession) -> Result<(), ClientError> {
        self.sessions.insert(session.expert_id.clone(), session);
        self.persist()
    }

    /// Append a message to an expert's session, creating it if needed.
    pub fn append(
        &mut self,
        expert_id: &str,
        sender: Sender,
        content: impl Into<String>,
        at: DateTime<Utc>,
    ) -> Result<&SessionMessage, ClientError> {
        self.sessions
            .entry(expert_id.to_string())
            .or_insert_with(|| ChatSession::new(expert_id))
            .messages
            .push(SessionMessage::new(sender, content, at));
        self.persist()?;

        self.sessions
            .get(expert_id)
            .and_then(|s| s.messages.last())
            .ok_or_else(|| ClientError::Storage(format!("session {} vanished", expert_id)))
    }

    /// Server-issued chat id for an expert's conversation.
    pub fn chat_id(&self, expert_id: &str) -> Option<&ChatId> {
        self.sessions.get(expert_id)?.chat_id.as_ref()
    }

    pub fn set_chat_id(&mut self, expert_id: &str, chat_id: ChatId) -> Result<(), ClientError> {
        self.sessions
            .entry(expert_id.to_string())
            .or_insert_with(|| ChatSession::new(expert_id))
            .chat_id = Some(chat_id);
        self.persist()
    }

    pub fn all(&self) -> impl Iterator<Item = &ChatSession> {
        self.sessions.values()
    }

    /// Drop every session.
    pub fn clear(&mut self) -> Result<(), ClientError> {
        self.sessions.clear();
        self.store.remove(SESSIONS_KEY)
    }

    pub fn metrics(&self, now: DateTime<Utc>) -> SessionMetrics {
        SessionMetrics::compute(self.sessions.values(), now)
    }

    fn persist(&self) -> Result<(), ClientError> {
        save_json(&self.store, SESSIONS_KEY, &self.sessions)
    }
}
