//! Client-side chat sessions, one per expert.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::chat::ChatMessage;
use crate::ids::ChatId;

/// Who wrote a session message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Expert,
}

/// A message as displayed in the chat window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionMessage {
    pub id: String,
    pub sender: Sender,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl SessionMessage {
    pub fn new(sender: Sender, content: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            sender,
            content: content.into(),
            timestamp,
        }
    }
}

/// Conversation with a single expert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatSession {
    pub expert_id: String,
    #[serde(default)]
    pub messages: Vec<SessionMessage>,
    /// Server-issued chat id, once the relay has persisted the conversation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chat_id: Option<ChatId>,
}

impl ChatSession {
    pub fn new(expert_id: impl Into<String>) -> Self {
        Self {
            expert_id: expert_id.into(),
            messages: Vec::new(),
            chat_id: None,
        }
    }

    pub fn last_activity(&self) -> Option<DateTime<Utc>> {
        self.messages.last().map(|m| m.timestamp)
    }

    /// Conversation in relay wire format.
    pub fn to_chat_messages(&self) -> Vec<ChatMessage> {
        self.messages
            .iter()
            .map(|m| match m.sender {
                Sender::User => ChatMessage::user(m.content.clone()),
                Sender::Expert => ChatMessage::assistant(m.content.clone()),
            })
            .collect()
    }
}

/// Dashboard summary over all sessions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionMetrics {
    pub total_consultations: usize,
    pub active_chats: usize,
    pub total_messages: usize,
    pub weekly_progress: u8,
}

impl SessionMetrics {
    /// Summarize sessions; a chat is active if its last message is under 24h old.
    pub fn compute<'a>(
        sessions: impl IntoIterator<Item = &'a ChatSession>,
        now: DateTime<Utc>,
    ) -> Self {
        let mut metrics = Self::default();
        for session in sessions {
            metrics.total_consultations += 1;
            metrics.total_messages += session.messages.len();
            if let Some(last) = session.last_activity() {
                if now - last < Duration::hours(24) {
                    metrics.active_chats += 1;
                }
            }
        }
        metrics.weekly_progress = (metrics.total_consultations * 20).min(100) as u8;
        metrics
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::ChatRole;

    #[test]
    fn test_to_chat_messages_maps_senders() {
        let now = Utc::now();
        let mut session = ChatSession::new("joao-crm");
        session.messages.push(SessionMessage::new(Sender::User, "oi", now));
        session.messages.push(SessionMessage::new(Sender::Expert, "olá", now));

        let wire = session.to_chat_messages();
        assert_eq!(wire[0].role, ChatRole::User);
        assert_eq!(wire[1].role, ChatRole::Assistant);
        assert_eq!(wire[1].content, "olá");
    }

    #[test]
    fn test_metrics() {
        let now = Utc::now();
        let mut recent = ChatSession::new("a");
        recent.messages.push(SessionMessage::new(Sender::User, "x", now - Duration::hours(1)));
        recent.messages.push(SessionMessage::new(Sender::Expert, "y", now));
        let mut stale = ChatSession::new("b");
        stale.messages.push(SessionMessage::new(Sender::User, "z", now - Duration::days(3)));
        let empty = ChatSession::new("c");

        let metrics = SessionMetrics::compute([&recent, &stale, &empty], now);

        assert_eq!(metrics.total_consultations, 3);
        assert_eq!(metrics.active_chats, 1);
        assert_eq!(metrics.total_messages, 3);
        assert_eq!(metrics.weekly_progress, 60);
    }

    #[test]
    fn test_weekly_progress_caps_at_100() {
        let sessions: Vec<_> = (0..8).map(|i| ChatSession::new(i.to_string())).collect();
        let metrics = SessionMetrics::compute(&sessions, Utc::now());
        assert_eq!(metrics.weekly_progress, 100);
    }
}
