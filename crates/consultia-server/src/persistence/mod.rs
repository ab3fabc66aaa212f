//! Best-effort chat persistence.
//!
//! The relay hands every successful exchange to [`persist_exchange`], which
//! writes the user, chat and message rows through a [`ChatStore`]. Failures
//! are logged and swallowed; the caller only learns the chat id, if any.

mod supabase;

pub use supabase::SupabaseStore;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, warn};

use consultia_core::{AuthUser, ChatId, ChatRequest, ChatRole, ExpertContext, UserId};

/// Errors from the chat store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store could not be reached.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The store rejected the request.
    #[error("store returned HTTP {status}: {message}")]
    Status { status: u16, message: String },

    /// The store answered with an unexpected body.
    #[error("invalid store response: {0}")]
    Decode(String),

    /// Users are keyed by email; one is required to upsert.
    #[error("user has no email")]
    MissingEmail,

    /// A write that should return a row returned none.
    #[error("no row returned from {0}")]
    EmptyResult(&'static str),
}

/// Relational store holding users, chats and chat messages.
#[async_trait]
pub trait ChatStore: Send + Sync {
    /// Insert or update the user keyed by email, returning its id.
    async fn upsert_user(&self, user: &AuthUser) -> Result<UserId, StoreError>;

    /// Create a chat row and return the issued id.
    async fn create_chat(
        &self,
        user_id: Option<&UserId>,
        expert: &ExpertContext,
    ) -> Result<ChatId, StoreError>;

    /// Append one message to a chat.
    async fn insert_message(
        &self,
        chat_id: &ChatId,
        role: ChatRole,
        content: &str,
    ) -> Result<(), StoreError>;
}

/// Resolve the user row for the caller.
///
/// Users are upserted on `email`. A caller that only supplied an id keeps
/// that id without a write, and the supplied id is also the fallback when the
/// upsert fails.
async fn resolve_user(store: &dyn ChatStore, user: &AuthUser) -> Option<UserId> {
    if !user.has_identity() {
        return None;
    }
    let supplied = user.user_id().cloned();
    if user.email().is_none() {
        return supplied;
    }

    match store.upsert_user(user).await {
        Ok(id) => Some(id),
        Err(e) => {
            warn!(error = %e, "Failed to upsert user");
            supplied
        }
    }
}

/// Persist one relayed exchange and return the chat id it was stored under.
///
/// Steps run in order and each tolerates the failure of the previous ones;
/// message inserts are skipped only when no chat id could be resolved.
pub async fn persist_exchange(
    store: &dyn ChatStore,
    request: &ChatRequest,
    reply: &str,
) -> Option<ChatId> {
    let user_id = match &request.auth_user {
        Some(user) => resolve_user(store, user).await,
        None => None,
    };

    let chat_id = match &request.chat_id {
        Some(id) => Some(id.clone()),
        None => match store
            .create_chat(user_id.as_ref(), &request.expert_context)
            .await
        {
            Ok(id) => {
                debug!(chat_id = %id, "Created chat");
                Some(id)
            }
            Err(e) => {
                warn!(error = %e, "Failed to create chat");
                None
            }
        },
    };

    let Some(chat_id) = chat_id else {
        warn!("No chat id resolved, skipping message persistence");
        return None;
    };

    if let Some(message) = request.latest_user_message() {
        if let Err(e) = store
            .insert_message(&chat_id, ChatRole::User, &message.content)
            .await
        {
            warn!(chat_id = %chat_id, error = %e, "Failed to insert user message");
        }
    }

    if !reply.is_empty() {
        if let Err(e) = store
            .insert_message(&chat_id, ChatRole::Assistant, reply)
            .await
        {
            warn!(chat_id = %chat_id, error = %e, "Failed to insert assistant message");
        }
    }

    Some(chat_id)
}
