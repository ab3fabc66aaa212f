//! Supabase (PostgREST) implementation of the chat store.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::{Method, RequestBuilder, Response};
use serde::{Deserialize, Serialize};
use tracing::debug;

use consultia_core::{AuthUser, ChatId, ChatRole, ExpertContext, UserId};

use super::{ChatStore, StoreError};

const USERS_TABLE: &str = "users_app";
const CHATS_TABLE: &str = "chats";
const MESSAGES_TABLE: &str = "chat_messages";

/// Sent with every request so store-side logs can attribute traffic.
const APPLICATION_NAME: &str = "consultia-api";

#[derive(Debug, Deserialize)]
struct IdRow {
    id: String,
}

#[derive(Debug, Serialize)]
struct UserRow<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<&'a str>,
    email: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
    updated_at: String,
}

#[derive(Debug, Serialize)]
struct ChatRow<'a> {
    user_id: Option<&'a str>,
    expert_context: serde_json::Value,
    created_at: String,
    updated_at: String,
}

#[derive(Debug, Serialize)]
struct MessageRow<'a> {
    chat_id: &'a str,
    role: &'static str,
    content: &'a str,
    created_at: String,
}

/// Chat store backed by a Supabase project's REST endpoint.
pub struct SupabaseStore {
    inner: reqwest::Client,
    rest_url: String,
    service_key: String,
}

impl SupabaseStore {
    /// Create a store for the project at `url`, authenticating with the service role key.
    pub fn new(url: &str, service_key: &str, timeout: Duration) -> Result<Self, StoreError> {
        let inner = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            inner,
            rest_url: format!("{}/rest/v1", url.trim_end_matches('/')),
            service_key: service_key.to_string(),
        })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.inner
            .request(method, format!("{}/{}", self.rest_url, path))
            .header("apikey", &self.service_key)
            .bearer_auth(&self.service_key)
            .header("x-application-name", APPLICATION_NAME)
    }

    async fn check(response: Response) -> Result<Response, StoreError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response.text().await.unwrap_or_default();
        Err(StoreError::Status {
            status: status.as_u16(),
            message,
        })
    }

    /// Decode the first row id of a `return=representation` response.
    async fn first_id(response: Response, table: &'static str) -> Result<String, StoreError> {
        let rows: Vec<IdRow> = response
            .json()
            .await
            .map_err(|e| StoreError::Decode(e.to_string()))?;
        rows.into_iter()
            .next()
            .map(|row| row.id)
            .ok_or(StoreError::EmptyResult(table))
    }
}

#[async_trait]
impl ChatStore for SupabaseStore {
    async fn upsert_user(&self, user: &AuthUser) -> Result<UserId, StoreError> {
        let email = user.email().ok_or(StoreError::MissingEmail)?;
        let row = UserRow {
            id: user.user_id().map(UserId::as_str),
            email,
            name: user.name.as_deref(),
            updated_at: Utc::now().to_rfc3339(),
        };

        let response = self
            .request(Method::POST, &format!("{}?on_conflict=email", USERS_TABLE))
            .header("Prefer", "return=representation,resolution=merge-duplicates")
            .json(&[row])
            .send()
            .await?;

        let id = Self::first_id(Self::check(response).await?, USERS_TABLE).await?;
        debug!(user_id = %id, "Upserted user");
        Ok(UserId::new(id))
    }

    async fn create_chat(
        &self,
        user_id: Option<&UserId>,
        expert: &ExpertContext,
    ) -> Result<ChatId, StoreError> {
        let now = Utc::now().to_rfc3339();
        let row = ChatRow {
            user_id: user_id.map(UserId::as_str),
            expert_context: serde_json::to_value(expert)
                .map_err(|e| StoreError::Decode(e.to_string()))?,
            created_at: now.clone(),
            updated_at: now,
        };

        let response = self
            .request(Method::POST, CHATS_TABLE)
            .header("Prefer", "return=representation")
            .json(&row)
            .send()
            .await?;

        let id = Self::first_id(Self::check(response).await?, CHATS_TABLE).await?;
        Ok(ChatId::new(id))
    }

    async fn insert_message(
        &self,
        chat_id: &ChatId,
        role: ChatRole,
        content: &str,
    ) -> Result<(), StoreError> {
        let row = MessageRow {
            chat_id: chat_id.as_str(),
            role: role.as_str(),
            content,
            created_at: Utc::now().to_rfc3339(),
        };

        let response = self
            .request(Method::POST, MESSAGES_TABLE)
            .header("Prefer", "return=minimal")
            .json(&row)
            .send()
            .await?;

        Self::check(response).await?;
        Ok(())
    }
}
