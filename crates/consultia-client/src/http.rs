//! HTTP client for the relay backend.

use reqwest::Response;
use serde::de::DeserializeOwned;
use tracing::debug;

use consultia_core::{
    AuthUser, ChatId, ChatMessage, ChatRequest, ChatResponse, ErrorBody, ExpertContext,
    HealthResponse, StatusResponse,
};

use crate::error::ClientError;

/// HTTP client for the ConsultIA API.
pub struct ApiClient {
    inner: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Create a new client. `base_url` includes any path prefix, e.g. `http://host/api`.
    pub fn new(base_url: &str) -> Self {
        Self {
            inner: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Send a conversation to an expert.
    pub async fn send_chat(
        &self,
        messages: &[ChatMessage],
        expert: &ExpertContext,
        auth_user: Option<&AuthUser>,
        chat_id: Option<&ChatId>,
    ) -> Result<ChatResponse, ClientError> {
        let url = format!("{}/chat", self.base_url);
        debug!(url = %url, messages = messages.len(), "POST chat");

        let request = ChatRequest {
            messages: messages.to_vec(),
            expert_context: expert.clone(),
            chat_id: chat_id.cloned(),
            auth_user: auth_user.cloned(),
        };

        let response = self.inner.post(&url).json(&request).send().await?;
        Self::decode(response).await
    }

    /// Fetch `/health`.
    pub async fn health(&self) -> Result<HealthResponse, ClientError> {
        self.get_json("/health").await
    }

    /// Fetch `/status`.
    pub async fn status(&self) -> Result<StatusResponse, ClientError> {
        self.get_json("/status").await
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let url = format!("{}{}", self.base_url, path);
        debug!(url = %url, "GET request");

        let response = self.inner.get(&url).send().await?;
        Self::decode(response).await
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(ClientError::Api {
                status: status.as_u16(),
                message: error_message(status, &text),
            });
        }

        response
            .json()
            .await
            .map_err(|e| ClientError::Serialization(e.to_string()))
    }
}

/// Compose a readable message from an error response body.
fn error_message(status: reqwest::StatusCode, text: &str) -> String {
    let described = match serde_json::from_str::<ErrorBody>(text) {
        Ok(body) => body.describe(),
        Err(_) => Some(text.trim().to_string()).filter(|t| !t.is_empty()),
    };
    described.unwrap_or_else(|| match status.canonical_reason() {
        Some(reason) => format!("HTTP {}: {}", status.as_u16(), reason),
        None => format!("HTTP {}", status.as_u16()),
    })
}
