//! Completion provider client.
//!
//! The relay talks to the model through [`CompletionProvider`]; the production
//! implementation is [`GroqClient`], which speaks the OpenAI-compatible
//! `chat/completions` protocol.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use consultia_core::{ChatMessage, Usage};

/// Errors returned by a completion provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The provider answered with a non-2xx status.
    #[error("provider returned HTTP {status}")]
    Status {
        status: u16,
        /// Parsed JSON body, or the raw text when it is not JSON.
        body: Value,
    },

    /// Network or protocol failure before a response was received.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The response body could not be decoded.
    #[error("invalid provider response: {0}")]
    Decode(String),
}

/// Outbound completion payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
    pub temperature: f32,
}

/// Completion response; only the fields the relay reads.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CompletionResponse {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub choices: Option<Vec<Choice>>,
    #[serde(default)]
    pub usage: Option<Usage>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Choice {
    #[serde(default)]
    pub index: u32,
    #[serde(default)]
    pub message: Option<ChoiceMessage>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChoiceMessage {
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

impl CompletionResponse {
    /// Text of the first choice, empty when the provider returned none.
    pub fn first_text(&self) -> String {
        self.choices
            .as_deref()
            .and_then(<[Choice]>::first)
            .and_then(|c| c.message.as_ref())
            .and_then(|m| m.content.clone())
            .unwrap_or_default()
    }
}

/// A chat completion backend.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Issue exactly one completion request.
    async fn complete(
        &self,
        request: &CompletionRequest,
    ) -> Result<CompletionResponse, ProviderError>;
}

/// Groq chat completion client.
pub struct GroqClient {
    inner: reqwest::Client,
    api_url: String,
    api_key: String,
}

impl GroqClient {
    /// Create a new client for the given endpoint.
    pub fn new(api_url: &str, api_key: &str) -> Self {
        Self {
            inner: reqwest::Client::new(),
            api_url: api_url.to_string(),
            api_key: api_key.to_string(),
        }
    }
}

#[async_trait]
impl CompletionProvider for GroqClient {
    async fn complete(
        &self,
        request: &CompletionRequest,
    ) -> Result<CompletionResponse, ProviderError> {
        debug!(
            url = %self.api_url,
            model = %request.model,
            messages = request.messages.len(),
            "Sending completion request"
        );

        let response = self
            .inner
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let body = serde_json::from_str(&text).unwrap_or(Value::String(text));
            return Err(ProviderError::Status {
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str(&text).map_err(|e| ProviderError::Decode(e.to_string()))
    }
}
