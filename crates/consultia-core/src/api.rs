//! Wire types for the relay HTTP API, shared by server and client.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::chat::{ChatMessage, Usage};
use crate::expert::ExpertContext;
use crate::ids::ChatId;
use crate::user::AuthUser;

/// Body of `POST /chat`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    pub messages: Vec<ChatMessage>,
    pub expert_context: ExpertContext,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chat_id: Option<ChatId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_user: Option<AuthUser>,
}

impl ChatRequest {
    pub fn new(messages: Vec<ChatMessage>, expert_context: ExpertContext) -> Self {
        Self {
            messages,
            expert_context,
            chat_id: None,
            auth_user: None,
        }
    }

    /// The trailing message, if it was written by the user.
    pub fn latest_user_message(&self) -> Option<&ChatMessage> {
        self.messages
            .last()
            .filter(|m| m.role == crate::chat::ChatRole::User)
    }
}

/// Successful reply of `POST /chat`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chat_id: Option<ChatId>,
}

/// Body of `GET /health`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub ai_configured: bool,
}

impl HealthResponse {
    /// The service can answer chats.
    pub fn is_available(&self) -> bool {
        self.status == "ok" && self.ai_configured
    }
}

/// Body of `GET /status`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusResponse {
    pub service: String,
    pub version: String,
    pub status: String,
    pub features: FeatureFlags,
}

/// Optional capabilities of the running service.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FeatureFlags {
    pub chat: bool,
    pub persistence: bool,
    pub rate_limit: bool,
    pub cors: bool,
}

/// Error body returned with every non-2xx status.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    #[serde(default)]
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub param: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_status: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_error: Option<Value>,
}

impl ErrorBody {
    /// One-line description joining the error, provider status and provider details.
    pub fn describe(&self) -> Option<String> {
        let mut parts = Vec::new();
        if !self.error.is_empty() {
            parts.push(self.error.clone());
        }
        if let Some(status) = self.provider_status {
            parts.push(format!("Status do provedor: {}", status));
        }
        if let Some(detail) = &self.provider_error {
            let text = match detail {
                Value::String(s) => s.clone(),
                other => other
                    .get("error")
                    .and_then(|e| e.get("message").or(Some(e)))
                    .or_else(|| other.get("message"))
                    .and_then(Value::as_str)
                    .map(str::to_string)
                    .unwrap_or_else(|| other.to_string()),
            };
            parts.push(format!("Detalhes: {}", text));
        }
        if parts.is_empty() {
            None
        } else {
            Some(parts.join(" | "))
        }
    }
}
