//! Chat relay: persona prompt, one bounded provider call, then persistence.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tracing::{info, warn};

use consultia_core::{ChatRequest, ChatResponse};

use crate::config::Config;
use crate::persistence::{persist_exchange, ChatStore};
use crate::provider::{CompletionProvider, CompletionRequest, ProviderError};

/// Errors surfaced to the caller of the relay.
#[derive(Debug, Error)]
pub enum RelayError {
    /// No provider API key configured.
    #[error("completion provider not configured")]
    NotConfigured,

    /// The provider did not answer within the timeout.
    #[error("provider timed out after {0:?}")]
    Timeout(Duration),

    /// The provider call failed.
    #[error(transparent)]
    Provider(#[from] ProviderError),
}

/// Parameters of every outbound completion.
#[derive(Debug, Clone)]
pub struct RelaySettings {
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub timeout: Duration,
}

impl From<&Config> for RelaySettings {
    fn from(config: &Config) -> Self {
        Self {
            model: config.groq_model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
            timeout: config.groq_timeout(),
        }
    }
}

impl Default for RelaySettings {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

/// Forwards conversations to the completion provider.
pub struct ChatRelay {
    provider: Option<Arc<dyn CompletionProvider>>,
    store: Option<Arc<dyn ChatStore>>,
    settings: RelaySettings,
}

impl ChatRelay {
    pub fn new(
        provider: Option<Arc<dyn CompletionProvider>>,
        store: Option<Arc<dyn ChatStore>>,
        settings: RelaySettings,
    ) -> Self {
        Self {
            provider,
            store,
            settings,
        }
    }

    /// Returns true if a provider is available.
    pub fn is_configured(&self) -> bool {
        self.provider.is_some()
    }

    /// Returns true if exchanges are persisted.
    pub fn persistence_enabled(&self) -> bool {
        self.store.is_some()
    }

    pub fn settings(&self) -> &RelaySettings {
        &self.settings
    }

    /// Build the provider payload: persona system prompt followed by the conversation.
    pub fn build_request(&self, request: &ChatRequest) -> CompletionRequest {
        CompletionRequest {
            model: self.settings.model.clone(),
            messages: request.expert_context.augment(&request.messages),
            max_tokens: self.settings.max_tokens,
            temperature: self.settings.temperature,
        }
    }

    /// Relay one conversation turn.
    pub async fn relay(&self, request: ChatRequest) -> Result<ChatResponse, RelayError> {
        let provider = self.provider.as_ref().ok_or(RelayError::NotConfigured)?;
        let payload = self.build_request(&request);

        let completion = tokio::time::timeout(self.settings.timeout, provider.complete(&payload))
            .await
            .map_err(|_| {
                warn!(timeout = ?self.settings.timeout, "Completion request timed out");
                RelayError::Timeout(self.settings.timeout)
            })??;

        let message = completion.first_text();
        info!(
            model = completion.model.as_deref().unwrap_or(&self.settings.model),
            total_tokens = completion.usage.as_ref().map(|u| u.total_tokens),
            "Completion received"
        );

        let chat_id = match &self.store {
            Some(store) => persist_exchange(store.as_ref(), &request, &message).await,
            None => None,
        };

        Ok(ChatResponse {
            message,
            usage: completion.usage,
            chat_id,
        })
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Scripted completion providers.

    use std::sync::Mutex;

    use async_trait::async_trait;
    use serde_json::json;

    use super::*;
    use crate::provider::CompletionResponse;

    /// Provider that replays a fixed outcome and records requests.
    pub struct ScriptedProvider {
        pub reply: Result<serde_json::Value, (u16, serde_json::Value)>,
        pub delay: Duration,
        pub requests: Mutex<Vec<CompletionRequest>>,
    }

    impl ScriptedProvider {
        pub fn answering(text: &str) -> Self {
            Self {
                reply: Ok(json!({
                    "id": "cmpl-1",
                    "model": "llama-3.1-8b-instant",
                    "choices": [{"index": 0, "message": {"role": "assistant", "content": text}, "finish_reason": "stop"}],
                    "usage": {"prompt_tokens": 10, "completion_tokens": 5, "total_tokens": 15}
                })),
                delay: Duration::ZERO,
                requests: Mutex::new(Vec::new()),
            }
        }

        pub fn failing(status: u16, body: serde_json::Value) -> Self {
            Self {
                reply: Err((status, body)),
                delay: Duration::ZERO,
                requests: Mutex::new(Vec::new()),
            }
        }

        pub fn stalled(delay: Duration) -> Self {
            Self {
                delay,
                ..Self::answering("late")
            }
        }
    }

    #[async_trait]
    impl CompletionProvider for ScriptedProvider {
        async fn complete(
            &self,
            request: &CompletionRequest,
        ) -> Result<CompletionResponse, ProviderError> {
            self.requests.lock().unwrap().push(request.clone());
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            match &self.reply {
                Ok(body) => serde_json::from_value(body.clone())
                    .map_err(|e| ProviderError::Decode(e.to_string())),
                Err((status, body)) => Err(ProviderError::Status {
                    status: *status,
                    body: body.clone(),
                }),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::ScriptedProvider;
    use super::*;
    use crate::persistence::testing::{Call, RecordingStore};
    use consultia_core::{ChatId, ChatMessage, ChatRole, ExpertContext};
    use serde_json::json;

    fn request() -> ChatRequest {
        ChatRequest::new(
            vec![ChatMessage::user("Como reduzir custos?")],
            ExpertContext::new("Henrique", "Analista de custos e precificação"),
        )
    }

    fn relay_with(
        provider: ScriptedProvider,
        store: Option<Arc<RecordingStore>>,
    ) -> (ChatRelay, Arc<ScriptedProvider>) {
        let provider = Arc::new(provider);
        let relay = ChatRelay::new(
            Some(provider.clone()),
            store.map(|s| s as Arc<dyn ChatStore>),
            RelaySettings::default(),
        );
        (relay, provider)
    }

    #[tokio::test]
    async fn test_payload_has_persona_and_settings() {
        let (relay, provider) = relay_with(ScriptedProvider::answering("ok"), None);

        relay.relay(request()).await.unwrap();

        let sent = provider.requests.lock().unwrap()[0].clone();
        assert_eq!(sent.model, "llama-3.1-8b-instant");
        assert_eq!(sent.max_tokens, 1000);
        assert_eq!(sent.messages.len(), 2);
        assert_eq!(sent.messages[0].role, ChatRole::System);
        assert!(sent.messages[0].content.contains("Henrique"));
        assert_eq!(sent.messages[1].content, "Como reduzir custos?");
    }

    #[tokio::test]
    async fn test_reply_without_store_has_no_chat_id() {
        let (relay, _) = relay_with(ScriptedProvider::answering("Revise fornecedores"), None);

        let reply = relay.relay(request()).await.unwrap();

        assert_eq!(reply.message, "Revise fornecedores");
        assert_eq!(reply.usage.unwrap().total_tokens, 15);
        assert_eq!(reply.chat_id, None);
    }

    #[tokio::test]
    async fn test_reply_with_store_returns_chat_id() {
        let store = Arc::new(RecordingStore::default());
        let (relay, _) = relay_with(ScriptedProvider::answering("ok"), Some(store.clone()));

        let reply = relay.relay(request()).await.unwrap();

        assert_eq!(reply.chat_id, Some(ChatId::new("new-chat")));
        assert_eq!(store.calls().len(), 3);
    }

    #[tokio::test]
    async fn test_upstream_error_is_not_persisted() {
        let store = Arc::new(RecordingStore::default());
        let (relay, _) = relay_with(
            ScriptedProvider::failing(429, json!({"error": {"message": "rate limited"}})),
            Some(store.clone()),
        );

        let err = relay.relay(request()).await.unwrap_err();

        assert!(matches!(
            err,
            RelayError::Provider(ProviderError::Status { status: 429, .. })
        ));
        assert!(store.calls().is_empty());
    }

    #[tokio::test]
    async fn test_stalled_provider_times_out() {
        let settings = RelaySettings {
            timeout: Duration::from_millis(50),
            ..Default::default()
        };
        let relay = ChatRelay::new(
            Some(Arc::new(ScriptedProvider::stalled(Duration::from_secs(5)))),
            None,
            settings,
        );

        let err = relay.relay(request()).await.unwrap_err();

        assert!(matches!(err, RelayError::Timeout(d) if d == Duration::from_millis(50)));
    }

    #[tokio::test]
    async fn test_unconfigured_relay() {
        let relay = ChatRelay::new(None, None, RelaySettings::default());
        assert!(!relay.is_configured());
        assert!(matches!(
            relay.relay(request()).await,
            Err(RelayError::NotConfigured)
        ));
    }

    #[tokio::test]
    async fn test_store_failure_does_not_fail_relay() {
        let store = Arc::new(RecordingStore {
            fail_create: true,
            ..Default::default()
        });
        let (relay, _) = relay_with(ScriptedProvider::answering("ok"), Some(store.clone()));

        let reply = relay.relay(request()).await.unwrap();

        assert_eq!(reply.message, "ok");
        assert_eq!(reply.chat_id, None);
        assert_eq!(store.calls(), vec![Call::CreateChat(None)]);
    }
}
