//! Shared application state.

use std::sync::Arc;

use tracing::{info, warn};

use crate::config::Config;
use crate::http::OriginPolicy;
use crate::persistence::{ChatStore, SupabaseStore};
use crate::provider::{CompletionProvider, GroqClient};
use crate::relay::{ChatRelay, RelaySettings};

/// Shared application state. Immutable after startup.
pub struct AppState {
    /// Provider and persistence handles.
    pub relay: ChatRelay,

    /// Browser origins allowed by CORS.
    pub cors: OriginPolicy,
}

impl AppState {
    /// Create a new AppState wrapped in Arc.
    pub fn new(relay: ChatRelay, cors: OriginPolicy) -> Arc<Self> {
        Arc::new(Self { relay, cors })
    }

    /// Build the state from configuration.
    ///
    /// The provider exists only with an API key and the store only with both
    /// Supabase settings; either may be absent.
    pub fn from_config(config: &Config) -> Arc<Self> {
        let provider = config.groq_api_key().map(|key| {
            Arc::new(GroqClient::new(&config.groq_api_url, key)) as Arc<dyn CompletionProvider>
        });

        let store = config.supabase_credentials().and_then(|(url, key)| {
            match SupabaseStore::new(url, key, config.supabase_timeout()) {
                Ok(store) => {
                    info!("Chat persistence enabled");
                    Some(Arc::new(store) as Arc<dyn ChatStore>)
                }
                Err(e) => {
                    warn!(error = %e, "Failed to build store client - chat persistence disabled");
                    None
                }
            }
        });

        let relay = ChatRelay::new(provider, store, RelaySettings::from(config));
        Self::new(relay, OriginPolicy::from_origins(config.origins()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unconfigured_state() {
        let state = AppState::from_config(&Config::default());
        assert!(!state.relay.is_configured());
        assert!(!state.relay.persistence_enabled());
        assert!(state.cors.allows("http://localhost:5173"));
    }

    #[test]
    fn test_fully_configured_state() {
        let config = Config {
            groq_api_key: Some("gsk_test".into()),
            supabase_url: Some("https://proj.supabase.co".into()),
            supabase_service_role_key: Some("service".into()),
            groq_model: "llama-3.3-70b-versatile".into(),
            ..Default::default()
        };
        let state = AppState::from_config(&config);
        assert!(state.relay.is_configured());
        assert!(state.relay.persistence_enabled());
        assert_eq!(state.relay.settings().model, "llama-3.3-70b-versatile");
    }
}
