//! ConsultIA Server Library
//!
//! The chat relay backend: forwards expert conversations to the completion
//! provider and persists them when a store is configured.

pub mod config;
pub mod http;
pub mod persistence;
pub mod provider;
pub mod relay;
pub mod state;

pub use config::Config;
pub use http::create_router;
pub use persistence::{persist_exchange, ChatStore, StoreError, SupabaseStore};
pub use provider::{CompletionProvider, GroqClient, ProviderError};
pub use relay::{ChatRelay, RelayError, RelaySettings};
pub use state::AppState;
