//! Client library for ConsultIA.
//!
//! Provides the HTTP client for the relay backend and the key/value backed
//! stores for goals, the company profile and chat sessions.

pub mod error;
pub mod goals;
pub mod http;
pub mod profile;
pub mod sessions;
pub mod store;

pub use error::ClientError;
pub use goals::GoalStore;
pub use http::ApiClient;
pub use profile::ProfileStore;
pub use sessions::SessionStore;
pub use store::{FileStore, LocalStore, MemoryStore};
