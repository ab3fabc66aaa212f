//! Key/value persistence the client stores write through to.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

use crate::error::ClientError;

/// Key under which goals are stored.
pub const GOALS_KEY: &str = "business-goals";
/// Key under which the company profile is stored.
pub const PROFILE_KEY: &str = "company-profile";
/// Key under which chat sessions are stored.
pub const SESSIONS_KEY: &str = "chat-sessions";

/// String key/value storage.
pub trait LocalStore {
    fn get(&self, key: &str) -> Result<Option<String>, ClientError>;
    fn set(&self, key: &str, value: &str) -> Result<(), ClientError>;
    fn remove(&self, key: &str) -> Result<(), ClientError>;
}

impl<S: LocalStore + ?Sized> LocalStore for &S {
    fn get(&self, key: &str) -> Result<Option<String>, ClientError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), ClientError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), ClientError> {
        (**self).remove(key)
    }
}

/// Read and decode a JSON value. Missing, unreadable or corrupt data yields `None`.
pub(crate) fn load_json<T: DeserializeOwned>(store: &impl LocalStore, key: &str) -> Option<T> {
    let raw = match store.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            warn!(key, error = %e, "Failed to read local store");
            return None;
        }
    };
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(key, error = %e, "Discarding corrupt local data");
            None
        }
    }
}

/// Encode and write a JSON value.
pub(crate) fn save_json<T: Serialize>(
    store: &impl LocalStore,
    key: &str,
    value: &T,
) -> Result<(), ClientError> {
    store.set(key, &serde_json::to_string(value)?)
}
