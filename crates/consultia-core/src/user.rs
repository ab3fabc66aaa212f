//! Authenticated user descriptor forwarded by the browser.

use serde::{Deserialize, Serialize};

use crate::ids::UserId;

/// Identity already established by the external auth provider.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<UserId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl AuthUser {
    /// Provider-issued id, ignoring empty strings.
    pub fn user_id(&self) -> Option<&UserId> {
        self.id.as_ref().filter(|id| !id.as_str().trim().is_empty())
    }

    /// Email, ignoring empty strings.
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref().filter(|e| !e.trim().is_empty())
    }

    /// Returns true if the caller identified themselves by id or email.
    pub fn has_identity(&self) -> bool {
        self.user_id().is_some() || self.email().is_some()
    }
}
