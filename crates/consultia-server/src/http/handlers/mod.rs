//! HTTP request handlers.

mod chat;
mod health;

pub use chat::{chat, parse_chat_request};
pub use health::{health_check, not_found, service_status, SERVICE_NAME};
