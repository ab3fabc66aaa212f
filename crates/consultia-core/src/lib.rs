//! ConsultIA Core Domain Types
//!
//! This crate contains pure domain types with no dependencies on:
//! - Network/HTTP
//! - Storage backends
//! - Runtime specifics
//!
//! Everything here is shared by the relay server, the client library and the CLI.

pub mod api;
pub mod catalog;
pub mod category;
pub mod chat;
pub mod company;
pub mod error;
pub mod expert;
pub mod goal;
pub mod ids;
pub mod session;
pub mod user;

// Re-export commonly used types
pub use api::{ChatRequest, ChatResponse, ErrorBody, FeatureFlags, HealthResponse, StatusResponse};
pub use catalog::Expert;
pub use category::Category;
pub use chat::{ChatMessage, ChatRole, Usage};
pub use company::{Company, CompanySize};
pub use error::CoreError;
pub use expert::ExpertContext;
pub use goal::{BusinessGoal, GoalDraft, GoalStatus};
pub use ids::{ChatId, GoalId, UserId};
pub use session::{ChatSession, SessionMessage, SessionMetrics, Sender};
pub use user::AuthUser;
