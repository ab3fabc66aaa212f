//! Health and status handlers.

use std::sync::Arc;

use axum::{extract::State, Json};
use chrono::Utc;

use consultia_core::{FeatureFlags, HealthResponse, StatusResponse};

use crate::http::error::ApiError;
use crate::state::AppState;

/// Service name reported by `/status`.
pub const SERVICE_NAME: &str = "ConsultIA API";

/// Health check endpoint.
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        timestamp: Utc::now(),
        ai_configured: state.relay.is_configured(),
    })
}

/// Service status and feature flags.
pub async fn service_status(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    Json(StatusResponse {
        service: SERVICE_NAME.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        status: "online".to_string(),
        features: FeatureFlags {
            chat: state.relay.is_configured(),
            persistence: state.relay.persistence_enabled(),
            rate_limit: false,
            cors: true,
        },
    })
}

/// Fallback for unknown routes.
pub async fn not_found() -> ApiError {
    ApiError::NotFound
}
