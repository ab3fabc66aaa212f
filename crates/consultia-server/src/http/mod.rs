//! HTTP server for the chat relay.
//!
//! Provides endpoints for:
//! - Chat relay (`POST /chat`)
//! - Health check (`/health`)
//! - Service status (`/status`)
//!
//! Every route is also served under `/api`, the base path the browser uses.

use std::any::Any;
use std::sync::Arc;

use axum::{
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::state::AppState;

pub mod cors;
pub mod error;
mod handlers;

pub use cors::OriginPolicy;
pub use error::ApiError;
pub use handlers::{parse_chat_request, SERVICE_NAME};

fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/chat", post(handlers::chat))
        .route("/health", get(handlers::health_check))
        .route("/status", get(handlers::service_status))
}

fn handle_panic(_err: Box<dyn Any + Send + 'static>) -> Response {
    ApiError::Internal.into_response()
}

/// Create the HTTP router.
pub fn create_router(state: Arc<AppState>) -> Router {
    let trace = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    Router::new()
        .merge(routes())
        .nest("/api", routes())
        .fallback(handlers::not_found)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(state.cors.layer())
        .layer(trace)
        .with_state(state)
}
