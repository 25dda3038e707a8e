//! Connection gateway: owns the sockets, the relay owns the state.
//!
//! Accepts WebSocket connections, turns JSON text frames into relay events,
//! and drains each connection's outbound queue back into its socket.

pub mod rest;
pub mod state;
pub mod websocket;

use axum::{http::Method, routing::get, Router};
use tower_http::cors::{Any, CorsLayer};

pub use state::AppState;

/// Build the gateway router: the WebSocket endpoint, a health probe, and a
/// permissive CORS layer (the relay is origin-agnostic by design).
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    Router::new()
        .route("/health", get(rest::health_check))
        .route("/ws", get(websocket::websocket_handler))
        .with_state(state)
        .layer(cors)
}
