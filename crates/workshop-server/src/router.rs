use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;

use crate::app_state::AppState;
use crate::handlers;

/// Create the main application router with all routes.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check, also served at the root for simple probes
        .route("/", get(handlers::health))
        .route("/health", get(handlers::health))
        // JSON-RPC endpoint, one request per POST
        .route("/mcp", post(handlers::mcp_request))
        // CORS: allow any origin (MCP clients may run in browsers or desktop hosts)
        .layer(CorsLayer::permissive())
        .with_state(state)
}
