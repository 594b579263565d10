//! API route configuration.

use std::sync::Arc;

use axum::{routing::get, Router};

use crate::handlers;
use crate::state::AppState;

/// Creates the API router with all routes configured.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))

        // Networks
        .route("/api/v1/networks", get(handlers::list_networks))
        .route("/api/v1/networks/:chain_id", get(handlers::get_network))

        // Reverse resolution
        .route("/api/v1/reverse/:address", get(handlers::reverse_lookup))
        .route("/api/v1/account", get(handlers::current_account))

        // Names
        .route("/api/v1/names", get(handlers::list_names))
        .route("/api/v1/names/:name", get(handlers::owner_detail))
        .route("/api/v1/names/:name/availability", get(handlers::name_availability))
        .route("/api/v1/owners/:address/names", get(handlers::names_by_owner))

        .with_state(state)
}
