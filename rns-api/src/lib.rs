//! # RNS API Server
//!
//! REST API over the RNS resolver. Every lookup returns its query state as
//! `{ data, is_loading, error }`.
//!
//! ## Endpoints
//!
//! - `GET /health` - Liveness and active chain
//! - `GET /api/v1/networks` - Configured networks
//! - `GET /api/v1/networks/:chain_id` - One network's contracts and endpoints
//! - `GET /api/v1/reverse/:address` - Address to name
//! - `GET /api/v1/account` - Watch-only session and its reverse name
//! - `GET /api/v1/names/:name` - Owner, expiry and grace period
//! - `GET /api/v1/names/:name/availability` - Whether a name can be registered
//! - `GET /api/v1/names?first=&skip=` - Subgraph listing
//! - `GET /api/v1/owners/:address/names` - Names held by an owner
//!
//! Malformed input disables the read and answers 200 with no data. Upstream
//! failures answer 502 with the error in the body.
//!
//! ## Example
//!
//! ```rust,ignore
//! use rns_api::{ApiServer, ApiConfig};
//!
//! let server = ApiServer::new(ApiConfig::from_env())?;
//! server.run(([0, 0, 0, 0], 3001)).await?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod routes;
mod handlers;
mod state;
mod dto;
mod error;

pub use routes::create_router;
pub use state::{AppState, ApiConfig};
pub use error::ApiError;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

/// API server for RNS lookups.
pub struct ApiServer {
    state: Arc<AppState>,
}

impl ApiServer {
    /// Creates a new API server with the given configuration.
    pub fn new(config: ApiConfig) -> rns_core::Result<Self> {
        Ok(Self {
            state: Arc::new(AppState::new(config)?),
        })
    }

    /// Creates the router with all routes configured.
    pub fn router(&self) -> Router {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        create_router(self.state.clone())
            .layer(cors)
            .layer(TraceLayer::new_for_http())
    }

    /// Connects the watch-only wallet, then serves on the given address.
    ///
    /// Uptime reported by `/health` counts from this call.
    pub async fn run(self, addr: impl Into<SocketAddr>) -> std::io::Result<()> {
        let addr = addr.into();
        self.state.mark_started();
        self.state.connect_wallet().await;

        let listener = tokio::net::TcpListener::bind(addr).await?;

        info!(
            chain_id = self.state.resolver.context().active_chain_id(),
            "RNS API server listening on {}", addr
        );

        axum::serve(listener, self.router()).await
    }
}

/// Starts the API server with configuration from the environment.
pub async fn start_server(port: u16) -> rns_core::Result<()> {
    let server = ApiServer::new(ApiConfig::from_env())?;
    server.run(([0, 0, 0, 0], port)).await?;
    Ok(())
}
