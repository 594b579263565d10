//! API route handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use tracing::debug;

use rns_core::constants::DEFAULT_PAGE_SIZE;
use rns_core::network::NetworkConfig;
use rns_resolver::{Availability, Listing, ListingQuery, OwnerRecord, ReverseName};

use crate::dto::*;
use crate::error::ApiError;
use crate::state::AppState;

type Result<T> = std::result::Result<T, ApiError>;

/// GET /health
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".into(),
        version: env!("CARGO_PKG_VERSION").into(),
        uptime_seconds: state.uptime().as_secs(),
        chain_id: state.resolver.context().active_chain_id(),
        network_configured: state.resolver.network().is_some(),
        cache_enabled: state.resolver.cache_stats().is_some(),
    })
}

/// GET /api/v1/networks
pub async fn list_networks(State(state): State<Arc<AppState>>) -> Json<NetworksResponse> {
    let context = state.resolver.context();
    Json(NetworksResponse {
        active_chain_id: context.active_chain_id(),
        networks: context.networks().iter().cloned().collect(),
    })
}

/// GET /api/v1/networks/:chain_id
pub async fn get_network(
    State(state): State<Arc<AppState>>,
    Path(chain_id): Path<u64>,
) -> Result<Json<NetworkConfig>> {
    state
        .resolver
        .context()
        .networks()
        .resolve(chain_id)
        .cloned()
        .map(Json)
        .ok_or_else(|| {
            ApiError::not_found(format!("No network configuration for chain {}", chain_id))
        })
}

/// GET /api/v1/reverse/:address
pub async fn reverse_lookup(
    State(state): State<Arc<AppState>>,
    Path(address): Path<String>,
) -> QueryResponse<ReverseName> {
    state.resolver.reverse(&address).await.into()
}

/// GET /api/v1/account
pub async fn current_account(State(state): State<Arc<AppState>>) -> Result<Json<AccountResponse>> {
    let session = state
        .resolver
        .context()
        .session()
        .map(|s| s.snapshot())
        .unwrap_or_default();
    let reverse = state.resolver.reverse_current_account().await?;

    Ok(Json(AccountResponse {
        session,
        reverse: reverse.into(),
    }))
}

/// GET /api/v1/names/:name
pub async fn owner_detail(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> QueryResponse<OwnerRecord> {
    state.resolver.owner(&name).await.into()
}

/// GET /api/v1/names/:name/availability
pub async fn name_availability(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> QueryResponse<Availability> {
    state.resolver.availability(&name).await.into()
}

/// GET /api/v1/names
pub async fn list_names(
    State(state): State<Arc<AppState>>,
    Query(page): Query<PageQuery>,
) -> QueryResponse<Listing> {
    let query = ListingQuery::All {
        first: page.first.unwrap_or(DEFAULT_PAGE_SIZE),
        skip: page.skip.unwrap_or(0),
    };
    debug!(?query, "Listing names");
    state.resolver.names(query).await.into()
}

/// GET /api/v1/owners/:address/names
pub async fn names_by_owner(
    State(state): State<Arc<AppState>>,
    Path(owner): Path<String>,
    Query(page): Query<PageQuery>,
) -> QueryResponse<Listing> {
    let query = ListingQuery::ByOwner {
        owner,
        first: page.first.unwrap_or(DEFAULT_PAGE_SIZE),
        skip: page.skip.unwrap_or(0),
    };
    debug!(?query, "Listing names by owner");
    state.resolver.names(query).await.into()
}
