//! DTOs for API requests and responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use rns_core::network::NetworkConfig;
use rns_core::types::{QueryState, WalletSession};
use rns_resolver::ReverseName;

use crate::error::{ApiError, ErrorBody};

/// Query state as returned to clients: `{ data, is_loading, error }`.
///
/// A disabled read (malformed input, unknown chain) is a 200 with no data;
/// a failed read carries the mapped error status.
#[derive(Debug, Serialize)]
pub struct QueryResponse<T> {
    /// Result, if the read finished with data
    pub data: Option<T>,
    /// True while a read is pending
    pub is_loading: bool,
    /// Failure of the read
    pub error: Option<ErrorBody>,
    #[serde(skip)]
    status: StatusCode,
}

impl<T> From<QueryState<T>> for QueryResponse<T> {
    fn from(state: QueryState<T>) -> Self {
        let error = state.error.as_deref().map(ApiError::from);
        Self {
            status: error.as_ref().map_or(StatusCode::OK, ApiError::status),
            error: error.as_ref().map(ApiError::body),
            data: state.data,
            is_loading: state.is_loading,
        }
    }
}

impl<T: Serialize> IntoResponse for QueryResponse<T> {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}

/// Paging parameters for listings.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    /// Page size
    pub first: Option<u32>,
    /// Rows to skip
    pub skip: Option<u32>,
}

/// Response for the network list.
#[derive(Debug, Serialize)]
pub struct NetworksResponse {
    /// Chain the server resolves against
    pub active_chain_id: u64,
    /// Every configured network
    pub networks: Vec<NetworkConfig>,
}

/// Response for the connected account.
#[derive(Debug, Serialize)]
pub struct AccountResponse {
    /// Wallet session
    pub session: WalletSession,
    /// Reverse name of the account
    pub reverse: QueryResponse<ReverseName>,
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Status
    pub status: String,
    /// Version
    pub version: String,
    /// Uptime in seconds
    pub uptime_seconds: u64,
    /// Active chain
    pub chain_id: u64,
    /// Whether the active chain is configured
    pub network_configured: bool,
    /// Whether lookups are memoized
    pub cache_enabled: bool,
}
