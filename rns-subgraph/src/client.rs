//! GraphQL client for the indexing subgraph.

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};
use url::Url;

use rns_core::constants::{DEFAULT_TIMEOUT_SECONDS, MAX_PAGE_SIZE};
use rns_core::error::{Result, RnsError};
use rns_core::types::Address;

use crate::documents::{GET_ALL_NAMES, GET_NAMES_BY_OWNER, GET_NAME_BY_LABEL};
use crate::types::{RevoName, RevoNames};

/// Subgraph client configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SubgraphConfig {
    /// Request timeout in seconds
    pub timeout_seconds: u64,
}

impl Default for SubgraphConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
        }
    }
}

/// Outcome of a subgraph query.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SubgraphResult<T> {
    /// The query ran and returned data.
    Data(T),
    /// No subgraph is configured for the active chain; nothing was sent.
    Unavailable,
}

impl<T> SubgraphResult<T> {
    /// Returns the data, or `None` when unavailable.
    pub fn data(self) -> Option<T> {
        match self {
            SubgraphResult::Data(data) => Some(data),
            SubgraphResult::Unavailable => None,
        }
    }

    /// Returns true when no subgraph was configured.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, SubgraphResult::Unavailable)
    }

    /// Transforms the data.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> SubgraphResult<U> {
        match self {
            SubgraphResult::Data(data) => SubgraphResult::Data(f(data)),
            SubgraphResult::Unavailable => SubgraphResult::Unavailable,
        }
    }
}

#[derive(Deserialize)]
struct GraphqlResponse<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Option<Vec<GraphqlErrorBody>>,
}

#[derive(Deserialize)]
struct GraphqlErrorBody {
    message: String,
}

/// Issues read-only GraphQL queries.
///
/// Queries are idempotent; paging is whatever the caller puts in the variables.
pub struct SubgraphClient {
    http_client: reqwest::Client,
}

impl SubgraphClient {
    /// Creates a client with default configuration.
    pub fn new() -> Result<Self> {
        Self::with_config(SubgraphConfig::default())
    }

    /// Creates a client with custom configuration.
    pub fn with_config(config: SubgraphConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| RnsError::ConfigError(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self { http_client })
    }

    /// Runs `document` with `variables` against `endpoint`.
    ///
    /// A missing endpoint yields [`SubgraphResult::Unavailable`] without a request.
    #[instrument(skip(self, document, variables))]
    pub async fn query<T: DeserializeOwned>(
        &self,
        endpoint: Option<&str>,
        document: &str,
        variables: serde_json::Value,
    ) -> Result<SubgraphResult<T>> {
        let Some(endpoint) = endpoint else {
            warn!("No subgraph configured for the active chain, query not sent");
            return Ok(SubgraphResult::Unavailable);
        };

        let url = Url::parse(endpoint)
            .map_err(|e| {
                RnsError::ConfigError(format!("invalid subgraph URL '{}': {}", endpoint, e))
            })?;

        let body = serde_json::json!({
            "query": document,
            "variables": variables,
        });

        let response = self
            .http_client
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    RnsError::ConnectionTimeout(e.to_string())
                } else {
                    RnsError::HttpError(e.to_string())
                }
            })?;

        if !response.status().is_success() {
            return Err(RnsError::HttpError(format!(
                "subgraph returned status {}",
                response.status()
            )));
        }

        let payload: GraphqlResponse<T> = response
            .json()
            .await
            .map_err(|e| RnsError::HttpError(e.to_string()))?;

        if let Some(errors) = payload.errors.filter(|e| !e.is_empty()) {
            let message = errors
                .into_iter()
                .map(|e| e.message)
                .collect::<Vec<_>>()
                .join("; ");
            warn!(error = %message, "Subgraph query failed");
            return Err(RnsError::GraphqlError(message));
        }

        let data = payload
            .data
            .ok_or_else(|| RnsError::GraphqlError("response has no data".into()))?;

        debug!("Subgraph query succeeded");
        Ok(SubgraphResult::Data(data))
    }

    /// Lists every name, newest registration first.
    pub async fn all_names(
        &self,
        endpoint: Option<&str>,
        first: u32,
        skip: u32,
    ) -> Result<SubgraphResult<Vec<RevoName>>> {
        let variables = serde_json::json!({
            "first": first.min(MAX_PAGE_SIZE),
            "skip": skip,
        });
        let result: SubgraphResult<RevoNames> =
            self.query(endpoint, GET_ALL_NAMES, variables).await?;
        Ok(result.map(|r| r.revo_names))
    }

    /// Lists names owned by `owner`.
    pub async fn names_by_owner(
        &self,
        endpoint: Option<&str>,
        owner: Address,
        first: u32,
        skip: u32,
    ) -> Result<SubgraphResult<Vec<RevoName>>> {
        // The indexer stores owners as lowercase hex.
        let variables = serde_json::json!({
            "owner": owner.to_lower_hex(),
            "first": first.min(MAX_PAGE_SIZE),
            "skip": skip,
        });
        let result: SubgraphResult<RevoNames> =
            self.query(endpoint, GET_NAMES_BY_OWNER, variables).await?;
        Ok(result.map(|r| r.revo_names))
    }

    /// Looks up one name by label.
    pub async fn name_by_label(
        &self,
        endpoint: Option<&str>,
        label: &str,
    ) -> Result<SubgraphResult<Option<RevoName>>> {
        let variables = serde_json::json!({ "labelName": label });
        let result: SubgraphResult<RevoNames> =
            self.query(endpoint, GET_NAME_BY_LABEL, variables).await?;
        Ok(result.map(|r| r.revo_names.into_iter().next()))
    }
}
