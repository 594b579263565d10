//! JSON-RPC `eth_call` transport.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use rns_core::constants::DEFAULT_TIMEOUT_SECONDS;
use rns_core::error::{Result, RnsError};
use rns_core::network::NetworkConfig;
use rns_core::traits::CallTransport;
use rns_core::types::Address;

/// JSON-RPC error code for reverted execution.
const EXECUTION_REVERTED_CODE: i64 = 3;

/// Transport configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RpcConfig {
    /// Endpoint used instead of the network's own RPC URL
    pub rpc_url_override: Option<String>,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            rpc_url_override: None,
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
        }
    }
}

impl RpcConfig {
    /// Creates a configuration that sends every call to `rpc_url`.
    pub fn with_rpc(rpc_url: impl Into<String>) -> Self {
        Self {
            rpc_url_override: Some(rpc_url.into()),
            ..Default::default()
        }
    }
}

/// `eth_call` over HTTP JSON-RPC.
pub struct JsonRpcTransport {
    config: RpcConfig,
    http_client: reqwest::Client,
    next_id: AtomicU64,
}

impl JsonRpcTransport {
    /// Creates a transport with default configuration.
    pub fn new() -> Result<Self> {
        Self::with_config(RpcConfig::default())
    }

    /// Creates a transport with custom configuration.
    pub fn with_config(config: RpcConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| RnsError::ConfigError(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            config,
            http_client,
            next_id: AtomicU64::new(1),
        })
    }

    fn endpoint<'a>(&'a self, network: &'a NetworkConfig) -> Result<&'a str> {
        self.config
            .rpc_url_override
            .as_deref()
            .or(network.rpc_url.as_deref())
            .ok_or_else(|| {
                RnsError::ConfigError(format!("no RPC endpoint for chain {}", network.chain_id))
            })
    }

    fn map_rpc_error(error: &serde_json::Value) -> RnsError {
        let code = error.get("code").and_then(|c| c.as_i64());
        let message = error
            .get("message")
            .and_then(|m| m.as_str())
            .unwrap_or("Unknown RPC error")
            .to_string();

        if code == Some(EXECUTION_REVERTED_CODE) || message.to_lowercase().contains("revert") {
            RnsError::ExecutionReverted(message)
        } else {
            match code {
                Some(code) => RnsError::RpcError(format!("{} (code {})", message, code)),
                None => RnsError::RpcError(message),
            }
        }
    }
}

#[async_trait]
impl CallTransport for JsonRpcTransport {
    #[instrument(skip(self, network, data), fields(chain_id = network.chain_id))]
    async fn eth_call(
        &self,
        network: &NetworkConfig,
        to: Address,
        data: &[u8],
    ) -> Result<Vec<u8>> {
        let url = self.endpoint(network)?;
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);

        let request = serde_json::json!({
            "jsonrpc": "2.0",
            "method": "eth_call",
            "params": [
                {
                    "to": to.to_lower_hex(),
                    "data": format!("0x{}", hex::encode(data))
                },
                "latest"
            ],
            "id": id
        });

        let response = self
            .http_client
            .post(url)
            .json(&request)
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
                "RPC endpoint returned status {}",
                response.status()
            )));
        }

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| RnsError::HttpError(e.to_string()))?;

        if let Some(error) = json.get("error") {
            let err = Self::map_rpc_error(error);
            warn!(%to, error = %err, "eth_call failed");
            return Err(err);
        }

        let result = json
            .get("result")
            .and_then(|v| v.as_str())
            .ok_or_else(|| RnsError::RpcError("missing result".into()))?;

        debug!(%to, bytes = result.len().saturating_sub(2) / 2, "eth_call returned");

        let hex_data = result.strip_prefix("0x").unwrap_or(result);
        Ok(hex::decode(hex_data)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn network(url: Option<String>) -> NetworkConfig {
        let mut network = NetworkConfig::new(1, "Test");
        network.rpc_url = url;
        network
    }

    #[tokio::test]
    async fn test_eth_call_returns_bytes() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_partial_json(serde_json::json!({ "method": "eth_call" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "jsonrpc": "2.0",
                "id": 1,
                "result": "0x0102"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let transport = JsonRpcTransport::new().unwrap();
        let data = transport
            .eth_call(&network(Some(server.uri())), Address::zero(), &[0xab])
            .await
            .unwrap();

        assert_eq!(data, vec![0x01, 0x02]);
    }

    #[tokio::test]
    async fn test_revert_is_distinguished() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "jsonrpc": "2.0",
                "id": 1,
                "error": { "code": 3, "message": "execution reverted" }
            })))
            .mount(&server)
            .await;

        let transport = JsonRpcTransport::new().unwrap();
        let err = transport
            .eth_call(&network(Some(server.uri())), Address::zero(), &[])
            .await
            .unwrap_err();

        assert!(matches!(err, RnsError::ExecutionReverted(_)));
    }

    #[tokio::test]
    async fn test_other_rpc_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "jsonrpc": "2.0",
                "id": 1,
                "error": { "code": -32000, "message": "header not found" }
            })))
            .mount(&server)
            .await;

        let transport = JsonRpcTransport::new().unwrap();
        let err = transport
            .eth_call(&network(Some(server.uri())), Address::zero(), &[])
            .await
            .unwrap_err();

        assert!(matches!(err, RnsError::RpcError(_)));
        assert!(err.is_recoverable());
    }

    #[tokio::test]
    async fn test_http_status_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let transport = JsonRpcTransport::new().unwrap();
        let err = transport
            .eth_call(&network(Some(server.uri())), Address::zero(), &[])
            .await
            .unwrap_err();

        assert!(matches!(err, RnsError::HttpError(_)));
    }

    #[tokio::test]
    async fn test_override_wins_over_network_url() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "jsonrpc": "2.0",
                "id": 1,
                "result": "0x"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let transport = JsonRpcTransport::with_config(RpcConfig::with_rpc(server.uri())).unwrap();
        let data = transport
            .eth_call(&network(Some("http://127.0.0.1:1".into())), Address::zero(), &[])
            .await
            .unwrap();

        assert!(data.is_empty());
    }

    #[tokio::test]
    async fn test_missing_endpoint_is_config_error() {
        let transport = JsonRpcTransport::new().unwrap();
        let err = transport
            .eth_call(&network(None), Address::zero(), &[])
            .await
            .unwrap_err();

        assert!(matches!(err, RnsError::ConfigError(_)));
    }
}
