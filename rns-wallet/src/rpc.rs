//! Node-backed wallet (EIP-1193 methods over HTTP JSON-RPC).

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, instrument, warn};

use rns_core::constants::DEFAULT_TIMEOUT_SECONDS;
use rns_core::error::{Result, RnsError};
use rns_core::traits::WalletProvider;
use rns_core::types::{Address, WalletAccount};

/// Wallet whose accounts are managed by a node, e.g. a local dev node.
pub struct RpcWallet {
    rpc_url: String,
    http_client: reqwest::Client,
    next_id: AtomicU64,
}

impl RpcWallet {
    /// Creates a wallet talking to `rpc_url`.
    pub fn new(rpc_url: impl Into<String>) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECONDS))
            .build()
            .map_err(|e| RnsError::ConfigError(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            rpc_url: rpc_url.into(),
            http_client,
            next_id: AtomicU64::new(1),
        })
    }

    async fn request(&self, method: &str) -> Result<Value> {
        let request = serde_json::json!({
            "jsonrpc": "2.0",
            "method": method,
            "params": [],
            "id": self.next_id.fetch_add(1, Ordering::Relaxed)
        });

        let response = self
            .http_client
            .post(&self.rpc_url)
            .json(&request)
            .send()
            .await
            .map_err(|e| RnsError::HttpError(e.to_string()))?;

        let json: Value = response
            .json()
            .await
            .map_err(|e| RnsError::HttpError(e.to_string()))?;

        if let Some(error) = json.get("error") {
            let message = error
                .get("message")
                .and_then(|m| m.as_str())
                .unwrap_or("Unknown wallet error");
            return Err(RnsError::WalletError(format!("{}: {}", method, message)));
        }

        json.get("result")
            .cloned()
            .ok_or_else(|| RnsError::WalletError(format!("{}: missing result", method)))
    }

    async fn accounts(&self, method: &str) -> Result<Option<Address>> {
        let result = self.request(method).await?;
        let first = result
            .as_array()
            .and_then(|accounts| accounts.first())
            .and_then(|a| a.as_str());

        match first {
            Some(account) => Ok(Some(account.parse()?)),
            None => Ok(None),
        }
    }

    async fn chain_id(&self) -> Option<u64> {
        match self.request("eth_chainId").await {
            Ok(result) => result
                .as_str()
                .and_then(|hex| u64::from_str_radix(hex.trim_start_matches("0x"), 16).ok()),
            Err(e) => {
                warn!(error = %e, "Could not read wallet chain id");
                None
            }
        }
    }
}

#[async_trait]
impl WalletProvider for RpcWallet {
    fn name(&self) -> &str {
        "rpc"
    }

    /// Requests accounts, falling back to already-exposed accounts when the
    /// node does not support `eth_requestAccounts`.
    #[instrument(skip(self), fields(rpc = %self.rpc_url))]
    async fn connect(&self) -> Result<WalletAccount> {
        let address = match self.accounts("eth_requestAccounts").await {
            Ok(Some(address)) => Some(address),
            Ok(None) => None,
            Err(e) => {
                debug!(error = %e, "eth_requestAccounts failed, trying eth_accounts");
                None
            }
        };

        let address = match address {
            Some(address) => address,
            None => self
                .accounts("eth_accounts")
                .await?
                .ok_or_else(|| RnsError::WalletError("no accounts available".into()))?,
        };

        Ok(WalletAccount {
            address,
            chain_id: self.chain_id().await,
        })
    }

    async fn disconnect(&self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const ACCOUNT: &str = "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266";

    async fn mount(server: &MockServer, rpc_method: &str, body: Value) {
        Mock::given(method("POST"))
            .and(body_partial_json(serde_json::json!({ "method": rpc_method })))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(server)
            .await;
    }

    fn answer(id: u64, result: Value) -> Value {
        serde_json::json!({ "jsonrpc": "2.0", "id": id, "result": result })
    }

    fn method_not_found(id: u64) -> Value {
        serde_json::json!({
            "jsonrpc": "2.0", "id": id, "error": { "code": -32601, "message": "method not found" }
        })
    }

    #[tokio::test]
    async fn test_connect_with_request_accounts() {
        let server = MockServer::start().await;
        mount(&server, "eth_requestAccounts", answer(1, serde_json::json!([ACCOUNT]))).await;
        mount(&server, "eth_chainId", answer(2, serde_json::json!("0x7a69"))).await;

        let wallet = RpcWallet::new(server.uri()).unwrap();
        let account = wallet.connect().await.unwrap();

        assert_eq!(account.address.to_lower_hex(), ACCOUNT);
        assert_eq!(account.chain_id, Some(31337));
    }

    #[tokio::test]
    async fn test_falls_back_to_eth_accounts() {
        let server = MockServer::start().await;
        mount(&server, "eth_requestAccounts", method_not_found(1)).await;
        mount(&server, "eth_accounts", answer(2, serde_json::json!([ACCOUNT]))).await;
        mount(&server, "eth_chainId", answer(3, serde_json::json!("0x1"))).await;

        let wallet = RpcWallet::new(server.uri()).unwrap();
        let account = wallet.connect().await.unwrap();

        assert_eq!(account.address.to_lower_hex(), ACCOUNT);
        assert_eq!(account.chain_id, Some(1));
    }

    #[tokio::test]
    async fn test_no_accounts_is_wallet_error() {
        let server = MockServer::start().await;
        mount(&server, "eth_requestAccounts", answer(1, serde_json::json!([]))).await;
        mount(&server, "eth_accounts", answer(2, serde_json::json!([]))).await;

        let wallet = RpcWallet::new(server.uri()).unwrap();
        let err = wallet.connect().await.unwrap_err();

        assert!(matches!(err, RnsError::WalletError(_)));
    }

    #[tokio::test]
    async fn test_missing_chain_id_is_tolerated() {
        let server = MockServer::start().await;
        mount(&server, "eth_requestAccounts", answer(1, serde_json::json!([ACCOUNT]))).await;
        mount(&server, "eth_chainId", method_not_found(2)).await;

        let wallet = RpcWallet::new(server.uri()).unwrap();
        let account = wallet.connect().await.unwrap();

        assert!(account.chain_id.is_none());
    }
}
