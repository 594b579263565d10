//! Wallet session types.

use serde::{Deserialize, Serialize};

use super::Address;

/// Account returned by a wallet provider on connect.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletAccount {
    /// Connected account
    pub address: Address,
    /// Chain the wallet is on, when the provider reports it
    pub chain_id: Option<u64>,
}

/// Connection state of the wallet for the lifetime of a session provider.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletSession {
    /// Whether an account is connected
    pub is_connected: bool,
    /// Connected account
    pub address: Option<Address>,
    /// Chain of the connected wallet
    pub chain_id: Option<u64>,
    /// Last provider error
    pub error: Option<String>,
}

impl WalletSession {
    /// A connected session.
    pub fn connected(account: WalletAccount) -> Self {
        Self {
            is_connected: true,
            address: Some(account.address),
            chain_id: account.chain_id,
            error: None,
        }
    }

    /// A disconnected session that remembers why it failed.
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connected_session() {
        let account = WalletAccount {
            address: Address::from_array([7; 20]),
            chain_id: Some(1),
        };
        let session = WalletSession::connected(account);
        assert!(session.is_connected);
        assert_eq!(session.address, Some(account.address));
        assert!(session.error.is_none());
    }

    #[test]
    fn test_failed_session() {
        let session = WalletSession::failed("rejected");
        assert!(!session.is_connected);
        assert!(session.address.is_none());
        assert_eq!(session.error.as_deref(), Some("rejected"));
    }
}
