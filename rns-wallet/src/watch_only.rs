//! Fixed-address wallet.

use async_trait::async_trait;

use rns_core::error::{Result, RnsError};
use rns_core::traits::WalletProvider;
use rns_core::types::{Address, WalletAccount};

/// A wallet that always connects the same account and cannot sign.
///
/// Used where the account comes from configuration rather than a user.
#[derive(Clone, Copy, Debug)]
pub struct WatchOnlyWallet {
    account: WalletAccount,
}

impl WatchOnlyWallet {
    /// Creates a wallet for `address` on `chain_id`.
    pub fn new(address: Address, chain_id: Option<u64>) -> Self {
        Self {
            account: WalletAccount { address, chain_id },
        }
    }

    /// Parses the address from a string.
    pub fn parse(address: &str, chain_id: Option<u64>) -> Result<Self> {
        Ok(Self::new(address.parse()?, chain_id))
    }
}

#[async_trait]
impl WalletProvider for WatchOnlyWallet {
    fn name(&self) -> &str {
        "watch-only"
    }

    async fn connect(&self) -> Result<WalletAccount> {
        if self.account.address.is_zero() {
            return Err(RnsError::WalletError(
                "the zero address cannot be connected".into(),
            ));
        }
        Ok(self.account)
    }

    async fn disconnect(&self) -> Result<()> {
        Ok(())
    }
}
