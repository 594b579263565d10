//! Common traits for RNS.
//!
//! These are the seams between the resolution layer and the outside world,
//! so the layer can be exercised without a live chain or wallet.

use async_trait::async_trait;

use crate::error::Result;
use crate::network::NetworkConfig;
use crate::types::{Address, WalletAccount};

// ═══════════════════════════════════════════════════════════════════════════════
// CONTRACT TRANSPORT
// ═══════════════════════════════════════════════════════════════════════════════

/// Read-only contract call transport.
///
/// Implementations might use:
/// - JSON-RPC `eth_call` against the network's RPC endpoint
/// - A scripted table (for tests)
#[async_trait]
pub trait CallTransport: Send + Sync {
    /// Executes a read-only call and returns the raw ABI-encoded return data.
    async fn eth_call(
        &self,
        network: &NetworkConfig,
        to: Address,
        data: &[u8],
    ) -> Result<Vec<u8>>;
}

// ═══════════════════════════════════════════════════════════════════════════════
// WALLET PROVIDER
// ═══════════════════════════════════════════════════════════════════════════════

/// Capability surface of a wallet.
///
/// Connection may fail with a provider-specific error.
#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// Short provider name for diagnostics.
    fn name(&self) -> &str;

    /// Requests an account.
    async fn connect(&self) -> Result<WalletAccount>;

    /// Releases the account.
    async fn disconnect(&self) -> Result<()>;
}

#[async_trait]
impl<W: WalletProvider + ?Sized> WalletProvider for Box<W> {
    fn name(&self) -> &str {
        (**self).name()
    }

    async fn connect(&self) -> Result<WalletAccount> {
        (**self).connect().await
    }

    async fn disconnect(&self) -> Result<()> {
        (**self).disconnect().await
    }
}
