//! Shared resolution context.

use std::sync::Arc;

use rns_core::constants::DEFAULT_CHAIN_ID;
use rns_core::network::{NetworkConfig, NetworkTable};
use rns_wallet::SessionReader;

/// Network table, default chain and wallet session, passed explicitly to
/// every operation.
///
/// The context only reads the session; the session provider owns it.
#[derive(Clone, Debug)]
pub struct RnsContext {
    networks: Arc<NetworkTable>,
    default_chain_id: u64,
    session: Option<SessionReader>,
}

impl Default for RnsContext {
    fn default() -> Self {
        Self::new(NetworkTable::builtin(), DEFAULT_CHAIN_ID)
    }
}

impl RnsContext {
    /// Creates a context without a wallet session.
    pub fn new(networks: NetworkTable, default_chain_id: u64) -> Self {
        Self {
            networks: Arc::new(networks),
            default_chain_id,
            session: None,
        }
    }

    /// Attaches a wallet session.
    pub fn with_session(mut self, session: SessionReader) -> Self {
        self.session = Some(session);
        self
    }

    /// The network table.
    pub fn networks(&self) -> &NetworkTable {
        &self.networks
    }

    /// The wallet session, if attached.
    pub fn session(&self) -> Option<&SessionReader> {
        self.session.as_ref()
    }

    /// Chain of the connected wallet, or the default chain.
    pub fn active_chain_id(&self) -> u64 {
        self.session
            .as_ref()
            .and_then(|s| s.chain_id())
            .unwrap_or(self.default_chain_id)
    }

    /// Config of the active chain; `None` disables every dependent read.
    pub fn network(&self) -> Option<&NetworkConfig> {
        self.networks.resolve(self.active_chain_id())
    }
}
