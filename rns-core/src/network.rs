//! Per-chain network configuration.
//!
//! A [`NetworkTable`] maps chain ids to the contract addresses and subgraph
//! endpoint of that chain. Any address or the subgraph URL may be absent,
//! which means the dependent feature is unavailable on that chain.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_ROOT_NAME, LOCAL_CHAIN_ID, LOCAL_RPC_URL, LOCAL_SUBGRAPH_URL};
use crate::error::{Result, RnsError};
use crate::types::Address;

fn default_root_name() -> String {
    DEFAULT_ROOT_NAME.into()
}

/// Contract addresses and endpoints of one chain.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// EIP-155 chain id
    pub chain_id: u64,
    /// Human-readable network name
    pub name: String,
    /// JSON-RPC endpoint for contract reads
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rpc_url: Option<String>,
    /// Root name second-level names live under
    #[serde(default = "default_root_name")]
    pub root_name: String,
    /// Registrar / registry contract
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registry_address: Option<Address>,
    /// Reverse registrar contract
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reverse_registrar_address: Option<Address>,
    /// Resolver contract
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolver_address: Option<Address>,
    /// GraphQL endpoint of the indexing subgraph
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subgraph_url: Option<String>,
}

impl NetworkConfig {
    /// Creates a config with no contracts or endpoints.
    pub fn new(chain_id: u64, name: impl Into<String>) -> Self {
        Self {
            chain_id,
            name: name.into(),
            rpc_url: None,
            root_name: default_root_name(),
            registry_address: None,
            reverse_registrar_address: None,
            resolver_address: None,
            subgraph_url: None,
        }
    }

    /// Sets the RPC endpoint.
    pub fn with_rpc(mut self, rpc_url: impl Into<String>) -> Self {
        self.rpc_url = Some(rpc_url.into());
        self
    }

    /// Sets the three contract addresses.
    pub fn with_contracts(
        mut self,
        registry: Address,
        reverse_registrar: Address,
        resolver: Address,
    ) -> Self {
        self.registry_address = Some(registry);
        self.reverse_registrar_address = Some(reverse_registrar);
        self.resolver_address = Some(resolver);
        self
    }

    /// Sets the subgraph endpoint.
    pub fn with_subgraph(mut self, url: impl Into<String>) -> Self {
        self.subgraph_url = Some(url.into());
        self
    }

    /// Returns the registry address or a configuration-absent error.
    pub fn require_registry(&self) -> Result<Address> {
        self.registry_address
            .ok_or(RnsError::ContractNotConfigured {
                chain_id: self.chain_id,
                contract: "registry",
            })
    }

    /// Returns the reverse registrar address or a configuration-absent error.
    pub fn require_reverse_registrar(&self) -> Result<Address> {
        self.reverse_registrar_address
            .ok_or(RnsError::ContractNotConfigured {
                chain_id: self.chain_id,
                contract: "reverse registrar",
            })
    }

    /// Returns the resolver address or a configuration-absent error.
    pub fn require_resolver(&self) -> Result<Address> {
        self.resolver_address
            .ok_or(RnsError::ContractNotConfigured {
                chain_id: self.chain_id,
                contract: "resolver",
            })
    }
}

/// Static lookup from chain id to [`NetworkConfig`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NetworkTable {
    networks: BTreeMap<u64, NetworkConfig>,
}

impl NetworkTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// The networks shipped with the client.
    ///
    /// Only the local development chain is built in; deployments are
    /// added through a networks file.
    pub fn builtin() -> Self {
        let mut local = NetworkConfig::new(LOCAL_CHAIN_ID, "Local")
            .with_rpc(LOCAL_RPC_URL)
            .with_subgraph(LOCAL_SUBGRAPH_URL);
        // First three contracts deployed by the default dev account.
        local.registry_address = "0x5FbDB2315678afecb367f032d93F642f64180aa3".parse().ok();
        local.reverse_registrar_address =
            "0xe7f1725E7734CE288F8367e1Bb143E90bb3F0512".parse().ok();
        local.resolver_address = "0x9fE46736679d2D9a65F0992F80322f30dc8B4D74".parse().ok();

        Self::from_networks([local])
    }

    /// Builds a table from a list of networks; later entries win.
    pub fn from_networks(networks: impl IntoIterator<Item = NetworkConfig>) -> Self {
        Self {
            networks: networks.into_iter().map(|n| (n.chain_id, n)).collect(),
        }
    }

    /// Parses a JSON array of networks.
    pub fn from_json(json: &str) -> Result<Self> {
        let networks: Vec<NetworkConfig> = serde_json::from_str(json)?;
        Ok(Self::from_networks(networks))
    }

    /// Reads a JSON networks file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Adds or replaces networks from `other`.
    pub fn merge(mut self, other: NetworkTable) -> Self {
        self.networks.extend(other.networks);
        self
    }

    /// Adds or replaces one network.
    pub fn insert(&mut self, network: NetworkConfig) {
        self.networks.insert(network.chain_id, network);
    }

    /// Looks up the config for a chain. `None` means "no config for this chain".
    pub fn resolve(&self, chain_id: u64) -> Option<&NetworkConfig> {
        self.networks.get(&chain_id)
    }

    /// Configured chain ids in ascending order.
    pub fn chain_ids(&self) -> Vec<u64> {
        self.networks.keys().copied().collect()
    }

    /// Iterates over all networks.
    pub fn iter(&self) -> impl Iterator<Item = &NetworkConfig> {
        self.networks.values()
    }

    /// Number of configured networks.
    pub fn len(&self) -> usize {
        self.networks.len()
    }

    /// Returns true if no network is configured.
    pub fn is_empty(&self) -> bool {
        self.networks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_local_network() {
        let table = NetworkTable::builtin();
        let local = table.resolve(LOCAL_CHAIN_ID).unwrap();

        assert!(local.registry_address.is_some());
        assert!(local.reverse_registrar_address.is_some());
        assert!(local.resolver_address.is_some());
        assert_eq!(local.subgraph_url.as_deref(), Some(LOCAL_SUBGRAPH_URL));
        assert_eq!(local.root_name, DEFAULT_ROOT_NAME);
    }

    #[test]
    fn test_unknown_chain_is_absent() {
        let table = NetworkTable::builtin();
        assert!(table.resolve(999_999).is_none());
    }

    #[test]
    fn test_from_json_with_missing_fields() {
        let json = r#"[
            {
                "chain_id": 1,
                "name": "Main",
                "registry_address": "0x00000000000000000000000000000000000000aa",
                "resolver_address": "0x00000000000000000000000000000000000000bb"
            }
        ]"#;
        let table = NetworkTable::from_json(json).unwrap();
        let main = table.resolve(1).unwrap();

        assert!(main.subgraph_url.is_none());
        assert!(main.reverse_registrar_address.is_none());
        assert_eq!(main.root_name, DEFAULT_ROOT_NAME);
        assert!(main.require_reverse_registrar().unwrap_err().is_config_absent());
        assert!(main.require_registry().is_ok());
    }

    #[test]
    fn test_from_json_rejects_bad_address() {
        let json = r#"[{ "chain_id": 1, "name": "Main", "registry_address": "0x12" }]"#;
        assert!(NetworkTable::from_json(json).is_err());
    }

    #[test]
    fn test_merge_overrides() {
        let override_table = NetworkTable::from_networks([
            NetworkConfig::new(LOCAL_CHAIN_ID, "Override"),
            NetworkConfig::new(5, "Other"),
        ]);
        let table = NetworkTable::builtin().merge(override_table);

        assert_eq!(table.len(), 2);
        assert_eq!(table.resolve(LOCAL_CHAIN_ID).unwrap().name, "Override");
        assert_eq!(table.chain_ids(), vec![5, LOCAL_CHAIN_ID]);
    }
}
