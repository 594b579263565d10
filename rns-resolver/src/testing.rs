//! Fixtures shared by the resolver tests.

use std::sync::Arc;

use rns_contracts::mock::MockTransport;
use rns_contracts::ContractGateway;
use rns_core::network::{NetworkConfig, NetworkTable};
use rns_core::types::Address;

use crate::context::RnsContext;

pub const CHAIN_ID: u64 = 1;
pub const REGISTRY: Address = Address::from_array([0x11; 20]);
pub const REVERSE_REGISTRAR: Address = Address::from_array([0x22; 20]);
pub const RESOLVER: Address = Address::from_array([0x33; 20]);

/// Chain 1 with all three contracts and no subgraph.
pub fn network() -> NetworkConfig {
    NetworkConfig::new(CHAIN_ID, "Test").with_contracts(REGISTRY, REVERSE_REGISTRAR, RESOLVER)
}

pub fn context(network: NetworkConfig) -> RnsContext {
    let chain_id = network.chain_id;
    RnsContext::new(NetworkTable::from_networks([network]), chain_id)
}

pub fn gateway() -> (Arc<MockTransport>, ContractGateway) {
    let mock = Arc::new(MockTransport::new());
    let gateway = ContractGateway::new(mock.clone());
    (mock, gateway)
}
