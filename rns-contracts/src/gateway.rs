//! Gated contract reads.

use std::sync::Arc;

use tracing::{debug, instrument};

use rns_core::error::Result;
use rns_core::network::NetworkConfig;
use rns_core::traits::CallTransport;
use rns_core::types::QueryState;

use crate::abi::ContractCall;

/// Dispatches typed reads against the naming contracts.
///
/// Reads are independent: any number may be in flight at once and no
/// ordering holds between them. Failures are passed through unmodified;
/// there is no retry.
#[derive(Clone)]
pub struct ContractGateway {
    transport: Arc<dyn CallTransport>,
}

impl ContractGateway {
    /// Creates a gateway over `transport`.
    pub fn new(transport: Arc<dyn CallTransport>) -> Self {
        Self { transport }
    }

    /// Reads `call` if `enabled`, reporting `{data, is_loading, error}`.
    ///
    /// When `enabled` is false nothing is dispatched and the state is
    /// `disabled` (`is_loading == false`, `data == None`).
    #[instrument(
        skip(self, network, call),
        fields(chain_id = network.chain_id, function = call.signature())
    )]
    pub async fn read<D>(
        &self,
        network: &NetworkConfig,
        call: &ContractCall<D>,
        enabled: bool,
    ) -> QueryState<D> {
        if !enabled {
            debug!("Read disabled, not dispatched");
            return QueryState::disabled();
        }

        QueryState::from_result(self.call(network, call).await)
    }

    /// Reads a call whose prerequisites may be missing.
    ///
    /// Enabled only when both the network and the call are present.
    pub async fn read_prepared<D>(
        &self,
        network: Option<&NetworkConfig>,
        call: Option<&ContractCall<D>>,
    ) -> QueryState<D> {
        match (network, call) {
            (Some(network), Some(call)) => self.read(network, call, true).await,
            _ => {
                debug!("Read prerequisites missing, not dispatched");
                QueryState::disabled()
            }
        }
    }

    /// Dispatches `call` unconditionally and decodes the result.
    pub async fn call<D>(&self, network: &NetworkConfig, call: &ContractCall<D>) -> Result<D> {
        let raw = self.transport.eth_call(network, call.to, call.calldata()).await?;
        call.decode(&raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::functions;
    use crate::mock::{MockReply, MockTransport};
    use rns_core::types::{Address, B256};
    use rns_core::NetworkConfig;

    fn setup() -> (Arc<MockTransport>, ContractGateway, NetworkConfig) {
        let mock = Arc::new(MockTransport::new());
        let gateway = ContractGateway::new(mock.clone());
        (mock, gateway, NetworkConfig::new(1, "Test"))
    }

    fn reverse_call() -> ContractCall<B256> {
        functions::reverse_node(Address::from_array([1; 20]), Address::from_array([2; 20]))
    }

    #[tokio::test]
    async fn test_disabled_read_is_not_dispatched() {
        let (mock, gateway, network) = setup();
        let call = reverse_call();

        let state: QueryState<B256> = gateway.read(&network, &call, false).await;

        assert!(state.is_disabled());
        assert!(!state.is_loading);
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn test_enabled_read_decodes() {
        let (mock, gateway, network) = setup();
        let call = reverse_call();
        let node = B256::from_array([9; 32]);
        mock.on(&call, MockReply::bytes32(node));

        let state: QueryState<B256> = gateway.read(&network, &call, true).await;

        assert_eq!(state.data, Some(node));
        assert!(state.error.is_none());
        assert_eq!(mock.call_count(), 1);
    }

    #[tokio::test]
    async fn test_failure_surfaces_as_error_value() {
        let (mock, gateway, network) = setup();
        let call = functions::owner_of(Address::from_array([1; 20]), B256::from_u64(1));
        mock.on(&call, MockReply::Error("node unavailable".into()));

        let state: QueryState<Address> = gateway.read(&network, &call, true).await;

        assert!(state.data.is_none());
        assert!(!state.is_loading);
        assert!(state.error.is_some());
    }

    #[tokio::test]
    async fn test_read_prepared_requires_both_inputs() {
        let (mock, gateway, network) = setup();
        let call = functions::available(Address::from_array([1; 20]), B256::from_u64(1));

        let no_network: QueryState<bool> = gateway.read_prepared(None, Some(&call)).await;
        let no_call: QueryState<bool> = gateway.read_prepared(Some(&network), None).await;

        assert!(no_network.is_disabled());
        assert!(no_call.is_disabled());
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn test_identical_reads_are_idempotent() {
        let (mock, gateway, network) = setup();
        let call = functions::name_expires(Address::from_array([1; 20]), B256::from_u64(1));
        mock.on(&call, MockReply::uint(1_800_000_000));

        let first: QueryState<u64> = gateway.read(&network, &call, true).await;
        let second: QueryState<u64> = gateway.read(&network, &call, true).await;

        assert_eq!(first.data, second.data);
        assert_eq!(mock.call_count(), 2);
    }

    #[tokio::test]
    async fn test_malformed_return_data_is_an_error() {
        let (mock, gateway, network) = setup();
        let call =
            functions::resolver_name(Address::from_array([1; 20]), B256::from_array([9; 32]));
        let mut raw = vec![0u8; 96];
        raw[24..32].copy_from_slice(&(u64::MAX - 31).to_be_bytes());
        mock.on(&call, MockReply::Data(raw));

        let state: QueryState<String> = gateway.read(&network, &call, true).await;

        assert!(state.is_settled());
        assert!(state.data.is_none());
        assert!(matches!(
            state.error.as_deref(),
            Some(rns_core::RnsError::AbiDecodeError(_))
        ));
    }
}
