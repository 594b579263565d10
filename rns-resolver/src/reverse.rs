//! Reverse lookup: address to display name.
//!
//! Runs as a two-stage pipeline. The reverse registrar maps the address to
//! a node, then the resolver maps the node to a name. The second stage is
//! only prepared from a successful, non-zero first stage.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use rns_contracts::{functions, ContractCall, ContractGateway};
use rns_core::error::{Result, RnsError};
use rns_core::namehash::first_label;
use rns_core::network::NetworkConfig;
use rns_core::types::{Address, Node};

use crate::context::RnsContext;
use crate::operation::Operation;

/// Name an address reverse-resolves to.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReverseName {
    /// Full name, e.g. `bob.revo`; `None` when nothing resolves
    pub full_name: Option<String>,
    /// First segment of the full name; empty when nothing resolves
    pub name: String,
}

impl ReverseName {
    /// No name for the address.
    pub fn unresolved() -> Self {
        Self::default()
    }

    /// Splits a resolved name. An empty name counts as unresolved.
    pub fn from_full_name(full_name: &str) -> Self {
        let full_name = full_name.trim();
        if full_name.is_empty() {
            return Self::unresolved();
        }

        Self {
            name: first_label(full_name).to_string(),
            full_name: Some(full_name.to_string()),
        }
    }

    /// True if a name was found.
    pub fn is_resolved(&self) -> bool {
        self.full_name.is_some()
    }
}

/// Pipeline stage of a reverse lookup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReverseStage {
    /// `node(address)` on the reverse registrar.
    ResolveNode(ContractCall<Node>),
    /// `name(node)` on the resolver.
    ResolveName(ContractCall<String>),
}

/// A reverse lookup ready to dispatch its first stage.
#[derive(Clone, Debug)]
pub struct ReversePlan {
    network: NetworkConfig,
    stage: ReverseStage,
}

impl ReversePlan {
    /// The stage the plan starts at.
    pub fn stage(&self) -> &ReverseStage {
        &self.stage
    }
}

/// Address to name resolution.
pub struct ReverseLookup {
    context: RnsContext,
    gateway: ContractGateway,
}

impl ReverseLookup {
    /// Creates the lookup.
    pub fn new(context: RnsContext, gateway: ContractGateway) -> Self {
        Self { context, gateway }
    }

    /// First-stage precondition: a non-zero address and a reverse registrar.
    pub fn prepare_node(
        network: Option<&NetworkConfig>,
        address: Option<Address>,
    ) -> Option<ContractCall<Node>> {
        let address = address.filter(|a| !a.is_zero())?;
        let reverse_registrar = network?.reverse_registrar_address?;
        Some(functions::reverse_node(reverse_registrar, address))
    }

    /// Second-stage precondition: a non-zero node from stage one and a resolver.
    pub fn prepare_name(
        network: Option<&NetworkConfig>,
        node: Option<Node>,
    ) -> Option<ContractCall<String>> {
        let node = node.filter(|n| !n.is_zero())?;
        let resolver = network?.resolver_address?;
        Some(functions::resolver_name(resolver, node))
    }

    /// Plans a lookup of `address` on the active network.
    pub fn plan(&self, address: Address) -> Option<ReversePlan> {
        let network = self.context.network()?;
        let call = Self::prepare_node(Some(network), Some(address))?;
        Some(ReversePlan {
            network: network.clone(),
            stage: ReverseStage::ResolveNode(call),
        })
    }

    /// Resolves `address` to its name.
    ///
    /// Missing prerequisites yield an unresolved name without any call.
    /// A failure in either stage is returned unchanged.
    #[instrument(skip(self))]
    pub async fn lookup(&self, address: Address) -> Result<ReverseName> {
        match self.plan(address) {
            Some(plan) => self.execute(plan).await,
            None => {
                debug!(%address, "Reverse lookup disabled");
                Ok(ReverseName::unresolved())
            }
        }
    }

    /// Resolves the connected account.
    ///
    /// Fails with `SessionMissing` when no account is connected.
    pub async fn for_current_account(&self) -> Result<ReverseName> {
        let address = self
            .context
            .session()
            .ok_or_else(|| RnsError::SessionMissing("no wallet session attached".into()))?
            .require_address()?;
        self.lookup(address).await
    }

    async fn execute(&self, plan: ReversePlan) -> Result<ReverseName> {
        let ReversePlan { network, mut stage } = plan;

        loop {
            stage = match stage {
                ReverseStage::ResolveNode(call) => {
                    let node: Node = self.gateway.call(&network, &call).await?;
                    match Self::prepare_name(Some(&network), Some(node)) {
                        Some(next) => ReverseStage::ResolveName(next),
                        None => {
                            debug!(%node, "No reverse record, name stage skipped");
                            return Ok(ReverseName::unresolved());
                        }
                    }
                }
                ReverseStage::ResolveName(call) => {
                    let full_name: String = self.gateway.call(&network, &call).await?;
                    let resolved = ReverseName::from_full_name(&full_name);
                    if let Some(full_name) = &resolved.full_name {
                        info!(full_name, "Reverse resolved");
                    }
                    return Ok(resolved);
                }
            };
        }
    }
}

#[async_trait]
impl Operation for ReverseLookup {
    type Input = String;
    type Prepared = ReversePlan;
    type Output = ReverseName;

    fn prepare(&self, input: &String) -> Option<ReversePlan> {
        let address = input.trim().parse().ok()?;
        self.plan(address)
    }

    async fn run(&self, plan: ReversePlan) -> Result<ReverseName> {
        self.execute(plan).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{self, RESOLVER, REVERSE_REGISTRAR};
    use rns_contracts::mock::MockReply;
    use rns_core::network::NetworkTable;
    use rns_core::types::{QueryState, WalletAccount, WalletSession, B256};
    use rns_wallet::SessionReader;
    use test_case::test_case;

    const BOB: &str = "0xabcd000000000000000000000000000000001234";

    fn bob() -> Address {
        BOB.parse().unwrap()
    }

    fn node_hash() -> B256 {
        B256::from_array([0x44; 32])
    }

    fn script_bob(mock: &rns_contracts::mock::MockTransport) {
        mock.on(
            &functions::reverse_node(REVERSE_REGISTRAR, bob()),
            MockReply::bytes32(node_hash()),
        );
        mock.on(
            &functions::resolver_name(RESOLVER, node_hash()),
            MockReply::string("bob.root"),
        );
    }

    #[tokio::test]
    async fn test_two_stage_resolution() {
        let (mock, gateway) = testing::gateway();
        script_bob(&mock);
        let lookup = ReverseLookup::new(testing::context(testing::network()), gateway);

        let state = lookup.read(&BOB.to_string()).await;

        assert!(!state.is_loading);
        let name = state.data.unwrap();
        assert_eq!(name.full_name.as_deref(), Some("bob.root"));
        assert_eq!(name.name, "bob");
        assert_eq!(mock.call_count(), 2);
    }

    #[tokio::test]
    async fn test_no_mapping_never_fires_name_stage() {
        let (mock, gateway) = testing::gateway();
        let address = Address::from_array([0x55; 20]);
        mock.on(
            &functions::reverse_node(REVERSE_REGISTRAR, address),
            MockReply::bytes32(B256::zero()),
        );
        let lookup = ReverseLookup::new(testing::context(testing::network()), gateway);

        let name = lookup.lookup(address).await.unwrap();

        assert_eq!(name, ReverseName { full_name: None, name: String::new() });
        assert_eq!(mock.calls_to(RESOLVER), 0);
    }

    #[tokio::test]
    async fn test_stage_one_failure_short_circuits() {
        let (mock, gateway) = testing::gateway();
        mock.on(
            &functions::reverse_node(REVERSE_REGISTRAR, bob()),
            MockReply::Error("node unavailable".into()),
        );
        let lookup = ReverseLookup::new(testing::context(testing::network()), gateway);

        let state = lookup.read(&bob().to_string()).await;

        assert!(state.data.is_none());
        assert!(matches!(state.error.as_deref(), Some(RnsError::RpcError(_))));
        assert_eq!(mock.calls_to(RESOLVER), 0);
    }

    #[tokio::test]
    async fn test_unknown_chain_makes_no_calls() {
        let (mock, gateway) = testing::gateway();
        let context = RnsContext::new(NetworkTable::from_networks([testing::network()]), 999);
        let lookup = ReverseLookup::new(context, gateway);

        let state = lookup.read(&bob().to_string()).await;

        assert!(state.is_disabled());
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn test_missing_resolver_disables_name_stage() {
        let (mock, gateway) = testing::gateway();
        let mut network = testing::network();
        network.resolver_address = None;
        mock.on(
            &functions::reverse_node(REVERSE_REGISTRAR, bob()),
            MockReply::bytes32(node_hash()),
        );
        let lookup = ReverseLookup::new(testing::context(network), gateway);

        let name = lookup.lookup(bob()).await.unwrap();

        assert!(!name.is_resolved());
        assert_eq!(mock.call_count(), 1);
    }

    #[test_case("" ; "empty")]
    #[test_case("   " ; "blank")]
    #[test_case("0x1234" ; "short")]
    #[test_case("bob.revo" ; "not an address")]
    #[test_case("0x0000000000000000000000000000000000000000" ; "zero address")]
    fn test_malformed_input_is_disabled(input: &str) {
        let (mock, gateway) = testing::gateway();
        let lookup = ReverseLookup::new(testing::context(testing::network()), gateway);

        let state: QueryState<ReverseName> = tokio_test::block_on(lookup.read(&input.to_string()));

        assert!(state.is_disabled());
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn test_empty_resolver_name_is_unresolved() {
        let (mock, gateway) = testing::gateway();
        mock.on(
            &functions::reverse_node(REVERSE_REGISTRAR, bob()),
            MockReply::bytes32(node_hash()),
        );
        mock.on(
            &functions::resolver_name(RESOLVER, node_hash()),
            MockReply::string(""),
        );
        let lookup = ReverseLookup::new(testing::context(testing::network()), gateway);

        let name = lookup.lookup(bob()).await.unwrap();

        assert_eq!(name, ReverseName::unresolved());
    }

    #[tokio::test]
    async fn test_current_account_requires_session() {
        let (mock, gateway) = testing::gateway();
        let lookup = ReverseLookup::new(testing::context(testing::network()), gateway);

        let err = lookup.for_current_account().await.unwrap_err();

        assert!(matches!(err, RnsError::SessionMissing(_)));
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn test_current_account_uses_session_address() {
        let (mock, gateway) = testing::gateway();
        script_bob(&mock);
        let session = SessionReader::detached(WalletSession::connected(WalletAccount {
            address: bob(),
            chain_id: Some(testing::CHAIN_ID),
        }));
        let context = testing::context(testing::network()).with_session(session);
        let lookup = ReverseLookup::new(context, gateway);

        let name = lookup.for_current_account().await.unwrap();

        assert_eq!(name.name, "bob");
    }

    #[tokio::test]
    async fn test_identical_lookups_agree() {
        let (mock, gateway) = testing::gateway();
        script_bob(&mock);
        let lookup = ReverseLookup::new(testing::context(testing::network()), gateway);

        let first = lookup.lookup(bob()).await.unwrap();
        let second = lookup.lookup(bob()).await.unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_name_is_first_segment() {
        let name = ReverseName::from_full_name("alice.root");
        assert_eq!(name.name, "alice");
        assert_eq!(name.full_name.as_deref(), Some("alice.root"));
    }
}
