//! Name availability.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use rns_contracts::{functions, ContractCall, ContractGateway};
use rns_core::error::Result;
use rns_core::network::NetworkConfig;
use rns_core::types::{NameStatus, RnsName};

use crate::context::RnsContext;
use crate::operation::Operation;

/// Whether a name can be registered.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Availability {
    /// Label only
    pub name: String,
    /// Label plus root suffix
    pub full_name: String,
    /// `available` unless a registration is still valid
    pub status: NameStatus,
}

impl Availability {
    /// True if the name can be registered.
    pub fn is_available(&self) -> bool {
        self.status == NameStatus::Available
    }
}

/// An `available(token_id)` call bound to a network.
#[derive(Clone, Debug)]
pub struct AvailabilityPlan {
    network: NetworkConfig,
    name: RnsName,
    call: ContractCall<bool>,
}

/// Name availability check against the registrar.
pub struct NameAvailability {
    context: RnsContext,
    gateway: ContractGateway,
}

impl NameAvailability {
    /// Creates the operation.
    pub fn new(context: RnsContext, gateway: ContractGateway) -> Self {
        Self { context, gateway }
    }

    /// Precondition: a well-formed name and a registry on the active network.
    pub fn plan(&self, input: &str) -> Option<AvailabilityPlan> {
        let network = self.context.network()?;
        let registry = network.registry_address?;
        let name = RnsName::parse(input, &network.root_name).ok()?;
        Some(AvailabilityPlan {
            call: functions::available(registry, name.token_id()),
            network: network.clone(),
            name,
        })
    }

    /// Asks the registrar whether the name is free.
    #[instrument(skip(self, plan), fields(name = %plan.name))]
    pub async fn check(&self, plan: AvailabilityPlan) -> Result<Availability> {
        let available: bool = self.gateway.call(&plan.network, &plan.call).await?;
        let status = if available {
            NameStatus::Available
        } else {
            NameStatus::Registered
        };

        info!(%status, "Availability checked");
        Ok(Availability {
            name: plan.name.label().to_string(),
            full_name: plan.name.full_name(),
            status,
        })
    }
}

#[async_trait]
impl Operation for NameAvailability {
    type Input = String;
    type Prepared = AvailabilityPlan;
    type Output = Availability;

    fn prepare(&self, input: &String) -> Option<AvailabilityPlan> {
        self.plan(input)
    }

    async fn run(&self, plan: AvailabilityPlan) -> Result<Availability> {
        self.check(plan).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{self, REGISTRY};
    use rns_contracts::mock::MockReply;
    use rns_core::network::NetworkTable;

    fn token_id(label: &str) -> rns_core::types::B256 {
        RnsName::parse(label, "revo").unwrap().token_id()
    }

    #[tokio::test]
    async fn test_available_name() {
        let (mock, gateway) = testing::gateway();
        mock.on(
            &functions::available(REGISTRY, token_id("fresh")),
            MockReply::boolean(true),
        );
        let op = NameAvailability::new(testing::context(testing::network()), gateway);

        let availability = op.read(&"fresh.revo".to_string()).await.data.unwrap();

        assert!(availability.is_available());
        assert_eq!(availability.name, "fresh");
        assert_eq!(availability.full_name, "fresh.revo");
    }

    #[tokio::test]
    async fn test_registered_name() {
        let (mock, gateway) = testing::gateway();
        mock.on(
            &functions::available(REGISTRY, token_id("alice")),
            MockReply::boolean(false),
        );
        let op = NameAvailability::new(testing::context(testing::network()), gateway);

        let availability = op.read(&"alice".to_string()).await.data.unwrap();

        assert_eq!(availability.status, NameStatus::Registered);
    }

    #[tokio::test]
    async fn test_empty_name_is_disabled() {
        let (mock, gateway) = testing::gateway();
        let op = NameAvailability::new(testing::context(testing::network()), gateway);

        let state = op.read(&String::new()).await;

        assert!(state.is_disabled());
        assert!(!state.is_loading);
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn test_unknown_chain_is_disabled() {
        let (mock, gateway) = testing::gateway();
        let op = NameAvailability::new(RnsContext::new(NetworkTable::new(), 42), gateway);

        let state = op.read(&"alice".to_string()).await;

        assert!(state.is_disabled());
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn test_failure_passes_through() {
        let (mock, gateway) = testing::gateway();
        mock.on(
            &functions::available(REGISTRY, token_id("alice")),
            MockReply::Error("rate limited".into()),
        );
        let op = NameAvailability::new(testing::context(testing::network()), gateway);

        let state = op.read(&"alice".to_string()).await;

        assert!(state.error.unwrap().is_recoverable());
    }
}
