//! Owner detail: name to owner and lifecycle dates.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use rns_contracts::{functions, ContractGateway};
use rns_core::error::{Result, RnsError};
use rns_core::network::NetworkConfig;
use rns_core::types::{unix_now, Address, NameDates, NameRecord, NameStatus, RnsName};
use rns_subgraph::{SubgraphClient, SubgraphResult};

use crate::context::RnsContext;
use crate::operation::Operation;

/// Owner and dates of a name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnerRecord {
    /// Ownership view with full and shortened owner address
    pub record: NameRecord,
    /// Registration, expiry and grace period end; `None` if never registered
    pub dates: Option<NameDates>,
}

/// A name bound to a network with a registry.
#[derive(Clone, Debug)]
pub struct OwnerPlan {
    network: NetworkConfig,
    registry: Address,
    name: RnsName,
}

/// Name to owner resolution.
pub struct OwnerDetail {
    context: RnsContext,
    gateway: ContractGateway,
    subgraph: Arc<SubgraphClient>,
}

impl OwnerDetail {
    /// Creates the operation.
    pub fn new(
        context: RnsContext,
        gateway: ContractGateway,
        subgraph: Arc<SubgraphClient>,
    ) -> Self {
        Self {
            context,
            gateway,
            subgraph,
        }
    }

    /// Precondition: a well-formed name and a registry on the active network.
    pub fn plan(&self, input: &str) -> Option<OwnerPlan> {
        let network = self.context.network()?;
        let registry = network.registry_address?;
        let name = RnsName::parse(input, &network.root_name).ok()?;
        Some(OwnerPlan {
            network: network.clone(),
            registry,
            name,
        })
    }

    /// Resolves owner and dates of `name`.
    ///
    /// `ownerOf` and `nameExpires` are independent and issued together with
    /// the subgraph registration lookup. A reverted `ownerOf` means the name
    /// has no owner.
    #[instrument(skip(self, plan), fields(name = %plan.name))]
    pub async fn resolve(&self, plan: OwnerPlan) -> Result<OwnerRecord> {
        let OwnerPlan {
            network,
            registry,
            name,
        } = plan;
        let token_id = name.token_id();
        let owner_call = functions::owner_of(registry, token_id);
        let expiry_call = functions::name_expires(registry, token_id);

        let (owner, expiry, registered_at) = futures::join!(
            self.gateway.call(&network, &owner_call),
            self.gateway.call(&network, &expiry_call),
            self.registration_date(&network, &name),
        );

        let owner = match owner {
            Ok(owner) => Some(owner).filter(|o| !o.is_zero()),
            Err(RnsError::ExecutionReverted(reason)) => {
                debug!(reason, "ownerOf reverted, name has no owner");
                None
            }
            Err(e) => return Err(e),
        };
        let expiry = expiry?;

        let dates = (expiry > 0).then(|| NameDates::new(registered_at, expiry));
        let reserved = dates
            .as_ref()
            .is_some_and(|d| !d.is_released_at(unix_now()));
        let status = if owner.is_some() || reserved {
            NameStatus::Registered
        } else {
            NameStatus::Available
        };

        info!(status = %status, owner = ?owner, "Owner resolved");
        Ok(OwnerRecord {
            record: NameRecord::new(&name, owner, status),
            dates,
        })
    }

    /// Registration date from the subgraph. Absence or failure is not fatal.
    async fn registration_date(&self, network: &NetworkConfig, name: &RnsName) -> Option<u64> {
        match self
            .subgraph
            .name_by_label(network.subgraph_url.as_deref(), name.label())
            .await
        {
            Ok(SubgraphResult::Data(found)) => found.and_then(|n| n.registration_date),
            Ok(SubgraphResult::Unavailable) => None,
            Err(e) => {
                warn!(error = %e, "Registration date unavailable");
                None
            }
        }
    }
}

#[async_trait]
impl Operation for OwnerDetail {
    type Input = String;
    type Prepared = OwnerPlan;
    type Output = OwnerRecord;

    fn prepare(&self, input: &String) -> Option<OwnerPlan> {
        self.plan(input)
    }

    async fn run(&self, plan: OwnerPlan) -> Result<OwnerRecord> {
        self.resolve(plan).await
    }
}
