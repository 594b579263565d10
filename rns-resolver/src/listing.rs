//! Subgraph-backed name listings.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use rns_core::constants::DEFAULT_PAGE_SIZE;
use rns_core::error::Result;
use rns_core::namehash::first_label;
use rns_core::types::{Address, NameDate};
use rns_subgraph::{RevoName, SubgraphClient, SubgraphResult};

use crate::context::RnsContext;
use crate::operation::Operation;

/// One row of a listing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameSummary {
    /// Label only
    pub name: String,
    /// Label plus root suffix
    pub full_name: String,
    /// Owner, when indexed
    pub owner_address: Option<Address>,
    /// Expiry plus grace period, when indexed
    pub expiry_date_with_grace: Option<NameDate>,
}

impl NameSummary {
    /// Builds a row from an indexed entity. Entities without a known label are skipped.
    pub fn from_entity(entity: &RevoName, root: &str) -> Option<Self> {
        let full_name = entity
            .name
            .clone()
            .or_else(|| entity.label_name.as_ref().map(|l| format!("{}.{}", l, root)))?;
        let name = entity
            .label_name
            .clone()
            .unwrap_or_else(|| first_label(&full_name).to_string());

        Some(Self {
            name,
            full_name,
            owner_address: entity.owner_address(),
            expiry_date_with_grace: entity.expiry_date_with_grace.map(NameDate::from_timestamp),
        })
    }
}

/// Result of a listing query.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "names", rename_all = "lowercase")]
pub enum Listing {
    /// Names returned by the subgraph
    Names(Vec<NameSummary>),
    /// No subgraph on the active chain
    Unavailable,
}

impl Listing {
    /// The names, empty when unavailable.
    pub fn names(&self) -> &[NameSummary] {
        match self {
            Listing::Names(names) => names,
            Listing::Unavailable => &[],
        }
    }
}

/// What to list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ListingQuery {
    /// Every name, newest registration first
    All {
        /// Page size
        first: u32,
        /// Rows to skip
        skip: u32,
    },
    /// Names held by an owner given as user text
    ByOwner {
        /// Owner address
        owner: String,
        /// Page size
        first: u32,
        /// Rows to skip
        skip: u32,
    },
}

impl Default for ListingQuery {
    fn default() -> Self {
        ListingQuery::All {
            first: DEFAULT_PAGE_SIZE,
            skip: 0,
        }
    }
}

/// A validated listing bound to a network.
#[derive(Clone, Debug)]
pub struct ListingPlan {
    endpoint: Option<String>,
    root: String,
    owner: Option<Address>,
    first: u32,
    skip: u32,
}

/// Listings from the indexing subgraph.
pub struct NameListing {
    context: RnsContext,
    subgraph: Arc<SubgraphClient>,
}

impl NameListing {
    /// Creates the operation.
    pub fn new(context: RnsContext, subgraph: Arc<SubgraphClient>) -> Self {
        Self { context, subgraph }
    }

    /// Precondition: a configured network and, for owner listings, a
    /// well-formed owner. A missing subgraph is not a precondition failure:
    /// the query reports `Unavailable` instead.
    pub fn plan(&self, query: &ListingQuery) -> Option<ListingPlan> {
        let network = self.context.network()?;
        let (owner, first, skip) = match query {
            ListingQuery::All { first, skip } => (None, *first, *skip),
            ListingQuery::ByOwner { owner, first, skip } => {
                let owner: Address = owner.trim().parse().ok()?;
                (Some(owner), *first, *skip)
            }
        };

        Some(ListingPlan {
            endpoint: network.subgraph_url.clone(),
            root: network.root_name.clone(),
            owner,
            first,
            skip,
        })
    }

    /// Runs the listing.
    #[instrument(
        skip(self, plan),
        fields(owner = ?plan.owner, first = plan.first, skip = plan.skip)
    )]
    pub async fn list(&self, plan: ListingPlan) -> Result<Listing> {
        let endpoint = plan.endpoint.as_deref();
        let result = match plan.owner {
            Some(owner) => {
                self.subgraph
                    .names_by_owner(endpoint, owner, plan.first, plan.skip)
                    .await?
            }
            None => self.subgraph.all_names(endpoint, plan.first, plan.skip).await?,
        };

        Ok(match result {
            SubgraphResult::Data(entities) => {
                let names: Vec<NameSummary> = entities
                    .iter()
                    .filter_map(|e| NameSummary::from_entity(e, &plan.root))
                    .collect();
                debug!(count = names.len(), "Listing returned");
                Listing::Names(names)
            }
            SubgraphResult::Unavailable => Listing::Unavailable,
        })
    }
}

#[async_trait]
impl Operation for NameListing {
    type Input = ListingQuery;
    type Prepared = ListingPlan;
    type Output = Listing;

    fn prepare(&self, input: &ListingQuery) -> Option<ListingPlan> {
        self.plan(input)
    }

    async fn run(&self, plan: ListingPlan) -> Result<Listing> {
        self.list(plan).await
    }
}
