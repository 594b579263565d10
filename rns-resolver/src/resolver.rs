//! Resolver facade and configuration.

use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use rns_cache::{CacheConfig, CacheKey, CacheStats, RecordCache};
use rns_contracts::{ContractGateway, JsonRpcTransport, RpcConfig};
use rns_core::constants::{DEFAULT_CHAIN_ID, DEFAULT_TIMEOUT_SECONDS};
use rns_core::error::{Result, RnsError};
use rns_core::network::{NetworkConfig, NetworkTable};
use rns_core::traits::CallTransport;
use rns_core::types::{Address, QueryState};
use rns_subgraph::{SubgraphClient, SubgraphConfig};
use rns_wallet::SessionReader;

use crate::availability::{Availability, NameAvailability};
use crate::context::RnsContext;
use crate::listing::{Listing, ListingQuery, NameListing};
use crate::operation::Operation;
use crate::owner::{OwnerDetail, OwnerRecord};
use crate::reverse::{ReverseLookup, ReverseName};

/// Resolver configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// Chain used when no wallet reports one
    pub chain_id: u64,
    /// RPC endpoint used instead of the networks' own
    pub rpc_url: Option<String>,
    /// JSON file with extra or replacement networks
    pub networks_file: Option<PathBuf>,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
    /// Whether to memoize reverse names and owner records
    pub enable_cache: bool,
    /// Cache TTL in seconds
    pub cache_ttl_seconds: u64,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            chain_id: DEFAULT_CHAIN_ID,
            rpc_url: None,
            networks_file: None,
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            enable_cache: false,
            cache_ttl_seconds: 60,
        }
    }
}

impl ResolverConfig {
    /// Reads `RNS_*` variables, after loading `.env` if present.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();
        let defaults = Self::default();

        Self {
            chain_id: env_parse("RNS_CHAIN_ID").unwrap_or(defaults.chain_id),
            rpc_url: std::env::var("RNS_RPC_URL").ok(),
            networks_file: std::env::var("RNS_NETWORKS_FILE").ok().map(PathBuf::from),
            timeout_seconds: env_parse("RNS_TIMEOUT_SECONDS").unwrap_or(defaults.timeout_seconds),
            enable_cache: std::env::var("RNS_ENABLE_CACHE")
                .map(|v| v != "false" && v != "0")
                .unwrap_or(defaults.enable_cache),
            cache_ttl_seconds: env_parse("RNS_CACHE_TTL_SECONDS")
                .unwrap_or(defaults.cache_ttl_seconds),
        }
    }

    /// Sets the default chain.
    pub fn with_chain(mut self, chain_id: u64) -> Self {
        self.chain_id = chain_id;
        self
    }

    /// Sends every contract read to `rpc_url`.
    pub fn with_rpc(mut self, rpc_url: impl Into<String>) -> Self {
        self.rpc_url = Some(rpc_url.into());
        self
    }

    /// Loads extra networks from a JSON file.
    pub fn with_networks_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.networks_file = Some(path.into());
        self
    }

    /// Enables memoization with the given TTL.
    pub fn with_cache(mut self, ttl_seconds: u64) -> Self {
        self.enable_cache = true;
        self.cache_ttl_seconds = ttl_seconds;
        self
    }

    /// The built-in networks merged with the networks file, if any.
    pub fn network_table(&self) -> Result<NetworkTable> {
        let builtin = NetworkTable::builtin();
        match &self.networks_file {
            Some(path) => {
                let extra = NetworkTable::from_file(path).map_err(|e| {
                    RnsError::ConfigError(format!("networks file {}: {}", path.display(), e))
                })?;
                Ok(builtin.merge(extra))
            }
            None => Ok(builtin),
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse().ok())
}

struct Caches {
    reverse: RecordCache<ReverseName>,
    owner: RecordCache<OwnerRecord>,
}

/// Name resolution for one context.
///
/// Bundles the operations over a shared context and gateway and, when
/// enabled, memoizes reverse names and owner records. Availability is
/// never cached.
pub struct RnsResolver {
    context: RnsContext,
    reverse: Arc<ReverseLookup>,
    owner: Arc<OwnerDetail>,
    availability: Arc<NameAvailability>,
    listing: Arc<NameListing>,
    caches: Option<Caches>,
}

impl RnsResolver {
    /// Creates a resolver with default configuration.
    pub fn new() -> Result<Self> {
        Self::with_config(ResolverConfig::default())
    }

    /// Creates a resolver with custom configuration.
    pub fn with_config(config: ResolverConfig) -> Result<Self> {
        Self::with_session(config, None)
    }

    /// Creates a resolver that follows a wallet session.
    pub fn with_session(config: ResolverConfig, session: Option<SessionReader>) -> Result<Self> {
        let rpc_config = RpcConfig {
            rpc_url_override: config.rpc_url.clone(),
            timeout_seconds: config.timeout_seconds,
        };
        let transport = Arc::new(JsonRpcTransport::with_config(rpc_config)?);
        let subgraph = SubgraphClient::with_config(SubgraphConfig {
            timeout_seconds: config.timeout_seconds,
        })?;

        let mut context = RnsContext::new(config.network_table()?, config.chain_id);
        if let Some(session) = session {
            context = context.with_session(session);
        }

        Ok(Self::from_parts(context, transport, subgraph, &config))
    }

    /// Assembles a resolver from an explicit context and transport.
    pub fn from_parts(
        context: RnsContext,
        transport: Arc<dyn CallTransport>,
        subgraph: SubgraphClient,
        config: &ResolverConfig,
    ) -> Self {
        let gateway = ContractGateway::new(transport);
        let subgraph = Arc::new(subgraph);

        let caches = config.enable_cache.then(|| {
            let cache_config = CacheConfig::with_ttl_seconds(config.cache_ttl_seconds);
            Caches {
                reverse: RecordCache::with_config(cache_config.clone()),
                owner: RecordCache::with_config(cache_config),
            }
        });

        info!(
            chain_id = context.active_chain_id(),
            networks = context.networks().len(),
            cache = caches.is_some(),
            "Resolver ready"
        );

        Self {
            reverse: Arc::new(ReverseLookup::new(context.clone(), gateway.clone())),
            owner: Arc::new(OwnerDetail::new(context.clone(), gateway.clone(), subgraph.clone())),
            availability: Arc::new(NameAvailability::new(context.clone(), gateway)),
            listing: Arc::new(NameListing::new(context.clone(), subgraph)),
            context,
            caches,
        }
    }

    /// The shared context.
    pub fn context(&self) -> &RnsContext {
        &self.context
    }

    /// Config of the active chain.
    pub fn network(&self) -> Option<&NetworkConfig> {
        self.context.network()
    }

    /// Reverse lookup operation, for use with a [`crate::QueryDriver`].
    pub fn reverse_lookup(&self) -> Arc<ReverseLookup> {
        Arc::clone(&self.reverse)
    }

    /// Owner detail operation.
    pub fn owner_detail(&self) -> Arc<OwnerDetail> {
        Arc::clone(&self.owner)
    }

    /// Availability operation.
    pub fn name_availability(&self) -> Arc<NameAvailability> {
        Arc::clone(&self.availability)
    }

    /// Listing operation.
    pub fn name_listing(&self) -> Arc<NameListing> {
        Arc::clone(&self.listing)
    }

    fn cache_key(&self, input: &str) -> CacheKey {
        CacheKey::new(self.context.active_chain_id(), input)
    }

    /// Reverse-resolves an address given as text.
    #[instrument(skip(self))]
    pub async fn reverse(&self, address: &str) -> QueryState<ReverseName> {
        let key = self.cache_key(address);
        if let Some(caches) = &self.caches {
            if let Some(name) = caches.reverse.get(&key) {
                debug!(address, "Cache hit");
                return QueryState::ready(name);
            }
        }

        let state = self.reverse.read(&address.to_string()).await;
        if let (Some(caches), Some(name)) = (&self.caches, &state.data) {
            caches.reverse.insert(key, name.clone());
        }
        state
    }

    /// Reverse-resolves the connected account.
    ///
    /// Fails with `SessionMissing` when no account is connected; read
    /// failures are reported in the returned state.
    pub async fn reverse_current_account(&self) -> Result<QueryState<ReverseName>> {
        let address: Address = self
            .context
            .session()
            .ok_or_else(|| RnsError::SessionMissing("no wallet session attached".into()))?
            .require_address()?;
        Ok(self.reverse(&address.to_string()).await)
    }

    /// Owner and dates of a name.
    #[instrument(skip(self))]
    pub async fn owner(&self, name: &str) -> QueryState<OwnerRecord> {
        let key = self.cache_key(name);
        if let Some(caches) = &self.caches {
            if let Some(record) = caches.owner.get(&key) {
                debug!(name, "Cache hit");
                return QueryState::ready(record);
            }
        }

        let state = self.owner.read(&name.to_string()).await;
        if let (Some(caches), Some(record)) = (&self.caches, &state.data) {
            caches.owner.insert(key, record.clone());
        }
        state
    }

    /// Whether a name can be registered.
    pub async fn availability(&self, name: &str) -> QueryState<Availability> {
        self.availability.read(&name.to_string()).await
    }

    /// Lists names from the subgraph.
    pub async fn names(&self, query: ListingQuery) -> QueryState<Listing> {
        self.listing.read(&query).await
    }

    /// Cache statistics, when caching is enabled.
    pub fn cache_stats(&self) -> Option<(CacheStats, CacheStats)> {
        self.caches
            .as_ref()
            .map(|c| (c.reverse.stats(), c.owner.stats()))
    }

    /// Drops every memoized record.
    pub fn clear_cache(&self) {
        if let Some(caches) = &self.caches {
            caches.reverse.clear();
            caches.owner.clear();
        }
    }
}
