//! Constants for the RNS client.

// ═══════════════════════════════════════════════════════════════════════════════
// NAMING
// ═══════════════════════════════════════════════════════════════════════════════

/// Root name that second-level names are registered under.
pub const DEFAULT_ROOT_NAME: &str = "revo";

/// Separator between the label and the root name.
pub const NAME_SEPARATOR: char = '.';

/// Interval after expiry during which a name stays reserved to its previous owner.
/// 90 days.
pub const GRACE_PERIOD_SECONDS: u64 = 90 * 24 * 60 * 60;

// ═══════════════════════════════════════════════════════════════════════════════
// ETHEREUM
// ═══════════════════════════════════════════════════════════════════════════════

/// Size of an account address in bytes.
pub const ADDRESS_SIZE: usize = 20;

/// Size of keccak256 output and of a node / label hash.
pub const HASH_SIZE: usize = 32;

/// Number of leading characters kept when shortening an address for display ("0x" + 4).
pub const DISPLAY_ADDRESS_PREFIX: usize = 6;

/// Number of trailing characters kept when shortening an address for display.
pub const DISPLAY_ADDRESS_SUFFIX: usize = 4;

// ═══════════════════════════════════════════════════════════════════════════════
// NETWORKS
// ═══════════════════════════════════════════════════════════════════════════════

/// Chain id of a local development node.
pub const LOCAL_CHAIN_ID: u64 = 31337;

/// RPC endpoint of a local development node.
pub const LOCAL_RPC_URL: &str = "http://127.0.0.1:8545";

/// Subgraph endpoint of a local graph node.
pub const LOCAL_SUBGRAPH_URL: &str = "http://127.0.0.1:8000/subgraphs/name/rns";

/// Chain id used when nothing else is configured.
pub const DEFAULT_CHAIN_ID: u64 = LOCAL_CHAIN_ID;

// ═══════════════════════════════════════════════════════════════════════════════
// CLIENT DEFAULTS
// ═══════════════════════════════════════════════════════════════════════════════

/// Default request timeout for RPC and subgraph calls.
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

/// Default page size for subgraph listings.
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// Largest page the subgraph accepts.
pub const MAX_PAGE_SIZE: u32 = 1000;
