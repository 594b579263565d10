//! Error types for RNS.
//!
//! One error hierarchy for the whole client. Configuration-absent and
//! malformed-input conditions are modelled here too, but the resolution
//! layer normally turns them into a disabled query instead of raising them.

use thiserror::Error;

/// Result type alias using `RnsError`.
pub type Result<T> = std::result::Result<T, RnsError>;

/// Main error type for all RNS operations.
#[derive(Debug, Error)]
pub enum RnsError {
    // ═══════════════════════════════════════════════════════════════════════════
    // CONFIGURATION ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// No network configuration exists for the chain.
    #[error("No network configuration for chain {0}")]
    NetworkNotConfigured(u64),

    /// The network exists but lacks the contract needed for the operation.
    #[error("Contract '{contract}' is not deployed on chain {chain_id}")]
    ContractNotConfigured { chain_id: u64, contract: &'static str },

    /// No subgraph endpoint for the chain.
    #[error("No subgraph configured for chain {0}")]
    SubgraphNotConfigured(u64),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    // ═══════════════════════════════════════════════════════════════════════════
    // INPUT ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Input validation failed.
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Malformed account address.
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// Malformed name.
    #[error("Invalid name '{name}': {reason}")]
    InvalidName { name: String, reason: String },

    // ═══════════════════════════════════════════════════════════════════════════
    // SESSION ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// A wallet-dependent operation ran without a connected session.
    #[error("No wallet session: {0}")]
    SessionMissing(String),

    /// The wallet provider refused or failed a request.
    #[error("Wallet error: {0}")]
    WalletError(String),

    // ═══════════════════════════════════════════════════════════════════════════
    // NETWORK ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    HttpError(String),

    /// JSON-RPC call returned an error.
    #[error("RPC call failed: {0}")]
    RpcError(String),

    /// The contract call reverted.
    #[error("Execution reverted: {0}")]
    ExecutionReverted(String),

    /// The subgraph answered with GraphQL errors.
    #[error("Subgraph query failed: {0}")]
    GraphqlError(String),

    /// Request timed out.
    #[error("Connection timeout: {0}")]
    ConnectionTimeout(String),

    // ═══════════════════════════════════════════════════════════════════════════
    // DECODING ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Invalid hex encoding.
    #[error("Invalid hex encoding: {0}")]
    HexError(#[from] hex::FromHexError),

    /// Return data did not match the expected ABI type.
    #[error("ABI decode error: {0}")]
    AbiDecodeError(String),

    /// File I/O error.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    // ═══════════════════════════════════════════════════════════════════════════
    // INTERNAL ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Internal invariant violation (should never happen).
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl RnsError {
    /// Returns true if this error is transient and the caller may retry.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            RnsError::HttpError(_) | RnsError::ConnectionTimeout(_) | RnsError::RpcError(_)
        )
    }

    /// Returns true if the error means "feature unavailable on this chain".
    pub fn is_config_absent(&self) -> bool {
        matches!(
            self,
            RnsError::NetworkNotConfigured(_)
                | RnsError::ContractNotConfigured { .. }
                | RnsError::SubgraphNotConfigured(_)
        )
    }

    /// Returns true if this is an input validation error.
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            RnsError::ValidationError(_)
                | RnsError::InvalidAddress(_)
                | RnsError::InvalidName { .. }
        )
    }

    /// Shorthand for an invalid name error.
    pub fn invalid_name(name: impl Into<String>, reason: impl Into<String>) -> Self {
        RnsError::InvalidName {
            name: name.into(),
            reason: reason.into(),
        }
    }
}
