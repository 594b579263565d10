//! # RNS Contract Read Gateway
//!
//! Read-only access to the three naming contracts (registrar, reverse
//! registrar, resolver) over JSON-RPC `eth_call`.
//!
//! Every read is parameterized by contract address, function and arguments,
//! and gated by an `enabled` flag computed by the caller: a disabled read is
//! never dispatched. Calldata and return values are encoded through `sol!`
//! bindings of the contract interfaces.

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

pub mod abi;
pub mod functions;
mod gateway;
#[cfg(any(test, feature = "test-utils"))]
pub mod mock;
mod rpc;

pub use abi::ContractCall;
pub use gateway::ContractGateway;
pub use rpc::{JsonRpcTransport, RpcConfig};
