//! # RNS Core
//!
//! Core types, errors, and traits for the RNS name-resolution client.
//!
//! This crate provides the building blocks shared by every other RNS crate:
//!
//! - **Types**: addresses, names, dates, query state, wallet session
//! - **Network**: the per-chain contract and subgraph table
//! - **Errors**: one error enum for configuration, input, session and network failures
//! - **Constants**: grace period, ABI sizes, defaults
//! - **Traits**: transport and wallet seams
//!
//! ## Example
//!
//! ```rust
//! use rns_core::{NetworkTable, RnsName};
//!
//! let table = NetworkTable::builtin();
//! let network = table.resolve(31337).expect("local network");
//! let name = RnsName::parse("Alice", &network.root_name).unwrap();
//! assert_eq!(name.full_name(), "alice.revo");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, clippy::all)]

pub mod constants;
pub mod error;
pub mod namehash;
pub mod network;
pub mod traits;
pub mod types;

// Re-export commonly used items at crate root
pub use constants::*;
pub use error::{Result, RnsError};
pub use namehash::{first_label, keccak256, labelhash, namehash};
pub use network::{NetworkConfig, NetworkTable};
pub use traits::*;
pub use types::*;
