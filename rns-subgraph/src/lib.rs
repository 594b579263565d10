//! # RNS Subgraph Gateway
//!
//! GraphQL queries against the indexed mirror of registry events, used for
//! listings that contract calls handle poorly.
//!
//! A chain without a subgraph endpoint yields [`SubgraphResult::Unavailable`]
//! and no request is made.

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod client;
pub mod documents;
mod types;

pub use client::{SubgraphClient, SubgraphConfig, SubgraphResult};
pub use types::{RevoName, RevoNames};
