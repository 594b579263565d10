//! # RNS Resolver
//!
//! Name resolution on top of the contract and subgraph gateways.
//!
//! ## Operations
//!
//! - [`ReverseLookup`]: address to name, as a two-stage pipeline
//! - [`OwnerDetail`]: name to owner, expiry and grace period
//! - [`NameAvailability`]: whether a name can be registered
//! - [`NameListing`]: subgraph-backed listings
//!
//! Every operation has an explicit precondition ([`Operation::prepare`]).
//! Empty or malformed input, an unknown chain, or a missing contract
//! disables the read: nothing is dispatched and the state reports
//! `is_loading == false` with no data.
//!
//! [`QueryDriver`] keeps one operation's state in sync with a changing
//! input and discards stale responses.
//!
//! ## Example
//!
//! ```rust,ignore
//! use rns_resolver::{RnsResolver, ResolverConfig};
//!
//! let resolver = RnsResolver::with_config(ResolverConfig::from_env())?;
//! let state = resolver.reverse("0xabcd000000000000000000000000000000001234").await;
//! if let Some(name) = state.data {
//!     println!("{}", name.full_name.unwrap_or_default());
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod availability;
mod context;
mod driver;
mod listing;
mod operation;
mod owner;
mod resolver;
mod reverse;

#[cfg(test)]
mod testing;

pub use availability::{Availability, AvailabilityPlan, NameAvailability};
pub use context::RnsContext;
pub use driver::QueryDriver;
pub use listing::{Listing, ListingPlan, ListingQuery, NameListing, NameSummary};
pub use operation::Operation;
pub use owner::{OwnerDetail, OwnerPlan, OwnerRecord};
pub use resolver::{ResolverConfig, RnsResolver};
pub use reverse::{ReverseLookup, ReverseName, ReversePlan, ReverseStage};
