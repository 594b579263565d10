//! Domain types for RNS.
//!
//! - [`Address`] / [`B256`]: on-chain addresses and 32-byte words
//! - [`RnsName`] / [`NameRecord`]: validated names and their ownership view
//! - [`NameDates`]: registration, expiry and grace period dates
//! - [`QueryState`]: `{data, is_loading, error}` of a gated read
//! - [`WalletSession`]: wallet connection state

mod address;
mod dates;
mod name;
mod query;
mod session;

pub use address::*;
pub use dates::*;
pub use name::*;
pub use query::*;
pub use session::*;
