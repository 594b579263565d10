//! # RNS Wallet
//!
//! Wallet session provider for the RNS client.
//!
//! A [`SessionProvider`] owns the connection state of one wallet and hands
//! out read-only [`SessionReader`]s. Resolution operations that default to
//! "the current account" take a reader and fail fast with
//! `RnsError::SessionMissing` when nothing is connected.
//!
//! ## Example
//!
//! ```rust,no_run
//! use rns_wallet::{SessionProvider, WatchOnlyWallet};
//!
//! # async fn example() -> rns_core::Result<()> {
//! let wallet = WatchOnlyWallet::parse("0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed", Some(31337))?;
//! let provider = SessionProvider::new(wallet);
//! let reader = provider.reader();
//!
//! provider.connect().await?;
//! assert!(reader.is_connected());
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, clippy::all)]

mod rpc;
mod session;
mod watch_only;

pub use rpc::RpcWallet;
pub use session::{SessionProvider, SessionReader};
pub use watch_only::WatchOnlyWallet;
