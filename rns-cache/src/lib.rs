//! Cache for resolved RNS records.
//!
//! Records are keyed by chain and normalized input and expire after a fixed
//! TTL. The resolver keeps one cache per record type.

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod cache;

pub use cache::{CacheConfig, CacheKey, CacheStats, RecordCache};
