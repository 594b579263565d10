//! Name hashing (EIP-137).
//!
//! `namehash` is the on-chain key of a fully-qualified name; `labelhash`
//! is the key of a single label and doubles as the registrar token id.

use crate::constants::NAME_SEPARATOR;
use crate::types::B256;

/// Computes keccak256 of the input.
pub fn keccak256(data: impl AsRef<[u8]>) -> B256 {
    B256::from_array(alloy::primitives::keccak256(data).into())
}

/// Computes the hash of a single label.
pub fn labelhash(label: &str) -> B256 {
    keccak256(label.as_bytes())
}

/// Computes the namehash of a dotted name.
///
/// The empty name hashes to the zero node.
pub fn namehash(name: &str) -> B256 {
    let mut node = [0u8; 32];

    for label in name.rsplit(NAME_SEPARATOR) {
        if label.is_empty() {
            continue;
        }

        let label_hash = labelhash(label);

        let mut combined = [0u8; 64];
        combined[..32].copy_from_slice(&node);
        combined[32..].copy_from_slice(label_hash.as_bytes());

        node = keccak256(combined).into_array();
    }

    B256::from_array(node)
}

/// Returns the first dot-delimited segment of a name.
pub fn first_label(full_name: &str) -> &str {
    full_name.split(NAME_SEPARATOR).next().unwrap_or_default()
}
