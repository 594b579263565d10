//! Contract interfaces and typed calls.
//!
//! Calldata and return values go through the `sol!` bindings below. A
//! [`ContractCall`] holds the encoded calldata together with the decoder
//! for its return value, so a read is typed by the call that built it.

use std::fmt;
use std::hash::{Hash, Hasher};

use alloy::primitives::U256;
use alloy::sol_types::SolCall;

use rns_core::error::{Result, RnsError};
use rns_core::types::{Address, B256};

alloy::sol! {
    /// Reverse registrar: maps an address to its reverse node.
    #[allow(missing_docs)]
    interface IReverseRegistrar {
        function node(address addr) external view returns (bytes32);
    }

    /// Public resolver: display name stored for a node.
    #[allow(missing_docs)]
    interface IResolver {
        function name(bytes32 node) external view returns (string);
    }

    /// Base registrar: ERC-721 over label hashes.
    #[allow(missing_docs)]
    interface IRegistrar {
        function ownerOf(uint256 tokenId) external view returns (address);
        function nameExpires(uint256 id) external view returns (uint256);
        function available(uint256 id) external view returns (bool);
    }
}

/// A fully-specified read: contract, encoded call and return decoder.
pub struct ContractCall<R> {
    /// Contract address
    pub to: Address,
    signature: &'static str,
    calldata: Vec<u8>,
    decode: fn(&[u8]) -> Result<R>,
}

impl<R> ContractCall<R> {
    /// Encodes `call` against `to`, decoding replies with `decode`.
    pub fn new<C: SolCall>(to: Address, call: &C, decode: fn(&[u8]) -> Result<R>) -> Self {
        Self {
            to,
            signature: C::SIGNATURE,
            calldata: call.abi_encode(),
            decode,
        }
    }

    /// Canonical signature, e.g. `node(address)`.
    pub fn signature(&self) -> &'static str {
        self.signature
    }

    /// Selector and arguments.
    pub fn calldata(&self) -> &[u8] {
        &self.calldata
    }

    /// Owned copy of the calldata.
    pub fn encode(&self) -> Vec<u8> {
        self.calldata.clone()
    }

    /// Decodes raw return data.
    pub fn decode(&self, raw: &[u8]) -> Result<R> {
        (self.decode)(raw)
    }
}

impl<R> Clone for ContractCall<R> {
    fn clone(&self) -> Self {
        Self {
            to: self.to,
            signature: self.signature,
            calldata: self.calldata.clone(),
            decode: self.decode,
        }
    }
}

impl<R> fmt::Debug for ContractCall<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContractCall")
            .field("to", &self.to)
            .field("function", &self.signature)
            .field("calldata", &hex::encode(&self.calldata))
            .finish()
    }
}

// The decoder is fixed by the function, so contract and calldata identify a call.
impl<R> PartialEq for ContractCall<R> {
    fn eq(&self, other: &Self) -> bool {
        self.to == other.to && self.calldata == other.calldata
    }
}

impl<R> Eq for ContractCall<R> {}

impl<R> Hash for ContractCall<R> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.to.hash(state);
        self.calldata.hash(state);
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// CONVERSIONS
// ═══════════════════════════════════════════════════════════════════════════════

/// Decodes the return value of `C`, naming the function on failure.
pub(crate) fn decode_returns<C: SolCall>(raw: &[u8]) -> Result<C::Return> {
    if raw.is_empty() {
        return Err(RnsError::AbiDecodeError(format!(
            "{}: empty return data",
            C::SIGNATURE
        )));
    }
    C::abi_decode_returns(raw)
        .map_err(|e| RnsError::AbiDecodeError(format!("{}: {}", C::SIGNATURE, e)))
}

pub(crate) fn sol_address(address: Address) -> alloy::primitives::Address {
    alloy::primitives::Address::from(address.into_array())
}

pub(crate) fn sol_uint(value: B256) -> U256 {
    U256::from_be_bytes(value.into_array())
}

pub(crate) fn sol_bytes32(value: B256) -> alloy::primitives::B256 {
    alloy::primitives::B256::from(value.into_array())
}

pub(crate) fn rns_address(address: alloy::primitives::Address) -> Address {
    Address::from_array(address.into())
}

pub(crate) fn rns_bytes32(value: alloy::primitives::B256) -> B256 {
    B256::from_array(value.into())
}

pub(crate) fn rns_u64(value: U256) -> Result<u64> {
    u64::try_from(value)
        .map_err(|_| RnsError::AbiDecodeError(format!("uint256 {} does not fit in 64 bits", value)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::sol_types::SolValue;

    fn name_call() -> ContractCall<String> {
        let node = B256::from_array([0x44; 32]);
        let call = IResolver::nameCall {
            node: sol_bytes32(node),
        };
        ContractCall::new(Address::zero(), &call, decode_returns::<IResolver::nameCall>)
    }

    #[test]
    fn test_calldata_layout() {
        let addr = Address::from_array([0x11; 20]);
        let call = IReverseRegistrar::nodeCall {
            addr: sol_address(addr),
        };
        let data = call.abi_encode();

        assert_eq!(data.len(), 4 + 32);
        assert!(data[4..16].iter().all(|&b| b == 0));
        assert!(data[16..36].iter().all(|&b| b == 0x11));
    }

    #[test]
    fn test_decode_string() {
        let encoded = String::from("bob.revo").abi_encode();

        assert_eq!(encoded.len(), 96);
        assert_eq!(name_call().decode(&encoded).unwrap(), "bob.revo");
    }

    #[test]
    fn test_decode_rejects_empty_data() {
        let err = name_call().decode(&[]).unwrap_err();

        assert!(err.to_string().contains("empty return data"));
        assert!(err.to_string().contains("name(bytes32)"));
    }

    #[test]
    fn test_decode_string_out_of_bounds() {
        let mut encoded = String::from("hello").abi_encode();
        encoded.truncate(64);

        assert!(matches!(
            name_call().decode(&encoded),
            Err(RnsError::AbiDecodeError(_))
        ));
    }

    #[test]
    fn test_huge_string_offset_is_an_error() {
        let mut encoded = vec![0u8; 96];
        encoded[24..32].copy_from_slice(&(u64::MAX - 31).to_be_bytes());

        let result = std::panic::catch_unwind(|| name_call().decode(&encoded));

        assert!(matches!(result, Ok(Err(RnsError::AbiDecodeError(_)))));
    }

    #[test]
    fn test_huge_string_length_is_an_error() {
        let mut encoded = vec![0u8; 96];
        encoded[31] = 32;
        encoded[56..64].copy_from_slice(&u64::MAX.to_be_bytes());

        assert!(matches!(
            name_call().decode(&encoded),
            Err(RnsError::AbiDecodeError(_))
        ));
    }

    #[test]
    fn test_uint_overflow() {
        let big = U256::from(u64::MAX) + U256::from(1u8);

        assert_eq!(rns_u64(U256::from(1_700_000_000u64)).unwrap(), 1_700_000_000);
        assert!(matches!(rns_u64(big), Err(RnsError::AbiDecodeError(_))));
    }

    #[test]
    fn test_conversions_keep_bytes() {
        let address = Address::from_array([0x22; 20]);
        let node = B256::from_array([0x33; 32]);

        assert_eq!(rns_address(sol_address(address)), address);
        assert_eq!(rns_bytes32(sol_bytes32(node)), node);
        assert_eq!(sol_uint(B256::from_u64(5)), U256::from(5u8));
    }

    #[test]
    fn test_calls_compare_by_target_and_calldata() {
        let a = name_call();
        let mut b = a.clone();
        assert_eq!(a, b);

        b.to = Address::from_array([1; 20]);
        assert_ne!(a, b);
    }
}
