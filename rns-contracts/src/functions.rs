//! Read functions of the three naming contracts and their call builders.

use rns_core::error::Result;
use rns_core::types::{Address, B256};

use crate::abi::{
    decode_returns, rns_address, rns_bytes32, rns_u64, sol_address, sol_bytes32, sol_uint,
    ContractCall, IRegistrar, IResolver, IReverseRegistrar,
};

/// Reverse node of `address`: `node(address) -> bytes32`.
pub fn reverse_node(reverse_registrar: Address, address: Address) -> ContractCall<B256> {
    let call = IReverseRegistrar::nodeCall {
        addr: sol_address(address),
    };
    ContractCall::new(reverse_registrar, &call, decode_node)
}

/// Display name stored for `node`: `name(bytes32) -> string`.
pub fn resolver_name(resolver: Address, node: B256) -> ContractCall<String> {
    let call = IResolver::nameCall {
        node: sol_bytes32(node),
    };
    ContractCall::new(resolver, &call, decode_returns::<IResolver::nameCall>)
}

/// Owner of the registrar token. Reverts for unregistered or expired tokens.
pub fn owner_of(registry: Address, token_id: B256) -> ContractCall<Address> {
    let call = IRegistrar::ownerOfCall {
        tokenId: sol_uint(token_id),
    };
    ContractCall::new(registry, &call, decode_owner)
}

/// Expiry timestamp of the registrar token.
pub fn name_expires(registry: Address, token_id: B256) -> ContractCall<u64> {
    let call = IRegistrar::nameExpiresCall {
        id: sol_uint(token_id),
    };
    ContractCall::new(registry, &call, decode_expiry)
}

/// Whether the registrar token can be registered.
pub fn available(registry: Address, token_id: B256) -> ContractCall<bool> {
    let call = IRegistrar::availableCall {
        id: sol_uint(token_id),
    };
    ContractCall::new(registry, &call, decode_returns::<IRegistrar::availableCall>)
}

fn decode_node(raw: &[u8]) -> Result<B256> {
    decode_returns::<IReverseRegistrar::nodeCall>(raw).map(rns_bytes32)
}

fn decode_owner(raw: &[u8]) -> Result<Address> {
    decode_returns::<IRegistrar::ownerOfCall>(raw).map(rns_address)
}

fn decode_expiry(raw: &[u8]) -> Result<u64> {
    rns_u64(decode_returns::<IRegistrar::nameExpiresCall>(raw)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::sol_types::SolValue;

    fn selector<R>(call: &ContractCall<R>) -> String {
        hex::encode(&call.calldata()[..4])
    }

    #[test]
    fn test_selectors_are_distinct() {
        let contract = Address::from_array([1; 20]);
        let id = B256::from_u64(1);
        let selectors = [
            selector(&reverse_node(contract, contract)),
            selector(&resolver_name(contract, id)),
            selector(&owner_of(contract, id)),
            selector(&name_expires(contract, id)),
            selector(&available(contract, id)),
        ];
        for (i, a) in selectors.iter().enumerate() {
            for b in &selectors[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_known_selectors() {
        let contract = Address::from_array([1; 20]);
        let id = B256::from_u64(1);

        assert_eq!(selector(&owner_of(contract, id)), "6352211e");
        assert_eq!(selector(&resolver_name(contract, id)), "691f3431");
        assert_eq!(owner_of(contract, id).signature(), "ownerOf(uint256)");
    }

    #[test]
    fn test_call_builders_target_contract() {
        let registry = Address::from_array([1; 20]);
        let call = owner_of(registry, B256::from_u64(5));

        assert_eq!(call.to, registry);
        assert_eq!(&call.calldata()[4..], B256::from_u64(5).as_bytes());
    }

    #[test]
    fn test_builders_decode_into_core_types() {
        let contract = Address::from_array([1; 20]);
        let id = B256::from_u64(1);
        let owner = Address::from_array([0x22; 20]);

        let raw = alloy::primitives::Address::from(owner.into_array()).abi_encode();
        assert_eq!(owner_of(contract, id).decode(&raw).unwrap(), owner);

        let raw = alloy::primitives::U256::from(1_800_000_000u64).abi_encode();
        assert_eq!(name_expires(contract, id).decode(&raw).unwrap(), 1_800_000_000);

        assert!(available(contract, id).decode(&true.abi_encode()).unwrap());
    }

    #[test]
    fn test_expiry_beyond_u64_is_rejected() {
        let contract = Address::from_array([1; 20]);
        let raw = alloy::primitives::U256::MAX.abi_encode();

        assert!(name_expires(contract, B256::from_u64(1)).decode(&raw).is_err());
    }
}
