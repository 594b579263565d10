//! Address and hash types.
//!
//! - [`Address`]: a 20-byte account or contract address
//! - [`B256`]: a 32-byte word (nodes, label hashes, token ids)

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::constants::{ADDRESS_SIZE, DISPLAY_ADDRESS_PREFIX, DISPLAY_ADDRESS_SUFFIX, HASH_SIZE};
use crate::error::{Result, RnsError};
use crate::namehash::keccak256;

fn strip_hex_prefix(s: &str) -> &str {
    let s = s.trim();
    if s.len() >= 2 && s.get(..2).map(|p| p.eq_ignore_ascii_case("0x")) == Some(true) {
        &s[2..]
    } else {
        s
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// ADDRESS
// ═══════════════════════════════════════════════════════════════════════════════

/// A 20-byte account or contract address.
///
/// Parsing accepts any letter case; display always goes through the EIP-55
/// checksum form so the same address never renders two different ways.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Address {
    bytes: [u8; ADDRESS_SIZE],
}

impl Address {
    /// Creates an address from raw bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != ADDRESS_SIZE {
            return Err(RnsError::InvalidAddress(format!(
                "expected {} bytes, got {}",
                ADDRESS_SIZE,
                bytes.len()
            )));
        }

        let mut arr = [0u8; ADDRESS_SIZE];
        arr.copy_from_slice(bytes);
        Ok(Self { bytes: arr })
    }

    /// Creates from a fixed-size array.
    pub const fn from_array(bytes: [u8; ADDRESS_SIZE]) -> Self {
        Self { bytes }
    }

    /// Parses from hex string (with or without 0x prefix).
    pub fn from_hex(s: &str) -> Result<Self> {
        let digits = strip_hex_prefix(s);
        if digits.len() != ADDRESS_SIZE * 2 {
            return Err(RnsError::InvalidAddress(format!(
                "expected {} hex digits, got {}",
                ADDRESS_SIZE * 2,
                digits.len()
            )));
        }
        let bytes = hex::decode(digits).map_err(|e| RnsError::InvalidAddress(e.to_string()))?;
        Self::from_bytes(&bytes)
    }

    /// Returns the raw bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Consumes into the fixed-size array.
    pub const fn into_array(self) -> [u8; ADDRESS_SIZE] {
        self.bytes
    }

    /// Returns the zero address.
    pub const fn zero() -> Self {
        Self {
            bytes: [0u8; ADDRESS_SIZE],
        }
    }

    /// Returns true if this is the zero address.
    pub fn is_zero(&self) -> bool {
        self.bytes.iter().all(|&b| b == 0)
    }

    /// Returns the lowercase hex string with 0x prefix.
    pub fn to_lower_hex(&self) -> String {
        format!("0x{}", hex::encode(self.bytes))
    }

    /// Returns the EIP-55 checksummed hex string.
    pub fn to_checksum_string(&self) -> String {
        let lower = hex::encode(self.bytes);
        let hash = keccak256(lower.as_bytes());
        let hash = hash.as_bytes();

        let mut out = String::with_capacity(2 + lower.len());
        out.push_str("0x");
        for (i, c) in lower.chars().enumerate() {
            let nibble = if i % 2 == 0 {
                hash[i / 2] >> 4
            } else {
                hash[i / 2] & 0x0f
            };
            if c.is_ascii_alphabetic() && nibble >= 8 {
                out.push(c.to_ascii_uppercase());
            } else {
                out.push(c);
            }
        }
        out
    }

    /// Returns the shortened display form, e.g. `0xAbCd...1234`.
    pub fn short(&self) -> String {
        let full = self.to_checksum_string();
        format!(
            "{}...{}",
            &full[..DISPLAY_ADDRESS_PREFIX],
            &full[full.len() - DISPLAY_ADDRESS_SUFFIX..]
        )
    }
}

impl FromStr for Address {
    type Err = RnsError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_hex(s)
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.to_checksum_string())
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_checksum_string())
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_checksum_string())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Address::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// 32-BYTE WORD
// ═══════════════════════════════════════════════════════════════════════════════

/// A 32-byte word.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct B256 {
    bytes: [u8; HASH_SIZE],
}

/// Namehash of a fully-qualified name.
pub type Node = B256;

/// Hash of a single label.
pub type LabelHash = B256;

impl B256 {
    /// Creates a word from raw bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != HASH_SIZE {
            return Err(RnsError::ValidationError(format!(
                "expected {} bytes, got {}",
                HASH_SIZE,
                bytes.len()
            )));
        }
        let mut arr = [0u8; HASH_SIZE];
        arr.copy_from_slice(bytes);
        Ok(Self { bytes: arr })
    }

    /// Creates from a fixed-size array.
    pub const fn from_array(bytes: [u8; HASH_SIZE]) -> Self {
        Self { bytes }
    }

    /// Creates a big-endian word holding `value`.
    pub fn from_u64(value: u64) -> Self {
        let mut bytes = [0u8; HASH_SIZE];
        bytes[HASH_SIZE - 8..].copy_from_slice(&value.to_be_bytes());
        Self { bytes }
    }

    /// Parses from hex string (with or without 0x prefix).
    pub fn from_hex(s: &str) -> Result<Self> {
        let bytes = hex::decode(strip_hex_prefix(s))?;
        Self::from_bytes(&bytes)
    }

    /// Returns the raw bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Returns the underlying array.
    pub fn into_array(self) -> [u8; HASH_SIZE] {
        self.bytes
    }

    /// Returns the zero word.
    pub const fn zero() -> Self {
        Self {
            bytes: [0u8; HASH_SIZE],
        }
    }

    /// Returns true if every byte is zero.
    pub fn is_zero(&self) -> bool {
        self.bytes.iter().all(|&b| b == 0)
    }

    /// Returns the hex string with 0x prefix.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.bytes))
    }
}

impl FromStr for B256 {
    type Err = RnsError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_hex(s)
    }
}

impl fmt::Debug for B256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "B256({})", self.to_hex())
    }
}

impl fmt::Display for B256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl Serialize for B256 {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for B256 {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        B256::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checksum_known_vector() {
        let addr = Address::from_hex("0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed").unwrap();
        assert_eq!(
            addr.to_checksum_string(),
            "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed"
        );
    }

    #[test]
    fn test_case_insensitive_parse() {
        let upper = Address::from_hex("0x5AAEB6053F3E94C9B9A09F33669435E7EF1BEAED").unwrap();
        let lower: Address = "5aaeb6053f3e94c9b9a09f33669435e7ef1beaed".parse().unwrap();
        assert_eq!(upper, lower);
        assert_eq!(upper.to_string(), lower.to_string());
    }

    #[test]
    fn test_short_display() {
        let addr = Address::from_hex("0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed").unwrap();
        assert_eq!(addr.short(), "0x5aAe...eAed");
    }

    #[test]
    fn test_rejects_bad_length() {
        assert!(Address::from_hex("0x1234").is_err());
        assert!(Address::from_hex("").is_err());
        assert!(Address::from_hex("0xzz5aaeb6053f3e94c9b9a09f33669435e7ef1bea").is_err());
    }

    #[test]
    fn test_zero() {
        assert!(Address::zero().is_zero());
        assert!(!Address::from_array([1; 20]).is_zero());
        assert!(B256::zero().is_zero());
    }

    #[test]
    fn test_b256_from_u64() {
        let word = B256::from_u64(0x0102);
        assert_eq!(word.as_bytes()[30], 0x01);
        assert_eq!(word.as_bytes()[31], 0x02);
        assert!(word.as_bytes()[..30].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_serde_uses_checksum() {
        let addr = Address::from_hex("0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed").unwrap();
        let json = serde_json::to_string(&addr).unwrap();
        assert_eq!(json, "\"0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed\"");
        let back: Address = serde_json::from_str(&json).unwrap();
        assert_eq!(back, addr);
    }
}
