//! Name types.
//!
//! - [`RnsName`]: a validated second-level name (label + root)
//! - [`NameRecord`]: the derived ownership view of a name

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{Address, B256};
use crate::constants::NAME_SEPARATOR;
use crate::error::{Result, RnsError};
use crate::namehash::{labelhash, namehash};

// ═══════════════════════════════════════════════════════════════════════════════
// NAME
// ═══════════════════════════════════════════════════════════════════════════════

/// A validated, normalized second-level name.
///
/// `"Alice"` and `"alice.revo"` both parse to label `alice` under root `revo`.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RnsName {
    label: String,
    root: String,
}

impl RnsName {
    /// Parses user input into a name under `root`.
    pub fn parse(input: &str, root: &str) -> Result<Self> {
        let normalized = input.trim().to_lowercase();

        if normalized.is_empty() {
            return Err(RnsError::invalid_name(input, "name cannot be empty"));
        }

        if normalized.chars().any(char::is_whitespace) {
            return Err(RnsError::invalid_name(input, "name cannot contain whitespace"));
        }

        let segments: Vec<&str> = normalized.split(NAME_SEPARATOR).collect();
        if segments.iter().any(|s| s.is_empty()) {
            return Err(RnsError::invalid_name(input, "name cannot contain empty labels"));
        }

        let label = match segments.as_slice() {
            [label] => *label,
            [label, suffix] if *suffix == root => *label,
            [_, suffix] => {
                return Err(RnsError::invalid_name(
                    input,
                    format!("unknown root '.{}', expected '.{}'", suffix, root),
                ))
            }
            _ => {
                return Err(RnsError::invalid_name(input, "subnames are not supported"));
            }
        };

        Ok(Self {
            label: label.to_string(),
            root: root.to_string(),
        })
    }

    /// Returns the label (the part before the root).
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Returns the root name.
    pub fn root(&self) -> &str {
        &self.root
    }

    /// Returns `label.root`.
    pub fn full_name(&self) -> String {
        format!("{}{}{}", self.label, NAME_SEPARATOR, self.root)
    }

    /// Returns keccak256 of the label.
    pub fn label_hash(&self) -> B256 {
        labelhash(&self.label)
    }

    /// Returns the namehash of the full name.
    pub fn node(&self) -> B256 {
        namehash(&self.full_name())
    }

    /// Returns the registrar token id (the label hash as uint256).
    pub fn token_id(&self) -> B256 {
        self.label_hash()
    }
}

impl fmt::Debug for RnsName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RnsName({})", self.full_name())
    }
}

impl fmt::Display for RnsName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.full_name())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// RECORD
// ═══════════════════════════════════════════════════════════════════════════════

/// Registration status of a label.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NameStatus {
    /// No valid registration; the label can be registered.
    Available,
    /// Registered and not past its grace period.
    Registered,
}

impl fmt::Display for NameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NameStatus::Available => write!(f, "available"),
            NameStatus::Registered => write!(f, "registered"),
        }
    }
}

/// Ownership view of a name, recomputed on each query.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameRecord {
    /// Label only
    pub name: String,
    /// Label plus root suffix
    pub full_name: String,
    /// Current owner, if any
    pub owner_address: Option<Address>,
    /// Shortened owner for display, empty without an owner
    pub display_address: String,
    /// Registration status
    pub status: NameStatus,
}

impl NameRecord {
    /// Builds a record for `name`.
    pub fn new(name: &RnsName, owner_address: Option<Address>, status: NameStatus) -> Self {
        let owner_address = owner_address.filter(|a| !a.is_zero());
        Self {
            name: name.label().to_string(),
            full_name: name.full_name(),
            display_address: owner_address.map(|a| a.short()).unwrap_or_default(),
            owner_address,
            status,
        }
    }
}
