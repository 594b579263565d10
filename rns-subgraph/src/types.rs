//! Subgraph entities.

use serde::{Deserialize, Deserializer, Serialize};

use rns_core::types::{Address, NameDates};

/// Accepts BigInt fields encoded either as JSON strings or numbers.
fn de_opt_u64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u64>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Str(String),
        Num(u64),
    }

    match Option::<Raw>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Raw::Num(n)) => Ok(Some(n)),
        Some(Raw::Str(s)) => s.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

/// One indexed name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevoName {
    /// Entity id (the label hash)
    pub id: String,
    /// Full name, when the label is known
    #[serde(default)]
    pub name: Option<String>,
    /// Label, when known
    #[serde(default)]
    pub label_name: Option<String>,
    /// Owner address, lowercase hex
    #[serde(default)]
    pub owner: Option<String>,
    /// Registration timestamp
    #[serde(default, deserialize_with = "de_opt_u64")]
    pub registration_date: Option<u64>,
    /// Expiry timestamp
    #[serde(default, deserialize_with = "de_opt_u64")]
    pub expiry_date: Option<u64>,
    /// Expiry plus grace period
    #[serde(default, deserialize_with = "de_opt_u64")]
    pub expiry_date_with_grace: Option<u64>,
}

impl RevoName {
    /// Parsed owner address, if present and well-formed.
    pub fn owner_address(&self) -> Option<Address> {
        self.owner.as_deref().and_then(|o| o.parse().ok())
    }

    /// Derived date set, when the expiry is indexed.
    pub fn dates(&self) -> Option<NameDates> {
        self.expiry_date
            .map(|expiry| NameDates::new(self.registration_date, expiry))
    }
}

/// `{ revoNames: [...] }` payload.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevoNames {
    /// Matching names
    pub revo_names: Vec<RevoName>,
}
