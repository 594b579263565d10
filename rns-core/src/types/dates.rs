//! Registration and expiry dates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::GRACE_PERIOD_SECONDS;

/// Display format for all name dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";

/// A raw unix timestamp together with its display string.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameDate {
    /// Unix seconds
    pub timestamp: u64,
    /// Human-readable form
    pub formatted: String,
}

impl NameDate {
    /// Formats a unix timestamp.
    pub fn from_timestamp(timestamp: u64) -> Self {
        let formatted = i64::try_from(timestamp)
            .ok()
            .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0))
            .map(|dt| dt.format(DATE_FORMAT).to_string())
            .unwrap_or_else(|| "-".into());

        Self {
            timestamp,
            formatted,
        }
    }
}

/// Lifecycle dates of a registered name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameDates {
    /// First registration, when the indexer knows it
    pub registration_date: Option<NameDate>,
    /// Registration expiry
    pub expiry_date: NameDate,
    /// End of the grace period after expiry
    pub grace_period_end_date: NameDate,
}

impl NameDates {
    /// Derives the date set from raw timestamps.
    pub fn new(registration: Option<u64>, expiry: u64) -> Self {
        Self {
            registration_date: registration.map(NameDate::from_timestamp),
            expiry_date: NameDate::from_timestamp(expiry),
            grace_period_end_date: NameDate::from_timestamp(
                expiry.saturating_add(GRACE_PERIOD_SECONDS),
            ),
        }
    }

    /// True once `now` is past the expiry.
    pub fn is_expired_at(&self, now: u64) -> bool {
        now > self.expiry_date.timestamp
    }

    /// True while expired but still reserved to the previous owner.
    pub fn in_grace_period_at(&self, now: u64) -> bool {
        self.is_expired_at(now) && now <= self.grace_period_end_date.timestamp
    }

    /// True once the grace period is over.
    pub fn is_released_at(&self, now: u64) -> bool {
        now > self.grace_period_end_date.timestamp
    }
}

/// Current unix time in seconds.
pub fn unix_now() -> u64 {
    u64::try_from(Utc::now().timestamp()).unwrap_or_default()
}
