//! Allowlist snapshot and origin matching.
//!
//! Entries are IPv4/IPv6 addresses or CIDR blocks; a bare address parses as
//! a full-prefix network. Matching parses the caller's origin as an address
//! and tests it against each entry network.

use std::collections::BTreeSet;
use std::net::IpAddr;

use chrono::{DateTime, Utc};
use ipnetwork::IpNetwork;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::AllowlistError;

/// Validate a single allowlist entry (address or CIDR).
pub fn validate_entry(entry: &str) -> Result<(), AllowlistError> {
    entry
        .parse::<IpNetwork>()
        .map_err(|e| AllowlistError::InvalidEntry {
            entry: entry.to_string(),
            reason: e.to_string(),
        })?;
    Ok(())
}

/// Validate every entry of a candidate replacement set.
pub fn validate_entries(entries: &BTreeSet<String>) -> Result<(), AllowlistError> {
    for entry in entries {
        validate_entry(entry)?;
    }
    Ok(())
}

/// Check whether an origin address falls inside an entry network.
///
/// Entries that fail to parse (legacy rows written before validation) are
/// skipped rather than matched.
pub fn origin_matches_entry(origin: &IpAddr, entry: &str) -> bool {
    if let Ok(network) = entry.parse::<IpNetwork>() {
        network.contains(*origin)
    } else {
        warn!(entry = %entry, "unparseable allowlist entry in store");
        false
    }
}

/// A point-in-time view of one scope's allowlist.
///
/// `updated_at` is `None` iff the scope has never been set; the entry set is
/// empty in that case and nothing is allowed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllowlistSnapshot {
    /// Permitted origin entries (addresses or CIDR blocks).
    pub entries: BTreeSet<String>,

    /// When the set was last replaced.
    pub updated_at: Option<DateTime<Utc>>,
}

impl AllowlistSnapshot {
    /// Build a snapshot from a stored entry set.
    #[must_use]
    pub fn new(entries: BTreeSet<String>, updated_at: DateTime<Utc>) -> Self {
        Self {
            entries,
            updated_at: Some(updated_at),
        }
    }

    /// The never-set snapshot: empty, nothing allowed.
    #[must_use]
    pub fn unset() -> Self {
        Self::default()
    }

    /// Whether the given origin address is a member of the allowlist.
    ///
    /// An origin that does not parse as an IP address matches nothing, and an
    /// empty set allows nothing.
    #[must_use]
    pub fn contains(&self, origin_address: &str) -> bool {
        let Ok(origin) = origin_address.parse::<IpAddr>() else {
            return false;
        };
        self.entries
            .iter()
            .any(|entry| origin_matches_entry(&origin, entry))
    }
}
