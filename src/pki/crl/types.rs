use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use x509_parser::num_bigint::BigUint;

use super::serial::canonical_serial;

/// Per-serial revocation details.
///
/// Carries no fields yet; reserved for the revocation reason and date.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevokedSerialInfo {}

/// A named CRL as held in the registry and persisted to storage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrlRecord {
    /// Revoked serials keyed by their canonical decimal form
    #[serde(default)]
    pub serials: BTreeMap<String, RevokedSerialInfo>,
}

impl CrlRecord {
    /// Returns true if the canonical serial key is revoked by this CRL
    pub fn contains(&self, serial_key: &str) -> bool {
        self.serials.contains_key(serial_key)
    }

    pub fn get(&self, serial_key: &str) -> Option<&RevokedSerialInfo> {
        self.serials.get(serial_key)
    }

    pub fn len(&self) -> usize {
        self.serials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.serials.is_empty()
    }
}

impl From<&RevokedSerials> for CrlRecord {
    fn from(revoked: &RevokedSerials) -> Self {
        let serials = revoked
            .iter()
            .map(|serial| (canonical_serial(serial), RevokedSerialInfo::default()))
            .collect();
        Self { serials }
    }
}

/// De-duplicated serial numbers extracted from a single CRL
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RevokedSerials(BTreeSet<BigUint>);

impl RevokedSerials {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a serial, returning false if it was already present
    pub fn insert(&mut self, serial: BigUint) -> bool {
        self.0.insert(serial)
    }

    pub fn contains(&self, serial: &BigUint) -> bool {
        self.0.contains(serial)
    }

    pub fn iter(&self) -> impl Iterator<Item = &BigUint> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<BigUint> for RevokedSerials {
    fn from_iter<I: IntoIterator<Item = BigUint>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
