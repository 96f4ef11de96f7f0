use std::collections::BTreeMap;

use tracing::debug;
use x509_parser::num_bigint::BigUint;

use crate::storage::Storage;

use super::registry::CrlRegistry;
use super::serial::canonical_serial;
use super::types::RevokedSerialInfo;

impl<S: Storage> CrlRegistry<S> {
    /// Finds every CRL revoking `serial`.
    ///
    /// Returns CRL name → revocation details, empty when the serial is not
    /// revoked anywhere.
    pub async fn find_by_serial(&self, serial: &BigUint) -> BTreeMap<String, RevokedSerialInfo> {
        let key = canonical_serial(serial);
        let index = self.read_index().await;

        let matches: BTreeMap<String, RevokedSerialInfo> = index
            .iter()
            .filter_map(|(name, record)| record.get(&key).map(|info| (name.clone(), *info)))
            .collect();

        debug!("Serial {key} revoked by {} CRLs", matches.len());
        matches
    }

    /// Returns true if any certificate of the chain is revoked by at least
    /// one CRL.
    pub async fn is_chain_revoked(&self, chain: &[BigUint]) -> bool {
        let index = self.read_index().await;
        chain.iter().any(|serial| {
            let key = canonical_serial(serial);
            index.values().any(|record| record.contains(&key))
        })
    }

    /// Returns true if at least one of the candidate chains has no revoked
    /// link.
    ///
    /// A chain containing a revoked serial is invalid, but any clean chain is
    /// enough to authenticate, so a certificate cross-signed by a revoked and
    /// a healthy intermediate still passes. All chains are checked against the
    /// same snapshot of the index.
    pub async fn has_unrevoked_chain(&self, chains: &[Vec<BigUint>]) -> bool {
        let index = self.read_index().await;
        chains.iter().any(|chain| {
            chain.iter().all(|serial| {
                let key = canonical_serial(serial);
                !index.values().any(|record| record.contains(&key))
            })
        })
    }
}
