use std::collections::HashMap;

use tokio::sync::{RwLock, RwLockReadGuard};
use tracing::{debug, info, warn};

use crate::storage::Storage;

use super::errors::{CrlError, CrlResult};
use super::types::{CrlRecord, RevokedSerials};

/// Storage namespace holding one JSON document per CRL
pub const CRL_PREFIX: &str = "crls/";

/// Process-wide index of named CRLs, written through to durable storage.
///
/// A single reader/writer lock guards the whole index. Lookups share the
/// read side; `populate`, `upsert` and `remove` hold the write side for the
/// whole operation, including the storage round trip, so no reader ever
/// observes a record that is not also persisted.
pub struct CrlRegistry<S: Storage> {
    storage: S,
    index: RwLock<HashMap<String, CrlRecord>>,
}

impl<S: Storage> CrlRegistry<S> {
    /// Creates an empty registry. Call [`populate`](Self::populate) before
    /// serving queries.
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            index: RwLock::new(HashMap::new()),
        }
    }

    /// Loads every persisted CRL into the index.
    ///
    /// Records replace in-memory entries of the same name. The load is
    /// all-or-nothing: if listing, fetching or decoding any record fails, the
    /// index is left untouched and the first failure is returned.
    ///
    /// Returns the number of records loaded.
    pub async fn populate(&self) -> CrlResult<usize> {
        let mut index = self.index.write().await;

        let keys = self
            .storage
            .list(CRL_PREFIX)
            .await
            .map_err(|e| CrlError::population("error listing CRLs", e.into()))?;

        let mut staged = Vec::with_capacity(keys.len());
        for key in keys {
            let entry = self
                .storage
                .get(&storage_key(&key))
                .await
                .map_err(|e| CrlError::population(format!("error loading CRL {key}"), e.into()))?;
            let Some(entry) = entry else {
                warn!("CRL {key} vanished from storage while loading, skipping");
                continue;
            };
            let record: CrlRecord = serde_json::from_slice(&entry).map_err(|e| {
                CrlError::population(format!("error decoding CRL {key}"), e.into())
            })?;
            staged.push((key, record));
        }

        let count = staged.len();
        index.extend(staged);
        info!("Loaded {count} CRLs from storage");
        Ok(count)
    }

    /// Stores the revoked serials under `name`, replacing any previous CRL of
    /// that name.
    ///
    /// The record is persisted first; the index only changes once storage
    /// accepted it.
    pub async fn upsert(&self, name: &str, revoked: &RevokedSerials) -> CrlResult<()> {
        let name = normalize_name(name)?;
        let record = CrlRecord::from(revoked);
        let entry = serde_json::to_vec(&record)?;

        let mut index = self.index.write().await;
        self.storage.put(&storage_key(&name), &entry).await?;

        info!("Stored CRL {name} with {} revoked serials", record.len());
        index.insert(name, record);
        Ok(())
    }

    /// Deletes the named CRL from storage, then from the index.
    pub async fn remove(&self, name: &str) -> CrlResult<()> {
        let name = normalize_name(name)?;

        let mut index = self.index.write().await;
        if !index.contains_key(&name) {
            return Err(CrlError::NotFound(name));
        }

        self.storage.delete(&storage_key(&name)).await?;
        index.remove(&name);
        info!("Deleted CRL {name}");
        Ok(())
    }

    /// Returns a copy of the named CRL.
    pub async fn lookup_by_name(&self, name: &str) -> CrlResult<CrlRecord> {
        let name = normalize_name(name)?;
        debug!("Looking up CRL {name}");

        self.index
            .read()
            .await
            .get(&name)
            .cloned()
            .ok_or(CrlError::NotFound(name))
    }

    /// Names of all loaded CRLs, sorted.
    pub async fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.index.read().await.keys().cloned().collect();
        names.sort();
        names
    }

    pub async fn len(&self) -> usize {
        self.index.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.index.read().await.is_empty()
    }

    pub(super) async fn read_index(&self) -> RwLockReadGuard<'_, HashMap<String, CrlRecord>> {
        self.index.read().await
    }
}

/// Lower-cases a CRL name and checks it is usable as a storage key.
///
/// Names start and end with a word character (`[A-Za-z0-9_]`); `-` and `.`
/// may appear in between.
pub fn normalize_name(name: &str) -> CrlResult<String> {
    if name.is_empty() {
        return Err(CrlError::Validation(
            r#""name" parameter cannot be empty"#.to_string(),
        ));
    }

    let is_word = |c: char| c.is_ascii_alphanumeric() || c == '_';
    let valid_ends = name.starts_with(is_word) && name.ends_with(is_word);
    let valid_inner = name
        .chars()
        .all(|c| is_word(c) || c == '-' || c == '.');
    if !valid_ends || !valid_inner {
        return Err(CrlError::Validation(format!("invalid CRL name {name:?}")));
    }

    Ok(name.to_ascii_lowercase())
}

fn storage_key(name: &str) -> String {
    format!("{CRL_PREFIX}{name}")
}
