use std::collections::BTreeSet;

use crate::storage::{Result, Storage};
use async_trait::async_trait;
use redis::{AsyncCommands, aio::ConnectionManager};

/// Keys requested per SCAN round trip
const SCAN_COUNT: usize = 100;

/// A Redis storage backend.
#[derive(Clone)]
pub struct RedisStorage {
    conn: ConnectionManager,
}

impl RedisStorage {
    /// Creates a new Redis storage from a connection manager.
    pub fn new(conn: ConnectionManager) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl Storage for RedisStorage {
    async fn list(&self, prefix: &str) -> Result<Vec<String>> {
        let mut conn = self.conn.clone();
        let pattern = format!("{prefix}*");
        let mut keys = Vec::new();
        let mut cursor: u64 = 0;
        loop {
            let (next, batch): (u64, Vec<String>) = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(&pattern)
                .arg("COUNT")
                .arg(SCAN_COUNT)
                .query_async(&mut conn)
                .await?;
            keys.extend(batch);
            if next == 0 {
                break;
            }
            cursor = next;
        }
        Ok(strip_prefix_sorted(keys, prefix))
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let mut conn = self.conn.clone();
        let result = conn.get(key).await?;
        Ok(result)
    }

    async fn put(&self, key: &str, value: &[u8]) -> Result<()> {
        let mut conn = self.conn.clone();
        let _: () = conn.set(key, value).await?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let mut conn = self.conn.clone();
        let _: () = conn.del(key).await?;
        Ok(())
    }
}

/// SCAN may return a key more than once, so the result is deduplicated.
fn strip_prefix_sorted(keys: Vec<String>, prefix: &str) -> Vec<String> {
    keys.into_iter()
        .filter_map(|key| key.strip_prefix(prefix).map(str::to_string))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_prefix_sorted() {
        let keys = vec![
            "crls/web".to_string(),
            "crls/ca1".to_string(),
            "crls/web".to_string(),
            "other/ca2".to_string(),
        ];
        assert_eq!(strip_prefix_sorted(keys, "crls/"), vec!["ca1", "web"]);
        assert!(strip_prefix_sorted(Vec::new(), "crls/").is_empty());
    }
}
