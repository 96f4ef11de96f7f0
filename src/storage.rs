use ::redis::RedisError;
use async_trait::async_trait;
use color_eyre::Report;
use std::error::Error as StdError;
use std::fmt;

mod memory;
mod redis;

pub use memory::MemoryStorage;
pub use redis::RedisStorage;

type Result<T> = std::result::Result<T, StorageError>;

/// Error type for storage backend operations.
#[derive(Debug)]
pub struct StorageError {
    error: Report,
}

impl StorageError {
    pub fn new<T>(error: T) -> Self
    where
        T: StdError + Send + Sync + 'static,
    {
        Self {
            error: Report::new(error),
        }
    }

    pub fn msg<T>(message: T) -> Self
    where
        T: fmt::Debug + fmt::Display + Send + Sync + 'static,
    {
        Self {
            error: Report::msg(message),
        }
    }
}

impl StdError for StorageError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.error.source()
    }
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.error.fmt(f)
    }
}

impl From<RedisError> for StorageError {
    fn from(error: RedisError) -> Self {
        Self::new(error)
    }
}

/// Durable key-value storage the CRL registry writes through to.
///
/// Implementations must be strongly consistent per key: a `get` issued after
/// a successful `put` or `delete` observes it.
#[async_trait]
pub trait Storage: Send + Sync + 'static {
    /// Lists the keys starting with `prefix`, with the prefix stripped, in sorted order.
    async fn list(&self, prefix: &str) -> Result<Vec<String>>;

    /// Loads the value stored under `key`, if any.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Stores `value` under `key`, replacing any previous value.
    async fn put(&self, key: &str, value: &[u8]) -> Result<()>;

    /// Deletes `key`. Deleting a missing key is not an error.
    async fn delete(&self, key: &str) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use ::redis::ErrorKind;

    #[test]
    fn test_storage_error_from_redis() {
        let error = StorageError::from(RedisError::from((ErrorKind::IoError, "connection refused")));
        assert!(error.to_string().contains("connection refused"));

        let error = StorageError::msg("disk full");
        assert_eq!(error.to_string(), "disk full");
    }
}
