use thiserror::Error;

use crate::storage::StorageError;

/// CRL registry errors
#[derive(Error, Debug)]
pub enum CrlError {
    /// A required field is missing, empty or malformed
    #[error("{0}")]
    Validation(String),

    #[error("error parsing serial {0}")]
    InvalidSerial(String),

    #[error("failed to parse CRL: {0}")]
    Decode(String),

    #[error("no such CRL {0}")]
    NotFound(String),

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("CRL record serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Start-up or reload of the index failed; wraps the first failure seen
    #[error("{context}: {source}")]
    Population {
        context: String,
        #[source]
        source: Box<CrlError>,
    },
}

impl CrlError {
    pub(crate) fn population(context: impl Into<String>, source: CrlError) -> Self {
        Self::Population {
            context: context.into(),
            source: Box::new(source),
        }
    }
}

/// Convenient Result type alias
pub type CrlResult<T> = Result<T, CrlError>;
