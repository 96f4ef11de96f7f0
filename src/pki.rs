pub mod crl;

// Re-export commonly used types
pub use crl::{CrlError, CrlRecord, CrlRegistry, CrlResult};
