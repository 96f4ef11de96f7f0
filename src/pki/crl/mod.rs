//! Certificate Revocation List (CRL) registry
//!
//! Holds operator-supplied CRLs by name and answers which CRLs revoke a given
//! certificate serial during client certificate authentication.
//!
//! # Features
//! - Decoding DER or PEM CRLs into their revoked serial numbers
//! - Parsing serials given as `:`/`-` separated hex bytes or prefixed integers
//! - A lock-guarded in-memory index, written through to durable storage
//! - Serial and trust chain revocation queries
//!
//! CRL signatures and validity windows are not checked. A CRL stays in force
//! until it is deleted.

mod errors;
mod parser;
mod query;
mod registry;
mod serial;
mod types;

// Re-export public types
pub use errors::{CrlError, CrlResult};
pub use parser::decode_crl;
pub use registry::{CRL_PREFIX, CrlRegistry, normalize_name};
pub use serial::{canonical_serial, parse_serial};
pub use types::{CrlRecord, RevokedSerialInfo, RevokedSerials};
