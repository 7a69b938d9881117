//! Degree Registry - content-fingerprinted credential registry.
//!
//! Degree records are identified by a SHA-256 fingerprint of their fields.
//! The service:
//! - Issues records idempotently (re-issuing identical fields is a no-op)
//! - Verifies a fingerprint by exact lookup
//! - Lists every issued record in issuance order
//! - Optionally writes records through to a JSON file

pub mod api;
pub mod config;
pub mod error;
pub mod fingerprint;
pub mod registry;

pub use config::Config;
pub use error::RegistryError;
pub use fingerprint::{fingerprint, FingerprintScheme};
pub use registry::{
    DegreeFields, DegreeRecord, IssueOutcome, IssueStatus, Registry, RegistryService, Store,
};
