//! Degree registry HTTP client.

mod client;
mod error;
mod types;

pub use client::RegistryClient;
pub use error::ClientError;
pub use types::*;
