//! Content fingerprints for degree records.
//!
//! A fingerprint is the SHA-256 digest of a canonical encoding of the four
//! source fields, rendered as `0x` followed by 64 lowercase hex characters.
//! Two encodings are supported:
//!
//! - [`FingerprintScheme::Legacy`] joins the fields with `-`. It matches the
//!   hashes produced by existing browser clients, but a field containing `-`
//!   can make two different tuples collide (`"A-B","C"` vs `"A","B-C"`).
//! - [`FingerprintScheme::LengthPrefixed`] writes each field as a big-endian
//!   `u64` byte length followed by its bytes, which cannot collide that way.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;

/// Prefix carried by every rendered fingerprint.
pub const FINGERPRINT_PREFIX: &str = "0x";

/// Length of a rendered fingerprint: prefix plus 32 bytes of hex.
pub const FINGERPRINT_LEN: usize = FINGERPRINT_PREFIX.len() + 64;

/// Canonical field encoding fed to the hash.
///
/// Deserializes through [`FromStr`], so `length-prefixed` and
/// `LENGTH_PREFIXED` are accepted alongside the canonical snake_case name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum FingerprintScheme {
    /// `name-id-degree-year`, compatible with existing clients.
    #[default]
    Legacy,
    /// Length-prefixed fields, unambiguous.
    LengthPrefixed,
}

impl FingerprintScheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            FingerprintScheme::Legacy => "legacy",
            FingerprintScheme::LengthPrefixed => "length_prefixed",
        }
    }

    /// Compute the fingerprint of a field tuple under this scheme.
    pub fn fingerprint(&self, name: &str, id: &str, degree: &str, year: &str) -> String {
        let mut hasher = Sha256::new();
        match self {
            FingerprintScheme::Legacy => {
                hasher.update(format!("{}-{}-{}-{}", name, id, degree, year).as_bytes());
            }
            FingerprintScheme::LengthPrefixed => {
                for field in [name, id, degree, year] {
                    hasher.update((field.len() as u64).to_be_bytes());
                    hasher.update(field.as_bytes());
                }
            }
        }
        format!("{}{}", FINGERPRINT_PREFIX, hex::encode(hasher.finalize()))
    }
}

impl fmt::Display for FingerprintScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FingerprintScheme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "legacy" => Ok(FingerprintScheme::Legacy),
            "length_prefixed" => Ok(FingerprintScheme::LengthPrefixed),
            other => Err(format!("Unknown fingerprint scheme: {}", other)),
        }
    }
}

impl TryFrom<String> for FingerprintScheme {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Fingerprint a field tuple with the legacy dash-joined encoding.
pub fn fingerprint(name: &str, id: &str, degree: &str, year: &str) -> String {
    FingerprintScheme::Legacy.fingerprint(name, id, degree, year)
}

/// Check whether a string has the shape of a rendered fingerprint.
///
/// Lookups never require this; a malformed value simply misses.
pub fn is_well_formed(value: &str) -> bool {
    value.len() == FINGERPRINT_LEN
        && value.starts_with(FINGERPRINT_PREFIX)
        && value[FINGERPRINT_PREFIX.len()..]
            .bytes()
            .all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}
