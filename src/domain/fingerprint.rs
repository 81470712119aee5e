//! Canonical OpenPGP fingerprint strings
//!
//! The formatted string is the primary key of every registered public key,
//! so the layout must never change.

use serde::{Deserialize, Serialize};

/// Length in bytes of a v4 primary key fingerprint
pub const FINGERPRINT_LEN: usize = 20;

/// Canonical fingerprint: ten groups of four uppercase hex digits, with a
/// double space between the fifth and sixth group.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Format raw fingerprint bytes
    pub fn from_bytes(bytes: &[u8; FINGERPRINT_LEN]) -> Self {
        let groups: Vec<String> = bytes.chunks(2).map(hex::encode_upper).collect();
        Self(format!("{}  {}", groups[..5].join(" "), groups[5..].join(" ")))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
