//! Registered public key

use serde::{Deserialize, Serialize};

use crate::domain::fingerprint::Fingerprint;

/// A public key registered under its canonical fingerprint.
///
/// Registering the same fingerprint again replaces the armored text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicKey {
    id: i64,
    fingerprint: Fingerprint,
    armored: String,
}

impl PublicKey {
    pub fn new(id: i64, fingerprint: Fingerprint, armored: impl Into<String>) -> Self {
        Self {
            id,
            fingerprint,
            armored: armored.into(),
        }
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn fingerprint(&self) -> &Fingerprint {
        &self.fingerprint
    }

    pub fn armored(&self) -> &str {
        &self.armored
    }

    /// Replace the stored armored text
    pub fn refresh(&mut self, armored: impl Into<String>) {
        self.armored = armored.into();
    }
}
