//! Key-ring parser port

use thiserror::Error;

use crate::domain::fingerprint::FINGERPRINT_LEN;

/// Errors produced while reading an armored key ring
#[derive(Debug, Error, Clone, PartialEq)]
pub enum KeyRingError {
    #[error("no armored PGP public key block found")]
    MissingArmor,

    #[error("armor block is not terminated")]
    UnterminatedArmor,

    #[error("invalid base64 in armor body: {0}")]
    InvalidBase64(String),

    #[error("armor checksum mismatch (expected {expected:06X}, got {actual:06X})")]
    ChecksumMismatch { expected: u32, actual: u32 },

    #[error("truncated packet at offset {0}")]
    TruncatedPacket(usize),

    #[error("unsupported packet header at offset {0}")]
    UnsupportedPacket(usize),

    #[error("unsupported public key version {0}")]
    UnsupportedKeyVersion(u8),

    #[error("{0} packet found before any public key packet")]
    OrphanPacket(&'static str),

    #[error("{0} packet not followed by a signature")]
    MissingSignature(&'static str),

    #[error("{0} signature is unsupported or of the wrong type")]
    InvalidSignature(&'static str),

    #[error("entity {0} has no user id")]
    NoIdentity(String),
}

/// One OpenPGP entity: a primary key and the user IDs bound to it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEntity {
    pub primary_fingerprint: [u8; FINGERPRINT_LEN],
    pub user_ids: Vec<String>,
}

impl KeyEntity {
    pub fn new(primary_fingerprint: [u8; FINGERPRINT_LEN]) -> Self {
        Self {
            primary_fingerprint,
            user_ids: Vec::new(),
        }
    }
}

/// Parses ASCII-armored key text into the entities it describes
pub trait KeyRingParser: Send + Sync + std::fmt::Debug {
    fn parse_key_ring(&self, armored: &str) -> Result<Vec<KeyEntity>, KeyRingError>;
}
