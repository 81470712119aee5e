//! OpenPGP key-ring parsing
//!
//! Reads ASCII-armored public key blocks far enough to group packets into
//! entities and compute each primary key's v4 fingerprint. Every entity must
//! carry a user ID, and every user ID and subkey must be followed by a
//! signature of the matching type. Signature cryptography is not checked.

mod armor;
mod packet;
#[cfg(test)]
pub(crate) mod testutil;

use std::iter::Peekable;
use std::slice::Iter;

use tracing::debug;

use crate::domain::{KeyEntity, KeyRingError, KeyRingParser};
use packet::{
    read_packets, signature_type, v4_fingerprint, Packet, TAG_PUBLIC_KEY, TAG_PUBLIC_SUBKEY,
    TAG_SIGNATURE, TAG_USER_ID,
};

/// Positive, casual, persona and generic certifications
const CERTIFICATION_TYPES: std::ops::RangeInclusive<u8> = 0x10..=0x13;
const SUBKEY_BINDING: u8 = 0x18;

/// Key-ring parser for armored OpenPGP public keys
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenPgpKeyRingParser;

impl OpenPgpKeyRingParser {
    pub fn new() -> Self {
        Self
    }
}

impl KeyRingParser for OpenPgpKeyRingParser {
    fn parse_key_ring(&self, armored: &str) -> Result<Vec<KeyEntity>, KeyRingError> {
        let data = armor::dearmor(armored)?;
        let packets = read_packets(&data)?;
        let mut packets = packets.iter().peekable();
        let mut entities: Vec<KeyEntity> = Vec::new();

        while let Some(packet) = packets.next() {
            match packet.tag {
                TAG_PUBLIC_KEY => {
                    entities.push(KeyEntity::new(v4_fingerprint(packet.body)?));
                }
                TAG_USER_ID => {
                    let entity = entities
                        .last_mut()
                        .ok_or(KeyRingError::OrphanPacket("user id"))?;
                    expect_signature(&mut packets, "user id", |t| {
                        CERTIFICATION_TYPES.contains(&t)
                    })?;
                    entity
                        .user_ids
                        .push(String::from_utf8_lossy(packet.body).into_owned());
                }
                TAG_PUBLIC_SUBKEY => {
                    if entities.is_empty() {
                        return Err(KeyRingError::OrphanPacket("subkey"));
                    }
                    expect_signature(&mut packets, "subkey", |t| t == SUBKEY_BINDING)?;
                }
                _ => {}
            }
        }

        if let Some(entity) = entities.iter().find(|e| e.user_ids.is_empty()) {
            return Err(KeyRingError::NoIdentity(hex::encode_upper(
                entity.primary_fingerprint,
            )));
        }

        debug!(entities = entities.len(), "Parsed key ring");
        Ok(entities)
    }
}

/// Require the next packet to be a signature whose type satisfies `accepts`
fn expect_signature(
    packets: &mut Peekable<Iter<'_, Packet<'_>>>,
    kind: &'static str,
    accepts: impl Fn(u8) -> bool,
) -> Result<(), KeyRingError> {
    let signature = packets
        .next_if(|p| p.tag == TAG_SIGNATURE)
        .ok_or(KeyRingError::MissingSignature(kind))?;

    match signature_type(signature.body) {
        Some(sig_type) if accepts(sig_type) => Ok(()),
        _ => Err(KeyRingError::InvalidSignature(kind)),
    }
}
