//! OpenPGP packet framing (RFC 4880 section 4.2)

use sha1::{Digest, Sha1};

use crate::domain::fingerprint::FINGERPRINT_LEN;
use crate::domain::KeyRingError;

pub const TAG_SIGNATURE: u8 = 2;
pub const TAG_PUBLIC_KEY: u8 = 6;
pub const TAG_USER_ID: u8 = 13;
pub const TAG_PUBLIC_SUBKEY: u8 = 14;

/// A packet tag and its body, borrowed from the decoded key ring
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Packet<'a> {
    pub tag: u8,
    pub body: &'a [u8],
}

/// Split a binary key ring into packets
pub fn read_packets(data: &[u8]) -> Result<Vec<Packet<'_>>, KeyRingError> {
    let mut packets = Vec::new();
    let mut offset = 0;

    while offset < data.len() {
        let start = offset;
        let header = data[offset];
        offset += 1;

        if header & 0x80 == 0 {
            return Err(KeyRingError::UnsupportedPacket(start));
        }

        let (tag, len) = if header & 0x40 != 0 {
            let tag = header & 0x3f;
            let first = *data.get(offset).ok_or(KeyRingError::TruncatedPacket(start))?;
            offset += 1;

            let len = match first {
                0..=191 => first as usize,
                192..=223 => {
                    let second =
                        *data.get(offset).ok_or(KeyRingError::TruncatedPacket(start))?;
                    offset += 1;
                    ((first as usize - 192) << 8) + second as usize + 192
                }
                255 => {
                    let len = read_be(data, offset, 4).ok_or(KeyRingError::TruncatedPacket(start))?;
                    offset += 4;
                    len
                }
                // Partial body lengths never appear in key material
                _ => return Err(KeyRingError::UnsupportedPacket(start)),
            };

            (tag, len)
        } else {
            let tag = (header >> 2) & 0x0f;
            let len = match header & 0x03 {
                0 => {
                    let len = read_be(data, offset, 1).ok_or(KeyRingError::TruncatedPacket(start))?;
                    offset += 1;
                    len
                }
                1 => {
                    let len = read_be(data, offset, 2).ok_or(KeyRingError::TruncatedPacket(start))?;
                    offset += 2;
                    len
                }
                2 => {
                    let len = read_be(data, offset, 4).ok_or(KeyRingError::TruncatedPacket(start))?;
                    offset += 4;
                    len
                }
                _ => data.len() - offset,
            };

            (tag, len)
        };

        let end = offset
            .checked_add(len)
            .filter(|end| *end <= data.len())
            .ok_or(KeyRingError::TruncatedPacket(start))?;

        packets.push(Packet {
            tag,
            body: &data[offset..end],
        });
        offset = end;
    }

    Ok(packets)
}

fn read_be(data: &[u8], offset: usize, width: usize) -> Option<usize> {
    let bytes = data.get(offset..offset.checked_add(width)?)?;
    Some(bytes.iter().fold(0usize, |acc, b| (acc << 8) | *b as usize))
}

/// Signature type octet of a v3 or v4 signature packet body
pub fn signature_type(body: &[u8]) -> Option<u8> {
    match body.first()? {
        // version, hashed length (always 5), then the type
        3 => body.get(2).copied(),
        4 => body.get(1).copied(),
        _ => None,
    }
}

/// Compute the v4 fingerprint of a public key packet body
pub fn v4_fingerprint(body: &[u8]) -> Result<[u8; FINGERPRINT_LEN], KeyRingError> {
    let version = *body.first().ok_or(KeyRingError::TruncatedPacket(0))?;

    if version != 4 {
        return Err(KeyRingError::UnsupportedKeyVersion(version));
    }

    let len = u16::try_from(body.len()).map_err(|_| KeyRingError::UnsupportedPacket(0))?;

    let mut hasher = Sha1::new();
    hasher.update([0x99u8]);
    hasher.update(len.to_be_bytes());
    hasher.update(body);
    let digest = hasher.finalize();

    let mut fingerprint = [0u8; FINGERPRINT_LEN];
    fingerprint.copy_from_slice(&digest);
    Ok(fingerprint)
}
