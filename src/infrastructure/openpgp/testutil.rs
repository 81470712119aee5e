//! Synthetic OpenPGP key fixtures for tests

use base64::{engine::general_purpose::STANDARD, Engine as _};

use super::armor::{BEGIN_PUBLIC_KEY, END_PUBLIC_KEY};
use super::packet::{TAG_PUBLIC_KEY, TAG_PUBLIC_SUBKEY, TAG_SIGNATURE, TAG_USER_ID};

pub const POSITIVE_CERTIFICATION: u8 = 0x13;

/// A new-format v4 public key packet whose key material is derived from `seed`
pub fn public_key_packet(seed: u8) -> Vec<u8> {
    // version, creation time, algorithm (EdDSA), then an opaque key blob
    let mut body = vec![4, 0x5f, 0x00, 0x00, seed, 22];
    body.extend([0x00, 0xff]);
    body.extend(std::iter::repeat_n(seed, 32));

    let mut packet = vec![0xC0 | TAG_PUBLIC_KEY, body.len() as u8];
    packet.extend(body);
    packet
}

/// The same key material framed as a public subkey
pub fn subkey_packet(seed: u8) -> Vec<u8> {
    let mut packet = public_key_packet(seed);
    packet[0] = 0xC0 | TAG_PUBLIC_SUBKEY;
    packet
}

/// A v4 signature packet of the given type with empty subpacket areas
pub fn signature_packet(sig_type: u8) -> Vec<u8> {
    // version, type, algorithm (EdDSA), hash (SHA-256), two empty areas, hash prefix
    let body = [4, sig_type, 22, 8, 0, 0, 0, 0, 0xAB, 0xCD];

    let mut packet = vec![0xC0 | TAG_SIGNATURE, body.len() as u8];
    packet.extend(body);
    packet
}

pub fn user_id_packet(user_id: &str) -> Vec<u8> {
    let mut packet = vec![0xC0 | TAG_USER_ID, user_id.len() as u8];
    packet.extend(user_id.as_bytes());
    packet
}

/// Wrap binary packets in an ASCII armor block with a CRC-24 checksum
pub fn armor(packets: &[u8]) -> String {
    let crc = crc24::hash_raw(packets).to_be_bytes();
    let encoded = STANDARD.encode(packets);

    let mut body = String::new();
    for chunk in encoded.as_bytes().chunks(64) {
        body.push_str(&String::from_utf8_lossy(chunk));
        body.push('\n');
    }

    format!(
        "{}\nComment: test fixture\n\n{}={}\n{}\n",
        BEGIN_PUBLIC_KEY,
        body,
        STANDARD.encode(&crc[1..]),
        END_PUBLIC_KEY
    )
}

/// Armored single-identity key
pub fn armored_key(seed: u8, user_id: &str) -> String {
    let mut packets = public_key_packet(seed);
    packets.extend(user_id_packet(user_id));
    packets.extend(signature_packet(POSITIVE_CERTIFICATION));
    armor(&packets)
}

/// Armored key ring containing one entity per seed
pub fn armored_key_ring(seeds: &[u8]) -> String {
    let mut packets = Vec::new();
    for seed in seeds {
        packets.extend(public_key_packet(*seed));
        packets.extend(user_id_packet(&format!("user {}", seed)));
        packets.extend(signature_packet(POSITIVE_CERTIFICATION));
    }
    armor(&packets)
}
