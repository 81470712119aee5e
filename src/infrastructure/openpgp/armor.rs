//! ASCII armor decoding for public key blocks

use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::domain::KeyRingError;

pub const BEGIN_PUBLIC_KEY: &str = "-----BEGIN PGP PUBLIC KEY BLOCK-----";
pub const END_PUBLIC_KEY: &str = "-----END PGP PUBLIC KEY BLOCK-----";

/// Decode the first public key block in `text`; anything after it is ignored
pub fn dearmor(text: &str) -> Result<Vec<u8>, KeyRingError> {
    let mut lines = text.lines().map(|l| l.trim_end());

    if !lines.any(|line| line.trim_start() == BEGIN_PUBLIC_KEY) {
        return Err(KeyRingError::MissingArmor);
    }

    decode_block(&mut lines)
}

/// Decode one block whose BEGIN line has already been consumed
fn decode_block<'a>(lines: &mut impl Iterator<Item = &'a str>) -> Result<Vec<u8>, KeyRingError> {
    let mut body = String::new();
    let mut checksum: Option<&str> = None;
    let mut in_headers = true;

    for line in lines {
        let line = line.trim_start();

        if line == END_PUBLIC_KEY {
            let data = STANDARD
                .decode(&body)
                .map_err(|e| KeyRingError::InvalidBase64(e.to_string()))?;

            if let Some(encoded) = checksum {
                verify_checksum(&data, encoded)?;
            }

            return Ok(data);
        }

        if in_headers {
            if line.is_empty() {
                in_headers = false;
                continue;
            }
            if line.contains(": ") {
                continue;
            }
            // Some producers omit the blank line when there are no headers
            in_headers = false;
        }

        if line.is_empty() {
            continue;
        }

        match line.strip_prefix('=') {
            Some(crc) if line.len() == 5 => checksum = Some(crc),
            _ => body.push_str(line),
        }
    }

    Err(KeyRingError::UnterminatedArmor)
}

fn verify_checksum(data: &[u8], encoded: &str) -> Result<(), KeyRingError> {
    let bytes = STANDARD
        .decode(encoded)
        .map_err(|e| KeyRingError::InvalidBase64(e.to_string()))?;

    let [a, b, c] = bytes.as_slice() else {
        return Err(KeyRingError::InvalidBase64(format!(
            "checksum must be 3 bytes, got {}",
            bytes.len()
        )));
    };

    let expected = u32::from_be_bytes([0, *a, *b, *c]);
    let actual = crc24::hash_raw(data);

    if expected != actual {
        return Err(KeyRingError::ChecksumMismatch { expected, actual });
    }

    Ok(())
}
