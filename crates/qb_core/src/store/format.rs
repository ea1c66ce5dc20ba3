//! On-disk sheet encoding: MessagePack + LZ4 with a checksum trailer.
//!
//! Layout: lz4-compressed msgpack payload (decompressed size prepended)
//! followed by a 32-byte SHA256 checksum of the compressed payload. The
//! format version travels inside the envelope so older readers can reject
//! newer files cleanly.

use lz4_flex::{compress_prepend_size, decompress_size_prepended};
use rmp_serde::{from_slice, to_vec_named};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::error::StoreError;
use super::SHEET_FORMAT_VERSION;
use crate::sheet::MatchSheet;

const CHECKSUM_LEN: usize = 32;

#[derive(Serialize, Deserialize)]
struct SheetEnvelope {
    version: u32,
    sheet: MatchSheet,
}

pub fn serialize_and_compress(sheet: &MatchSheet) -> Result<Vec<u8>, StoreError> {
    sheet.check_invariants().map_err(StoreError::InvariantViolation)?;

    let envelope = SheetEnvelope { version: SHEET_FORMAT_VERSION, sheet: sheet.clone() };
    let msgpack = to_vec_named(&envelope).map_err(StoreError::Serialization)?;
    let compressed = compress_prepend_size(&msgpack);

    let mut hasher = Sha256::new();
    hasher.update(&compressed);
    let checksum = hasher.finalize();

    let mut result = compressed;
    result.extend_from_slice(&checksum);
    Ok(result)
}

pub fn decompress_and_deserialize(bytes: &[u8]) -> Result<MatchSheet, StoreError> {
    // Compressed size prefix + checksum is the smallest well-formed file.
    if bytes.len() < 4 + CHECKSUM_LEN {
        return Err(StoreError::Corrupted);
    }

    let (payload, checksum_bytes) = bytes.split_at(bytes.len() - CHECKSUM_LEN);

    let mut hasher = Sha256::new();
    hasher.update(payload);
    let calculated = hasher.finalize();
    if &calculated[..] != checksum_bytes {
        return Err(StoreError::ChecksumMismatch);
    }

    let msgpack = decompress_size_prepended(payload).map_err(|_| StoreError::Decompression)?;
    let envelope: SheetEnvelope = from_slice(&msgpack).map_err(StoreError::Deserialization)?;

    if envelope.version > SHEET_FORMAT_VERSION {
        return Err(StoreError::VersionMismatch {
            found: envelope.version,
            expected: SHEET_FORMAT_VERSION,
        });
    }

    envelope.sheet.check_invariants().map_err(StoreError::InvariantViolation)?;
    Ok(envelope.sheet)
}
