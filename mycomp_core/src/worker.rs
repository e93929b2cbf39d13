use crate::codec::Codec;
use crate::error::{Error, Result};
use crate::format::ChunkRecord;

// Both operations are pure functions of their inputs and share no mutable
// state, so the dispatch engine may run any number of them concurrently
// without locking.

/// Compress one chunk end-to-end: checksum the raw bytes, encode them, and
/// assemble the record. Fails only if the codec fails.
pub fn compress_chunk(codec: &dyn Codec, raw: &[u8]) -> Result<ChunkRecord> {
    let checksum = crc32fast::hash(raw);
    let payload = codec.encode(raw)?;
    Ok(ChunkRecord {
        original_size: raw.len() as u64,
        compressed_size: payload.len() as u64,
        checksum,
        payload,
    })
}

/// Decompress one chunk and verify it against the record.
///
/// A checksum mismatch is a hard failure, never retried: it indicates either
/// on-disk corruption or a logic defect, and silently emitting wrong bytes is
/// unacceptable. On success the returned bytes are exactly `original_size`
/// long.
pub fn decompress_chunk(codec: &dyn Codec, index: u64, record: &ChunkRecord) -> Result<Vec<u8>> {
    let raw = codec.decode(&record.payload, record.original_size as usize)?;
    if raw.len() as u64 != record.original_size {
        return Err(Error::Codec(format!(
            "chunk {index} decompressed to {} bytes but the record says {}",
            raw.len(),
            record.original_size
        )));
    }
    let actual = crc32fast::hash(&raw);
    if actual != record.checksum {
        return Err(Error::Integrity {
            index,
            expected: record.checksum,
            actual,
        });
    }
    Ok(raw)
}
