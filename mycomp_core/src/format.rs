use crate::error::{Error, Result};

/// Magic bytes identifying a MYCOMP container: 6 ASCII bytes at offset 0.
pub const MAGIC: &[u8; 6] = b"MYCOMP";

/// Fixed size of the container header in bytes.
///   magic[6] + chunk_count:u64 = 6 + 8 = 14
pub const HEADER_SIZE: usize = 14;

/// Fixed size of the per-chunk prelude, written before each payload.
///   original_size:u64 + compressed_size:u64 + checksum:u32 = 8 + 8 + 4 = 20
pub const CHUNK_HEADER_SIZE: usize = 20;

/// Default raw bytes per chunk: 1 MiB (the last chunk may be smaller).
pub const DEFAULT_CHUNK_SIZE: u64 = 1024 * 1024;

// All multi-byte integers in the container are little-endian with fixed
// widths, regardless of the machine that wrote or reads the file.

// ── Header ─────────────────────────────────────────────────────────────────

/// Decoded representation of the 14-byte container header.
///
/// `chunk_count` is fixed at creation: it is computed from the input size
/// before any chunk body is written, never discovered incrementally.
#[derive(Debug, Clone)]
pub struct ContainerHeader {
    pub chunk_count: u64,
}

impl ContainerHeader {
    /// Serialize to exactly `HEADER_SIZE` bytes.
    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut buf = [0u8; HEADER_SIZE];
        buf[..6].copy_from_slice(MAGIC);
        buf[6..14].copy_from_slice(&self.chunk_count.to_le_bytes());
        buf
    }

    /// Deserialize from `HEADER_SIZE` bytes, checking the magic.
    pub fn from_bytes(buf: &[u8; HEADER_SIZE]) -> Result<Self> {
        if &buf[..6] != MAGIC {
            return Err(Error::Format(
                "bad magic bytes, not a MYCOMP container".into(),
            ));
        }
        let mut count = [0u8; 8];
        count.copy_from_slice(&buf[6..14]);
        Ok(Self {
            chunk_count: u64::from_le_bytes(count),
        })
    }
}

// ── Chunk record ────────────────────────────────────────────────────────────

/// One compressed unit stored in the container.
///
/// The ordinal index is never stored; it is implied by position in the file,
/// and records must be read, written, and reassembled in that exact order.
/// Invariant: decompressing `payload` yields exactly `original_size` bytes
/// whose CRC-32 equals `checksum`.
#[derive(Debug, Clone, Default)]
pub struct ChunkRecord {
    /// Byte length of the chunk before compression.
    pub original_size: u64,
    /// Byte length of `payload`.
    pub compressed_size: u64,
    /// CRC-32 of the original (uncompressed) bytes.
    pub checksum: u32,
    /// Opaque compressed bytes, `len() == compressed_size`.
    pub payload: Vec<u8>,
}

impl ChunkRecord {
    /// Serialize the fixed prelude to exactly `CHUNK_HEADER_SIZE` bytes.
    /// The payload follows the prelude verbatim on disk.
    pub fn header_to_bytes(&self) -> [u8; CHUNK_HEADER_SIZE] {
        let mut buf = [0u8; CHUNK_HEADER_SIZE];
        buf[0..8].copy_from_slice(&self.original_size.to_le_bytes());
        buf[8..16].copy_from_slice(&self.compressed_size.to_le_bytes());
        buf[16..20].copy_from_slice(&self.checksum.to_le_bytes());
        buf
    }

    /// Deserialize the fixed prelude. The payload is left empty; the caller
    /// reads exactly `compressed_size` bytes after the prelude to fill it.
    pub fn header_from_bytes(buf: &[u8; CHUNK_HEADER_SIZE]) -> Self {
        let mut original = [0u8; 8];
        let mut compressed = [0u8; 8];
        let mut checksum = [0u8; 4];
        original.copy_from_slice(&buf[0..8]);
        compressed.copy_from_slice(&buf[8..16]);
        checksum.copy_from_slice(&buf[16..20]);
        Self {
            original_size: u64::from_le_bytes(original),
            compressed_size: u64::from_le_bytes(compressed),
            checksum: u32::from_le_bytes(checksum),
            payload: Vec::new(),
        }
    }
}
