use mycomp_core::codec::Codec;
use mycomp_core::error::{Error, Result};

/// Zstandard chunk codec.
///
/// Each chunk is compressed independently with `zstd` at the configured level
/// (default: 3), so any chunk can be decompressed without touching its
/// neighbors.
pub struct ZstdCodec {
    /// Compression level (1 = fast / larger, 22 = slow / smallest).
    pub level: i32,
}

impl Default for ZstdCodec {
    fn default() -> Self {
        Self { level: 3 }
    }
}

impl ZstdCodec {
    pub fn new(level: i32) -> Self {
        Self { level }
    }
}

impl Codec for ZstdCodec {
    fn name(&self) -> &'static str {
        "zstd"
    }

    fn encode(&self, raw: &[u8]) -> Result<Vec<u8>> {
        zstd::bulk::compress(raw, self.level)
            .map_err(|e| Error::Codec(format!("zstd compress: {e}")))
    }

    fn decode(&self, compressed: &[u8], original_size: usize) -> Result<Vec<u8>> {
        // The record's original size is exact, so it doubles as the output
        // capacity; a stream claiming more than that is malformed.
        zstd::bulk::decompress(compressed, original_size)
            .map_err(|e| Error::Codec(format!("zstd decompress: {e}")))
    }
}
