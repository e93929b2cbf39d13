use lz4_flex::block::{compress, decompress};

use mycomp_core::codec::Codec;
use mycomp_core::error::{Error, Result};

/// LZ4 chunk codec.
///
/// Fastest decompression of the bundled codecs. The container records each
/// chunk's original size, so the raw block format is used directly with that
/// size as the decode bound; nothing is prepended to the payload.
///
/// Best for: hot data where decode speed matters more than size reduction.
pub struct Lz4Codec;

impl Codec for Lz4Codec {
    fn name(&self) -> &'static str {
        "lz4"
    }

    fn encode(&self, raw: &[u8]) -> Result<Vec<u8>> {
        Ok(compress(raw))
    }

    fn decode(&self, compressed: &[u8], original_size: usize) -> Result<Vec<u8>> {
        decompress(compressed, original_size)
            .map_err(|e| Error::Codec(format!("lz4 decompress: {e}")))
    }
}
