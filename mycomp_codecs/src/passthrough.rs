use mycomp_core::codec::Codec;
use mycomp_core::error::Result;

/// No-op codec: stores chunks verbatim, with no compression.
///
/// Useful for:
/// - Verifying the container and checksum protocol independently of any
///   codec.
/// - Data that is already compressed (e.g., JPEG, MP4) where further
///   compression would expand the file.
pub struct PassthroughCodec;

impl Codec for PassthroughCodec {
    fn name(&self) -> &'static str {
        "passthrough"
    }

    fn encode(&self, raw: &[u8]) -> Result<Vec<u8>> {
        Ok(raw.to_vec())
    }

    fn decode(&self, compressed: &[u8], _original_size: usize) -> Result<Vec<u8>> {
        Ok(compressed.to_vec())
    }
}
