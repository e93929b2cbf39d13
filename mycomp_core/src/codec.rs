use crate::error::Result;

/// Core compression abstraction.
///
/// Each `Codec` implementation:
/// - Must compress/decompress individual chunks independently; no cross-chunk
///   state is permitted. This is the invariant that makes chunk-parallel
///   processing possible.
/// - Must not assume the compressed length is knowable in advance in either
///   direction: incompressible input expands on `encode`, and the ratio of
///   repetitive input on `decode` can exceed any fixed multiplier. Adapters
///   over streaming codecs grow their buffers until the underlying stream
///   reports completion.
///
/// The container stores each payload's length and the chunk's original size
/// explicitly, so `decode` always receives the exact original size as a hint
/// and payloads never need to be self-delimiting.
pub trait Codec: Send + Sync {
    /// Human-readable codec name for CLI display.
    fn name(&self) -> &'static str;

    /// Compress a single independent chunk.
    fn encode(&self, raw: &[u8]) -> Result<Vec<u8>>;

    /// Decompress a single independent chunk.
    ///
    /// `original_size` is the exact decompressed length recorded at
    /// compression time. Fails with `Error::Codec` if the stream is malformed
    /// or truncated.
    fn decode(&self, compressed: &[u8], original_size: usize) -> Result<Vec<u8>>;
}
