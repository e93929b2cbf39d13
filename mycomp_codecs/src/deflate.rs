use flate2::{Compress, Compression, Decompress, FlushCompress, FlushDecompress, Status};

use mycomp_core::codec::Codec;
use mycomp_core::error::{Error, Result};

/// DEFLATE codec over flate2's streaming primitives (zlib wrapper).
///
/// The compressed length is not knowable in advance in either direction:
/// incompressible input expands on encode, and repetitive input can decode to
/// many times any fixed multiplier. Both loops therefore grow the output
/// buffer by doubling until the stream itself reports `StreamEnd`, instead of
/// trusting a one-shot allocation.
///
/// Best for: general text, logs, mixed data where wide compatibility matters.
pub struct DeflateCodec;

impl Codec for DeflateCodec {
    fn name(&self) -> &'static str {
        "deflate"
    }

    fn encode(&self, raw: &[u8]) -> Result<Vec<u8>> {
        let mut encoder = Compress::new(Compression::default(), true);
        let mut out = Vec::with_capacity((raw.len() / 2).max(64));
        loop {
            let consumed = encoder.total_in() as usize;
            let status = encoder
                .compress_vec(&raw[consumed..], &mut out, FlushCompress::Finish)
                .map_err(|e| Error::Codec(format!("deflate: {e}")))?;
            match status {
                Status::StreamEnd => break,
                Status::Ok | Status::BufError => out.reserve(out.capacity().max(64)),
            }
        }
        Ok(out)
    }

    fn decode(&self, compressed: &[u8], original_size: usize) -> Result<Vec<u8>> {
        let mut decoder = Decompress::new(true);
        let mut out = Vec::with_capacity(original_size.max(64));
        loop {
            let consumed = decoder.total_in();
            let produced = decoder.total_out();
            let status = decoder
                .decompress_vec(&compressed[consumed as usize..], &mut out, FlushDecompress::Finish)
                .map_err(|e| Error::Codec(format!("inflate: {e}")))?;
            match status {
                Status::StreamEnd => break,
                Status::Ok | Status::BufError => {
                    if out.len() == out.capacity() {
                        out.reserve(out.capacity().max(64));
                    } else if decoder.total_in() == consumed && decoder.total_out() == produced {
                        // Input exhausted, output space available, still no
                        // StreamEnd: the stream is cut short.
                        return Err(Error::Codec("truncated deflate stream".into()));
                    }
                }
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pseudo_random_bytes(len: usize, seed: u64) -> Vec<u8> {
        let mut rng = seed;
        (0..len)
            .map(|_| {
                rng = rng
                    .wrapping_mul(6364136223846793005)
                    .wrapping_add(1442695040888963407);
                (rng >> 56) as u8
            })
            .collect()
    }

    #[test]
    fn roundtrip_text() {
        let data = b"the quick brown fox jumps over the lazy dog. ".repeat(100);
        let codec = DeflateCodec;
        let encoded = codec.encode(&data).unwrap();
        assert!(encoded.len() < data.len());
        let decoded = codec.decode(&encoded, data.len()).unwrap();
        assert_eq!(decoded, data);
    }

    #[test]
    fn incompressible_input_roundtrips() {
        // High-entropy input expands; the encode loop must keep growing
        // rather than truncate.
        let data = pseudo_random_bytes(4096, 0xDEAD_BEEF);
        let codec = DeflateCodec;
        let encoded = codec.encode(&data).unwrap();
        let decoded = codec.decode(&encoded, data.len()).unwrap();
        assert_eq!(decoded, data);
    }

    #[test]
    fn high_ratio_input_roundtrips() {
        let data = vec![0u8; 512 * 1024];
        let codec = DeflateCodec;
        let encoded = codec.encode(&data).unwrap();
        assert!(encoded.len() < data.len() / 100);
        let decoded = codec.decode(&encoded, data.len()).unwrap();
        assert_eq!(decoded, data);
    }

    #[test]
    fn undersized_hint_still_decodes_fully() {
        let data = b"abcdefgh".repeat(10_000);
        let codec = DeflateCodec;
        let encoded = codec.encode(&data).unwrap();
        let decoded = codec.decode(&encoded, 1).unwrap();
        assert_eq!(decoded, data);
    }

    #[test]
    fn truncated_stream_is_rejected() {
        let data = b"hello world, hello world, hello world".repeat(200);
        let codec = DeflateCodec;
        let encoded = codec.encode(&data).unwrap();
        let cut = &encoded[..encoded.len() / 2];
        let err = codec.decode(cut, data.len()).unwrap_err();
        assert!(matches!(err, Error::Codec(_)));
    }
}
