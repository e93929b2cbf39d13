mod deflate;
mod lz4_codec;
mod passthrough;
mod zstd_codec;

pub use deflate::DeflateCodec;
pub use lz4_codec::Lz4Codec;
pub use passthrough::PassthroughCodec;
pub use zstd_codec::ZstdCodec;

use mycomp_core::error::{Error, Result};
use mycomp_core::Codec;

/// Resolve a codec from its CLI name.
///
/// The container format does not record which codec produced it, so
/// decompression must be invoked with the codec that compression used. A
/// mismatch
/// surfaces as a codec or checksum failure, never as silently wrong output.
pub fn codec_by_name(name: &str) -> Result<Box<dyn Codec>> {
    match name {
        "deflate" | "zlib" | "d" => Ok(Box::new(DeflateCodec)),
        "zstd" | "z" => Ok(Box::new(ZstdCodec::default())),
        "lz4" | "l" => Ok(Box::new(Lz4Codec)),
        "passthrough" | "pass" | "none" => Ok(Box::new(PassthroughCodec)),
        other => Err(Error::Codec(format!(
            "unknown codec '{other}'. Valid options: deflate, zstd, lz4, passthrough"
        ))),
    }
}
