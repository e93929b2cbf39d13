use thiserror::Error as ThisError;

/// Failure kinds surfaced by the container core.
///
/// Every failure aborts the whole operation. There is no local recovery or
/// retry anywhere in the core: a partially decompressed file with a corrupted
/// tail is worse than no output. Callers decide how to present the failure;
/// the core never logs.
#[derive(Debug, ThisError)]
pub enum Error {
    /// File open/read/write failure, including short reads of a record that
    /// promised more payload bytes than the file holds.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// Bad magic bytes or a structurally impossible field value.
    #[error("invalid container: {0}")]
    Format(String),

    /// The compressor or decompressor failed, or the compressed stream is
    /// malformed or truncated.
    #[error("codec failure: {0}")]
    Codec(String),

    /// The decompressed bytes of one chunk do not match the stored checksum.
    /// Indicates on-disk corruption or a logic defect; never retried.
    #[error("chunk {index} checksum mismatch: stored {expected:#010x}, computed {actual:#010x}")]
    Integrity {
        index: u64,
        expected: u32,
        actual: u32,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
