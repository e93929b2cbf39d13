pub mod chunker;
pub mod codec;
pub mod engine;
pub mod error;
pub mod format;
pub mod reader;
pub mod worker;
pub mod writer;

pub use codec::Codec;
pub use error::{Error, Result};
pub use format::{ChunkRecord, ContainerHeader, DEFAULT_CHUNK_SIZE, HEADER_SIZE, MAGIC};
pub use reader::{
    decompress_bytes, decompress_file, inspect_file, ContainerStats, DecompressOptions,
    DecompressReport,
};
pub use writer::{compress_bytes, compress_file, CompressOptions, CompressReport};
