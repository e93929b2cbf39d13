use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use crate::chunker::{self, ChunkSpan};
use crate::codec::Codec;
use crate::engine::{self, dispatch_ordered};
use crate::error::{Error, Result};
use crate::format::{ChunkRecord, ContainerHeader, CHUNK_HEADER_SIZE, DEFAULT_CHUNK_SIZE, HEADER_SIZE};
use crate::worker;

/// Tuning knobs for the compress pipeline.
#[derive(Debug, Clone)]
pub struct CompressOptions {
    /// Raw bytes per chunk (the last chunk may be smaller). Must be positive.
    pub chunk_size: u64,
    /// Worker threads; capped at the chunk count.
    pub workers: usize,
}

impl Default for CompressOptions {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            workers: engine::default_workers(),
        }
    }
}

/// Totals reported after a successful compression.
#[derive(Debug, Clone, Copy)]
pub struct CompressReport {
    pub chunk_count: u64,
    pub original_size: u64,
    /// Container bytes written, header and preludes included.
    pub compressed_size: u64,
}

/// Compress `input` into a MYCOMP container at `output`.
///
/// The input is read sequentially, one chunk span at a time, by the engine's
/// feeder; chunks are compressed concurrently and records land in the output
/// in strict index order. On failure the output file may be left incomplete.
pub fn compress_file(
    input: &Path,
    output: &Path,
    codec: &dyn Codec,
    options: &CompressOptions,
) -> Result<CompressReport> {
    let file = File::open(input)?;
    let total_size = file.metadata()?.len();
    let mut src = BufReader::new(file);

    let mut dst = BufWriter::new(File::create(output)?);
    let read_chunk = move |span: ChunkSpan| -> Result<Vec<u8>> {
        let mut buf = vec![0u8; span.len as usize];
        src.read_exact(&mut buf)?;
        Ok(buf)
    };
    let report = compress_container(&mut dst, total_size, codec, options, read_chunk)?;
    dst.flush()?;
    Ok(report)
}

/// Compress an in-memory byte slice into a container held in memory.
pub fn compress_bytes(data: &[u8], codec: &dyn Codec, options: &CompressOptions) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    let read_chunk = |span: ChunkSpan| -> Result<Vec<u8>> {
        let start = span.offset as usize;
        Ok(data[start..start + span.len as usize].to_vec())
    };
    compress_container(&mut out, data.len() as u64, codec, options, read_chunk)?;
    Ok(out)
}

/// Shared compress pipeline: header first (the chunk count is known from the
/// input size alone), then one record per chunk in index order.
fn compress_container<W, F>(
    out: &mut W,
    total_size: u64,
    codec: &dyn Codec,
    options: &CompressOptions,
    mut read_chunk: F,
) -> Result<CompressReport>
where
    W: Write,
    F: FnMut(ChunkSpan) -> Result<Vec<u8>> + Send,
{
    if options.chunk_size == 0 {
        return Err(Error::Format("chunk size must be positive".into()));
    }

    let chunk_count = chunker::chunk_count(total_size, options.chunk_size);
    let header = ContainerHeader { chunk_count };
    out.write_all(&header.to_bytes())?;

    let workers = options.workers.min(chunk_count.max(1) as usize);
    let jobs = chunker::spans(total_size, options.chunk_size).map(move |span| {
        match read_chunk(span) {
            Ok(raw) => Ok(move || worker::compress_chunk(codec, &raw)),
            Err(err) => Err(err),
        }
    });

    let mut written = HEADER_SIZE as u64;
    dispatch_ordered(jobs, workers, |_, record: ChunkRecord| -> Result<()> {
        out.write_all(&record.header_to_bytes())?;
        out.write_all(&record.payload)?;
        written += (CHUNK_HEADER_SIZE + record.payload.len()) as u64;
        Ok(())
    })?;

    Ok(CompressReport {
        chunk_count,
        original_size: total_size,
        compressed_size: written,
    })
}
