use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use crate::codec::Codec;
use crate::engine::{self, dispatch_ordered};
use crate::error::{Error, Result};
use crate::format::{ChunkRecord, ContainerHeader, CHUNK_HEADER_SIZE, HEADER_SIZE};
use crate::worker;

/// Tuning knobs for the decompress pipeline.
#[derive(Debug, Clone)]
pub struct DecompressOptions {
    /// Worker threads; capped at the chunk count.
    pub workers: usize,
}

impl Default for DecompressOptions {
    fn default() -> Self {
        Self {
            workers: engine::default_workers(),
        }
    }
}

/// Totals reported after a successful decompression.
#[derive(Debug, Clone, Copy)]
pub struct DecompressReport {
    pub chunk_count: u64,
    pub original_size: u64,
}

/// Container header plus the prelude of every record, payloads skipped.
///
/// Backs `inspect` style tooling: nothing is decompressed and no payload is
/// loaded, so this is cheap even for large containers. The `payload` field of
/// each entry is left empty.
#[derive(Debug)]
pub struct ContainerStats {
    pub chunk_count: u64,
    pub entries: Vec<ChunkRecord>,
}

impl ContainerStats {
    /// Total uncompressed size of all chunks in bytes.
    pub fn original_size(&self) -> u64 {
        self.entries.iter().map(|e| e.original_size).sum()
    }

    /// Total compressed payload bytes (header and preludes excluded).
    pub fn payload_size(&self) -> u64 {
        self.entries.iter().map(|e| e.compressed_size).sum()
    }

    /// Compression ratio (original / payload).
    pub fn ratio(&self) -> f64 {
        let payload = self.payload_size();
        if payload == 0 {
            return 1.0;
        }
        self.original_size() as f64 / payload as f64
    }
}

/// Decompress the container at `input` into `output`.
///
/// The magic is validated before the output file is even created; records are
/// read sequentially by the engine's feeder, decompressed and verified
/// concurrently, and the decoded bytes are written in strict index order.
/// Output for chunk `i + 1` is never written before chunk `i`, so on failure
/// the output holds a clean prefix of the original, possibly incomplete.
pub fn decompress_file(
    input: &Path,
    output: &Path,
    codec: &dyn Codec,
    options: &DecompressOptions,
) -> Result<DecompressReport> {
    let mut src = BufReader::new(File::open(input)?);
    let header = read_header(&mut src)?;

    let mut dst = BufWriter::new(File::create(output)?);
    let produced = decompress_container(&mut src, &mut dst, header.chunk_count, codec, options)?;
    dst.flush()?;
    Ok(DecompressReport {
        chunk_count: header.chunk_count,
        original_size: produced,
    })
}

/// Decompress an in-memory container back into the original bytes.
pub fn decompress_bytes(
    data: &[u8],
    codec: &dyn Codec,
    options: &DecompressOptions,
) -> Result<Vec<u8>> {
    let mut src = data;
    let header = read_header(&mut src)?;
    let mut out = Vec::new();
    decompress_container(&mut src, &mut out, header.chunk_count, codec, options)?;
    Ok(out)
}

/// Read every record prelude without touching payloads.
pub fn inspect_file(path: &Path) -> Result<ContainerStats> {
    let mut src = BufReader::new(File::open(path)?);
    let header = read_header(&mut src)?;

    let mut entries = Vec::with_capacity(header.chunk_count as usize);
    for index in 0..header.chunk_count {
        let mut buf = [0u8; CHUNK_HEADER_SIZE];
        src.read_exact(&mut buf)?;
        let record = ChunkRecord::header_from_bytes(&buf);
        validate_record(&record, index)?;
        src.seek_relative(record.compressed_size as i64)?;
        entries.push(record);
    }
    Ok(ContainerStats {
        chunk_count: header.chunk_count,
        entries,
    })
}

fn read_header<R: Read>(src: &mut R) -> Result<ContainerHeader> {
    let mut buf = [0u8; HEADER_SIZE];
    src.read_exact(&mut buf)?;
    ContainerHeader::from_bytes(&buf)
}

/// Read one full record: fixed prelude, then exactly `compressed_size`
/// payload bytes. A short read is a fatal i/o error, not a partial result.
fn read_record<R: Read>(src: &mut R, index: u64) -> Result<ChunkRecord> {
    let mut buf = [0u8; CHUNK_HEADER_SIZE];
    src.read_exact(&mut buf)?;
    let mut record = ChunkRecord::header_from_bytes(&buf);
    validate_record(&record, index)?;

    let mut payload = vec![0u8; record.compressed_size as usize];
    src.read_exact(&mut payload)?;
    record.payload = payload;
    Ok(record)
}

/// The chunker never produces empty chunks and codecs never produce empty
/// payloads, so a zero in either size field cannot come from a valid writer.
fn validate_record(record: &ChunkRecord, index: u64) -> Result<()> {
    if record.original_size == 0 {
        return Err(Error::Format(format!(
            "chunk {index} declares zero original size"
        )));
    }
    if record.compressed_size == 0 {
        return Err(Error::Format(format!(
            "chunk {index} declares an empty payload"
        )));
    }
    Ok(())
}

fn decompress_container<R, W>(
    src: &mut R,
    out: &mut W,
    chunk_count: u64,
    codec: &dyn Codec,
    options: &DecompressOptions,
) -> Result<u64>
where
    R: Read + Send,
    W: Write,
{
    let workers = options.workers.min(chunk_count.max(1) as usize);
    let jobs = (0..chunk_count).map(move |index| {
        match read_record(&mut *src, index) {
            Ok(record) => Ok(move || worker::decompress_chunk(codec, index, &record)),
            Err(err) => Err(err),
        }
    });

    let mut produced = 0u64;
    dispatch_ordered(jobs, workers, |_, raw: Vec<u8>| -> Result<()> {
        out.write_all(&raw)?;
        produced += raw.len() as u64;
        Ok(())
    })?;
    Ok(produced)
}
