/// A contiguous byte range of the input, processed as one compression unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkSpan {
    pub offset: u64,
    pub len: u64,
}

/// Number of chunks a `total_size`-byte input splits into: `ceil(total / chunk)`.
///
/// `chunk_size` must be positive. Empty input yields zero chunks, never a
/// single zero-length chunk.
pub fn chunk_count(total_size: u64, chunk_size: u64) -> u64 {
    total_size.div_ceil(chunk_size)
}

/// Ordered chunk boundaries for the given sizes.
///
/// Every span has length `chunk_size` except the last, which covers whatever
/// remains. No span is ever empty.
pub fn spans(total_size: u64, chunk_size: u64) -> impl Iterator<Item = ChunkSpan> {
    let count = chunk_count(total_size, chunk_size);
    (0..count).map(move |i| {
        let offset = i * chunk_size;
        let len = if i + 1 == count {
            total_size - offset
        } else {
            chunk_size
        };
        ChunkSpan { offset, len }
    })
}
