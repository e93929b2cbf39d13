/// End-to-end tests over the container: round trips across codecs and sizes,
/// chunk-count arithmetic, corruption and truncation handling, and
/// determinism across worker counts.
use mycomp_codecs::{DeflateCodec, Lz4Codec, PassthroughCodec, ZstdCodec};
use mycomp_core::format::{CHUNK_HEADER_SIZE, HEADER_SIZE};
use mycomp_core::{
    compress_bytes, compress_file, decompress_bytes, decompress_file, inspect_file, ChunkRecord,
    CompressOptions, DecompressOptions, Error,
};

/// Generate `len` deterministic bytes using a simple LCG.
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

/// Generate `len` highly compressible bytes (repeating pattern).
fn compressible_bytes(len: usize) -> Vec<u8> {
    let pattern = b"the quick brown fox jumps over the lazy dog. ";
    (0..len).map(|i| pattern[i % pattern.len()]).collect()
}

// ── helpers ────────────────────────────────────────────────────────────────

fn temp_path(name: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!("mycomp_test_{}", name))
}

fn small_chunks(chunk_size: u64) -> CompressOptions {
    CompressOptions {
        chunk_size,
        ..CompressOptions::default()
    }
}

fn parsed_chunk_count(container: &[u8]) -> u64 {
    let mut count = [0u8; 8];
    count.copy_from_slice(&container[6..14]);
    u64::from_le_bytes(count)
}

// ── round trips ────────────────────────────────────────────────────────────

#[test]
fn roundtrip_boundary_sizes() {
    let chunk_size = 1024u64;
    let codec = DeflateCodec;
    for len in [
        0usize,
        1,
        chunk_size as usize - 1,
        chunk_size as usize,
        chunk_size as usize + 1,
        3 * chunk_size as usize,
        5 * chunk_size as usize + 77,
    ] {
        let data = compressible_bytes(len);
        let container = compress_bytes(&data, &codec, &small_chunks(chunk_size)).unwrap();
        assert_eq!(
            parsed_chunk_count(&container),
            (len as u64).div_ceil(chunk_size),
            "chunk count for len {len}"
        );
        let restored =
            decompress_bytes(&container, &codec, &DecompressOptions::default()).unwrap();
        assert_eq!(restored, data, "round trip for len {len}");
    }
}

#[test]
fn roundtrip_all_codecs() {
    let data = compressible_bytes(3 * 4096 + 777);
    let options = small_chunks(4096);
    let codecs: Vec<Box<dyn mycomp_core::Codec>> = vec![
        Box::new(DeflateCodec),
        Box::new(ZstdCodec::default()),
        Box::new(Lz4Codec),
        Box::new(PassthroughCodec),
    ];
    for codec in codecs {
        let container = compress_bytes(&data, codec.as_ref(), &options).unwrap();
        let restored =
            decompress_bytes(&container, codec.as_ref(), &DecompressOptions::default()).unwrap();
        assert_eq!(restored, data, "round trip via {}", codec.name());
    }
}

#[test]
fn roundtrip_incompressible_data() {
    // High-entropy chunks expand under deflate; the record must still carry
    // them back exactly.
    let data = pseudo_random_bytes(64 * 1024, 0x1234_5678);
    let container = compress_bytes(&data, &DeflateCodec, &small_chunks(1024)).unwrap();
    assert!(container.len() > data.len());
    let restored = decompress_bytes(&container, &DeflateCodec, &DecompressOptions::default()).unwrap();
    assert_eq!(restored, data);
}

#[test]
fn empty_input_yields_empty_container() {
    let container = compress_bytes(b"", &DeflateCodec, &CompressOptions::default()).unwrap();
    assert_eq!(container.len(), HEADER_SIZE);
    assert_eq!(parsed_chunk_count(&container), 0);
    let restored = decompress_bytes(&container, &DeflateCodec, &DecompressOptions::default()).unwrap();
    assert!(restored.is_empty());
}

#[test]
fn abc_compresses_to_a_single_checked_chunk() {
    let data = b"abc";
    let container = compress_bytes(data, &DeflateCodec, &CompressOptions::default()).unwrap();
    assert_eq!(parsed_chunk_count(&container), 1);

    let mut prelude = [0u8; CHUNK_HEADER_SIZE];
    prelude.copy_from_slice(&container[HEADER_SIZE..HEADER_SIZE + CHUNK_HEADER_SIZE]);
    let record = ChunkRecord::header_from_bytes(&prelude);
    assert_eq!(record.original_size, 3);
    assert_eq!(record.checksum, crc32fast::hash(data));
    assert_eq!(
        record.compressed_size as usize,
        container.len() - HEADER_SIZE - CHUNK_HEADER_SIZE
    );

    let restored = decompress_bytes(&container, &DeflateCodec, &DecompressOptions::default()).unwrap();
    assert_eq!(restored, data);
}

// ── determinism ────────────────────────────────────────────────────────────

#[test]
fn container_is_identical_across_worker_counts() {
    let data = pseudo_random_bytes(300 * 1024, 0xFEED_FACE);
    let serial = CompressOptions {
        chunk_size: 4096,
        workers: 1,
    };
    let parallel = CompressOptions {
        chunk_size: 4096,
        workers: 8,
    };
    let a = compress_bytes(&data, &DeflateCodec, &serial).unwrap();
    let b = compress_bytes(&data, &DeflateCodec, &parallel).unwrap();
    assert_eq!(a, b);
}

// ── corruption and validation ──────────────────────────────────────────────

#[test]
fn payload_bitflip_fails_with_that_chunks_index() {
    // Passthrough keeps payload offsets predictable and leaves the checksum
    // protocol alone to catch the damage.
    let chunk_size = 1024usize;
    let data = compressible_bytes(4 * chunk_size);
    let mut container =
        compress_bytes(&data, &PassthroughCodec, &small_chunks(chunk_size as u64)).unwrap();

    // Chunk 2's payload starts after the header, two full records, and its
    // own prelude.
    let offset = HEADER_SIZE + 2 * (CHUNK_HEADER_SIZE + chunk_size) + CHUNK_HEADER_SIZE + 100;
    container[offset] ^= 0x01;

    match decompress_bytes(&container, &PassthroughCodec, &DecompressOptions::default()) {
        Err(Error::Integrity { index, .. }) => assert_eq!(index, 2),
        other => panic!("expected integrity failure for chunk 2, got {:?}", other),
    }
}

#[test]
fn failed_chunk_stops_output_at_the_preceding_chunk() {
    let chunk_size = 1024usize;
    let data = compressible_bytes(6 * chunk_size);
    let mut container =
        compress_bytes(&data, &PassthroughCodec, &small_chunks(chunk_size as u64)).unwrap();
    let offset = HEADER_SIZE + 2 * (CHUNK_HEADER_SIZE + chunk_size) + CHUNK_HEADER_SIZE;
    container[offset] ^= 0x80;

    let container_path = temp_path("corrupt_tail.compressed");
    let output_path = temp_path("corrupt_tail.out");
    std::fs::write(&container_path, &container).unwrap();

    let err = decompress_file(
        &container_path,
        &output_path,
        &PassthroughCodec,
        &DecompressOptions::default(),
    )
    .unwrap_err();
    assert!(matches!(err, Error::Integrity { index: 2, .. }));

    // Whatever reached the output is an in-order prefix that stops before
    // the failing chunk.
    let partial = std::fs::read(&output_path).unwrap();
    assert!(partial.len() <= 2 * chunk_size);
    assert_eq!(&data[..partial.len()], &partial[..]);
}

#[test]
fn corrupted_magic_is_rejected_before_any_processing() {
    let data = compressible_bytes(2048);
    let mut container = compress_bytes(&data, &DeflateCodec, &small_chunks(1024)).unwrap();
    container[0] ^= 0xFF;

    match decompress_bytes(&container, &DeflateCodec, &DecompressOptions::default()) {
        Err(Error::Format(_)) => {}
        other => panic!("expected format error, got {:?}", other),
    }

    // The file path variant must not even create the output file.
    let container_path = temp_path("bad_magic.compressed");
    let output_path = temp_path("bad_magic.out");
    let _ = std::fs::remove_file(&output_path);
    std::fs::write(&container_path, &container).unwrap();
    let err = decompress_file(
        &container_path,
        &output_path,
        &DeflateCodec,
        &DecompressOptions::default(),
    )
    .unwrap_err();
    assert!(matches!(err, Error::Format(_)));
    assert!(!output_path.exists());
}

#[test]
fn truncated_container_is_an_io_error() {
    let data = compressible_bytes(8 * 1024);
    let container = compress_bytes(&data, &DeflateCodec, &small_chunks(1024)).unwrap();
    let cut = &container[..container.len() - 3];
    match decompress_bytes(cut, &DeflateCodec, &DecompressOptions::default()) {
        Err(Error::Io(_)) => {}
        other => panic!("expected i/o error, got {:?}", other),
    }
}

#[test]
fn zero_sized_record_fields_are_structurally_invalid() {
    let record = ChunkRecord {
        original_size: 0,
        compressed_size: 5,
        checksum: 0,
        payload: vec![0; 5],
    };
    let mut container = Vec::new();
    container.extend_from_slice(b"MYCOMP");
    container.extend_from_slice(&1u64.to_le_bytes());
    container.extend_from_slice(&record.header_to_bytes());
    container.extend_from_slice(&record.payload);

    match decompress_bytes(&container, &DeflateCodec, &DecompressOptions::default()) {
        Err(Error::Format(_)) => {}
        other => panic!("expected format error, got {:?}", other),
    }
}

#[test]
fn deflate_payload_corruption_never_yields_wrong_bytes() {
    let data = compressible_bytes(16 * 1024);
    let mut container = compress_bytes(&data, &DeflateCodec, &small_chunks(4096)).unwrap();
    // Flip a bit somewhere inside the first payload; depending on where it
    // lands the codec or the checksum rejects it, but it never succeeds.
    let offset = HEADER_SIZE + CHUNK_HEADER_SIZE + 10;
    container[offset] ^= 0x10;
    let result = decompress_bytes(&container, &DeflateCodec, &DecompressOptions::default());
    match result {
        Err(Error::Codec(_)) | Err(Error::Integrity { .. }) => {}
        other => panic!("expected codec or integrity failure, got {:?}", other),
    }
}

// ── file pipelines ─────────────────────────────────────────────────────────

#[test]
fn file_roundtrip_with_reports() {
    let data = compressible_bytes(200 * 1024 + 123);
    let input = temp_path("file_roundtrip.bin");
    let compressed = temp_path("file_roundtrip.bin.compressed");
    let restored = temp_path("file_roundtrip.bin.restored");
    std::fs::write(&input, &data).unwrap();

    let options = small_chunks(16 * 1024);
    let report = compress_file(&input, &compressed, &DeflateCodec, &options).unwrap();
    assert_eq!(report.original_size, data.len() as u64);
    assert_eq!(report.chunk_count, (data.len() as u64).div_ceil(16 * 1024));
    assert_eq!(
        report.compressed_size,
        std::fs::metadata(&compressed).unwrap().len()
    );

    let report = decompress_file(
        &compressed,
        &restored,
        &DeflateCodec,
        &DecompressOptions::default(),
    )
    .unwrap();
    assert_eq!(report.original_size, data.len() as u64);
    assert_eq!(std::fs::read(&restored).unwrap(), data);
}

#[test]
fn exact_double_chunk_input_splits_evenly() {
    let chunk_size = 1024u64;
    let data = compressible_bytes(2 * chunk_size as usize);
    let input = temp_path("two_chunks.bin");
    let compressed = temp_path("two_chunks.bin.compressed");
    std::fs::write(&input, &data).unwrap();

    compress_file(&input, &compressed, &ZstdCodec::default(), &small_chunks(chunk_size)).unwrap();

    let stats = inspect_file(&compressed).unwrap();
    assert_eq!(stats.chunk_count, 2);
    assert_eq!(stats.entries.len(), 2);
    assert!(stats.entries.iter().all(|e| e.original_size == chunk_size));
    assert_eq!(stats.original_size(), 2 * chunk_size);
}

#[test]
fn missing_input_file_is_an_io_error() {
    let missing = temp_path("does_not_exist.bin");
    let _ = std::fs::remove_file(&missing);
    let out = temp_path("does_not_exist.out");
    let err = compress_file(
        &missing,
        &out,
        &DeflateCodec,
        &CompressOptions::default(),
    )
    .unwrap_err();
    assert!(matches!(err, Error::Io(_)));
}
