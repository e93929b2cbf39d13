use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Context;
use clap::{Parser, Subcommand};

use mycomp_codecs::codec_by_name;
use mycomp_core::{
    compress_file, decompress_file, inspect_file, CompressOptions, DecompressOptions,
    DEFAULT_CHUNK_SIZE,
};

// ── CLI definition ─────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "mycomp",
    about = "Chunked parallel compression: pack files into MYCOMP containers and back",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compress a file into a MYCOMP container
    Compress {
        /// Source file to compress
        input: PathBuf,
        /// Destination path (default: <input>.compressed)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Codec to use: deflate | zstd | lz4 | passthrough
        #[arg(short, long, default_value = "deflate")]
        codec: String,
        /// Raw bytes per chunk (default: 1048576 = 1 MiB)
        #[arg(long, default_value_t = DEFAULT_CHUNK_SIZE)]
        chunk_size: u64,
        /// Worker threads (default: available CPU parallelism)
        #[arg(short = 'j', long)]
        threads: Option<usize>,
    },
    /// Decompress a MYCOMP container back to the original bytes
    Decompress {
        /// Source container (usually "<name>.compressed")
        input: PathBuf,
        /// Destination path (default: input minus its last extension)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Codec the container was compressed with
        #[arg(short, long, default_value = "deflate")]
        codec: String,
        /// Worker threads (default: available CPU parallelism)
        #[arg(short = 'j', long)]
        threads: Option<usize>,
    },
    /// Print container header metadata and chunk statistics
    Inspect {
        /// Container file to inspect
        file: PathBuf,
        /// Print per-chunk details
        #[arg(long)]
        chunks: bool,
    },
}

// ── Helpers ────────────────────────────────────────────────────────────────

fn human_bytes(n: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
    let mut v = n as f64;
    let mut unit = 0;
    while v >= 1024.0 && unit < UNITS.len() - 1 {
        v /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} B", n)
    } else {
        format!("{:.2} {}", v, UNITS[unit])
    }
}

fn default_compressed_path(input: &Path) -> PathBuf {
    let mut name = input.as_os_str().to_os_string();
    name.push(".compressed");
    PathBuf::from(name)
}

fn derive_decompressed_path(input: &Path) -> anyhow::Result<PathBuf> {
    match (input.extension(), input.file_stem()) {
        (Some(_), Some(stem)) => Ok(input.with_file_name(stem)),
        _ => anyhow::bail!(
            "cannot derive an output name from {:?} (no extension to strip); use --output",
            input
        ),
    }
}

// ── Subcommand implementations ─────────────────────────────────────────────

fn run_compress(
    input: PathBuf,
    output: Option<PathBuf>,
    codec_name: &str,
    chunk_size: u64,
    threads: Option<usize>,
) -> anyhow::Result<()> {
    let codec = codec_by_name(codec_name)?;
    let output = output.unwrap_or_else(|| default_compressed_path(&input));

    let mut options = CompressOptions {
        chunk_size,
        ..CompressOptions::default()
    };
    if let Some(threads) = threads {
        options.workers = threads.max(1);
    }
    log::debug!(
        "compressing {:?} -> {:?}: {} byte chunks, {} workers",
        input,
        output,
        options.chunk_size,
        options.workers
    );

    let t0 = Instant::now();
    let report = compress_file(&input, &output, codec.as_ref(), &options)
        .with_context(|| format!("compressing {:?}", input))?;
    let elapsed = t0.elapsed();

    let ratio = if report.compressed_size == 0 {
        1.0
    } else {
        report.original_size as f64 / report.compressed_size as f64
    };
    eprintln!("  codec       : {}", codec.name());
    eprintln!("  chunk size  : {}", human_bytes(options.chunk_size));
    eprintln!("  chunks      : {}", report.chunk_count);
    eprintln!("  raw size    : {}", human_bytes(report.original_size));
    eprintln!("  compressed  : {}", human_bytes(report.compressed_size));
    eprintln!("  ratio       : {:.2}x", ratio);
    eprintln!(
        "  throughput  : {}/s",
        human_bytes((report.original_size as f64 / elapsed.as_secs_f64()) as u64)
    );
    eprintln!("  elapsed     : {:.3}s", elapsed.as_secs_f64());
    Ok(())
}

fn run_decompress(
    input: PathBuf,
    output: Option<PathBuf>,
    codec_name: &str,
    threads: Option<usize>,
) -> anyhow::Result<()> {
    let codec = codec_by_name(codec_name)?;
    let output = match output {
        Some(path) => path,
        None => derive_decompressed_path(&input)?,
    };

    let mut options = DecompressOptions::default();
    if let Some(threads) = threads {
        options.workers = threads.max(1);
    }
    log::debug!(
        "decompressing {:?} -> {:?}: {} workers",
        input,
        output,
        options.workers
    );

    let t0 = Instant::now();
    let report = decompress_file(&input, &output, codec.as_ref(), &options)
        .with_context(|| format!("decompressing {:?}", input))?;
    let elapsed = t0.elapsed();

    eprintln!("  chunks      : {}", report.chunk_count);
    eprintln!("  raw size    : {}", human_bytes(report.original_size));
    eprintln!(
        "  throughput  : {}/s",
        human_bytes((report.original_size as f64 / elapsed.as_secs_f64()) as u64)
    );
    eprintln!("  elapsed     : {:.3}s", elapsed.as_secs_f64());
    Ok(())
}

fn run_inspect(file: PathBuf, show_chunks: bool) -> anyhow::Result<()> {
    let stats = inspect_file(&file).with_context(|| format!("inspecting {:?}", file))?;
    let on_disk = std::fs::metadata(&file)?.len();

    println!("=== MYCOMP container: {:?} ===", file);
    println!();
    println!("  chunks        : {}", stats.chunk_count);
    println!("  raw size      : {}", human_bytes(stats.original_size()));
    println!("  payload bytes : {}", human_bytes(stats.payload_size()));
    println!("  file on disk  : {}", human_bytes(on_disk));
    println!("  ratio         : {:.2}x", stats.ratio());

    if show_chunks {
        println!();
        println!(
            "  {:>8}  {:>12}  {:>12}  {:>10}",
            "chunk", "raw", "compressed", "checksum"
        );
        println!("  {}", "-".repeat(50));
        for (i, e) in stats.entries.iter().enumerate() {
            println!(
                "  {:>8}  {:>12}  {:>12}  {:08x}",
                i,
                human_bytes(e.original_size),
                human_bytes(e.compressed_size),
                e.checksum
            );
        }
    }

    Ok(())
}

// ── Entry point ────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.command {
        Commands::Compress {
            input,
            output,
            codec,
            chunk_size,
            threads,
        } => run_compress(input, output, &codec, chunk_size, threads),
        Commands::Decompress {
            input,
            output,
            codec,
            threads,
        } => run_decompress(input, output, &codec, threads),
        Commands::Inspect { file, chunks } => run_inspect(file, chunks),
    }
}
