use clap::{Parser, Subcommand};
use deduplication::stream::DEFAULT_BUFFER_SIZE;
use deduplication::{manifest, required_target_capacity, ChunkRecord, Chunker, StreamChunker};
use futures_util::stream::{self, StreamExt};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use std::collections::HashSet;
use std::fs::File;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Average chunk sizes exercised by `bench`.
const BENCH_AVERAGES: [u32; 7] = [2048, 4096, 8192, 16384, 32768, 65536, 131072];

#[derive(Parser)]
#[command(name = "deduplication")]
#[command(about = "Content-defined chunking with SHA-256 chunk manifests")]
struct Cli {
    /// Log filter used when RUST_LOG is not set
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Chunk a file and print one line per chunk
    Chunk {
        /// File to chunk
        file: PathBuf,
        /// Target average chunk size in bytes
        #[arg(long, default_value = "65536")]
        average: u32,
        /// Minimum chunk size (default: average / 4)
        #[arg(long)]
        minimum: Option<u32>,
        /// Maximum chunk size (default: average * 8)
        #[arg(long)]
        maximum: Option<u32>,
        /// Source buffer size, must exceed the maximum chunk size
        #[arg(long, default_value_t = DEFAULT_BUFFER_SIZE)]
        buffer_size: usize,
        /// Also write the packed binary manifest here
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Print the records of a binary manifest
    Inspect {
        /// Manifest file
        manifest: PathBuf,
    },
    /// Print the target capacity needed for a source size
    TargetSize {
        /// Minimum chunk size in bytes
        #[arg(long)]
        minimum: u32,
        /// Source size in bytes
        source_size: u32,
    },
    /// Measure throughput and deduplication ratio on generated data
    Bench {
        /// Number of generated sources
        #[arg(long, default_value = "16")]
        files: usize,
        /// Size of each source in bytes
        #[arg(long, default_value_t = DEFAULT_BUFFER_SIZE)]
        file_size: usize,
        /// Concurrent workers (default: available parallelism)
        #[arg(long)]
        threads: Option<usize>,
        /// Seed for the generated data
        #[arg(long, default_value = "0")]
        seed: u64,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    match cli.command {
        Commands::Chunk {
            file,
            average,
            minimum,
            maximum,
            buffer_size,
            output,
        } => {
            let chunker = Chunker::new(
                average,
                minimum.unwrap_or(average.saturating_add(2) / 4),
                maximum.unwrap_or(average.saturating_mul(8)),
            )?;
            info!(params = ?chunker.params(), file = %file.display(), "chunking");

            let entries = tokio::task::spawn_blocking(move || {
                let reader = File::open(&file)?;
                StreamChunker::with_buffer_size(reader, chunker, buffer_size)?
                    .collect::<deduplication::Result<Vec<_>>>()
            })
            .await??;

            let mut packed = Vec::with_capacity(entries.len() * deduplication::RECORD_SIZE);
            for entry in &entries {
                println!(
                    "hash={} offset={} size={}",
                    hex::encode(entry.hash),
                    entry.offset,
                    entry.length
                );
                let record = ChunkRecord {
                    hash: entry.hash,
                    length: entry.length,
                };
                packed.extend_from_slice(&record.to_bytes());
            }

            if let Some(output) = output {
                tokio::fs::write(&output, &packed).await?;
                info!(
                    records = entries.len(),
                    path = %output.display(),
                    "wrote manifest"
                );
            }
        }
        Commands::Inspect {
            manifest: manifest_path,
        } => {
            let bytes = tokio::fs::read(&manifest_path).await?;
            let records = manifest::decode(&bytes)?;
            let mut offset = 0u64;
            for record in &records {
                println!(
                    "hash={} offset={} size={}",
                    hex::encode(record.hash),
                    offset,
                    record.length
                );
                offset += u64::from(record.length);
            }
            println!("chunks={} bytes={}", records.len(), offset);
        }
        Commands::TargetSize {
            minimum,
            source_size,
        } => {
            println!("{}", required_target_capacity(minimum, source_size)?);
        }
        Commands::Bench {
            files,
            file_size,
            threads,
            seed,
        } => {
            let threads = threads.unwrap_or_else(|| {
                std::thread::available_parallelism()
                    .map(|n| n.get())
                    .unwrap_or(1)
            });
            bench(files, file_size, threads.max(1), seed).await?;
        }
    }

    Ok(())
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Generate `files` sources that share most of their content.
///
/// Each source is a common random master cut into eight slices, with a
/// short run of fresh random bytes (a different length per source) in
/// front of every slice. Chunks away from the insertions deduplicate.
fn generate_sources(files: usize, file_size: usize, seed: u64) -> Vec<Arc<[u8]>> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut master = vec![0u8; file_size];
    rng.fill_bytes(&mut master);
    let slice_size = file_size.div_ceil(8).max(1);

    (0..files)
        .map(|index| {
            let mut source = Vec::with_capacity(file_size + 8 * (index + 16));
            for slice in master.chunks(slice_size) {
                let mut noise = vec![0u8; index + 16];
                rng.fill_bytes(&mut noise);
                source.extend_from_slice(&noise);
                source.extend_from_slice(slice);
            }
            source.truncate(file_size);
            Arc::from(source)
        })
        .collect()
}

async fn bench(
    files: usize,
    file_size: usize,
    threads: usize,
    seed: u64,
) -> Result<(), Box<dyn std::error::Error>> {
    let sources = generate_sources(files, file_size, seed);
    println!("{:>15} {}", "Threads:", threads);
    println!("{:>15} {} x {} Bytes", "Files:", files, file_size);

    for average in BENCH_AVERAGES {
        let chunker = Chunker::recommended(average)?;
        let started = Instant::now();

        let results: Vec<_> = stream::iter(sources.iter().cloned())
            .map(|source| {
                tokio::task::spawn_blocking(move || {
                    let start = Instant::now();
                    let manifest = chunker.manifest(&source)?;
                    Ok::<_, deduplication::Error>((start.elapsed(), manifest))
                })
            })
            .buffer_unordered(threads)
            .collect()
            .await;
        let elapsed = started.elapsed();

        let mut latency = Duration::ZERO;
        let mut seen = HashSet::new();
        let mut unique_chunks = 0u64;
        let mut logical = 0u64;
        let mut physical = 0u64;
        for result in results {
            let (took, packed) = result??;
            latency += took;
            for record in manifest::records(&packed) {
                let length = u64::from(record.length);
                if seen.insert(record.hash) {
                    unique_chunks += 1;
                    logical += length;
                }
                physical += length;
            }
        }
        debug!(average, unique_chunks, logical, physical, "bench round");

        let actual = logical.div_ceil(unique_chunks.max(1));
        let error = (actual as f64 - f64::from(average)) / f64::from(average) * 100.0;
        let ratio = if physical == 0 {
            0.0
        } else {
            (physical - logical) as f64 / physical as f64 * 100.0
        };
        let latency_ms = latency.as_secs_f64() * 1000.0 / files.max(1) as f64;
        let throughput = physical as f64 / elapsed.as_secs_f64().max(f64::EPSILON) / 1_000_000.0;

        println!();
        println!("{:>15} {} Bytes ({:+.2}% E)", "Chunk:", average, error);
        println!("{:>15} {:.2}%", "Ratio:", ratio);
        println!(
            "{:>15} Latency: {:.3}ms, Throughput: {:.2} MB/s",
            "Timing:", latency_ms, throughput
        );
    }

    Ok(())
}
