//! In-memory round-trip benchmark.
//!
//! Compresses a buffer, decompresses it back, verifies the result with XXH64
//! and reports the ratio and the best speed seen over a number of timed
//! iterations. Each iteration builds fresh codec state, like every other
//! caller of the codec.

use std::io;
use std::time::{Duration, Instant};

use crate::block::{compress, decompress};
use crate::displaylevel;
use crate::xxhash::xxh64_oneshot;

const MB: f64 = (1 << 20) as f64;

/// Result of one [`bench_mem`] run.
#[derive(Debug, Clone)]
pub struct BenchResult {
    /// Bytes in the source.
    pub src_size: usize,
    /// Bytes in the compressed stream, end marker included.
    pub compressed_size: usize,
    /// `src_size / compressed_size`.
    pub ratio: f64,
    /// Best compression throughput, MB/s.
    pub compress_speed_mb_s: f64,
    /// Best decompression throughput, MB/s.
    pub decompress_speed_mb_s: f64,
}

fn speed_mb_s(bytes: usize, elapsed: Duration) -> f64 {
    let secs = elapsed.as_secs_f64();
    if secs <= 0.0 {
        return f64::INFINITY;
    }
    bytes as f64 / MB / secs
}

/// Benchmark `src` over `iterations` timed rounds (at least one).
///
/// Fails with `InvalidData` when a round trip does not reproduce `src`.
pub fn bench_mem(src: &[u8], display_name: &str, iterations: u32) -> io::Result<BenchResult> {
    let iterations = iterations.max(1);
    let reference = xxh64_oneshot(src);

    let mut best_c = Duration::MAX;
    let mut best_d = Duration::MAX;
    let mut compressed_size = 0;

    for round in 1..=iterations {
        let start = Instant::now();
        let compressed = compress(src);
        best_c = best_c.min(start.elapsed());
        compressed_size = compressed.len();

        let start = Instant::now();
        let restored = decompress(&compressed).map_err(|e| {
            io::Error::new(io::ErrorKind::InvalidData, format!("{display_name}: {e}"))
        })?;
        best_d = best_d.min(start.elapsed());

        if xxh64_oneshot(&restored) != reference {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("{display_name}: round trip mismatch in round {round}"),
            ));
        }

        displaylevel!(
            3,
            "{:>2}#{:<17.17} : {:>10} -> {:>10} \r",
            round,
            display_name,
            src.len(),
            compressed_size
        );
    }

    let result = BenchResult {
        src_size: src.len(),
        compressed_size,
        ratio: src.len() as f64 / compressed_size as f64,
        compress_speed_mb_s: speed_mb_s(src.len(), best_c),
        decompress_speed_mb_s: speed_mb_s(src.len(), best_d),
    };

    displaylevel!(
        2,
        "{:<17.17} : {:>10} -> {:>10} ({:5.3}), {:7.1} MB/s, {:7.1} MB/s\n",
        display_name,
        result.src_size,
        result.compressed_size,
        result.ratio,
        result.compress_speed_mb_s,
        result.decompress_speed_mb_s
    );
    Ok(result)
}
