use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use lzo_lite::{Compressor, CompressorConfig, compress_worst_size, decompress};
use std::hint::black_box;

/// Block size used by every scenario.
const SIZE: usize = 64 * 1024;

/// Deterministic high-entropy bytes from a fixed-seed LCG.
///
/// Worst case for the match finder: almost every chain walk comes back empty.
fn generate_random(size: usize) -> Vec<u8> {
    let mut seed: u64 = 0xDEAD_BEEF;
    (0..size)
        .map(|_| {
            seed = (seed.wrapping_mul(1_664_525).wrapping_add(1_013_904_223)) & 0xFFFF_FFFF;
            (seed >> 24) as u8
        })
        .collect()
}

/// Repeated sentence, truncated to `size`. Long matches at a single distance.
fn generate_text(size: usize) -> Vec<u8> {
    b"The quick brown fox jumps over the lazy dog. "
        .iter()
        .copied()
        .cycle()
        .take(size)
        .collect()
}

/// Log-like records with varying fields: many short and medium matches at
/// different distances, which exercises chain depth and lazy matching.
fn generate_records(size: usize) -> Vec<u8> {
    let mut out = Vec::with_capacity(size + 64);
    let mut i: u32 = 0;
    while out.len() < size {
        let line = format!(
            "{{\"id\":{i},\"level\":\"{}\",\"shard\":{},\"latency_ms\":{}}}\n",
            ["info", "warn", "debug"][(i % 3) as usize],
            i % 17,
            (i * 7919) % 1000
        );
        out.extend_from_slice(line.as_bytes());
        i += 1;
    }
    out.truncate(size);
    out
}

fn scenarios() -> [(&'static str, Vec<u8>); 4] {
    [
        ("Zeroes", vec![0u8; SIZE]),
        ("Random", generate_random(SIZE)),
        ("Text", generate_text(SIZE)),
        ("Records", generate_records(SIZE)),
    ]
}

/// Benchmarks compression with the default configuration.
fn bench_compression(c: &mut Criterion) {
    let mut group = c.benchmark_group("Compression");

    for (name, input_data) in &scenarios() {
        group.throughput(Throughput::Bytes(SIZE as u64));
        group.bench_function(format!("{name} 64KB"), |b| {
            // Reuse the context and output so only the codec is measured.
            let mut ctx = Compressor::new();
            let mut output = vec![0u8; compress_worst_size(SIZE)];
            b.iter(|| {
                ctx.compress(black_box(input_data), black_box(&mut output))
                    .unwrap()
            });
        });
    }

    group.finish();
}

/// Compares the match finder presets on the records corpus.
fn bench_presets(c: &mut Criterion) {
    let mut group = c.benchmark_group("Compression Presets");
    let input_data = generate_records(SIZE);

    for (name, config) in [
        ("Fast", CompressorConfig::FAST),
        ("Default", CompressorConfig::DEFAULT),
        ("Best", CompressorConfig::BEST),
    ] {
        group.throughput(Throughput::Bytes(SIZE as u64));
        group.bench_function(name, |b| {
            let mut ctx = Compressor::with_config(config).unwrap();
            let mut output = vec![0u8; compress_worst_size(SIZE)];
            b.iter(|| {
                ctx.compress(black_box(&input_data), black_box(&mut output))
                    .unwrap()
            });
        });
    }

    group.finish();
}

/// Benchmarks decompression.
///
/// Throughput is reported against the uncompressed size.
fn bench_decompression(c: &mut Criterion) {
    let mut group = c.benchmark_group("Decompression");

    for (name, source_data) in &scenarios() {
        let mut compressed_data = vec![0u8; compress_worst_size(SIZE)];
        let len = Compressor::new()
            .compress(source_data, &mut compressed_data)
            .unwrap();
        compressed_data.truncate(len);

        group.throughput(Throughput::Bytes(SIZE as u64));
        group.bench_function(format!("{name} 64KB"), |b| {
            let mut output = vec![0u8; SIZE];
            b.iter(|| {
                // Unwrap so a decoding failure fails the benchmark.
                decompress(black_box(&compressed_data), black_box(&mut output)).unwrap()
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_compression, bench_presets, bench_decompression);
criterion_main!(benches);
