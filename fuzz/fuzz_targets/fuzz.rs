#![no_main]

use libfuzzer_sys::fuzz_target;
use lzo_lite::{Error, compress, compress_worst_size, decompress};

/// Verifies that the decompressor safely handles arbitrary, potentially malformed input.
///
/// # Invariant
/// The decompressor must return either `Ok(_)` or `Err(_)` and must **never** panic,
/// whatever the input and whatever the output capacity. A successful decode never
/// reports more bytes than the buffers hold.
fn verify_decompression_robustness(data: &[u8]) {
    // Derive the output capacity from the input so small buffers get exercised too.
    let capacity = data.first().map_or(0, |&b| usize::from(b) * 64);
    let mut output = vec![0u8; capacity];

    if let Ok(res) = decompress(data, &mut output) {
        assert!(res.written <= capacity);
        assert!(res.consumed <= data.len());
    }
}

/// Verifies the lossless round-trip property, with arbitrary trailing bytes.
///
/// # Invariant
/// `decompress(compress(data) ++ suffix) == data`, and exactly the frame is consumed.
///
/// # Panics
/// On any mismatch or on a rejected frame. These panics signal a fuzzing failure.
fn verify_round_trip(data: &[u8]) {
    let mut compressed = vec![0u8; compress_worst_size(data.len())];
    let len = match compress(data, &mut compressed) {
        Ok(len) => len,
        Err(e) => panic!("Compression into a worst-case buffer failed: {e:?}"),
    };
    compressed.truncate(len);
    // Reuse the input as trailing garbage.
    compressed.extend_from_slice(&data[..data.len().min(16)]);

    let mut decompressed = vec![0u8; data.len()];
    match decompress(&compressed, &mut decompressed) {
        Ok(res) => {
            if res.consumed != len || decompressed[..res.written] != *data {
                panic!(
                    "Round-trip mismatch!\nInput len: {}\nFrame len: {}\nConsumed: {}\nDecompressed len: {}",
                    data.len(),
                    len,
                    res.consumed,
                    res.written
                );
            }
        }
        Err(e) => {
            panic!(
                "Round-trip failed! Decompressor rejected valid compressed data.\nError: {:?}\nInput len: {}",
                e,
                data.len()
            );
        }
    }
}

/// Verifies that a one-byte-short output buffer is reported, never overrun.
fn verify_overflow_detection(data: &[u8]) {
    let mut exact = vec![0u8; compress_worst_size(data.len())];
    let Ok(len) = compress(data, &mut exact) else {
        return;
    };
    if len < 2 {
        return;
    }
    let mut short = vec![0u8; len - 1];
    assert!(matches!(
        compress(data, &mut short),
        Err(Error::OutputOverflow { .. })
    ));
}

fuzz_target!(|data: &[u8]| {
    // 1. Robustness: Ensure random noise doesn't crash the decompressor.
    verify_decompression_robustness(data);

    // 2. Correctness: Ensure valid data survives a compress-decompress cycle.
    verify_round_trip(data);

    // 3. Capacity: Ensure undersized buffers fail cleanly.
    verify_overflow_detection(data);
});
