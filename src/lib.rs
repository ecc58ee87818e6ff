//! # LZO-style Compression
//!
//! `lzo-lite` is a safe, pure-Rust byte-oriented LZ77 codec in the LZO family:
//! a hash-chain match finder feeding a compact token format of literal runs and
//! back-references, with no entropy coding.
//!
//! Both directions work on caller-owned buffers. Nothing is ever reallocated; a
//! buffer that is too small is reported as [`Error::OutputOverflow`]. Size the
//! compression output with [`compress_worst_size`].
//!
//! The frame layout is documented in [`format`].
//!
//! ## Example
//!
//! ```rust
//! use lzo_lite::{compress, compress_worst_size, decompress};
//!
//! let data = b"hello world; hello world; hello world;";
//!
//! let mut compressed = vec![0u8; compress_worst_size(data.len())];
//! let len = compress(data, &mut compressed).expect("Compression failed");
//!
//! // Bytes after the frame are ignored.
//! let mut framed = compressed[..len].to_vec();
//! framed.extend_from_slice(b"hello");
//!
//! let mut output = [0u8; 100];
//! let result = decompress(&framed, &mut output).expect("Decompression failed");
//! assert_eq!(&output[..result.written], data);
//! assert_eq!(result.trailing(&framed), b"hello");
//! ```

#![no_std]
#![forbid(unsafe_code)]

extern crate alloc;

pub mod compress;
pub mod config;
pub mod decompress;
pub mod error;
pub mod format;
mod matcher;

pub use compress::{Compressor, compress, compress_with_config};
pub use config::CompressorConfig;
pub use decompress::{Decompressed, decompress};
pub use error::{Corruption, Error, Result};
pub use format::{MAX_DISTANCE, MAX_MATCH_LENGTH, MIN_MATCH, Token, compress_worst_size};

#[cfg(test)]
mod tests {
    use alloc::vec;
    use alloc::vec::Vec;

    use super::{Error, compress, compress_worst_size, decompress};

    fn round_trip(original: &[u8]) -> Vec<u8> {
        let mut compressed = vec![0u8; compress_worst_size(original.len())];
        let len = compress(original, &mut compressed).unwrap();

        let mut decompressed = vec![0u8; original.len()];
        let res = decompress(&compressed[..len], &mut decompressed).unwrap();
        assert_eq!(res.consumed, len);
        decompressed.truncate(res.written);
        decompressed
    }

    #[test]
    fn test_round_trip() {
        let original = b"Hello world repeated Hello world repeated Hello world repeated";
        assert_eq!(round_trip(original), original);
    }

    #[test]
    fn test_compress_rle() {
        let original = vec![b'A'; 100];
        let mut compressed = vec![0u8; compress_worst_size(original.len())];
        let len = compress(&original, &mut compressed).unwrap();

        // Literal + one long match + marker.
        assert!(len < 10);
        assert_eq!(round_trip(&original), original);
    }

    #[test]
    fn test_incompressible() {
        // Literal escape (1) + varlen (1) + 200 bytes + marker (1).
        let original: Vec<u8> = (0..200).map(|i| (i * 7) as u8).collect();
        let mut compressed = vec![0u8; compress_worst_size(original.len())];
        let len = compress(&original, &mut compressed).unwrap();
        assert_eq!(len, 203);
        assert_eq!(round_trip(&original), original);
    }

    #[test]
    fn test_decompress_into_short_buffer() {
        let original = vec![b'A'; 100];
        let mut compressed = vec![0u8; compress_worst_size(original.len())];
        let len = compress(&original, &mut compressed).unwrap();

        let mut small = [0u8; 50];
        assert!(matches!(
            decompress(&compressed[..len], &mut small),
            Err(Error::OutputOverflow { .. })
        ));
    }
}
