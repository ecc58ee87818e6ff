//! Frame layout shared by the encoder and the decoder.
//!
//! A frame is a sequence of tokens. Every token starts with a control byte:
//!
//! | Control byte          | Token         | Embedded value                          | Followed by                          |
//! |-----------------------|---------------|-----------------------------------------|--------------------------------------|
//! | `0x00`                | End of stream | -                                       | nothing                              |
//! | `000LLLLL`, L=1..=30  | Literal run   | run = L                                 | `run` raw bytes                      |
//! | `0x1F`                | Literal run   | run = 31 + varlen                       | varlen, raw bytes                    |
//! | `001LLLLL`, L=0..=30  | Long match    | length = L + 3                          | distance (u16 LE)                    |
//! | `0x3F`                | Long match    | length = 34 + varlen                    | varlen, distance (u16 LE)            |
//! | `LLLDDDDD`, LLL=2..=7 | Short match   | length = LLL + 1, distance bits 8..13   | distance bits 0..8                   |
//!
//! Long match distance is `u16 + 1` (1..=65536), short match distance is
//! `((DDDDD << 8) | low) + 1` (1..=8192).
//!
//! `varlen` is zero or more `0xFF` bytes, each worth 255, terminated by a single
//! byte below `0xFF` which is added to the total.
//!
//! ## Worst-case size
//!
//! The encoder only emits a match whose token is strictly shorter than the
//! match, so each match saves at least one byte. A literal run of `r` bytes
//! costs `r + 1` when `r <= 30` and `r + 2 + (r - 31) / 255` otherwise. Every
//! run except the last is followed by a match, which pays back one byte of its
//! header, so a run before a match costs at most `(r + 3) / 34` extra bytes.
//! The last run adds at most `2 + n / 255` and the end marker one more. The
//! frame therefore never exceeds `n + n / 34 + n / 255 + 3` bytes, which
//! [`compress_worst_size`] covers with room to spare.

use crate::error::{Error, Result};

/// Shortest back-reference the encoder emits.
pub const MIN_MATCH: usize = 3;

/// Largest back-reference distance (the window).
pub const MAX_DISTANCE: usize = 1 << 16;

/// Largest length of a single match token produced by the encoder.
pub const MAX_MATCH_LENGTH: usize = 1 << 16;

/// Control byte that terminates a frame.
pub(crate) const END_OF_STREAM: u8 = 0x00;

/// Token class selector (top 3 bits of the control byte).
const CLASS_SHIFT: u32 = 5;
/// Low 5 bits of the control byte.
const EMBEDDED_MASK: u8 = 0x1F;

/// Class of literal runs and the end marker (`000xxxxx`).
const CLASS_LITERAL: u8 = 0;
/// Class of long matches (`001xxxxx`); classes 2..=7 are short matches.
const CLASS_LONG_MATCH: u8 = 1;

/// Longest literal run whose length fits in the control byte.
pub(crate) const LITERAL_INLINE_MAX: usize = 30;
/// Literal control byte announcing a varlen run length.
pub(crate) const LITERAL_ESCAPE: u8 = 0x1F;
/// Added to the varlen of an escaped literal run.
pub(crate) const LITERAL_ESCAPE_BIAS: usize = 31;

/// Class bits of a long match control byte (`001LLLLL`).
pub(crate) const LONG_MATCH_TAG: u8 = CLASS_LONG_MATCH << CLASS_SHIFT;
/// Long match control byte announcing a varlen match length.
pub(crate) const LONG_MATCH_ESCAPE: u8 = LONG_MATCH_TAG | EMBEDDED_MASK;
/// Longest match whose length fits in a long match control byte.
pub(crate) const LONG_MATCH_INLINE_MAX: usize = 33;
/// Added to the varlen of an escaped long match.
pub(crate) const LONG_MATCH_ESCAPE_BIAS: usize = 34;

/// Longest match the 2-byte short form can encode.
pub(crate) const SHORT_MATCH_MAX_LENGTH: usize = 8;
/// Farthest distance the 2-byte short form can encode (13 bits).
pub(crate) const SHORT_MATCH_MAX_DISTANCE: usize = 1 << 13;

/// Varlen byte worth 255 that continues the length.
const VARLEN_CONTINUE: u8 = 0xFF;

/// Output capacity that is always sufficient to compress `input_len` bytes.
///
/// See the worst-case derivation in the [module docs](self).
#[must_use]
pub const fn compress_worst_size(input_len: usize) -> usize {
    input_len + input_len / 16 + 64 + 3
}

/// A single unit of the compressed stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    /// `run` raw bytes follow the token header.
    Literal { run: usize },
    /// Copy `length` bytes starting `distance` bytes behind the write cursor.
    Match { distance: usize, length: usize },
    EndOfStream,
}

impl Token {
    /// Number of bytes the token occupies in a frame, literal payload included.
    #[must_use]
    pub const fn encoded_len(&self) -> usize {
        match *self {
            Self::EndOfStream => 1,
            Self::Literal { run } => {
                if run <= LITERAL_INLINE_MAX {
                    1 + run
                } else {
                    1 + varlen_size(run - LITERAL_ESCAPE_BIAS) + run
                }
            }
            Self::Match { distance, length } => {
                if length <= SHORT_MATCH_MAX_LENGTH && distance <= SHORT_MATCH_MAX_DISTANCE {
                    2
                } else if length <= LONG_MATCH_INLINE_MAX {
                    3
                } else {
                    3 + varlen_size(length - LONG_MATCH_ESCAPE_BIAS)
                }
            }
        }
    }
}

/// Meaning of a control byte before its extension bytes are read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Control {
    EndOfStream,
    Literal { run: usize },
    LiteralExtended,
    LongMatch { length: usize },
    LongMatchExtended,
    ShortMatch { length: usize, distance_high: usize },
}

impl Control {
    pub(crate) const fn parse(byte: u8) -> Self {
        let embedded = (byte & EMBEDDED_MASK) as usize;
        match byte >> CLASS_SHIFT {
            CLASS_LITERAL => match byte {
                END_OF_STREAM => Self::EndOfStream,
                LITERAL_ESCAPE => Self::LiteralExtended,
                _ => Self::Literal { run: embedded },
            },
            CLASS_LONG_MATCH => {
                if byte == LONG_MATCH_ESCAPE {
                    Self::LongMatchExtended
                } else {
                    Self::LongMatch {
                        length: embedded + MIN_MATCH,
                    }
                }
            }
            class => Self::ShortMatch {
                length: class as usize + 1,
                distance_high: embedded,
            },
        }
    }
}

/// Bytes needed to store `value` as a varlen.
#[inline]
const fn varlen_size(value: usize) -> usize {
    value / VARLEN_CONTINUE as usize + 1
}

/// Write cursor over a caller-owned buffer. Every write is checked against the
/// remaining capacity before any byte is touched.
pub(crate) struct OutputCursor<'a> {
    buf: &'a mut [u8],
    pos: usize,
}

impl<'a> OutputCursor<'a> {
    pub(crate) const fn new(buf: &'a mut [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Bytes written so far.
    #[inline]
    pub(crate) const fn position(&self) -> usize {
        self.pos
    }

    #[inline]
    pub(crate) const fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    /// Fails with `OutputOverflow` unless `needed` more bytes fit.
    #[inline]
    pub(crate) const fn ensure(&self, needed: usize) -> Result<()> {
        let available = self.remaining();
        if needed > available {
            return Err(Error::OutputOverflow {
                position: self.pos,
                needed,
                available,
            });
        }
        Ok(())
    }

    #[inline]
    pub(crate) fn push(&mut self, byte: u8) -> Result<()> {
        self.ensure(1)?;
        self.buf[self.pos] = byte;
        self.pos += 1;
        Ok(())
    }

    pub(crate) fn extend(&mut self, bytes: &[u8]) -> Result<()> {
        self.ensure(bytes.len())?;
        self.buf[self.pos..self.pos + bytes.len()].copy_from_slice(bytes);
        self.pos += bytes.len();
        Ok(())
    }

    pub(crate) fn put_varlen(&mut self, mut value: usize) -> Result<()> {
        self.ensure(varlen_size(value))?;
        while value >= VARLEN_CONTINUE as usize {
            self.push(VARLEN_CONTINUE)?;
            value -= VARLEN_CONTINUE as usize;
        }
        self.push(value as u8)
    }

    /// Replays `length` bytes starting `distance` bytes behind the cursor.
    ///
    /// The caller guarantees `1 <= distance <= position()`. Overlapping copies
    /// are done in chunks of at most `distance` bytes so every chunk reads only
    /// bytes that are already final.
    pub(crate) fn copy_back(&mut self, distance: usize, length: usize) -> Result<()> {
        debug_assert!(distance >= 1 && distance <= self.pos);
        self.ensure(length)?;

        // RLE fast path
        if distance == 1 {
            let byte = self.buf[self.pos - 1];
            self.buf[self.pos..self.pos + length].fill(byte);
            self.pos += length;
            return Ok(());
        }

        let mut remaining = length;
        while remaining > 0 {
            let chunk = remaining.min(distance);
            let src = self.pos - distance;
            self.buf.copy_within(src..src + chunk, self.pos);
            self.pos += chunk;
            remaining -= chunk;
        }
        Ok(())
    }
}
