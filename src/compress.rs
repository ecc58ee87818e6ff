use tracing::{debug, trace};

use crate::config::CompressorConfig;
use crate::error::{Error, Result};
use crate::format::{
    END_OF_STREAM, LITERAL_ESCAPE, LITERAL_ESCAPE_BIAS, LITERAL_INLINE_MAX, LONG_MATCH_ESCAPE,
    LONG_MATCH_ESCAPE_BIAS, LONG_MATCH_INLINE_MAX, LONG_MATCH_TAG, MAX_DISTANCE, MIN_MATCH,
    OutputCursor, SHORT_MATCH_MAX_DISTANCE, SHORT_MATCH_MAX_LENGTH, Token,
};
use crate::matcher::{Match, MatchFinder};

/// Serializes tokens into a caller-owned buffer.
///
/// Each token's full size is checked against the remaining capacity before its
/// first byte is written, so an overflow never leaves a half-written token.
struct TokenWriter<'a> {
    out: OutputCursor<'a>,
}

impl<'a> TokenWriter<'a> {
    const fn new(output: &'a mut [u8]) -> Self {
        Self {
            out: OutputCursor::new(output),
        }
    }

    /// Writes a literal run token followed by its payload. Empty runs are skipped.
    fn literal(&mut self, run: &[u8]) -> Result<()> {
        if run.is_empty() {
            return Ok(());
        }
        self.out.ensure(Token::Literal { run: run.len() }.encoded_len())?;

        if run.len() <= LITERAL_INLINE_MAX {
            self.out.push(run.len() as u8)?;
        } else {
            self.out.push(LITERAL_ESCAPE)?;
            self.out.put_varlen(run.len() - LITERAL_ESCAPE_BIAS)?;
        }
        self.out.extend(run)
    }

    /// Writes a match token, using the 2-byte short form whenever it fits.
    fn matched(&mut self, m: Match) -> Result<()> {
        debug_assert!(m.length >= MIN_MATCH);
        debug_assert!(m.distance >= 1 && m.distance <= MAX_DISTANCE);

        let token = Token::Match {
            distance: m.distance,
            length: m.length,
        };
        self.out.ensure(token.encoded_len())?;

        let offset = m.distance - 1;
        if m.length <= SHORT_MATCH_MAX_LENGTH && m.distance <= SHORT_MATCH_MAX_DISTANCE {
            // LLLDDDDD dddddddd
            self.out.push((((m.length - 1) << 5) | (offset >> 8)) as u8)?;
            return self.out.push(offset as u8);
        }

        if m.length <= LONG_MATCH_INLINE_MAX {
            self.out.push(LONG_MATCH_TAG | (m.length - MIN_MATCH) as u8)?;
        } else {
            self.out.push(LONG_MATCH_ESCAPE)?;
            self.out.put_varlen(m.length - LONG_MATCH_ESCAPE_BIAS)?;
        }
        self.out.extend(&(offset as u16).to_le_bytes())
    }

    /// Terminates the frame and returns its total length.
    fn finish(mut self) -> Result<usize> {
        self.out.push(END_OF_STREAM)?;
        Ok(self.out.position())
    }
}

/// Whether the match token is strictly shorter than the bytes it replaces.
///
/// Only a length-3 match beyond the short-form window fails this; its 3-byte
/// long form saves nothing and would split the surrounding literal run.
fn pays_off(m: &Match) -> bool {
    Token::Match {
        distance: m.distance,
        length: m.length,
    }
    .encoded_len()
        < m.length
}

/// Reusable compression state.
///
/// Holds the heap-allocated match finder tables so repeated calls do not
/// allocate. The tables are reset at the start of every call; nothing from a
/// previous input can leak into the next frame.
pub struct Compressor {
    config: CompressorConfig,
    finder: MatchFinder,
}

impl Default for Compressor {
    fn default() -> Self {
        Self::new()
    }
}

impl Compressor {
    /// Creates a context with [`CompressorConfig::DEFAULT`].
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: CompressorConfig::DEFAULT,
            finder: MatchFinder::new(),
        }
    }

    /// Creates a context with custom settings.
    ///
    /// # Errors
    /// [`Error::InvalidArgument`] when the configuration fails
    /// [`CompressorConfig::validate`].
    pub fn with_config(config: CompressorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            finder: MatchFinder::new(),
        })
    }

    #[must_use]
    pub const fn config(&self) -> &CompressorConfig {
        &self.config
    }

    /// Compresses `input` into `output` and returns the frame length.
    ///
    /// `output[..len]` holds a complete frame terminated by the end-of-stream
    /// marker. An `output` of [`compress_worst_size`](crate::compress_worst_size)
    /// bytes always suffices.
    ///
    /// # Errors
    /// * [`Error::InvalidArgument`] if `output` is empty.
    /// * [`Error::OutputOverflow`] as soon as a token does not fit. The contents
    ///   of `output` are unspecified in that case.
    pub fn compress(&mut self, input: &[u8], output: &mut [u8]) -> Result<usize> {
        if output.is_empty() {
            return Err(Error::InvalidArgument("output buffer has zero capacity"));
        }

        self.compress_frame(input, output)
            .inspect(|len| {
                trace!(
                    input_len = input.len(),
                    compressed_len = *len,
                    "compressed frame"
                );
            })
            .inspect_err(|e| {
                debug!(
                    input_len = input.len(),
                    output_capacity = output.len(),
                    error = %e,
                    "compression failed"
                );
            })
    }

    fn compress_frame(&mut self, input: &[u8], output: &mut [u8]) -> Result<usize> {
        self.finder.reset();
        let max_length = self.config.match_length_limit();
        let depth = self.config.max_chain_depth;

        let mut writer = TokenWriter::new(output);
        let mut literal_start = 0;
        let mut pos = 0;

        while pos < input.len() {
            // --- 1. Find Best Match ---
            let Some(found) = self
                .finder
                .find(input, pos, max_length, depth)
                .filter(pays_off)
            else {
                self.finder.insert(input, pos);
                pos += 1;
                continue;
            };
            self.finder.insert(input, pos);

            // --- 2. Lazy Evaluation ---
            // A strictly longer match one byte later is worth a literal.
            if self.config.lazy_matching {
                if let Some(next) = self
                    .finder
                    .find(input, pos + 1, max_length, depth)
                    .filter(pays_off)
                {
                    if next.length > found.length {
                        pos += 1;
                        continue;
                    }
                }
            }

            // --- 3. Encode Pending Literals and the Match ---
            writer.literal(&input[literal_start..pos])?;
            writer.matched(found)?;

            // Index every covered position so later matches can overlap this one.
            for covered in pos + 1..pos + found.length {
                self.finder.insert(input, covered);
            }
            pos += found.length;
            literal_start = pos;
        }

        writer.literal(&input[literal_start..])?;
        writer.finish()
    }
}

/// Compresses `input` into the caller-provided `output` buffer using default settings.
///
/// Returns the number of bytes written. See [`Compressor::compress`].
///
/// # Errors
/// [`Error::OutputOverflow`] when `output` is too small, [`Error::InvalidArgument`]
/// when it is empty.
pub fn compress(input: &[u8], output: &mut [u8]) -> Result<usize> {
    Compressor::new().compress(input, output)
}

/// Like [`compress`], with explicit match finder settings.
///
/// # Errors
/// [`Error::InvalidArgument`] for an invalid `config`, otherwise as [`compress`].
pub fn compress_with_config(
    input: &[u8],
    output: &mut [u8],
    config: CompressorConfig,
) -> Result<usize> {
    Compressor::with_config(config)?.compress(input, output)
}
