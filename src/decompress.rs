use tracing::{debug, trace};

use crate::error::{Corruption, Error, Result};
use crate::format::{Control, LITERAL_ESCAPE_BIAS, LONG_MATCH_ESCAPE_BIAS, OutputCursor, Token};

/// Outcome of a successful [`decompress`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decompressed {
    /// Compressed bytes consumed, end-of-stream marker included.
    pub consumed: usize,
    /// Bytes written to the output buffer.
    pub written: usize,
}

impl Decompressed {
    /// Bytes of `input` that follow the end-of-stream marker.
    #[must_use]
    pub fn trailing<'a>(&self, input: &'a [u8]) -> &'a [u8] {
        input.get(self.consumed..).unwrap_or_default()
    }
}

/// Bounds-checked read cursor over the compressed frame.
struct Reader<'a> {
    input: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    const fn new(input: &'a [u8]) -> Self {
        Self { input, pos: 0 }
    }

    #[inline]
    const fn remaining(&self) -> usize {
        self.input.len() - self.pos
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8]> {
        let available = self.remaining();
        if len > available {
            return Err(Error::truncated(self.pos, len, available));
        }
        let bytes = &self.input[self.pos..self.pos + len];
        self.pos += len;
        Ok(bytes)
    }

    #[inline]
    fn byte(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    /// Reads a varlen: `0xFF` bytes worth 255 each, ended by a byte below `0xFF`.
    fn varlen(&mut self) -> Result<usize> {
        let mut total: usize = 0;
        loop {
            let b = self.byte()?;
            total = total
                .checked_add(b as usize)
                .ok_or(Error::corrupt(self.pos, Corruption::LengthOverflow))?;
            if b != 0xFF {
                return Ok(total);
            }
        }
    }

    fn distance_u16(&mut self) -> Result<usize> {
        let bytes = self.take(2)?;
        Ok(usize::from(u16::from_le_bytes([bytes[0], bytes[1]])) + 1)
    }

    /// Reads one full token header: control byte, extension bytes and distance.
    ///
    /// The literal payload is left in place for the caller.
    fn token(&mut self) -> Result<Token> {
        if self.remaining() == 0 {
            return Err(Error::corrupt(self.pos, Corruption::MissingEndMarker));
        }

        let token = match Control::parse(self.byte()?) {
            Control::EndOfStream => Token::EndOfStream,
            Control::Literal { run } => Token::Literal { run },
            Control::LiteralExtended => Token::Literal {
                run: biased(self.varlen()?, LITERAL_ESCAPE_BIAS, self.pos)?,
            },
            Control::LongMatch { length } => Token::Match {
                distance: self.distance_u16()?,
                length,
            },
            Control::LongMatchExtended => {
                let length = biased(self.varlen()?, LONG_MATCH_ESCAPE_BIAS, self.pos)?;
                Token::Match {
                    distance: self.distance_u16()?,
                    length,
                }
            }
            Control::ShortMatch {
                length,
                distance_high,
            } => Token::Match {
                distance: ((distance_high << 8) | usize::from(self.byte()?)) + 1,
                length,
            },
        };
        Ok(token)
    }
}

#[inline]
fn biased(value: usize, bias: usize, position: usize) -> Result<usize> {
    value
        .checked_add(bias)
        .ok_or(Error::corrupt(position, Corruption::LengthOverflow))
}

/// Decompresses a single frame from `input` into the caller-provided `output`.
///
/// Decoding stops at the end-of-stream marker; any bytes after it are ignored
/// and can be retrieved with [`Decompressed::trailing`].
///
/// # Errors
/// * [`Error::InvalidArgument`] if `input` is empty.
/// * [`Error::CorruptStream`] on a truncated token, a distance reaching before
///   the start of the output, or a missing end-of-stream marker.
/// * [`Error::OutputOverflow`] when the decoded data does not fit in `output`.
///
/// On error the contents of `output` are unspecified.
pub fn decompress(input: &[u8], output: &mut [u8]) -> Result<Decompressed> {
    if input.is_empty() {
        return Err(Error::InvalidArgument("compressed input is empty"));
    }

    let capacity = output.len();
    decompress_frame(input, output)
        .inspect(|d| {
            trace!(
                consumed = d.consumed,
                written = d.written,
                trailing = input.len() - d.consumed,
                "decompressed frame"
            );
        })
        .inspect_err(|e| {
            debug!(
                input_len = input.len(),
                output_capacity = capacity,
                error = %e,
                "decompression failed"
            );
        })
}

/// Replays tokens until the end-of-stream marker.
///
/// `ReadControlByte -> { EmitLiteralRun | EmitMatch | Halt }`
fn decompress_frame(input: &[u8], output: &mut [u8]) -> Result<Decompressed> {
    let mut reader = Reader::new(input);
    let mut out = OutputCursor::new(output);

    loop {
        let token_pos = reader.pos;
        match reader.token()? {
            Token::Literal { run } => {
                let bytes = reader.take(run)?;
                out.extend(bytes)?;
            }
            Token::Match { distance, length } => {
                let written = out.position();
                if distance == 0 || distance > written {
                    return Err(Error::corrupt(
                        token_pos,
                        Corruption::InvalidDistance { distance, written },
                    ));
                }
                out.copy_back(distance, length)?;
            }
            Token::EndOfStream => break,
        }
    }

    Ok(Decompressed {
        consumed: reader.pos,
        written: out.position(),
    })
}
