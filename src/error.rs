use thiserror::Error;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The caller-provided output buffer is too small. Retrying with a larger
    /// buffer may succeed.
    #[error("Output buffer overflow at {position}: needed {needed} bytes, {available} available")]
    OutputOverflow {
        position: usize,
        needed: usize,
        available: usize,
    },

    #[error("Corrupt stream at byte {position}: {kind}")]
    CorruptStream { position: usize, kind: Corruption },

    #[error("Invalid argument: {0}")]
    InvalidArgument(&'static str),
}

/// Reason a compressed frame was rejected.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Corruption {
    #[error("truncated token, needed {needed} bytes, {available} available")]
    Truncated { needed: usize, available: usize },

    #[error("match distance {distance} exceeds {written} bytes written")]
    InvalidDistance { distance: usize, written: usize },

    #[error("no end-of-stream marker")]
    MissingEndMarker,

    #[error("length counter overflow")]
    LengthOverflow,
}

impl Error {
    pub(crate) const fn corrupt(position: usize, kind: Corruption) -> Self {
        Self::CorruptStream { position, kind }
    }

    pub(crate) const fn truncated(position: usize, needed: usize, available: usize) -> Self {
        Self::corrupt(position, Corruption::Truncated { needed, available })
    }
}
