use crate::error::{Error, Result};
use crate::format::{MAX_MATCH_LENGTH, MIN_MATCH};

/// Tuning knobs for the match finder.
///
/// Every setting only trades speed against ratio; the frame produced is always
/// decodable by [`decompress`](crate::decompress).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompressorConfig {
    /// Maximum number of hash chain entries inspected per position.
    /// Bounds the worst case at O(N * depth).
    pub max_chain_depth: usize,
    /// Longest single match the encoder emits. Clamped to [`MAX_MATCH_LENGTH`].
    pub max_match_length: usize,
    /// Defer a match by one byte when the next position has a strictly longer one.
    pub lazy_matching: bool,
}

impl CompressorConfig {
    /// Greedy parse that only looks at the most recent candidate.
    pub const FAST: Self = Self {
        max_chain_depth: 1,
        max_match_length: MAX_MATCH_LENGTH,
        lazy_matching: false,
    };

    /// Moderate chain depth with lazy matching.
    pub const DEFAULT: Self = Self {
        max_chain_depth: 16,
        max_match_length: MAX_MATCH_LENGTH,
        lazy_matching: true,
    };

    /// Deep chain walks for the best ratio.
    pub const BEST: Self = Self {
        max_chain_depth: 256,
        max_match_length: MAX_MATCH_LENGTH,
        lazy_matching: true,
    };

    #[must_use]
    pub const fn with_max_chain_depth(mut self, depth: usize) -> Self {
        self.max_chain_depth = depth;
        self
    }

    #[must_use]
    pub const fn with_max_match_length(mut self, length: usize) -> Self {
        self.max_match_length = length;
        self
    }

    #[must_use]
    pub const fn with_lazy_matching(mut self, enabled: bool) -> Self {
        self.lazy_matching = enabled;
        self
    }

    /// Rejects settings the match finder cannot work with.
    pub const fn validate(&self) -> Result<()> {
        if self.max_chain_depth == 0 {
            return Err(Error::InvalidArgument("max_chain_depth must be at least 1"));
        }
        if self.max_match_length < MIN_MATCH {
            return Err(Error::InvalidArgument(
                "max_match_length must be at least the minimum match length",
            ));
        }
        Ok(())
    }

    /// Match length cap actually used by the encoder.
    pub(crate) const fn match_length_limit(&self) -> usize {
        if self.max_match_length > MAX_MATCH_LENGTH {
            MAX_MATCH_LENGTH
        } else {
            self.max_match_length
        }
    }
}

impl Default for CompressorConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}
