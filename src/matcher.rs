use alloc::vec;
use alloc::vec::Vec;

use crate::format::{MAX_DISTANCE, MIN_MATCH};

/// Hash table size in bits (16K heads).
const HASH_BITS: u32 = 14;
const HASH_SIZE: usize = 1 << HASH_BITS;

/// The `prev` chain is a ring covering exactly one window.
const WINDOW_MASK: usize = MAX_DISTANCE - 1;

/// Marker for an empty head or chain slot.
const EMPTY_ENTRY: usize = usize::MAX;

/// A verified back-reference candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Match {
    pub(crate) distance: usize,
    pub(crate) length: usize,
}

/// Hash-chain match finder.
///
/// `head` maps a 3-byte prefix hash to the most recent position with that hash,
/// `prev` maps a position (modulo the window) to the previous position that shared
/// its hash. Chains are walked newest first, so among equally long matches the
/// closest one wins.
pub(crate) struct MatchFinder {
    head: Vec<usize>,
    prev: Vec<usize>,
}

impl MatchFinder {
    pub(crate) fn new() -> Self {
        Self {
            head: vec![EMPTY_ENTRY; HASH_SIZE],
            prev: vec![EMPTY_ENTRY; MAX_DISTANCE],
        }
    }

    /// Forgets every position from a previous input.
    ///
    /// `prev` is only reachable through `head`, and every `prev` slot reached
    /// from a fresh head has been rewritten during the current input.
    pub(crate) fn reset(&mut self) {
        self.head.fill(EMPTY_ENTRY);
    }

    /// Records `pos` so later positions can reference it.
    ///
    /// Must be called for every position in increasing order, matched bytes
    /// included, so that overlapping matches are found.
    #[inline]
    pub(crate) fn insert(&mut self, input: &[u8], pos: usize) {
        if let Some(h) = prefix_hash(input, pos) {
            self.prev[pos & WINDOW_MASK] = self.head[h];
            self.head[h] = pos;
        }
    }

    /// Finds the longest earlier occurrence of the bytes at `pos`, capped at
    /// `max_length`, inspecting at most `max_depth` candidates.
    ///
    /// Returns `None` when nothing of at least [`MIN_MATCH`] bytes is found or
    /// when fewer than [`MIN_MATCH`] bytes remain.
    pub(crate) fn find(
        &self,
        input: &[u8],
        pos: usize,
        max_length: usize,
        max_depth: usize,
    ) -> Option<Match> {
        let h = prefix_hash(input, pos)?;
        let limit = (input.len() - pos).min(max_length);
        if limit < MIN_MATCH {
            return None;
        }

        let mut best = Match {
            distance: 0,
            length: 0,
        };
        let mut candidate = self.head[h];
        let mut depth = 0;

        while candidate != EMPTY_ENTRY && depth < max_depth {
            if candidate >= pos {
                break;
            }
            let distance = pos - candidate;
            if distance > MAX_DISTANCE {
                break;
            }

            // Fail fast on the byte that would have to extend the current best.
            if input[candidate + best.length] == input[pos + best.length] {
                let length = common_prefix_len(&input[pos..], &input[candidate..], limit);
                if length > best.length {
                    best = Match { distance, length };
                    if length == limit {
                        break;
                    }
                }
            }

            let next = self.prev[candidate & WINDOW_MASK];
            if next != EMPTY_ENTRY && next >= candidate {
                break;
            }
            candidate = next;
            depth += 1;
        }

        (best.length >= MIN_MATCH).then_some(best)
    }
}

/// Multiplicative hash of the 3 bytes at `pos`, or `None` near the end of input.
#[inline]
fn prefix_hash(input: &[u8], pos: usize) -> Option<usize> {
    let bytes = input.get(pos..pos.checked_add(MIN_MATCH)?)?;
    let v = u32::from(bytes[0]) | (u32::from(bytes[1]) << 8) | (u32::from(bytes[2]) << 16);
    Some((v.wrapping_mul(2_654_435_761) >> (32 - HASH_BITS)) as usize)
}

/// Finds the length of the common prefix between two slices, up to `max`.
#[inline]
fn common_prefix_len(a: &[u8], b: &[u8], max: usize) -> usize {
    let limit = a.len().min(b.len()).min(max);
    let mut len = 0;
    while len < limit && a[len] == b[len] {
        len += 1;
    }
    len
}
