//! Cheap set-membership filters derived from the reference string.
//!
//! Both filters answer the same question: does the candidate contain so many
//! symbols that never occur in the reference that it cannot possibly lie
//! within the distance bound? Every such symbol costs at least one edit, so
//! counting them gives a lower bound on the distance. The filters only ever
//! prune work; a disabled filter is always correct, just slower.

use tracing::debug;

use crate::error::MatchError;

/// A reference alphabet with more distinct bytes than this rarely prunes
/// enough candidates to pay for the per-candidate pass.
const MAX_UNIQUE_BYTES: usize = 45;

/// The codepoint bitmap is capped at 64 KiB; a reference whose codepoint span
/// needs more than that disables the filter instead.
const MAX_BITMAP_BYTES: usize = 0x10000;

/// Presence bitmap over byte values, for byte-oriented matchers.
#[derive(Debug, Clone)]
pub(crate) struct ByteAlphabet {
    present: [bool; 0x100],
    enabled: bool,
}

impl ByteAlphabet {
    pub(crate) fn build(reference: &[u8]) -> Self {
        let mut present = [false; 0x100];
        let mut unique = 0usize;
        for &b in reference {
            if !present[usize::from(b)] {
                present[usize::from(b)] = true;
                unique += 1;
            }
        }
        let enabled = unique <= MAX_UNIQUE_BYTES;
        if !enabled {
            debug!(unique, "byte alphabet filter disabled");
        }
        ByteAlphabet { present, enabled }
    }

    pub(crate) fn enabled(&self) -> bool {
        self.enabled
    }

    /// True if the candidate cannot be within `max_distance` of the
    /// reference: the count of candidate bytes absent from the reference
    /// already exceeds the bound.
    pub(crate) fn reject(&self, candidate: &[u8], max_distance: usize) -> bool {
        let mut misses = 0usize;
        for &b in candidate {
            if !self.present[usize::from(b)] {
                misses += 1;
                if misses > max_distance {
                    return true;
                }
            }
        }
        false
    }
}

/// Range-bounded presence bitmap over codepoints, for codepoint-oriented
/// matchers.
#[derive(Debug, Clone)]
pub(crate) struct CodepointAlphabet {
    min: i32,
    max: i32,
    bitmap: Vec<u8>,
    enabled: bool,
}

impl CodepointAlphabet {
    /// Builds the bitmap over `[min, max]` of the reference codepoints.
    ///
    /// A span too wide for [`MAX_BITMAP_BYTES`] disables the filter rather
    /// than failing; only a genuine allocation failure is an error.
    pub(crate) fn build(reference: &[i32]) -> Result<Self, MatchError> {
        let disabled = CodepointAlphabet {
            min: 0,
            max: 0,
            bitmap: Vec::new(),
            enabled: false,
        };

        let (Some(&min), Some(&max)) = (reference.iter().min(), reference.iter().max()) else {
            return Ok(disabled);
        };

        let size = (max - min) as usize / 8 + 1;
        if size >= MAX_BITMAP_BYTES {
            debug!(min, max, size, "codepoint alphabet filter disabled");
            return Ok(disabled);
        }

        let mut bitmap = Vec::new();
        bitmap.try_reserve_exact(size)?;
        bitmap.resize(size, 0u8);
        for &cp in reference {
            let offset = (cp - min) as usize;
            bitmap[offset / 8] |= 1 << (offset % 8);
        }
        Ok(CodepointAlphabet {
            min,
            max,
            bitmap,
            enabled: true,
        })
    }

    pub(crate) fn enabled(&self) -> bool {
        self.enabled
    }

    fn contains(&self, cp: i32) -> bool {
        if cp < self.min || cp > self.max {
            return false;
        }
        let offset = (cp - self.min) as usize;
        self.bitmap[offset / 8] & (1 << (offset % 8)) != 0
    }

    /// True if the candidate cannot lie strictly within `bound`: the count of
    /// candidate codepoints missing from the reference reaches `bound`.
    pub(crate) fn reject(&self, candidate: &[i32], bound: usize) -> bool {
        let mut misses = 0usize;
        for &cp in candidate {
            if !self.contains(cp) {
                misses += 1;
                if misses >= bound {
                    return true;
                }
            }
        }
        false
    }
}
