//! Selection model for the comment editor
//!
//! A selection is a half-open `[start, end)` range of UTF-16 offsets into the
//! editor buffer, the same unit a browser textarea reports through its native
//! selection API. `start == end` is a collapsed cursor.

use std::ops::Range;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::string_utils::{
    byte_to_utf16_index, utf16_len, utf16_to_byte_ceil, utf16_to_byte_floor,
};

// ─────────────────────────────────────────────────────────────────────────────
// SelectionRange
// ─────────────────────────────────────────────────────────────────────────────

/// Half-open selection range in UTF-16 code units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SelectionRange {
    /// First selected offset
    pub start: usize,
    /// One past the last selected offset
    pub end: usize,
}

#[allow(clippy::len_without_is_empty)]
impl SelectionRange {
    /// Create a selection from two offsets, in the order given.
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Create a collapsed cursor at `at`.
    pub const fn collapsed(at: usize) -> Self {
        Self { start: at, end: at }
    }

    /// Whether this is a cursor rather than a range.
    pub fn is_collapsed(&self) -> bool {
        self.start == self.end
    }

    /// Number of selected code units.
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Clamp both offsets into `[0, buffer_len]` and put them in order.
    ///
    /// Out-of-range values are never rejected: they can only come from host
    /// state that is itself bounded by the buffer.
    pub fn normalize(self, buffer_len: usize) -> Self {
        let start = self.start.min(buffer_len);
        let end = self.end.min(buffer_len);
        if start > end {
            Self::new(end, start)
        } else {
            Self::new(start, end)
        }
    }

    /// Normalize against `text` and snap both ends to character boundaries.
    ///
    /// An offset inside a surrogate pair widens the selection to cover the
    /// whole character; a collapsed cursor inside one moves to its start.
    pub fn resolve(self, text: &str) -> ResolvedSelection {
        let sel = self.normalize(utf16_len(text));
        let start_byte = utf16_to_byte_floor(text, sel.start);
        let end_byte = if sel.is_collapsed() {
            start_byte
        } else {
            utf16_to_byte_ceil(text, sel.end)
        };

        ResolvedSelection {
            range: Self::new(
                byte_to_utf16_index(text, start_byte),
                byte_to_utf16_index(text, end_byte),
            ),
            bytes: start_byte..end_byte,
        }
    }
}

impl FromStr for SelectionRange {
    type Err = Error;

    /// Parse `"3"`, `"0,3"` or `"0..3"`.
    ///
    /// Negative numbers are numeric and clamp to zero; anything that is not a
    /// number is an `InvalidSelection`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parse = |part: &str| -> Result<usize, Error> {
            part.trim()
                .parse::<i64>()
                .map(|n| n.max(0) as usize)
                .map_err(|_| Error::InvalidSelection(s.to_string()))
        };

        let trimmed = s.trim();
        let (start, end) = match trimmed.split_once("..").or_else(|| trimmed.split_once(',')) {
            Some((start, end)) => (parse(start)?, parse(end)?),
            None => {
                let at = parse(trimmed)?;
                (at, at)
            }
        };
        Ok(Self::new(start, end))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// ResolvedSelection
// ─────────────────────────────────────────────────────────────────────────────

/// A selection checked against a concrete buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSelection {
    /// Normalized range in UTF-16 code units
    pub range: SelectionRange,
    /// The same range as UTF-8 byte offsets, safe to slice with
    pub bytes: Range<usize>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
