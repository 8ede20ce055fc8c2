//! Comment length statistics
//!
//! The host enforces the domain's maximum comment length before it submits
//! a comment. This module gives it the counts it needs for that check and
//! for the "characters remaining" hint under the editor. Characters are
//! counted in UTF-16 code units, the same unit the browser uses for the
//! textarea's `maxlength`.

use crate::string_utils::utf16_len;

// ─────────────────────────────────────────────────────────────────────────────
// CommentStats
// ─────────────────────────────────────────────────────────────────────────────

/// Length statistics for a comment draft.
///
/// # Example
///
/// ```ignore
/// let stats = CommentStats::from_text("Hello, World!", Some(10));
/// assert_eq!(stats.words, 2);
/// assert!(stats.exceeds_limit());
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CommentStats {
    /// Number of words (sequences of non-whitespace characters)
    pub words: usize,
    /// Length in UTF-16 code units
    pub characters: usize,
    /// Number of lines (an empty draft has one)
    pub lines: usize,
    /// Configured maximum length, if the domain sets one
    pub max_length: Option<usize>,
}

impl CommentStats {
    /// Calculate statistics for `text` against an optional length limit.
    pub fn from_text(text: &str, max_length: Option<usize>) -> Self {
        let mut stats = Self {
            max_length,
            lines: 1,
            ..Self::default()
        };

        let mut in_word = false;
        for ch in text.chars() {
            stats.characters += ch.len_utf16();

            if ch == '\n' {
                stats.lines += 1;
            }

            if ch.is_whitespace() {
                in_word = false;
            } else if !in_word {
                in_word = true;
                stats.words += 1;
            }
        }

        debug_assert_eq!(stats.characters, utf16_len(text));
        stats
    }

    /// Characters left before the limit; negative once over it.
    pub fn remaining(&self) -> Option<i64> {
        self.max_length
            .map(|max| max as i64 - self.characters as i64)
    }

    /// Whether the draft is longer than the configured limit.
    pub fn exceeds_limit(&self) -> bool {
        self.remaining().is_some_and(|left| left < 0)
    }

    /// Format the statistics for display under the editor.
    ///
    /// Returns a compact string like "12 words | 80/500 chars"
    pub fn format_compact(&self) -> String {
        match self.max_length {
            Some(max) => format!(
                "{} words | {}/{} chars",
                self.words, self.characters, max
            ),
            None => format!("{} words | {} chars", self.words, self.characters),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
