//! Line index over the editor buffer
//!
//! Line-oriented toolbar commands (quote, lists) work on whole lines, so they
//! need to know which lines a character selection touches. The index is
//! derived fresh from the buffer on every call.

use serde::Serialize;

use super::selection::SelectionRange;
use crate::string_utils::utf16_len;

/// One line of the buffer, in UTF-16 code units.
///
/// `end` excludes the trailing newline; the last line ends at the buffer length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LineSpan {
    pub start: usize,
    pub end: usize,
}

impl LineSpan {
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Half-open overlap with a selection.
    ///
    /// A collapsed cursor sitting exactly at the line start also counts.
    pub fn overlaps(&self, sel: SelectionRange) -> bool {
        (self.start < sel.end && sel.start < self.end)
            || (sel.is_collapsed() && sel.start == self.start)
    }

    /// Whether `offset` lies on this line, end included.
    pub fn contains(&self, offset: usize) -> bool {
        self.start <= offset && offset <= self.end
    }
}

/// Split the buffer on `\n` into line spans.
///
/// Always yields at least one span: the empty buffer is one empty line.
pub fn lines_of(buffer: &str) -> Vec<LineSpan> {
    let mut spans = Vec::new();
    let mut line_start = 0;
    let mut offset = 0;

    for ch in buffer.chars() {
        if ch == '\n' {
            spans.push(LineSpan::new(line_start, offset));
            line_start = offset + 1;
        }
        offset += ch.len_utf16();
    }
    spans.push(LineSpan::new(line_start, offset));

    spans
}

/// The lines a selection touches, in buffer order.
///
/// When no line overlaps (a cursor at the end of a line, or a selection that
/// only covers a newline), the line containing `sel.start` is returned so a
/// line command always has somewhere to put its marker.
pub fn affected_lines(buffer: &str, sel: SelectionRange) -> Vec<LineSpan> {
    let sel = sel.normalize(utf16_len(buffer));
    let lines = lines_of(buffer);

    let touched: Vec<LineSpan> = lines
        .iter()
        .copied()
        .filter(|line| line.overlaps(sel))
        .collect();
    if !touched.is_empty() {
        return touched;
    }

    lines
        .into_iter()
        .find(|line| line.contains(sel.start))
        .into_iter()
        .collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
