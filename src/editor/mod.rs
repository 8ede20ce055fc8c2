//! Editor module for markbar
//!
//! This module contains the editor-side value types the toolbar engine works
//! on: the selection model, the line index derived from the buffer, and the
//! comment length counter.

mod lines;
mod selection;
mod stats;

pub use lines::{affected_lines, lines_of, LineSpan};
pub use selection::{ResolvedSelection, SelectionRange};
pub use stats::CommentStats;
