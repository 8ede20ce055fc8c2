//! markbar - comment editor formatting toolbar and Markdown preview
//!
//! Two pure, synchronous entry points:
//!
//! - [`apply_command`] rewrites the editor buffer for a toolbar click and
//!   returns the new buffer together with the new selection.
//! - [`render_markdown`] turns the buffer into sanitized preview HTML.
//!
//! Selection offsets are UTF-16 code units, the unit browser textareas use.

pub mod config;
pub mod editor;
pub mod error;
pub mod markdown;
pub mod string_utils;

pub use editor::{CommentStats, LineSpan, SelectionRange};
pub use error::{Error, Result};
pub use markdown::{
    apply_command, apply_format, render_markdown, visible_commands, CommandId, Feature,
    FeatureFlags, FormatResult,
};

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
