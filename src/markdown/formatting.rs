//! Markdown Formatting Operations
//!
//! This module applies toolbar commands to the plain-text comment buffer.
//! Every command returns the new buffer *and* the new selection, so the host
//! can write both back into its textarea in one step.
//!
//! All offsets are UTF-16 code units (see [`crate::string_utils`]).
//!
//! # Usage
//! ```ignore
//! use markbar::{apply_command, FeatureFlags, SelectionRange};
//!
//! let result = apply_command(
//!     "bold",
//!     "foo",
//!     SelectionRange::new(0, 3),
//!     &FeatureFlags::default(),
//! )?;
//! assert_eq!(result.text, "**foo**");
//! assert_eq!(result.selection, SelectionRange::collapsed(7));
//! ```

use log::trace;
use serde::Serialize;
use std::ops::Range;

use super::commands::{CommandId, CommandKind};
use super::features::FeatureFlags;
use crate::editor::{affected_lines, ResolvedSelection, SelectionRange};
use crate::error::{Error, Result};
use crate::string_utils::{utf16_len, utf16_to_byte_floor};

// ─────────────────────────────────────────────────────────────────────────────
// Format Result
// ─────────────────────────────────────────────────────────────────────────────

/// Result of applying a formatting command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormatResult {
    /// The new buffer after formatting
    pub text: String,
    /// The new selection, in UTF-16 code units
    pub selection: SelectionRange,
}

impl FormatResult {
    /// Create a result with a collapsed cursor.
    pub fn with_cursor(text: String, cursor: usize) -> Self {
        Self {
            text,
            selection: SelectionRange::collapsed(cursor),
        }
    }

    /// Create a result with a selection range.
    pub fn with_selection(text: String, start: usize, end: usize) -> Self {
        Self {
            text,
            selection: SelectionRange::new(start, end),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Entry Points
// ─────────────────────────────────────────────────────────────────────────────

/// Apply the toolbar command named `command_id`.
///
/// # Errors
/// - `Error::UnknownCommand` if `command_id` names no command
/// - `Error::CommandDisabled` if the command's feature is off in `flags`
///
/// On error the buffer is left untouched: nothing is returned but the error.
pub fn apply_command(
    command_id: &str,
    buffer: &str,
    selection: SelectionRange,
    flags: &FeatureFlags,
) -> Result<FormatResult> {
    let id: CommandId = command_id.parse()?;
    apply_format(id, buffer, selection, flags)
}

/// Apply a toolbar command to `buffer` with the host's current `selection`.
///
/// The selection is clamped and ordered first; it is never rejected.
pub fn apply_format(
    id: CommandId,
    buffer: &str,
    selection: SelectionRange,
    flags: &FeatureFlags,
) -> Result<FormatResult> {
    if let Some(feature) = id.required_feature() {
        if !flags.allows(feature) {
            return Err(Error::CommandDisabled {
                command: id.as_str(),
                feature: feature.name(),
            });
        }
    }

    let sel = selection.resolve(buffer);
    let result = match id.command().kind {
        CommandKind::InlineWrap {
            left,
            right,
            placeholder,
        } => apply_inline_wrap(buffer, &sel, left, right, placeholder),
        CommandKind::LinkLike { placeholder, url } => apply_link(buffer, &sel, placeholder, url),
        CommandKind::ImageLike { url } => apply_image(buffer, &sel, url),
        CommandKind::Table { heading, cell } => apply_table(buffer, &sel, heading, cell),
        CommandKind::LinePrefix { marker } => apply_line_prefix(buffer, &sel, marker),
    };

    trace!(
        "{}: [{}, {}) -> [{}, {})",
        id,
        sel.range.start,
        sel.range.end,
        result.selection.start,
        result.selection.end
    );
    Ok(result)
}

// ─────────────────────────────────────────────────────────────────────────────
// Per-Kind Algorithms
// ─────────────────────────────────────────────────────────────────────────────

/// Replace `bytes` of `buffer` with `insert`.
fn splice(buffer: &str, bytes: Range<usize>, insert: &str) -> String {
    let mut text = String::with_capacity(buffer.len() + insert.len());
    text.push_str(&buffer[..bytes.start]);
    text.push_str(insert);
    text.push_str(&buffer[bytes.end..]);
    text
}

/// Bold, italic, strikethrough and code.
///
/// A cursor gets a selected placeholder; a selection is wrapped and the
/// cursor lands after the closing marker.
fn apply_inline_wrap(
    buffer: &str,
    sel: &ResolvedSelection,
    left: &str,
    right: &str,
    placeholder: &str,
) -> FormatResult {
    let start = sel.range.start;

    if sel.range.is_collapsed() {
        let text = splice(buffer, sel.bytes.clone(), &[left, placeholder, right].concat());
        let from = start + utf16_len(left);
        return FormatResult::with_selection(text, from, from + utf16_len(placeholder));
    }

    let selected = &buffer[sel.bytes.clone()];
    let text = splice(buffer, sel.bytes.clone(), &[left, selected, right].concat());
    let cursor = start + utf16_len(left) + sel.range.len() + utf16_len(right);
    FormatResult::with_cursor(text, cursor)
}

/// `[label](url)`.
///
/// Without a selection the placeholder label is selected; with one, the
/// selection becomes the label and the URL is selected next.
fn apply_link(buffer: &str, sel: &ResolvedSelection, placeholder: &str, url: &str) -> FormatResult {
    let start = sel.range.start;

    if sel.range.is_collapsed() {
        let text = splice(
            buffer,
            sel.bytes.clone(),
            &["[", placeholder, "](", url, ")"].concat(),
        );
        return FormatResult::with_selection(text, start + 1, start + 1 + utf16_len(placeholder));
    }

    let label = &buffer[sel.bytes.clone()];
    let text = splice(buffer, sel.bytes.clone(), &["[", label, "](", url, ")"].concat());
    let url_start = start + 1 + sel.range.len() + 2;
    FormatResult::with_selection(text, url_start, url_start + utf16_len(url))
}

/// `![](url)`.
///
/// The selection is taken as the URL, not the alt text, so there is nothing
/// left to fill in and the cursor collapses after the image.
fn apply_image(buffer: &str, sel: &ResolvedSelection, url: &str) -> FormatResult {
    let start = sel.range.start;

    if sel.range.is_collapsed() {
        let text = splice(buffer, sel.bytes.clone(), &["![](", url, ")"].concat());
        return FormatResult::with_selection(text, start + 4, start + 4 + utf16_len(url));
    }

    let selected = &buffer[sel.bytes.clone()];
    let text = splice(buffer, sel.bytes.clone(), &["![](", selected, ")"].concat());
    FormatResult::with_cursor(text, start + 4 + sel.range.len() + 1)
}

/// Build the two-column table template.
///
/// Column widths follow the heading placeholder, whatever replaces the first
/// heading.
fn table_block(first_heading: &str, heading: &str, cell: &str) -> String {
    let width = heading.len();
    let rule = "-".repeat(width + 2);
    format!(
        "\n| {first} | {heading} |\n|{rule}|{rule}|\n| {cell:<width$} | {cell:<width$} |\n",
        first = first_heading,
        heading = heading,
        rule = rule,
        cell = cell,
        width = width,
    )
}

/// Insert a table.
///
/// Without a selection the first heading is selected. With one, the
/// selection fills the first heading and the second heading is selected.
fn apply_table(buffer: &str, sel: &ResolvedSelection, heading: &str, cell: &str) -> FormatResult {
    // "\n| " precedes the first heading, " | " separates the two
    const LEAD: usize = 3;
    const SEPARATOR: usize = 3;

    let start = sel.range.start;
    let heading_len = utf16_len(heading);

    if sel.range.is_collapsed() {
        let text = splice(buffer, sel.bytes.clone(), &table_block(heading, heading, cell));
        return FormatResult::with_selection(text, start + LEAD, start + LEAD + heading_len);
    }

    let selected = &buffer[sel.bytes.clone()];
    let text = splice(buffer, sel.bytes.clone(), &table_block(selected, heading, cell));
    let second = start + LEAD + sel.range.len() + SEPARATOR;
    FormatResult::with_selection(text, second, second + heading_len)
}

/// Quote, bullet list and numbered list.
///
/// The marker goes in front of every touched line. Only the marker on the
/// first touched line can precede the selection start, so the cursor always
/// lands at `start + len(marker)`.
fn apply_line_prefix(buffer: &str, sel: &ResolvedSelection, marker: &str) -> FormatResult {
    let mut text = buffer.to_string();

    // back to front, so earlier byte offsets stay valid
    for line in affected_lines(buffer, sel.range).iter().rev() {
        text.insert_str(utf16_to_byte_floor(buffer, line.start), marker);
    }

    FormatResult::with_cursor(text, sel.range.start + utf16_len(marker))
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
