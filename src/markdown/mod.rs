//! Markdown toolbar commands and preview rendering
//!
//! This module holds the two pure entry points the comment editor calls:
//! the formatting toolbar engine and the live preview renderer. Both take
//! the domain's feature flags, and neither keeps state between calls.
//!
//! # Features
//! - Static toolbar command catalog with feature gating
//! - Selection-aware formatting commands with cursor placement
//! - Constrained Markdown to sanitized HTML, parsed with comrak
//!
//! # Example
//! ```ignore
//! use crate::markdown::{apply_command, render_markdown, FeatureFlags};
//! use crate::editor::SelectionRange;
//!
//! let flags = FeatureFlags::default();
//! let result = apply_command("quote", "zip\nrar", SelectionRange::new(0, 3), &flags)?;
//! let html = render_markdown(&result.text, &flags);
//! assert_eq!(html, "<blockquote><p>zip<br>rar</p></blockquote>");
//! ```

pub mod commands;
mod features;
pub mod formatting;
mod parser;
mod render;

pub use commands::{visible_commands, Command, CommandId, CommandKind, CATALOG};
pub use features::{Feature, FeatureFlags};
pub use formatting::{apply_command, apply_format, FormatResult};
pub use parser::{parse_blocks, Block, Inline};
pub use render::{html_escape, render_markdown};
