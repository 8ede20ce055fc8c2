//! Toolbar Command Catalog
//!
//! Every toolbar button maps to exactly one [`CommandId`], and every command
//! has a fixed [`CommandKind`] carrying the literal marker strings it
//! inserts. The catalog is static data; the engine in
//! [`formatting`](super::formatting) dispatches on the kind.
//!
//! # Command kinds
//! - **InlineWrap**: Bold, Italic, Strikethrough, Code
//! - **LinkLike**: Link (selection becomes the label)
//! - **ImageLike**: Image (selection becomes the URL)
//! - **Table**: two-column table template
//! - **LinePrefix**: Quote, Bullet List, Numbered List

use std::fmt;
use std::str::FromStr;

use super::features::{Feature, FeatureFlags};
use crate::error::Error;

// ─────────────────────────────────────────────────────────────────────────────
// Constants
// ─────────────────────────────────────────────────────────────────────────────

/// Text inserted (and selected) when an inline or link command has no selection.
pub const PLACEHOLDER_TEXT: &str = "text";

/// URL inserted by link and image commands until the user types a real one.
pub const PLACEHOLDER_URL: &str = "https://example.com";

/// Placeholder for each table heading cell.
pub const TABLE_HEADING: &str = "Heading";

/// Placeholder for each table body cell.
pub const TABLE_CELL: &str = "Text";

// ─────────────────────────────────────────────────────────────────────────────
// Command Ids
// ─────────────────────────────────────────────────────────────────────────────

/// Toolbar commands, in toolbar order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandId {
    Bold,
    Italic,
    Strikethrough,
    Link,
    Quote,
    Code,
    Image,
    Table,
    BulletList,
    NumberedList,
}

impl CommandId {
    /// Every command, in toolbar order.
    pub const ALL: [CommandId; 10] = [
        CommandId::Bold,
        CommandId::Italic,
        CommandId::Strikethrough,
        CommandId::Link,
        CommandId::Quote,
        CommandId::Code,
        CommandId::Image,
        CommandId::Table,
        CommandId::BulletList,
        CommandId::NumberedList,
    ];

    /// Stable string id the host uses to name this command.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bold => "bold",
            Self::Italic => "italic",
            Self::Strikethrough => "strikethrough",
            Self::Link => "link",
            Self::Quote => "quote",
            Self::Code => "code",
            Self::Image => "image",
            Self::Table => "table",
            Self::BulletList => "bullet-list",
            Self::NumberedList => "numbered-list",
        }
    }

    /// The catalog entry for this command.
    pub fn command(&self) -> &'static Command {
        // CATALOG is laid out in the same order as ALL
        &CATALOG[*self as usize]
    }

    /// Feature flag this command depends on, if any.
    pub fn required_feature(&self) -> Option<Feature> {
        match self {
            Self::Link => Some(Feature::Links),
            Self::Image => Some(Feature::Images),
            Self::Table => Some(Feature::Tables),
            _ => None,
        }
    }

    /// Whether the toolbar should offer this command under `flags`.
    pub fn is_enabled(&self, flags: &FeatureFlags) -> bool {
        self.required_feature()
            .map_or(true, |feature| flags.allows(feature))
    }

    /// Button label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Bold => "Bold",
            Self::Italic => "Italic",
            Self::Strikethrough => "Strikethrough",
            Self::Link => "Insert Link",
            Self::Quote => "Quote",
            Self::Code => "Code",
            Self::Image => "Insert Image",
            Self::Table => "Insert Table",
            Self::BulletList => "Bullet List",
            Self::NumberedList => "Numbered List",
        }
    }

    /// Get the keyboard shortcut label for this command.
    pub fn shortcut_label(&self) -> &'static str {
        match self {
            Self::Bold => "Ctrl+B",
            Self::Italic => "Ctrl+I",
            Self::Strikethrough => "Ctrl+Shift+S",
            Self::Link => "Ctrl+K",
            Self::Quote => "Ctrl+Q",
            Self::Code => "Ctrl+`",
            Self::Image => "Ctrl+Shift+K",
            Self::Table => "Ctrl+Shift+T",
            Self::BulletList => "Ctrl+Shift+B",
            Self::NumberedList => "Ctrl+Shift+N",
        }
    }

    /// Get the icon for this command (for toolbar).
    pub fn icon(&self) -> &'static str {
        match self {
            Self::Bold => "𝐁",
            Self::Italic => "𝐼",
            Self::Strikethrough => "S̶",
            Self::Link => "🔗",
            Self::Quote => "\u{275D}", // heavy double turned comma quotation mark ❝
            Self::Code => "</>",
            Self::Image => "🖼",
            Self::Table => "▦",
            Self::BulletList => "\u{2022}", // bullet •
            Self::NumberedList => "1.",
        }
    }

    /// Get the tooltip text for this command.
    pub fn tooltip(&self) -> String {
        format!("{} ({})", self.label(), self.shortcut_label())
    }
}

impl fmt::Display for CommandId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CommandId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CommandId::ALL
            .into_iter()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| Error::UnknownCommand(s.to_string()))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Command Kinds
// ─────────────────────────────────────────────────────────────────────────────

/// The five behavioural kinds of toolbar command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    /// Wrap the selection in `left`/`right`, or insert a selected placeholder.
    InlineWrap {
        left: &'static str,
        right: &'static str,
        placeholder: &'static str,
    },
    /// `[label](url)`: the selection is the label.
    LinkLike {
        placeholder: &'static str,
        url: &'static str,
    },
    /// `![](url)`: the selection is the URL.
    ImageLike { url: &'static str },
    /// Two-column table with one header row and one body row.
    Table {
        heading: &'static str,
        cell: &'static str,
    },
    /// Insert `marker` at the start of every touched line.
    LinePrefix { marker: &'static str },
}

/// A catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Command {
    pub id: CommandId,
    pub kind: CommandKind,
}

const fn inline(id: CommandId, marker: &'static str) -> Command {
    Command {
        id,
        kind: CommandKind::InlineWrap {
            left: marker,
            right: marker,
            placeholder: PLACEHOLDER_TEXT,
        },
    }
}

const fn line_prefix(id: CommandId, marker: &'static str) -> Command {
    Command {
        id,
        kind: CommandKind::LinePrefix { marker },
    }
}

/// The toolbar command table, indexed by `CommandId as usize`.
pub static CATALOG: [Command; 10] = [
    inline(CommandId::Bold, "**"),
    inline(CommandId::Italic, "*"),
    inline(CommandId::Strikethrough, "~~"),
    Command {
        id: CommandId::Link,
        kind: CommandKind::LinkLike {
            placeholder: PLACEHOLDER_TEXT,
            url: PLACEHOLDER_URL,
        },
    },
    line_prefix(CommandId::Quote, "> "),
    inline(CommandId::Code, "`"),
    Command {
        id: CommandId::Image,
        kind: CommandKind::ImageLike {
            url: PLACEHOLDER_URL,
        },
    },
    Command {
        id: CommandId::Table,
        kind: CommandKind::Table {
            heading: TABLE_HEADING,
            cell: TABLE_CELL,
        },
    },
    line_prefix(CommandId::BulletList, "* "),
    line_prefix(CommandId::NumberedList, "1. "),
];

/// Commands the toolbar should show for a domain, in toolbar order.
pub fn visible_commands(flags: &FeatureFlags) -> Vec<CommandId> {
    CommandId::ALL
        .into_iter()
        .filter(|id| id.is_enabled(flags))
        .collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
