//! Markdown parsing using comrak
//!
//! comrak parses the buffer (CommonMark plus strikethrough, and GFM tables
//! when the domain allows them); this module walks its tree into the
//! renderer's own `Block`/`Inline` types. Nodes outside the preview dialect,
//! or switched off by a feature flag, come out as literal text so nothing the
//! user typed is dropped.
//!
//! Lazy continuation for blockquotes and list items is CommonMark's: a plain
//! line right after `> zip` joins the quoted paragraph.

use comrak::{
    nodes::{AstNode, ListType as ComrakListType, NodeValue},
    parse_document, Arena, Options,
};

use super::features::FeatureFlags;

/// Containers nested deeper than this are flattened to plain text.
const MAX_NESTING: usize = 32;

// ─────────────────────────────────────────────────────────────────────────────
// Public Types
// ─────────────────────────────────────────────────────────────────────────────

/// A block of the preview document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Paragraph(Vec<Inline>),
    Blockquote(Vec<Block>),
    /// One entry per item. Paragraphs of a tight list render without `<p>`.
    List {
        ordered: bool,
        tight: bool,
        items: Vec<Vec<Block>>,
    },
    /// Header cells and body rows
    Table {
        header: Vec<Vec<Inline>>,
        rows: Vec<Vec<Vec<Inline>>>,
    },
    /// Fenced or indented code, kept verbatim
    CodeBlock { info: String, literal: String },
}

/// Inline content of a paragraph, list item or table cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inline {
    Text(String),
    /// Soft or hard line break
    LineBreak,
    Code(String),
    Strong(Vec<Inline>),
    Emphasis(Vec<Inline>),
    Strikethrough(Vec<Inline>),
    Link { url: String, label: Vec<Inline> },
    Image { url: String, alt: String },
}

// ─────────────────────────────────────────────────────────────────────────────
// Parsing
// ─────────────────────────────────────────────────────────────────────────────

fn comrak_options(flags: &FeatureFlags) -> Options {
    let mut options = Options::default();

    options.extension.strikethrough = true;
    options.extension.table = flags.tables;
    options.extension.autolink = false;

    options
}

/// Parse a buffer into preview blocks.
///
/// Tables are only recognised when `flags.tables` is set; otherwise their
/// rows stay ordinary paragraph text.
pub fn parse_blocks(buffer: &str, flags: &FeatureFlags) -> Vec<Block> {
    let arena = Arena::new();
    let root = parse_document(&arena, buffer, &comrak_options(flags));

    let walker = TreeWalker {
        flags: *flags,
        lines: buffer.lines().collect(),
    };
    walker.blocks(root, 0)
}

/// Only plain web URLs (and `mailto:` for links) are linkified.
///
/// URLs without a scheme are relative and always allowed.
fn is_safe_url(url: &str, allow_mailto: bool) -> bool {
    if url.is_empty() {
        return false;
    }
    let scheme_end = match url.find(|c: char| matches!(c, ':' | '/' | '?' | '#')) {
        Some(i) if url[i..].starts_with(':') => i,
        _ => return true,
    };

    match url[..scheme_end].to_ascii_lowercase().as_str() {
        "http" | "https" => true,
        "mailto" => allow_mailto,
        _ => false,
    }
}

/// `url` or `url "title"`, as written between the parentheses.
fn destination(url: &str, title: &str) -> String {
    if title.is_empty() {
        url.to_string()
    } else {
        format!("{} \"{}\"", url, title)
    }
}

/// Concatenated text of a subtree, without recursion.
fn plain_text<'a>(node: &'a AstNode<'a>) -> String {
    let mut text = String::new();
    for descendant in node.descendants() {
        match &descendant.data.borrow().value {
            NodeValue::Text(t) => text.push_str(t),
            NodeValue::Code(code) => text.push_str(&code.literal),
            NodeValue::SoftBreak | NodeValue::LineBreak => text.push(' '),
            _ => {}
        }
    }
    text
}

// ─────────────────────────────────────────────────────────────────────────────
// Tree Conversion
// ─────────────────────────────────────────────────────────────────────────────

struct TreeWalker<'s> {
    flags: FeatureFlags,
    /// Source lines, for constructs that are echoed back literally
    lines: Vec<&'s str>,
}

impl<'s> TreeWalker<'s> {
    /// Source line by comrak's 1-based line number.
    fn source_line(&self, line: usize) -> &'s str {
        line.checked_sub(1)
            .and_then(|i| self.lines.get(i))
            .copied()
            .unwrap_or("")
    }

    fn blocks<'a>(&self, parent: &'a AstNode<'a>, depth: usize) -> Vec<Block> {
        let mut blocks = Vec::new();
        for child in parent.children() {
            self.push_block(&mut blocks, child, depth);
        }
        blocks
    }

    fn push_block<'a>(&self, out: &mut Vec<Block>, node: &'a AstNode<'a>, depth: usize) {
        if depth >= MAX_NESTING {
            out.push(Block::Paragraph(vec![Inline::Text(plain_text(node))]));
            return;
        }

        let ast = node.data.borrow();
        match &ast.value {
            NodeValue::Paragraph => out.push(Block::Paragraph(self.inlines(node, depth + 1))),
            NodeValue::BlockQuote => out.push(Block::Blockquote(self.blocks(node, depth + 1))),
            NodeValue::List(list) => out.push(Block::List {
                ordered: matches!(list.list_type, ComrakListType::Ordered),
                tight: list.tight,
                items: node
                    .children()
                    .map(|item| self.blocks(item, depth + 1))
                    .collect(),
            }),
            NodeValue::CodeBlock(code) => out.push(Block::CodeBlock {
                info: code.info.clone(),
                literal: code.literal.clone(),
            }),
            NodeValue::Table(_) => {
                let table = self.table(node, depth + 1);
                if matches!(&table, Block::Table { rows, .. } if rows.is_empty()) {
                    // a table needs at least one body row
                    let (start, end) = (ast.sourcepos.start, ast.sourcepos.end);
                    let mut inlines = Vec::new();
                    for line in start.line..=end.line.max(start.line + 1) {
                        let source = self.source_line(line);
                        let text = source
                            .get(start.column.saturating_sub(1)..)
                            .unwrap_or(source)
                            .trim();
                        if !inlines.is_empty() {
                            inlines.push(Inline::LineBreak);
                        }
                        inlines.push(Inline::Text(text.to_string()));
                    }
                    out.push(Block::Paragraph(inlines));
                } else {
                    out.push(table);
                }
            }

            // headings are not part of the dialect: keep the markers as text
            NodeValue::Heading(heading) => {
                let level = usize::from(heading.level);
                let mut inlines = Vec::new();
                if heading.setext {
                    inlines.extend(self.inlines(node, depth + 1));
                    let line = self.source_line(ast.sourcepos.end.line).trim_end();
                    let underline = &line[line.trim_end_matches(['=', '-']).len()..];
                    let underline = match (underline.is_empty(), level) {
                        (false, _) => underline.to_string(),
                        (true, 1) => "===".to_string(),
                        (true, _) => "---".to_string(),
                    };
                    inlines.push(Inline::LineBreak);
                    inlines.push(Inline::Text(underline));
                } else {
                    let children = self.inlines(node, depth + 1);
                    let marker = "#".repeat(level);
                    if children.is_empty() {
                        inlines.push(Inline::Text(marker));
                    } else {
                        inlines.push(Inline::Text(marker + " "));
                        inlines.extend(children);
                    }
                }
                out.push(Block::Paragraph(inlines));
            }
            NodeValue::ThematicBreak => {
                let line = self.source_line(ast.sourcepos.start.line);
                let text = line
                    .get(ast.sourcepos.start.column.saturating_sub(1)..)
                    .unwrap_or(line)
                    .trim();
                let text = if text.is_empty() { "---" } else { text };
                out.push(Block::Paragraph(vec![Inline::Text(text.to_string())]));
            }
            NodeValue::HtmlBlock(html) => {
                let mut inlines = Vec::new();
                for (i, line) in html.literal.trim_end_matches('\n').split('\n').enumerate() {
                    if i > 0 {
                        inlines.push(Inline::LineBreak);
                    }
                    inlines.push(Inline::Text(line.to_string()));
                }
                out.push(Block::Paragraph(inlines));
            }
            _ => out.extend(self.blocks(node, depth + 1)),
        }
    }

    fn table<'a>(&self, node: &'a AstNode<'a>, depth: usize) -> Block {
        let mut header = Vec::new();
        let mut rows = Vec::new();

        for row in node.children() {
            let is_header = matches!(row.data.borrow().value, NodeValue::TableRow(true));
            let cells: Vec<Vec<Inline>> = row
                .children()
                .map(|cell| self.inlines(cell, depth + 1))
                .collect();
            if is_header {
                header = cells;
            } else {
                rows.push(cells);
            }
        }

        Block::Table { header, rows }
    }

    fn inlines<'a>(&self, parent: &'a AstNode<'a>, depth: usize) -> Vec<Inline> {
        let mut inlines = Vec::new();
        for child in parent.children() {
            self.push_inline(&mut inlines, child, depth);
        }
        inlines
    }

    fn push_inline<'a>(&self, out: &mut Vec<Inline>, node: &'a AstNode<'a>, depth: usize) {
        if depth >= MAX_NESTING {
            out.push(Inline::Text(plain_text(node)));
            return;
        }

        let ast = node.data.borrow();
        match &ast.value {
            NodeValue::Text(text) => out.push(Inline::Text(text.clone())),
            NodeValue::SoftBreak | NodeValue::LineBreak => out.push(Inline::LineBreak),
            NodeValue::Code(code) => out.push(Inline::Code(code.literal.clone())),
            NodeValue::HtmlInline(html) => out.push(Inline::Text(html.clone())),
            NodeValue::Strong => out.push(Inline::Strong(self.inlines(node, depth + 1))),
            NodeValue::Emph => out.push(Inline::Emphasis(self.inlines(node, depth + 1))),
            NodeValue::Strikethrough => {
                out.push(Inline::Strikethrough(self.inlines(node, depth + 1)))
            }
            NodeValue::Link(link) => {
                let label = self.inlines(node, depth + 1);
                if self.flags.links && is_safe_url(&link.url, true) {
                    out.push(Inline::Link {
                        url: link.url.clone(),
                        label,
                    });
                } else {
                    out.push(Inline::Text("[".to_string()));
                    out.extend(label);
                    out.push(Inline::Text(format!(
                        "]({})",
                        destination(&link.url, &link.title)
                    )));
                }
            }
            NodeValue::Image(link) => {
                let alt = plain_text(node);
                if self.flags.images && is_safe_url(&link.url, false) {
                    out.push(Inline::Image {
                        url: link.url.clone(),
                        alt,
                    });
                } else {
                    out.push(Inline::Text(format!(
                        "![{}]({})",
                        alt,
                        destination(&link.url, &link.title)
                    )));
                }
            }
            _ => out.extend(self.inlines(node, depth + 1)),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(buffer: &str) -> Vec<Block> {
        parse_blocks(buffer, &FeatureFlags::default())
    }

    fn text(s: &str) -> Inline {
        Inline::Text(s.to_string())
    }

    fn paragraph(words: &[&str]) -> Block {
        let mut inlines = Vec::new();
        for (i, word) in words.iter().enumerate() {
            if i > 0 {
                inlines.push(Inline::LineBreak);
            }
            inlines.push(text(word));
        }
        Block::Paragraph(inlines)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // URL Tests
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_is_safe_url() {
        assert!(is_safe_url("https://example.com", false));
        assert!(is_safe_url("HTTP://example.com", false));
        assert!(is_safe_url("/relative/path", false));
        assert!(is_safe_url("bar", false));
        assert!(is_safe_url("mailto:a@b.c", true));
        assert!(!is_safe_url("mailto:a@b.c", false));
        assert!(!is_safe_url("javascript:alert(1)", true));
        assert!(!is_safe_url("data:image/png", false));
        assert!(!is_safe_url("", true));
    }

    #[test]
    fn test_destination_with_title() {
        assert_eq!(destination("/x", ""), "/x");
        assert_eq!(destination("/x", "t"), "/x \"t\"");
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Block Tests
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_empty_buffer_has_no_blocks() {
        assert!(parse("").is_empty());
        assert!(parse("\n\n  \n").is_empty());
    }

    #[test]
    fn test_paragraphs_split_on_blank_line() {
        assert_eq!(
            parse("zip\nrar\n\nfoo"),
            vec![paragraph(&["zip", "rar"]), paragraph(&["foo"])]
        );
    }

    #[test]
    fn test_blockquote_lazy_continuation() {
        assert_eq!(
            parse("> zip\nrar"),
            vec![Block::Blockquote(vec![paragraph(&["zip", "rar"])])]
        );
    }

    #[test]
    fn test_blockquote_ended_by_blank_line() {
        assert_eq!(
            parse("> zip\n\nrar"),
            vec![
                Block::Blockquote(vec![paragraph(&["zip"])]),
                paragraph(&["rar"]),
            ]
        );
    }

    #[test]
    fn test_list_lazy_continuation() {
        assert_eq!(
            parse("* zip\nrar"),
            vec![Block::List {
                ordered: false,
                tight: true,
                items: vec![vec![paragraph(&["zip", "rar"])]],
            }]
        );
    }

    #[test]
    fn test_ordered_list() {
        assert_eq!(
            parse("1. zip\n1. rar"),
            vec![Block::List {
                ordered: true,
                tight: true,
                items: vec![vec![paragraph(&["zip"])], vec![paragraph(&["rar"])]],
            }]
        );
    }

    #[test]
    fn test_code_fence_is_verbatim() {
        assert_eq!(
            parse("```rust\n> not a quote\n```\nafter"),
            vec![
                Block::CodeBlock {
                    info: "rust".to_string(),
                    literal: "> not a quote\n".to_string(),
                },
                paragraph(&["after"]),
            ]
        );
    }

    #[test]
    fn test_table_disabled_is_paragraph() {
        let flags = FeatureFlags {
            tables: false,
            ..FeatureFlags::default()
        };
        let blocks = parse_blocks("| a |\n|---|\n| 1 |", &flags);
        assert_eq!(blocks.len(), 1);
        assert!(matches!(blocks[0], Block::Paragraph(_)));
    }

    #[test]
    fn test_header_only_table_is_paragraph() {
        assert_eq!(parse("| a |\n|---|"), vec![paragraph(&["| a |", "|---|"])]);
    }

    #[test]
    fn test_table_enabled() {
        let blocks = parse("| a | b |\n|---|---|\n| 1 | 2 |");
        assert_eq!(
            blocks,
            vec![Block::Table {
                header: vec![vec![text("a")], vec![text("b")]],
                rows: vec![vec![vec![text("1")], vec![text("2")]]],
            }]
        );
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Unsupported Construct Tests
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_atx_heading_keeps_marker() {
        assert_eq!(
            parse("## title"),
            vec![Block::Paragraph(vec![text("## "), text("title")])]
        );
        assert_eq!(parse("#"), vec![paragraph(&["#"])]);
    }

    #[test]
    fn test_setext_heading_keeps_underline() {
        assert_eq!(parse("zip\n---"), vec![paragraph(&["zip", "---"])]);
    }

    #[test]
    fn test_thematic_break_is_text() {
        assert_eq!(parse("***"), vec![paragraph(&["***"])]);
    }

    #[test]
    fn test_deep_nesting_is_flattened() {
        let buffer = format!("{} deep", ">".repeat(200));
        let blocks = parse(&buffer);
        assert_eq!(blocks.len(), 1);
        assert!(matches!(blocks[0], Block::Blockquote(_)));
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Inline Tests
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_emphasis_spans_soft_break() {
        assert_eq!(
            parse("**zip\nrar**"),
            vec![Block::Paragraph(vec![Inline::Strong(vec![
                text("zip"),
                Inline::LineBreak,
                text("rar"),
            ])])]
        );
    }

    #[test]
    fn test_disabled_link_becomes_text() {
        let blocks = parse_blocks("[bar](https://example.com)", &FeatureFlags::none());
        let Block::Paragraph(inlines) = &blocks[0] else {
            panic!("expected paragraph, got {:?}", blocks);
        };
        assert!(inlines.iter().all(|i| matches!(i, Inline::Text(_))));
    }

    #[test]
    fn test_image_alt_is_plain_text() {
        assert_eq!(
            parse("![a *b*](/x.png)"),
            vec![Block::Paragraph(vec![Inline::Image {
                url: "/x.png".to_string(),
                alt: "a b".to_string(),
            }])]
        );
    }
}
