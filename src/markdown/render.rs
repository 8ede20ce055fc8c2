//! Preview HTML rendering
//!
//! `render_markdown` is what the host calls on every buffer change to refresh
//! the live preview pane. It is total: any input renders, and anything the
//! dialect does not support comes out as escaped literal text.

use log::trace;

use super::features::FeatureFlags;
use super::parser::{parse_blocks, Block, Inline};

/// Render a comment buffer to sanitized HTML.
///
/// Blocks are written back to back with no separating whitespace; an empty
/// or all-blank buffer renders to the empty string.
///
/// # Example
/// ```ignore
/// let html = render_markdown("> zip\nrar", &FeatureFlags::default());
/// assert_eq!(html, "<blockquote><p>zip<br>rar</p></blockquote>");
/// ```
pub fn render_markdown(buffer: &str, flags: &FeatureFlags) -> String {
    let blocks = parse_blocks(buffer, flags);

    let mut html = String::with_capacity(buffer.len() + buffer.len() / 2);
    for block in &blocks {
        write_block(&mut html, block, false);
    }

    trace!(
        "rendered {} blocks ({} bytes -> {} bytes)",
        blocks.len(),
        buffer.len(),
        html.len()
    );
    html
}

/// `tight` is set for the direct children of a tight list item, whose
/// paragraphs are written without `<p>`.
fn write_block(html: &mut String, block: &Block, tight: bool) {
    match block {
        Block::Paragraph(inlines) => {
            if !tight {
                html.push_str("<p>");
            }
            write_inlines(html, inlines);
            if !tight {
                html.push_str("</p>");
            }
        }
        Block::Blockquote(children) => {
            html.push_str("<blockquote>");
            for child in children {
                write_block(html, child, false);
            }
            html.push_str("</blockquote>");
        }
        Block::List {
            ordered,
            tight,
            items,
        } => {
            let tag = if *ordered { "ol" } else { "ul" };
            html.push_str(&format!("<{}>", tag));
            for item in items {
                html.push_str("<li>");
                for child in item {
                    write_block(html, child, *tight);
                }
                html.push_str("</li>");
            }
            html.push_str(&format!("</{}>", tag));
        }
        Block::Table { header, rows } => write_table(html, header, rows),
        Block::CodeBlock { info, literal } => {
            match language_class(info) {
                Some(language) => {
                    html.push_str("<pre><code class=\"language-");
                    html.push_str(&html_escape(language));
                    html.push_str("\">");
                }
                None => html.push_str("<pre><code>"),
            }
            html.push_str(&html_escape(literal));
            html.push_str("</code></pre>");
        }
    }
}

fn write_table(html: &mut String, header: &[Vec<Inline>], rows: &[Vec<Vec<Inline>>]) {
    html.push_str("<table><thead><tr>");
    for cell in header {
        html.push_str("<th>");
        write_inlines(html, cell);
        html.push_str("</th>");
    }
    html.push_str("</tr></thead><tbody>");
    for row in rows {
        html.push_str("<tr>");
        // body rows take the header's width: short rows are padded, long ones cut
        for col in 0..header.len() {
            html.push_str("<td>");
            if let Some(cell) = row.get(col) {
                write_inlines(html, cell);
            }
            html.push_str("</td>");
        }
        html.push_str("</tr>");
    }
    html.push_str("</tbody></table>");
}

fn write_inlines(html: &mut String, inlines: &[Inline]) {
    for inline in inlines {
        write_inline(html, inline);
    }
}

fn write_inline(html: &mut String, inline: &Inline) {
    match inline {
        Inline::Text(text) => push_escaped(html, text),
        Inline::LineBreak => html.push_str("<br>"),
        Inline::Code(code) => {
            html.push_str("<code>");
            push_escaped(html, code);
            html.push_str("</code>");
        }
        Inline::Strong(children) => write_wrapped(html, "strong", children),
        Inline::Emphasis(children) => write_wrapped(html, "em", children),
        Inline::Strikethrough(children) => write_wrapped(html, "del", children),
        Inline::Link { url, label } => {
            html.push_str("<a href=\"");
            push_escaped(html, url);
            html.push_str("\" rel=\"nofollow noopener\" target=\"_blank\">");
            write_inlines(html, label);
            html.push_str("</a>");
        }
        Inline::Image { url, alt } => {
            html.push_str("<img src=\"");
            push_escaped(html, url);
            html.push_str("\" alt=\"");
            push_escaped(html, alt);
            html.push_str("\">");
        }
    }
}

fn write_wrapped(html: &mut String, tag: &str, children: &[Inline]) {
    html.push_str(&format!("<{}>", tag));
    write_inlines(html, children);
    html.push_str(&format!("</{}>", tag));
}

/// First word of a fence info string, if it is a plain language name.
fn language_class(info: &str) -> Option<&str> {
    let word = info.split_whitespace().next()?;
    word.chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '+' | '#' | '.'))
        .then_some(word)
}

// ─────────────────────────────────────────────────────────────────────────────
// Escaping
// ─────────────────────────────────────────────────────────────────────────────

/// HTML-escape a string.
pub fn html_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    push_escaped(&mut out, s);
    out
}

fn push_escaped(out: &mut String, s: &str) {
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    fn render(buffer: &str) -> String {
        render_markdown(buffer, &FeatureFlags::default())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Paragraph Tests
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_empty_buffer() {
        assert_eq!(render(""), "");
        assert_eq!(render("\n \n"), "");
    }

    #[test]
    fn test_soft_break_and_paragraphs() {
        assert_eq!(render("a\nb\n\nc"), "<p>a<br>b</p><p>c</p>");
    }

    #[test]
    fn test_unsupported_heading_is_literal() {
        assert_eq!(render("# title"), "<p># title</p>");
        assert_eq!(render("zip\n---"), "<p>zip<br>---</p>");
    }

    #[test]
    fn test_thematic_break_is_literal() {
        assert_eq!(render("***"), "<p>***</p>");
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Inline Tests
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_inline_emphasis_in_paragraph() {
        assert_eq!(
            render("**b** *i* ~~s~~ `c`"),
            "<p><strong>b</strong> <em>i</em> <del>s</del> <code>c</code></p>"
        );
    }

    #[test]
    fn test_nested_emphasis() {
        assert_eq!(
            render("**bold *and* more**"),
            "<p><strong>bold <em>and</em> more</strong></p>"
        );
    }

    #[test]
    fn test_unmatched_markers_are_literal() {
        assert_eq!(render("**a"), "<p>**a</p>");
        assert_eq!(render("a ~ b"), "<p>a ~ b</p>");
        assert_eq!(render("2 * 3 * 4"), "<p>2 * 3 * 4</p>");
        assert_eq!(render("`open"), "<p>`open</p>");
    }

    #[test]
    fn test_code_span_is_not_interpreted() {
        assert_eq!(
            render("`**x** <b>`"),
            "<p><code>**x** &lt;b&gt;</code></p>"
        );
    }

    #[test]
    fn test_backslash_escape() {
        assert_eq!(render(r"\*not em\*"), "<p>*not em*</p>");
        assert_eq!(render(r"a\b"), r"<p>a\b</p>");
    }

    #[test]
    fn test_inline_spans_cross_soft_break() {
        assert_eq!(
            render("**zip\nrar**"),
            "<p><strong>zip<br>rar</strong></p>"
        );
        assert_eq!(render("*zip\nrar*"), "<p><em>zip<br>rar</em></p>");
        assert_eq!(
            render("[zip\nrar](https://example.com)"),
            "<p><a href=\"https://example.com\" rel=\"nofollow noopener\" target=\"_blank\">\
             zip<br>rar</a></p>"
        );
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Blockquote Tests
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_quote_lazy_continuation() {
        assert_eq!(
            render("> zip\nrar"),
            "<blockquote><p>zip<br>rar</p></blockquote>"
        );
    }

    #[test]
    fn test_quote_every_line_marked() {
        assert_eq!(
            render("> zip\n> rar"),
            "<blockquote><p>zip<br>rar</p></blockquote>"
        );
    }

    #[test]
    fn test_quote_then_paragraph() {
        assert_eq!(
            render("> zip\n\nrar"),
            "<blockquote><p>zip</p></blockquote><p>rar</p>"
        );
    }

    #[test]
    fn test_quote_with_two_paragraphs() {
        assert_eq!(
            render("> a\n>\n> b"),
            "<blockquote><p>a</p><p>b</p></blockquote>"
        );
    }

    #[test]
    fn test_deeply_nested_quotes_render() {
        let html = render(&format!("{} a", ">".repeat(200)));
        assert!(html.starts_with("<blockquote><blockquote>"));
        assert!(html.contains('a'));
    }

    // ─────────────────────────────────────────────────────────────────────────
    // List Tests
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_numbered_list() {
        assert_eq!(
            render("1. zip\n1. rar"),
            "<ol><li>zip</li><li>rar</li></ol>"
        );
    }

    #[test]
    fn test_ordered_numbers_are_ignored() {
        assert_eq!(render("7. a\n3. b"), "<ol><li>a</li><li>b</li></ol>");
    }

    #[test]
    fn test_bullet_list() {
        assert_eq!(render("* zip\n* rar"), "<ul><li>zip</li><li>rar</li></ul>");
        assert_eq!(render("- zip\n- rar"), "<ul><li>zip</li><li>rar</li></ul>");
    }

    #[test]
    fn test_list_lazy_continuation() {
        assert_eq!(render("* zip\nrar"), "<ul><li>zip<br>rar</li></ul>");
    }

    #[test]
    fn test_list_ended_by_blank_line() {
        assert_eq!(
            render("* zip\n\nrar"),
            "<ul><li>zip</li></ul><p>rar</p>"
        );
    }

    #[test]
    fn test_loose_list_keeps_paragraphs() {
        assert_eq!(
            render("* zip\n\n* rar"),
            "<ul><li><p>zip</p></li><li><p>rar</p></li></ul>"
        );
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Table Tests
    // ─────────────────────────────────────────────────────────────────────────

    const TABLE: &str = "\n| Heading | Heading |\n|---------|---------|\n| Text    | Text    |\n";

    #[test]
    fn test_toolbar_table() {
        assert_eq!(
            render(TABLE),
            "<table><thead><tr><th>Heading</th><th>Heading</th></tr></thead>\
             <tbody><tr><td>Text</td><td>Text</td></tr></tbody></table>"
        );
    }

    #[test]
    fn test_table_rows_take_header_width() {
        assert_eq!(
            render("| a | b |\n|---|---|\n| 1 |\n| 1 | 2 | 3 |"),
            "<table><thead><tr><th>a</th><th>b</th></tr></thead>\
             <tbody><tr><td>1</td><td></td></tr><tr><td>1</td><td>2</td></tr></tbody></table>"
        );
    }

    #[test]
    fn test_header_only_table_is_literal() {
        assert_eq!(render("| a |\n|---|"), "<p>| a |<br>|---|</p>");
    }

    #[test]
    fn test_table_disabled_is_literal() {
        let flags = FeatureFlags {
            tables: false,
            ..FeatureFlags::default()
        };
        assert_eq!(
            render_markdown(TABLE, &flags),
            "<p>| Heading | Heading |<br>|---------|---------|<br>| Text    | Text    |</p>"
        );
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Code Block Tests
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_code_block_verbatim() {
        assert_eq!(
            render("```\n**not bold** <tag>\n> x\n```"),
            "<pre><code>**not bold** &lt;tag&gt;\n&gt; x\n</code></pre>"
        );
    }

    #[test]
    fn test_code_block_language_class() {
        assert_eq!(
            render("```rust\nfn main() {}\n```"),
            "<pre><code class=\"language-rust\">fn main() {}\n</code></pre>"
        );
        assert_eq!(
            render("```\"><script>\nx\n```"),
            "<pre><code>x\n</code></pre>"
        );
    }

    #[test]
    fn test_unclosed_fence_runs_to_end() {
        assert_eq!(render("```\na\n\nb"), "<pre><code>a\n\nb\n</code></pre>");
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Link and Image Tests
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_links_and_images_enabled() {
        assert_eq!(
            render("[bar](https://example.com) ![](bar)"),
            "<p><a href=\"https://example.com\" rel=\"nofollow noopener\" target=\"_blank\">bar</a> \
             <img src=\"bar\" alt=\"\"></p>"
        );
    }

    #[test]
    fn test_link_label_keeps_emphasis() {
        assert_eq!(
            render("[**b**](/x)"),
            "<p><a href=\"/x\" rel=\"nofollow noopener\" target=\"_blank\"><strong>b</strong></a></p>"
        );
    }

    #[test]
    fn test_flags_off_render_literal_text() {
        let html = render_markdown(
            "[bar](https://example.com) ![](bar)",
            &FeatureFlags::none(),
        );
        assert_eq!(html, "<p>[bar](https://example.com) ![](bar)</p>");
        assert!(!html.contains("<a "));
        assert!(!html.contains("<img"));
    }

    #[test]
    fn test_disabled_image_is_literal_even_with_links() {
        let flags = FeatureFlags {
            images: false,
            ..FeatureFlags::default()
        };
        assert_eq!(render_markdown("![](bar)", &flags), "<p>![](bar)</p>");
    }

    #[test]
    fn test_unsafe_urls_are_literal() {
        assert_eq!(
            render("[x](javascript:alert(1))"),
            "<p>[x](javascript:alert(1))</p>"
        );
        assert_eq!(
            render("![x](data:image/png)"),
            "<p>![x](data:image/png)</p>"
        );
    }

    #[test]
    fn test_mailto_only_for_links() {
        assert!(render("[me](mailto:a@b.c)").starts_with("<p><a href=\"mailto:a@b.c\""));
        assert_eq!(render("![me](mailto:a@b.c)"), "<p>![me](mailto:a@b.c)</p>");
    }

    #[test]
    fn test_brackets_without_url() {
        assert_eq!(render("[not a link]"), "<p>[not a link]</p>");
        assert_eq!(render("[a]()"), "<p>[a]()</p>");
    }

    #[test]
    fn test_attribute_escaping() {
        assert_eq!(
            render("![a\"b](/x\"y)"),
            "<p><img src=\"/x&quot;y\" alt=\"a&quot;b\"></p>"
        );
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Escaping Tests
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_html_escape() {
        assert_eq!(
            html_escape("<a href='x'>\"&\"</a>"),
            "&lt;a href=&#39;x&#39;&gt;&quot;&amp;&quot;&lt;/a&gt;"
        );
    }

    #[test]
    fn test_script_is_escaped() {
        assert_eq!(
            render("<script>alert(1)</script>"),
            "<p>&lt;script&gt;alert(1)&lt;/script&gt;</p>"
        );
    }

    #[test]
    fn test_inline_html_is_escaped() {
        assert_eq!(render("a <b>x</b>"), "<p>a &lt;b&gt;x&lt;/b&gt;</p>");
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Totality Tests
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_deterministic_and_total() {
        let inputs = [
            "",
            "> ",
            "* ",
            "1. ",
            "```",
            "|",
            "| a |\n|---|\n|",
            "**",
            "[](",
            "![",
            "\\",
            "🎉 > * 1. `",
            "a\r\n\r\n> b\r\nc",
        ];
        for input in inputs {
            assert_eq!(render(input), render(input));
        }
    }

    /// Time to render `unit` repeated until the input is at least `len` bytes.
    fn time_render(unit: &str, len: usize) -> Duration {
        let buffer = unit.repeat(len / unit.len() + 1);
        let started = Instant::now();
        let html = render(&buffer);
        let elapsed = started.elapsed();
        assert!(html.len() >= buffer.len());
        elapsed
    }

    #[test]
    fn test_unclosed_openers_render_in_linear_time() {
        for unit in ["[a](", "![a](", "**a ", "_a "] {
            // warm up allocator and caches
            time_render(unit, 1 << 12);

            let small = time_render(unit, 1 << 14);
            let large = time_render(unit, 1 << 17);

            // 8x the input; a quadratic pass would take about 64x as long
            assert!(
                large <= small * 32 + Duration::from_millis(100),
                "{:?} x {}: {:?} vs {:?}",
                unit,
                1 << 17,
                large,
                small
            );
        }
    }
}
