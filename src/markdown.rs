//! Markdown rule engine.
//!
//! Renders a sanitized, normalized tree to Markdown text in a single pass.
//! Every element is classified once into a closed `NodeKind`, then matched
//! exhaustively by the renderer; no selector re-matching happens at render
//! time. A text-level post-processing step cleans up blank lines, pipe
//! table spacing and CJK punctuation spacing.

use dom_query::{Document, NodeRef, Selection};

use crate::dom;
use crate::error::{Error, Result};
use crate::patterns::{
    INLINE_WHITESPACE, MULTIPLE_NEWLINES, SPACE_AFTER_CJK_PUNCT, SPACE_BEFORE_CJK_PUNCT,
};
use crate::selector::preserve;
use crate::selector::utils::{attr, class, tag};

/// Closed set of node categories the renderer understands.
///
/// Classification happens exactly once per element during the rendering
/// walk; the match in `render_block`/`render_inline` is exhaustive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Heading(u8),
    Paragraph,
    Image,
    Figure,
    Table,
    InfoBox,
    Toc,
    FootnoteRef,
    /// Navigation/template/message-box chrome: rendered as empty string.
    Chrome,
    /// Edit-section markers: rendered as empty string.
    EditSection,
    UnorderedList,
    OrderedList,
    ListItem,
    Blockquote,
    Pre,
    Code,
    Bold,
    Italic,
    Anchor,
    LineBreak,
    HorizontalRule,
    /// Anything else: falls through to generic block/inline rendering.
    Generic,
}

/// Classify an element into its render category.
#[must_use]
pub fn classify(sel: &Selection) -> NodeKind {
    let tag_val = tag(sel);
    match tag_val.as_str() {
        "h1" => NodeKind::Heading(1),
        "h2" => NodeKind::Heading(2),
        "h3" => NodeKind::Heading(3),
        "h4" => NodeKind::Heading(4),
        "h5" => NodeKind::Heading(5),
        "h6" => NodeKind::Heading(6),
        "p" => NodeKind::Paragraph,
        "img" => NodeKind::Image,
        "figure" => NodeKind::Figure,
        "br" => NodeKind::LineBreak,
        "hr" => NodeKind::HorizontalRule,
        "ul" => NodeKind::UnorderedList,
        "ol" => NodeKind::OrderedList,
        "li" => NodeKind::ListItem,
        "blockquote" => NodeKind::Blockquote,
        "pre" => NodeKind::Pre,
        "code" => NodeKind::Code,
        "b" | "strong" => NodeKind::Bold,
        "i" | "em" => NodeKind::Italic,
        "a" => NodeKind::Anchor,
        "nav" => NodeKind::Chrome,
        "sup" => {
            let class_val = class(sel);
            if class_val.contains("reference") || class_val.contains("footnote") {
                NodeKind::FootnoteRef
            } else {
                NodeKind::Generic
            }
        }
        "span" => {
            if class(sel).contains("mw-editsection") {
                NodeKind::EditSection
            } else {
                NodeKind::Generic
            }
        }
        "table" | "div" => {
            if preserve::preserve_rule_toc(sel) {
                NodeKind::Toc
            } else if preserve::preserve_rule_infobox(sel) {
                NodeKind::InfoBox
            } else if is_chrome(sel) {
                NodeKind::Chrome
            } else if preserve::preserve_rule_figure(sel) {
                NodeKind::Figure
            } else if tag_val == "table" {
                NodeKind::Table
            } else {
                NodeKind::Generic
            }
        }
        _ => NodeKind::Generic,
    }
}

/// Navigation, template and message-box chrome that survived sanitization
/// under a class the removal rules did not know. Discarded during the walk.
fn is_chrome(sel: &Selection) -> bool {
    let class_val = class(sel);
    const CHROME_FRAGMENTS: &[&str] = &[
        "navbox",
        "vertical-navbox",
        "navigation-box",
        "ambox",
        "tmbox",
        "cmbox",
        "fmbox",
        "imbox",
        "mbox-small",
        "hatnote",
        "metadata",
        "sistersitebox",
        "noprint",
        "mw-editsection",
    ];
    CHROME_FRAGMENTS.iter().any(|frag| class_val.contains(frag))
}

/// Render a document tree to Markdown.
///
/// Deterministic single pass; a structurally odd but well-formed tree never
/// fails, it falls through to generic rendering. Fails with
/// `ConversionError` only when the tree has no renderable root.
pub fn render(doc: &Document, page: &str) -> Result<String> {
    let body = doc.select("body");
    if !body.exists() {
        return Err(Error::ConversionError {
            page: page.to_string(),
            reason: "document has no renderable root".to_string(),
        });
    }

    let mut out = String::new();
    for node in child_nodes(&body) {
        render_node(&node, &mut out);
    }
    Ok(postprocess(&out))
}

fn child_nodes<'a>(sel: &Selection<'a>) -> Vec<NodeRef<'a>> {
    let mut out = Vec::new();
    if let Some(first) = sel.nodes().first() {
        let mut child = first.first_child();
        while let Some(node) = child {
            child = node.next_sibling();
            out.push(node);
        }
    }
    out
}

fn node_children<'a>(node: &NodeRef<'a>) -> Vec<NodeRef<'a>> {
    let mut out = Vec::new();
    let mut child = node.first_child();
    while let Some(n) = child {
        child = n.next_sibling();
        out.push(n);
    }
    out
}

/// Render one node in block context.
fn render_node(node: &NodeRef, out: &mut String) {
    if node.is_text() {
        let text = collapse_whitespace(&node.text());
        if !text.trim().is_empty() {
            push_inline(out, text.trim());
        }
        return;
    }
    if !node.is_element() {
        return;
    }

    let sel = Selection::from(*node);
    match classify(&sel) {
        NodeKind::Chrome | NodeKind::EditSection => {}
        NodeKind::Heading(level) => {
            let text = inline_content(node);
            let text = text.trim();
            if !text.is_empty() {
                push_block(out, &format!("{} {}", "#".repeat(usize::from(level)), text));
            }
        }
        NodeKind::Paragraph => {
            let text = inline_content(node);
            let text = text.trim();
            if !text.is_empty() {
                push_block(out, text);
            }
        }
        NodeKind::Image => {
            push_block(out, &image_markdown(&sel));
        }
        NodeKind::Figure => render_figure(&sel, out),
        NodeKind::Table => render_table(&sel, out),
        NodeKind::InfoBox => render_infobox(node, &sel, out),
        NodeKind::Toc => render_toc(&sel, out),
        NodeKind::UnorderedList => render_list(node, out, 0, false),
        NodeKind::OrderedList => render_list(node, out, 0, true),
        NodeKind::Blockquote => {
            let mut inner = String::new();
            for child in node_children(node) {
                render_node(&child, &mut inner);
            }
            let quoted: Vec<String> = inner
                .trim()
                .lines()
                .map(|line| format!("> {line}").trim_end().to_string())
                .collect();
            if !quoted.is_empty() {
                push_block(out, &quoted.join("\n"));
            }
        }
        NodeKind::Pre => {
            let text = dom::text_content(&sel);
            let text = text.trim_end();
            if !text.trim().is_empty() {
                push_block(out, &format!("```\n{text}\n```"));
            }
        }
        NodeKind::HorizontalRule => push_block(out, "---"),
        NodeKind::LineBreak => out.push('\n'),
        NodeKind::FootnoteRef => push_inline(out, &footnote_markdown(&sel)),
        NodeKind::Anchor | NodeKind::Bold | NodeKind::Italic | NodeKind::Code => {
            let mut inline = String::new();
            render_inline(node, &mut inline);
            push_inline(out, inline.trim());
        }
        NodeKind::ListItem | NodeKind::Generic => {
            for child in node_children(node) {
                render_node(&child, out);
            }
        }
    }
}

/// Render a node's children in inline context (paragraph/heading interiors).
fn inline_content(node: &NodeRef) -> String {
    let mut out = String::new();
    for child in node_children(node) {
        render_inline(&child, &mut out);
    }
    collapse_whitespace(&out)
}

fn render_inline(node: &NodeRef, out: &mut String) {
    if node.is_text() {
        out.push_str(&node.text());
        return;
    }
    if !node.is_element() {
        return;
    }

    let sel = Selection::from(*node);
    match classify(&sel) {
        NodeKind::Chrome | NodeKind::EditSection => {}
        NodeKind::Bold => wrap_inline(node, out, "**"),
        NodeKind::Italic => wrap_inline(node, out, "*"),
        NodeKind::Code => {
            let text = dom::text_content(&sel);
            let text = text.trim();
            if !text.is_empty() {
                out.push('`');
                out.push_str(text);
                out.push('`');
            }
        }
        NodeKind::Anchor => {
            let text = collapse_whitespace(&inline_content(node));
            let text = text.trim();
            let href = attr(&sel, "href");
            if text.is_empty() {
                // Nothing visible to link.
            } else if href.is_empty() {
                out.push_str(text);
            } else {
                out.push_str(&format!("[{text}]({href})"));
            }
        }
        NodeKind::Image => out.push_str(&image_markdown(&sel)),
        NodeKind::FootnoteRef => out.push_str(&footnote_markdown(&sel)),
        NodeKind::LineBreak => out.push('\n'),
        _ => {
            for child in node_children(node) {
                render_inline(&child, out);
            }
        }
    }
}

fn wrap_inline(node: &NodeRef, out: &mut String, marker: &str) {
    let text = inline_content(node);
    let text = text.trim();
    if !text.is_empty() {
        out.push_str(marker);
        out.push_str(text);
        out.push_str(marker);
    }
}

fn image_markdown(img: &Selection) -> String {
    let src = attr(img, "src");
    let alt = collapse_whitespace(&attr(img, "alt"));
    format!("![{}]({src})", alt.trim())
}

/// Footnote markers render to `[^n]`; an empty marker renders to nothing.
fn footnote_markdown(sel: &Selection) -> String {
    let text = dom::text_content(sel);
    let label: String = text
        .trim()
        .trim_start_matches('[')
        .trim_end_matches(']')
        .to_string();
    if label.is_empty() {
        String::new()
    } else {
        format!("[^{label}]")
    }
}

/// Image figure: `![alt](url)` followed by an italicized caption line.
fn render_figure(sel: &Selection, out: &mut String) {
    let img = sel.select("img");
    if !img.exists() {
        return;
    }
    let mut block = image_markdown(&img);
    let caption_sel = sel.select("figcaption, .thumbcaption");
    let caption = collapse_whitespace(&dom::text_content(&caption_sel));
    let caption = caption.trim().to_string();
    if !caption.is_empty() {
        block.push_str(&format!("\n*{caption}*"));
    }
    push_block(out, &block);
}

/// Pipe table with a bold caption line; a `---` separator row is emitted
/// only under a first row that holds header cells. Pipes inside cells are
/// escaped.
fn render_table(sel: &Selection, out: &mut String) {
    let mut block = String::new();

    let caption_sel = sel.select("caption");
    let caption = collapse_whitespace(&dom::text_content(&caption_sel));
    let caption = caption.trim().to_string();
    if !caption.is_empty() {
        block.push_str(&format!("**{caption}**\n\n"));
    }

    for (idx, row_node) in sel.select("tr").nodes().iter().enumerate() {
        let row = Selection::from(*row_node);
        let cells: Vec<String> = row
            .select("td, th")
            .nodes()
            .iter()
            .map(|cell| cell_text(&Selection::from(*cell)))
            .collect();
        if cells.is_empty() {
            continue;
        }
        block.push_str(&format!("| {} |\n", cells.join(" | ")));
        if idx == 0 && row.select("th").exists() {
            let separator: Vec<&str> = cells.iter().map(|_| "---").collect();
            block.push_str(&format!("| {} |\n", separator.join(" | ")));
        }
    }

    let block = block.trim_end();
    if !block.is_empty() {
        push_block(out, block);
    }
}

fn cell_text(cell: &Selection) -> String {
    collapse_whitespace(&dom::text_content(cell))
        .trim()
        .replace('|', "\\|")
}

/// Info box: level-2 heading from the extracted title (generic label when
/// absent) plus bold `label: value` lines. When no structured rows are
/// found the inner content is rendered verbatim instead of being dropped.
fn render_infobox(node: &NodeRef, sel: &Selection, out: &mut String) {
    let title = crate::components::infobox_title(sel).unwrap_or_else(|| "Infobox".to_string());
    let mut block = format!("## {title}");

    let mut structured_rows = 0;
    for row_node in sel.select("tr").nodes() {
        let row = Selection::from(*row_node);
        let label_sel = row.select("th");
        let value_sel = row.select("td");
        let label = collapse_whitespace(&dom::text_content(&label_sel));
        let value = collapse_whitespace(&dom::text_content(&value_sel));
        let (label, value) = (label.trim(), value.trim());
        if label.is_empty() || value.is_empty() {
            continue;
        }
        structured_rows += 1;
        block.push_str(&format!("\n**{label}**: {value}"));
    }

    push_block(out, &block);
    if structured_rows == 0 {
        // Fallback: never silently drop an unstructured info box.
        let mut inner = String::new();
        for child in node_children(node) {
            render_node(&child, &mut inner);
        }
        let inner = inner.trim();
        if !inner.is_empty() {
            push_block(out, inner);
        }
    }
}

/// Table of contents: fixed heading plus an indented link list, two spaces
/// of indentation per nesting level.
fn render_toc(sel: &Selection, out: &mut String) {
    let mut block = String::from("## Table of Contents");
    let lists = sel.select("ul, ol");
    if let Some(first) = lists.nodes().first() {
        let mut body = String::new();
        render_toc_list(&Selection::from(*first), 0, &mut body);
        if body.is_empty() {
            return;
        }
        block.push_str("\n\n");
        block.push_str(body.trim_end());
    }
    push_block(out, &block);
}

fn render_toc_list(list: &Selection, depth: usize, out: &mut String) {
    if depth >= 6 {
        return;
    }
    for li_node in list.children().nodes() {
        let li = Selection::from(*li_node);
        if tag(&li) != "li" {
            continue;
        }
        for child_node in node_children(li_node) {
            let child = Selection::from(child_node);
            match tag(&child).as_str() {
                "a" => {
                    let text = collapse_whitespace(&dom::text_content(&child));
                    let text = text.trim().to_string();
                    let href = attr(&child, "href");
                    if !text.is_empty() {
                        out.push_str(&"  ".repeat(depth));
                        if href.is_empty() {
                            out.push_str(&format!("- {text}\n"));
                        } else {
                            out.push_str(&format!("- [{text}]({href})\n"));
                        }
                    }
                }
                "ul" | "ol" => render_toc_list(&child, depth + 1, out),
                _ => {}
            }
        }
    }
}

fn render_list(node: &NodeRef, out: &mut String, depth: usize, ordered: bool) {
    let mut block = String::new();
    list_items(node, depth, ordered, &mut block);
    let block = block.trim_end();
    if !block.is_empty() {
        if depth == 0 {
            push_block(out, block);
        } else {
            out.push('\n');
            out.push_str(block);
        }
    }
}

fn list_items(list: &NodeRef, depth: usize, ordered: bool, out: &mut String) {
    let mut index = 0;
    for li_node in node_children(list) {
        if !li_node.is_element() {
            continue;
        }
        let li = Selection::from(li_node);
        if tag(&li) != "li" {
            continue;
        }
        index += 1;

        let mut text = String::new();
        let mut nested = String::new();
        for child in node_children(&li_node) {
            if child.is_element() {
                let child_sel = Selection::from(child);
                match classify(&child_sel) {
                    NodeKind::UnorderedList => {
                        list_items(&child, depth + 1, false, &mut nested);
                        continue;
                    }
                    NodeKind::OrderedList => {
                        list_items(&child, depth + 1, true, &mut nested);
                        continue;
                    }
                    _ => {}
                }
            }
            render_inline(&child, &mut text);
        }

        let text = collapse_whitespace(&text);
        let text = text.trim();
        if !text.is_empty() {
            let marker = if ordered {
                format!("{index}.")
            } else {
                "-".to_string()
            };
            out.push_str(&format!("{}{marker} {text}\n", "  ".repeat(depth)));
        }
        if !nested.is_empty() {
            out.push_str(&nested);
        }
    }
}

// === Output assembly helpers ===

fn push_block(out: &mut String, block: &str) {
    if !out.is_empty() && !out.ends_with("\n\n") {
        while out.ends_with('\n') {
            out.pop();
        }
        out.push_str("\n\n");
    }
    out.push_str(block);
    out.push('\n');
}

fn push_inline(out: &mut String, text: &str) {
    if !out.is_empty() && !out.ends_with(char::is_whitespace) {
        out.push(' ');
    }
    out.push_str(text);
}

fn collapse_whitespace(text: &str) -> String {
    let replaced = text.replace(['\n', '\r', '\t'], " ");
    INLINE_WHITESPACE.replace_all(&replaced, " ").into_owned()
}

/// Text-level post-processing, applied in order: blank-line collapsing,
/// pipe-table spacing, CJK punctuation spacing.
#[must_use]
pub fn postprocess(text: &str) -> String {
    let collapsed = MULTIPLE_NEWLINES.replace_all(text.trim(), "\n\n");
    let spaced = space_pipe_tables(&collapsed);
    let spaced = SPACE_BEFORE_CJK_PUNCT.replace_all(&spaced, "$1");
    let spaced = SPACE_AFTER_CJK_PUNCT.replace_all(&spaced, "$1");
    spaced.into_owned()
}

/// Ensure exactly one blank line directly before and after each pipe-table
/// block.
fn space_pipe_tables(text: &str) -> String {
    let lines: Vec<&str> = text.lines().collect();
    let mut out: Vec<String> = Vec::with_capacity(lines.len());
    let mut in_table = false;

    for line in lines {
        let is_table_line = line.trim_start().starts_with('|');
        if is_table_line && !in_table {
            while out.last().is_some_and(|l| l.is_empty()) {
                out.pop();
            }
            if !out.is_empty() {
                out.push(String::new());
            }
            in_table = true;
        } else if !is_table_line && in_table {
            in_table = false;
            if !line.trim().is_empty() {
                out.push(String::new());
            }
        }
        out.push(line.to_string());
    }

    out.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render_html(html: &str) -> String {
        let doc = dom::parse(html);
        render(&doc, "Test").unwrap()
    }

    #[test]
    fn heading_and_paragraph() {
        let md = render_html(r#"<h2 id="x">Intro</h2><p>hello</p>"#);
        assert!(md.contains("## Intro"));
        assert!(md.contains("hello"));
    }

    #[test]
    fn header_table_gets_separator_row() {
        let md = render_html(
            r#"<table>
                <tr><th>Year</th><th>Pop</th></tr>
                <tr><td>2020</td><td>13,960,236</td></tr>
            </table>"#,
        );
        assert!(md.contains("| Year | Pop |"));
        assert!(md.contains("| --- | --- |"));
        assert!(md.contains("| 2020 | 13,960,236 |"));
        let header_pos = md.find("| Year").unwrap();
        let sep_pos = md.find("| ---").unwrap();
        assert!(sep_pos > header_pos);
    }

    #[test]
    fn headerless_table_has_no_separator() {
        let md = render_html("<table><tr><td>a</td><td>b</td></tr></table>");
        assert!(md.contains("| a | b |"));
        assert!(!md.contains("---"));
    }

    #[test]
    fn table_caption_is_bold_and_pipes_escaped() {
        let md = render_html(
            r#"<table><caption>Lines</caption><tr><td>A|B</td></tr></table>"#,
        );
        assert!(md.contains("**Lines**"));
        assert!(md.contains("A\\|B"));
    }

    #[test]
    fn figure_renders_image_and_italic_caption() {
        let md = render_html(
            r#"<div class="thumb"><div class="thumbinner">
                <img src="https://upload.example.org/x.jpg" alt="Skyline">
                <div class="thumbcaption">Tokyo at night</div>
            </div></div>"#,
        );
        assert!(md.contains("![Skyline](https://upload.example.org/x.jpg)"));
        assert!(md.contains("*Tokyo at night*"));
    }

    #[test]
    fn infobox_renders_title_and_rows() {
        let md = render_html(
            r#"<table class="infobox"><caption>Tokyo</caption>
                <tr><th>Country</th><td>Japan</td></tr>
                <tr><th>Population</th><td>13,960,236</td></tr>
            </table>"#,
        );
        assert!(md.contains("## Tokyo"));
        assert!(md.contains("**Country**: Japan"));
        assert!(md.contains("**Population**: 13,960,236"));
    }

    #[test]
    fn unstructured_infobox_falls_back_to_content() {
        let md = render_html(
            r#"<div class="infobox"><p>Free-form summary text.</p></div>"#,
        );
        assert!(md.contains("## Infobox"));
        assert!(md.contains("Free-form summary text."));
    }

    #[test]
    fn toc_renders_heading_and_nested_list() {
        let md = render_html(
            r##"<div id="toc"><ul>
                <li><a href="#History">History</a>
                    <ul><li><a href="#Edo">Edo</a></li></ul>
                </li>
            </ul></div>"##,
        );
        assert!(md.contains("## Table of Contents"));
        assert!(md.contains("- [History](#History)"));
        assert!(md.contains("  - [Edo](#Edo)"));
    }

    #[test]
    fn footnote_marker_renders_reference() {
        let md = render_html(r#"<p>Fact<sup class="reference">[3]</sup> here.</p>"#);
        assert!(md.contains("[^3]"));
    }

    #[test]
    fn empty_footnote_marker_renders_nothing() {
        let md = render_html(r#"<p>Fact<sup class="reference"></sup> here.</p>"#);
        assert!(!md.contains("[^"));
        assert!(md.contains("Fact"));
    }

    #[test]
    fn chrome_and_edit_sections_render_empty() {
        let md = render_html(
            r#"<p>keep</p>
               <table class="vertical-navbox"><tr><td>nav</td></tr></table>
               <div class="hatnote">See also</div>
               <h2>Title<span class="mw-editsection">[edit]</span></h2>"#,
        );
        assert!(md.contains("keep"));
        assert!(!md.contains("nav"));
        assert!(!md.contains("See also"));
        assert!(md.contains("## Title"));
        assert!(!md.contains("[edit]"));
    }

    #[test]
    fn inline_formatting_and_links() {
        let md = render_html(
            r#"<p>A <b>bold</b> and <i>subtle</i> <a href="https://example.com/x">ref</a> with <code>code</code>.</p>"#,
        );
        assert!(md.contains("**bold**"));
        assert!(md.contains("*subtle*"));
        assert!(md.contains("[ref](https://example.com/x)"));
        assert!(md.contains("`code`"));
    }

    #[test]
    fn lists_render_with_markers_and_nesting() {
        let md = render_html(
            "<ul><li>one<ul><li>deep</li></ul></li><li>two</li></ul><ol><li>first</li><li>second</li></ol>",
        );
        assert!(md.contains("- one"));
        assert!(md.contains("  - deep"));
        assert!(md.contains("- two"));
        assert!(md.contains("1. first"));
        assert!(md.contains("2. second"));
    }

    #[test]
    fn postprocess_collapses_blank_lines() {
        assert_eq!(postprocess("a\n\n\n\n\nb"), "a\n\nb");
    }

    #[test]
    fn postprocess_pads_pipe_tables() {
        let input = "before\n| a | b |\n| 1 | 2 |\nafter";
        let result = postprocess(input);
        assert!(result.contains("before\n\n| a | b |"));
        assert!(result.contains("| 1 | 2 |\n\nafter"));
    }

    #[test]
    fn postprocess_fixes_cjk_punctuation_spacing() {
        assert_eq!(postprocess("東京 ，日本の首都。 である"), "東京，日本の首都。である");
    }

    #[test]
    fn render_never_fails_on_odd_but_wellformed_trees() {
        let md = render_html("<section><article><aside>odd</aside></article></section>");
        assert!(md.contains("odd"));
    }
}
