//! Component extractor.
//!
//! Walks the sanitized tree once and harvests structured records: heading
//! sections, images, tables, info boxes and the table of contents. Pure
//! reads; the tree is never mutated here. Summary statistics are computed
//! from the same tree so their counts always agree with the records.

use dom_query::{Document, Selection};
use serde::{Deserialize, Serialize};

use crate::dom;
use crate::options::Options;
use crate::result::PageStats;
use crate::selector::preserve;
use crate::selector::utils::{attr, class, tag};

/// Maximum nesting depth recorded for table-of-contents entries.
const MAX_TOC_DEPTH: usize = 6;

/// A heading section in document order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    /// Heading depth, 1 through 6.
    pub level: u8,
    /// Trimmed heading text.
    pub text: String,
    /// Anchor id usable for in-page links, if the heading carries one.
    pub anchor_id: Option<String>,
}

/// An image with its resolved source and optional caption.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRecord {
    pub absolute_url: String,
    pub alt_text: String,
    pub caption: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

/// A data table summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRecord {
    pub caption: Option<String>,
    pub row_count: usize,
    pub col_count: usize,
    pub has_header_row: bool,
}

/// An info box (structured summary table).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InfoboxRecord {
    /// Extracted title, if any candidate location held one.
    pub title: Option<String>,
    /// Variant hint taken from the class list (e.g. "geography", "vcard").
    pub kind: String,
}

/// One table-of-contents entry with its nested children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TocEntry {
    pub text: String,
    pub href: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TocEntry>,
}

/// Extracted record set for one page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentComponents {
    pub sections: Vec<Section>,
    pub images: Vec<ImageRecord>,
    pub tables: Vec<TableRecord>,
    pub infoboxes: Vec<InfoboxRecord>,
    pub toc: Option<Vec<TocEntry>>,
}

/// Harvest all components from a sanitized, normalized tree.
#[must_use]
pub fn extract(doc: &Document) -> ContentComponents {
    ContentComponents {
        sections: extract_sections(doc),
        images: extract_images(doc),
        tables: extract_tables(doc),
        infoboxes: extract_infoboxes(doc),
        toc: extract_toc(doc),
    }
}

/// Summary statistics for the page; counts mirror the component records.
#[must_use]
pub fn page_stats(doc: &Document, components: &ContentComponents, options: &Options) -> PageStats {
    PageStats {
        word_count: count_words(doc, options),
        image_count: components.images.len(),
        table_count: components.tables.len(),
        section_count: components.sections.len(),
    }
}

fn content_root<'a>(doc: &'a Document) -> Selection<'a> {
    for selector in ["#mw-content-text", ".mw-parser-output", "#content", "body"] {
        let sel = doc.select(selector);
        if sel.exists() {
            return sel;
        }
    }
    doc.select("html")
}

fn count_words(doc: &Document, options: &Options) -> usize {
    let text = dom::text_content(&content_root(doc));
    text.split_whitespace()
        .filter(|token| token.chars().count() >= options.min_word_length)
        .filter(|token| token.chars().any(char::is_alphanumeric))
        .count()
}

fn extract_sections(doc: &Document) -> Vec<Section> {
    let mut sections = Vec::new();
    for node in doc.select("h1, h2, h3, h4, h5, h6").nodes() {
        let heading = Selection::from(*node);
        let level = match tag(&heading).as_str() {
            "h1" => 1,
            "h2" => 2,
            "h3" => 3,
            "h4" => 4,
            "h5" => 5,
            _ => 6,
        };
        sections.push(Section {
            level,
            text: dom::text_content(&heading).trim().to_string(),
            anchor_id: heading_anchor_id(&heading),
        });
    }
    sections
}

/// Anchor id candidates, tried in order: the heading's own id, then the id
/// of a headline span nested inside it.
fn heading_anchor_id(heading: &Selection) -> Option<String> {
    let own = attr(heading, "id");
    if !own.is_empty() {
        return Some(own);
    }
    for node in heading.select("*").nodes() {
        let nested = attr(&Selection::from(*node), "id");
        if !nested.is_empty() {
            return Some(nested);
        }
    }
    None
}

fn extract_images(doc: &Document) -> Vec<ImageRecord> {
    let mut images = Vec::new();
    for node in doc.select("img").nodes() {
        let img = Selection::from(*node);
        let parse_dim = |name: &str| {
            dom::get_attribute(&img, name).and_then(|v| v.trim().parse::<u32>().ok())
        };
        images.push(ImageRecord {
            absolute_url: attr(&img, "src"),
            alt_text: attr(&img, "alt"),
            caption: image_caption(&img),
            width: parse_dim("width"),
            height: parse_dim("height"),
        });
    }
    images
}

/// Caption for an image, read from its enclosing figure wrapper if any.
fn image_caption(img: &Selection) -> Option<String> {
    let mut current = img.parent();
    while current.exists() {
        if preserve::preserve_rule_figure(&current) {
            let caption = current.select("figcaption, .thumbcaption");
            let text = dom::text_content(&caption);
            let text = text.trim();
            if !text.is_empty() {
                return Some(text.to_string());
            }
        } else {
            break;
        }
        current = current.parent();
    }
    None
}

fn extract_tables(doc: &Document) -> Vec<TableRecord> {
    let mut tables = Vec::new();
    for node in doc.select("table").nodes() {
        let table = Selection::from(*node);
        // Info boxes and toc wrappers are reported separately.
        if preserve::preserve_rule_infobox(&table) || preserve::preserve_rule_toc(&table) {
            continue;
        }
        tables.push(table_record(&table));
    }
    tables
}

fn table_record(table: &Selection) -> TableRecord {
    let caption_sel = table.select("caption");
    let caption_text = dom::text_content(&caption_sel);
    let caption_text = caption_text.trim();
    let caption = if caption_text.is_empty() {
        None
    } else {
        Some(caption_text.to_string())
    };

    let mut row_count = 0;
    let mut col_count = 0;
    let mut has_header_row = false;
    for (idx, row_node) in table.select("tr").nodes().iter().enumerate() {
        let row = Selection::from(*row_node);
        row_count += 1;
        let cells = row.select("td, th").length();
        col_count = col_count.max(cells);
        if idx == 0 && row.select("th").exists() {
            has_header_row = true;
        }
    }

    TableRecord {
        caption,
        row_count,
        col_count,
        has_header_row,
    }
}

fn extract_infoboxes(doc: &Document) -> Vec<InfoboxRecord> {
    let mut infoboxes = Vec::new();
    for node in doc.select("table, div").nodes() {
        let sel = Selection::from(*node);
        if !preserve::preserve_rule_infobox(&sel) {
            continue;
        }
        infoboxes.push(InfoboxRecord {
            title: infobox_title(&sel),
            kind: infobox_kind(&sel),
        });
    }
    infoboxes
}

/// Title candidates, tried in order until one yields non-empty text:
/// a `<caption>`, a header cell spanning the box, a name element, then the
/// first `<th>` of any shape.
pub(crate) fn infobox_title(infobox: &Selection) -> Option<String> {
    type Strategy = fn(&Selection) -> Option<String>;
    let strategies: &[Strategy] = &[
        |sel| first_text(&sel.select("caption")),
        |sel| {
            sel.select("th").nodes().iter().find_map(|node| {
                let th = Selection::from(*node);
                if attr(&th, "colspan").is_empty() {
                    None
                } else {
                    first_text(&th)
                }
            })
        },
        |sel| first_text(&sel.select(".fn")),
        |sel| first_text(&sel.select("th")),
    ];
    strategies.iter().find_map(|strategy| strategy(infobox))
}

/// Trimmed text of the first matching node, or None when empty.
fn first_text(sel: &Selection) -> Option<String> {
    let node = sel.nodes().first()?;
    let text = Selection::from(*node).text();
    let text = text.trim();
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

/// Variant hint: the first class token that is not "infobox" itself.
fn infobox_kind(infobox: &Selection) -> String {
    class(infobox)
        .split_ascii_whitespace()
        .find(|token| !token.contains("infobox"))
        .unwrap_or("infobox")
        .to_string()
}

fn extract_toc(doc: &Document) -> Option<Vec<TocEntry>> {
    let toc = doc.select("#toc, .toc");
    if !toc.exists() {
        return None;
    }
    // The first child list of the container; nested lists are handled
    // recursively per entry.
    let top_list = toc.select("ul, ol");
    let first_list = top_list.nodes().first().map(|node| Selection::from(*node))?;
    let entries = toc_entries(&first_list, 1);
    if entries.is_empty() {
        None
    } else {
        Some(entries)
    }
}

fn toc_entries(list: &Selection, depth: usize) -> Vec<TocEntry> {
    if depth > MAX_TOC_DEPTH {
        return Vec::new();
    }
    let mut entries = Vec::new();
    for li_node in list.children().nodes() {
        let li = Selection::from(*li_node);
        if tag(&li) != "li" {
            continue;
        }
        let mut text = String::new();
        let mut href = String::new();
        let mut children = Vec::new();
        for child_node in li.children().nodes() {
            let child = Selection::from(*child_node);
            match tag(&child).as_str() {
                "a" if href.is_empty() => {
                    text = dom::text_content(&child).trim().to_string();
                    href = attr(&child, "href");
                }
                "ul" | "ol" => {
                    children.extend(toc_entries(&child, depth + 1));
                }
                _ => {}
            }
        }
        if !text.is_empty() {
            entries.push(TocEntry { text, href, children });
        }
    }
    entries
}
