//! Document sanitizer.
//!
//! Loads raw HTML into a mutable tree, verifies it looks like a genuine
//! article document, deletes chrome matching the removal rules, and strips
//! empty leaf elements in a single bounded pass. Serialization collapses
//! redundant blank lines.

use crate::dom::{self, Document};
use crate::error::{Error, Result};
use crate::patterns::MULTIPLE_NEWLINES;
use crate::selector::{self, preserve, removal, utils};

/// Structural markers identifying a genuine content document. At least one
/// must be present or the input is rejected as foreign HTML (error pages,
/// unrelated sites).
pub(crate) const CONTENT_MARKERS: &str = "#content, #mw-content-text, .mw-parser-output, h1";

/// Sanitize raw HTML into a cleaned document tree.
///
/// Fails with `InvalidDocument` when the input is empty or carries none of
/// the recognized content markers.
pub fn sanitize(html: &str, page: &str) -> Result<Document> {
    if html.trim().is_empty() {
        return Err(Error::InvalidDocument {
            page: page.to_string(),
            reason: "empty input".to_string(),
        });
    }

    let doc = dom::parse(html);
    if !doc.select(CONTENT_MARKERS).exists() {
        return Err(Error::InvalidDocument {
            page: page.to_string(),
            reason: "no recognized content markers".to_string(),
        });
    }

    apply_removal_rules(&doc);
    drop_empty_leaves(&doc);
    Ok(doc)
}

/// Delete every node matching a removal rule.
///
/// Rules are independent, so matches are collected per rule and removed;
/// ordering between rules does not change the outcome.
fn apply_removal_rules(doc: &Document) {
    let root = doc.select("html");
    for rule in removal::REMOVAL_RULES {
        for sel in selector::query_all(&root, *rule) {
            sel.remove();
        }
    }
}

/// Remove empty leaf elements (`p`/`div`/`span` with no children and no
/// text) in one pass over a snapshot of candidates.
///
/// Known limitation, kept deliberately: parents that become empty because
/// their last child was swept here are NOT re-checked, so a deeply nested
/// stack of empty wrappers can survive one level per sanitization.
fn drop_empty_leaves(doc: &Document) {
    let root = doc.select("html");
    let candidates = selector::query_all(&root, is_empty_leaf);
    for sel in candidates {
        if !selector::matches_any(&sel, preserve::PRESERVE_RULES) {
            sel.remove();
        }
    }
}

fn is_empty_leaf(sel: &dom_query::Selection) -> bool {
    matches!(utils::tag(sel).as_str(), "p" | "div" | "span")
        && sel.children().is_empty()
        && dom::text_content(sel).trim().is_empty()
}

/// Serialize a sanitized document, collapsing runs of 3+ newlines down to
/// a single blank line.
#[must_use]
pub fn serialize(doc: &Document) -> String {
    let html = doc.html().to_string();
    MULTIPLE_NEWLINES.replace_all(&html, "\n\n").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_input() {
        let err = sanitize("", "Tokyo").err().unwrap();
        assert!(matches!(err, Error::InvalidDocument { .. }));
        let err = sanitize("   \n ", "Tokyo").err().unwrap();
        assert!(matches!(err, Error::InvalidDocument { .. }));
    }

    #[test]
    fn rejects_foreign_html() {
        let err = sanitize("<html><body><p>404 not found</p></body></html>", "Tokyo").err().unwrap();
        assert!(matches!(err, Error::InvalidDocument { .. }));
    }

    #[test]
    fn accepts_any_single_marker() {
        assert!(sanitize("<h1>Tokyo</h1><p>text</p>", "Tokyo").is_ok());
        assert!(sanitize(r#"<div id="content"><p>text</p></div>"#, "Tokyo").is_ok());
        assert!(sanitize(r#"<div class="mw-parser-output"><p>text</p></div>"#, "Tokyo").is_ok());
    }

    #[test]
    fn removes_edit_sections_and_navboxes() {
        let html = r#"<div id="content">
            <h2>History<span class="mw-editsection">[edit]</span></h2>
            <table class="navbox"><tbody><tr><td>nav links</td></tr></tbody></table>
            <p>prose</p>
        </div>"#;
        let doc = sanitize(html, "Tokyo").unwrap();
        assert!(!doc.select("span.mw-editsection").exists());
        assert!(!doc.select("table.navbox").exists());
        assert!(doc.select("p").exists());
    }

    #[test]
    fn sweeps_empty_leaves_but_keeps_preserved_nodes() {
        let html = r#"<div id="content">
            <p></p>
            <span></span>
            <div id="toc" class="toc"></div>
            <p>kept</p>
        </div>"#;
        let doc = sanitize(html, "Tokyo").unwrap();
        assert!(doc.select("#toc").exists());
        let paragraphs = doc.select("p");
        assert_eq!(paragraphs.length(), 1);
        assert!(!doc.select("#content > span").exists());
    }

    #[test]
    fn empty_leaf_sweep_is_single_pass() {
        // The outer div only becomes empty after its child p is swept, so it
        // survives this sanitization.
        let html = r#"<div id="content"><div class="wrapper"><p></p></div><p>x</p></div>"#;
        let doc = sanitize(html, "Tokyo").unwrap();
        assert!(doc.select("div.wrapper").exists());
        assert!(!doc.select("div.wrapper p").exists());
    }

    #[test]
    fn no_removal_match_survives_and_preserved_nodes_remain() {
        let html = r##"<div id="content">
            <table class="infobox"><tbody><tr><th>Name</th><td>Tokyo</td></tr></tbody></table>
            <div id="toc" class="toc"><ul><li><a href="#a">A</a></li></ul></div>
            <h2>Section<span class="mw-editsection">[edit]</span></h2>
            <nav>menu</nav>
            <div class="navbox">nav</div>
            <p>prose</p>
        </div>"##;
        let doc = sanitize(html, "Tokyo").unwrap();
        let root = doc.select("html");
        for rule in removal::REMOVAL_RULES {
            assert!(selector::query_all(&root, *rule).is_empty());
        }
        assert!(doc.select(".infobox").exists());
        assert!(doc.select("#toc").exists());
        assert!(doc.select("#content").exists());
    }

    #[test]
    fn serialize_collapses_blank_line_runs() {
        let doc = dom::parse("<div id=\"content\"><pre>a\n\n\n\n\nb</pre></div>");
        let out = serialize(&doc);
        assert!(out.contains("a\n\nb"));
    }
}
