//! Preservation rules for structures the pipeline must keep.
//!
//! A node matching a preserve rule survives the sanitizer's empty-leaf
//! sweep on pattern match alone, whether or not it currently holds visible
//! content. The extractor and the Markdown engine both key off these same
//! patterns.

use crate::selector::utils::{class_contains, has_class, id, tag};
use crate::selector::Rule;
use dom_query::Selection;

/// All preservation rules, honored by the sanitizer's empty-leaf sweep.
pub static PRESERVE_RULES: &[Rule] = &[
    preserve_rule_infobox,
    preserve_rule_toc,
    preserve_rule_content_container,
    preserve_rule_figure,
];

/// Info boxes: the structured summary table at the top of an article.
#[must_use]
pub fn preserve_rule_infobox(sel: &Selection) -> bool {
    class_contains(sel, "infobox") || (has_class(sel, "sidebar") && has_class(sel, "vcard"))
}

/// Table of contents container.
#[must_use]
pub fn preserve_rule_toc(sel: &Selection) -> bool {
    id(sel) == "toc" || has_class(sel, "toc")
}

/// Main content containers identifying a genuine article document.
#[must_use]
pub fn preserve_rule_content_container(sel: &Selection) -> bool {
    matches!(id(sel).as_str(), "content" | "mw-content-text" | "bodyContent")
        || has_class(sel, "mw-parser-output")
        || has_class(sel, "mw-body")
}

/// Image figure wrappers (thumbnails with captions).
#[must_use]
pub fn preserve_rule_figure(sel: &Selection) -> bool {
    tag(sel) == "figure"
        || has_class(sel, "thumb")
        || has_class(sel, "thumbinner")
        || has_class(sel, "thumbcaption")
}

/// Whether `sel` sits inside the table-of-contents subtree (itself included).
///
/// Walks ancestors instead of comparing node identities, which keeps the
/// check usable from any stage that only holds a `Selection`.
#[must_use]
pub fn is_within_toc(sel: &Selection) -> bool {
    if preserve_rule_toc(sel) {
        return true;
    }
    let mut current = sel.parent();
    while current.exists() {
        if preserve_rule_toc(&current) {
            return true;
        }
        current = current.parent();
    }
    false
}

/// Whether `sel` sits inside (or is) an image figure wrapper.
#[must_use]
pub fn is_within_figure(sel: &Selection) -> bool {
    if preserve_rule_figure(sel) {
        return true;
    }
    let mut current = sel.parent();
    while current.exists() {
        if preserve_rule_figure(&current) {
            return true;
        }
        current = current.parent();
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom;

    #[test]
    fn infobox_classes_match() {
        let doc = dom::parse(r#"<table class="infobox geography vcard"><tr><td>x</td></tr></table>"#);
        assert!(preserve_rule_infobox(&doc.select("table")));
    }

    #[test]
    fn toc_by_id_and_class() {
        let doc = dom::parse(r#"<div id="toc" class="toc"><ul></ul></div>"#);
        assert!(preserve_rule_toc(&doc.select("#toc")));
    }

    #[test]
    fn content_container_matches() {
        let doc = dom::parse(r#"<div class="mw-parser-output"><p>x</p></div>"#);
        assert!(preserve_rule_content_container(&doc.select("div")));
    }

    #[test]
    fn is_within_toc_walks_ancestors() {
        let doc = dom::parse(
            r##"<div id="toc"><ul><li><a href="#History">History</a></li></ul></div>
               <p><a href="#Culture">Culture</a></p>"##,
        );
        assert!(is_within_toc(&doc.select("#toc a")));
        assert!(!is_within_toc(&doc.select("p a")));
    }

    #[test]
    fn figure_wrappers_match() {
        let doc = dom::parse(
            r#"<div class="thumb tright"><div class="thumbinner"><img src="/a.png"></div></div>"#,
        );
        assert!(preserve_rule_figure(&doc.select(".thumb")));
        assert!(is_within_figure(&doc.select("img")));
    }
}
