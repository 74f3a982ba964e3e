//! Removal rules for wiki page chrome.
//!
//! Elements matching any of these rules are deleted by the sanitizer.
//! The rules are independent of one another: no rule targets the output of
//! another rule, so application order does not affect the result.

use crate::selector::utils::{attr, class, class_contains, has_class, id, tag};
use crate::selector::Rule;
use dom_query::Selection;

/// All removal rules, applied by the sanitizer.
pub static REMOVAL_RULES: &[Rule] = &[
    removal_rule_edit_sections,
    removal_rule_scripts_and_styles,
    removal_rule_navigation,
    removal_rule_site_chrome,
    removal_rule_citation_backlinks,
    removal_rule_collapsible_toggles,
    removal_rule_hidden_metadata,
];

/// Edit-section markers rendered next to every heading.
#[must_use]
pub fn removal_rule_edit_sections(sel: &Selection) -> bool {
    tag(sel) == "span" && class_contains(sel, "mw-editsection")
}

/// Script, style and related non-content nodes.
#[must_use]
pub fn removal_rule_scripts_and_styles(sel: &Selection) -> bool {
    matches!(tag(sel).as_str(), "script" | "style" | "noscript" | "link" | "meta")
}

/// Navigation boxes and site navigation menus.
///
/// Matches the skin-level navigation containers plus inline navbox tables
/// that templates drop at the bottom of articles.
#[must_use]
pub fn removal_rule_navigation(sel: &Selection) -> bool {
    let tag_val = tag(sel);
    if tag_val == "nav" {
        return true;
    }
    let id_val = id(sel);
    if matches!(
        id_val.as_str(),
        "mw-navigation" | "mw-panel" | "mw-head" | "p-search" | "jump-to-nav"
    ) {
        return true;
    }
    has_class(sel, "navbox")
        || class_contains(sel, "vector-menu")
        || class_contains(sel, "mw-jump-link")
        || attr(sel, "role") == "navigation"
}

/// Site chrome and page metadata outside the article body.
#[must_use]
pub fn removal_rule_site_chrome(sel: &Selection) -> bool {
    let id_val = id(sel);
    if matches!(
        id_val.as_str(),
        "siteSub" | "contentSub" | "contentSub2" | "footer" | "catlinks" | "siteNotice"
    ) {
        return true;
    }
    let class_val = class(sel);
    class_val.contains("printfooter")
        || class_val.contains("sistersitebox")
        || class_val.contains("mw-indicators")
        || class_val.contains("mw-hidden-catlinks")
}

/// Backlinks from a footnote body to its citation markers ("^ a b c").
#[must_use]
pub fn removal_rule_citation_backlinks(sel: &Selection) -> bool {
    class_contains(sel, "mw-cite-backlink")
}

/// Show/hide controls injected into collapsible tables.
#[must_use]
pub fn removal_rule_collapsible_toggles(sel: &Selection) -> bool {
    class_contains(sel, "mw-collapsible-toggle")
}

/// Hidden metadata wrappers and print-only noise.
#[must_use]
pub fn removal_rule_hidden_metadata(sel: &Selection) -> bool {
    has_class(sel, "noprint") || has_class(sel, "mw-empty-elt") || has_class(sel, "metadata")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom;

    #[test]
    fn edit_section_span_matches() {
        let doc = dom::parse(r#"<h2>History<span class="mw-editsection">[edit]</span></h2>"#);
        assert!(removal_rule_edit_sections(&doc.select("span")));
        assert!(!removal_rule_edit_sections(&doc.select("h2")));
    }

    #[test]
    fn navbox_and_nav_tag_match() {
        let doc = dom::parse(
            r#"<nav>menu</nav><table class="navbox mw-collapsible"><tr><td>links</td></tr></table>"#,
        );
        assert!(removal_rule_navigation(&doc.select("nav")));
        assert!(removal_rule_navigation(&doc.select("table")));
    }

    #[test]
    fn infobox_table_is_not_navigation() {
        let doc = dom::parse(r#"<table class="infobox vcard"><tr><td>x</td></tr></table>"#);
        assert!(!removal_rule_navigation(&doc.select("table")));
    }

    #[test]
    fn site_chrome_ids_match() {
        let doc = dom::parse(r#"<div id="siteSub">From the free encyclopedia</div>"#);
        assert!(removal_rule_site_chrome(&doc.select("div")));
    }

    #[test]
    fn cite_backlink_matches() {
        let doc = dom::parse(r##"<span class="mw-cite-backlink"><a href="#ref">^</a></span>"##);
        assert!(removal_rule_citation_backlinks(&doc.select("span")));
    }

    #[test]
    fn plain_paragraph_matches_no_rule() {
        let doc = dom::parse("<p>Just prose.</p>");
        let p = doc.select("p");
        assert!(!crate::selector::matches_any(&p, REMOVAL_RULES));
    }
}
