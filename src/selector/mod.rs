//! Selector rule infrastructure.
//!
//! Removal and preservation of document substructures is driven by small
//! predicate functions over a `Selection`. Rules are pure data plus a match
//! test; the sanitizer decides what to do with matches.

use dom_query::Selection;

pub mod preserve;
pub mod removal;
pub mod utils;

/// A selector rule: tests whether a selection matches a structural pattern.
pub type Rule = fn(&Selection) -> bool;

/// Collect all descendants of `root` matching `rule`, in document order.
///
/// # Example
///
/// ```rust
/// use rs_wikimark::selector::{self, utils};
/// use rs_wikimark::dom;
///
/// let doc = dom::parse(r#"<div><span class="mw-editsection">edit</span></div>"#);
/// let root = doc.select("div");
///
/// fn is_edit_marker(sel: &dom_query::Selection) -> bool {
///     utils::class(sel).contains("mw-editsection")
/// }
///
/// let matches = selector::query_all(&root, is_edit_marker);
/// assert_eq!(matches.len(), 1);
/// ```
#[must_use]
pub fn query_all<'a>(root: &Selection<'a>, rule: Rule) -> Vec<Selection<'a>> {
    let mut matches = Vec::new();
    for node in root.select("*").nodes() {
        let sel = Selection::from(*node);
        if rule(&sel) {
            matches.push(sel);
        }
    }
    matches
}

/// First descendant of `root` matching `rule`, in document order.
#[must_use]
pub fn query<'a>(root: &Selection<'a>, rule: Rule) -> Option<Selection<'a>> {
    for node in root.select("*").nodes() {
        let sel = Selection::from(*node);
        if rule(&sel) {
            return Some(sel);
        }
    }
    None
}

/// Whether `sel` matches any rule in `rules`.
#[must_use]
pub fn matches_any(sel: &Selection, rules: &[Rule]) -> bool {
    rules.iter().any(|rule| rule(sel))
}
