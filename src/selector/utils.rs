//! Helper functions shared by selector rules.
//!
//! Rules read tag, id and class as plain strings; these helpers keep the
//! rule bodies terse and total (missing attributes become empty strings).

use crate::dom;
use dom_query::Selection;

/// Tag name (empty string if missing).
#[inline]
#[must_use]
pub fn tag(sel: &Selection) -> String {
    dom::tag_name(sel).unwrap_or_default()
}

/// Element id attribute (empty string if missing).
#[inline]
#[must_use]
pub fn id(sel: &Selection) -> String {
    dom::id(sel).unwrap_or_default()
}

/// Element class attribute (empty string if missing).
#[inline]
#[must_use]
pub fn class(sel: &Selection) -> String {
    dom::class_name(sel).unwrap_or_default()
}

/// Any attribute (empty string if missing).
#[inline]
#[must_use]
pub fn attr(sel: &Selection, name: &str) -> String {
    dom::get_attribute(sel, name).unwrap_or_default()
}

/// Whether the class attribute contains `name` as a whole class token.
#[must_use]
pub fn has_class(sel: &Selection, name: &str) -> bool {
    class(sel).split_ascii_whitespace().any(|c| c == name)
}

/// Whether any class token contains `fragment` as a substring.
#[must_use]
pub fn class_contains(sel: &Selection, fragment: &str) -> bool {
    class(sel).contains(fragment)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom;

    #[test]
    fn attribute_helpers_default_to_empty() {
        let doc = dom::parse("<p>x</p>");
        let p = doc.select("p");
        assert_eq!(tag(&p), "p");
        assert_eq!(id(&p), "");
        assert_eq!(class(&p), "");
        assert_eq!(attr(&p, "href"), "");
    }

    #[test]
    fn has_class_matches_whole_tokens_only() {
        let doc = dom::parse(r#"<div class="toc navbox-inner">x</div>"#);
        let div = doc.select("div");
        assert!(has_class(&div, "toc"));
        assert!(!has_class(&div, "navbox"));
        assert!(class_contains(&div, "navbox"));
    }
}
