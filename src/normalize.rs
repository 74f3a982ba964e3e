//! Reference normalizer.
//!
//! Rewrites relative image sources and link targets to absolute URLs,
//! drops small thumbnail figures, and applies the link-stripping policy:
//! edit links, self links and internal wiki links collapse to their visible
//! text, table-of-contents anchors are preserved and absolutized, and
//! external links to foreign hosts pass through verbatim.

use dom_query::{Document, Selection};
use url::Url;

use crate::dom;
use crate::options::Options;
use crate::patterns::{EDIT_LINK_HREF, PAGE_NAME_WHITESPACE, WIKI_PATH_HREF};
use crate::selector::preserve;
use crate::selector::utils::{attr, class_contains, has_class};

/// How an anchor is treated by the normalizer.
///
/// Classification order is load-bearing: later variants assume earlier ones
/// did not match (e.g. the external check only sees anchors that are not
/// edit, self or in-page links).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    /// Opens the wiki editor, including red links to missing pages.
    Edit,
    /// Links back to the page itself.
    SelfLink,
    /// In-page anchor inside the table-of-contents subtree; preserved.
    TocAnchor,
    /// Any other link into the wiki (articles, in-page anchors in prose).
    InternalWiki,
    /// Absolute link whose host is not the wiki's own; preserved verbatim.
    External,
}

/// Normalize links and images in place.
pub fn normalize(doc: &Document, page: &str, options: &Options) {
    normalize_images(doc, options);
    normalize_anchors(doc, page, options);
}

/// Classify an anchor by href, class and position.
#[must_use]
pub fn classify_anchor(sel: &Selection, options: &Options) -> LinkKind {
    let href = attr(sel, "href");

    if EDIT_LINK_HREF.is_match(&href) || has_class(sel, "new") {
        return LinkKind::Edit;
    }
    if href.is_empty() || href == "#" || class_contains(sel, "mw-selflink") {
        return LinkKind::SelfLink;
    }
    if href.starts_with('#') {
        if preserve::is_within_toc(sel) {
            return LinkKind::TocAnchor;
        }
        return LinkKind::InternalWiki;
    }
    if WIKI_PATH_HREF.is_match(&href) {
        return LinkKind::InternalWiki;
    }
    if let Ok(url) = Url::parse(&href) {
        if url.host_str().is_some_and(|host| host != options.wiki_host) {
            return LinkKind::External;
        }
        // Absolute URL back into the wiki's own host. Inside the toc this
        // is an already-normalized anchor; reprocessing must keep it.
        if preserve::is_within_toc(sel) {
            return LinkKind::TocAnchor;
        }
        return LinkKind::InternalWiki;
    }
    // Relative paths with no wiki shape: demote to plain text like any
    // other internal reference.
    LinkKind::InternalWiki
}

fn normalize_anchors(doc: &Document, page: &str, options: &Options) {
    let anchors: Vec<Selection> = doc
        .select("a")
        .nodes()
        .iter()
        .map(|node| Selection::from(*node))
        .collect();

    for anchor in anchors {
        match classify_anchor(&anchor, options) {
            LinkKind::Edit | LinkKind::SelfLink | LinkKind::InternalWiki => {
                let text = dom::text_content(&anchor);
                let text = text.trim();
                if text.is_empty() {
                    anchor.remove();
                } else {
                    anchor.replace_with_html(dom::escape_text(text));
                }
            }
            LinkKind::TocAnchor => {
                let href = attr(&anchor, "href");
                if href.starts_with('#') {
                    let absolute = absolutize_fragment(&href, page, options);
                    dom::set_attribute(&anchor, "href", &absolute);
                }
            }
            LinkKind::External => {}
        }
    }
}

/// Rewrite an in-page `#fragment` href to an absolute article URL.
fn absolutize_fragment(href: &str, page: &str, options: &Options) -> String {
    let page_path = PAGE_NAME_WHITESPACE.replace_all(page.trim(), "_");
    let path = format!("/wiki/{page_path}{href}");
    match Url::parse(&options.base_url).and_then(|base| base.join(&path)) {
        Ok(url) => url.to_string(),
        Err(_) => path,
    }
}

fn normalize_images(doc: &Document, options: &Options) {
    let images: Vec<Selection> = doc
        .select("img")
        .nodes()
        .iter()
        .map(|node| Selection::from(*node))
        .collect();

    for img in images {
        let src = attr(&img, "src");
        if src.starts_with('/') {
            if let Ok(base) = Url::parse(&options.base_url) {
                if let Ok(absolute) = base.join(&src) {
                    dom::set_attribute(&img, "src", absolute.as_str());
                }
            }
        }

        if options.drop_small_images && is_small_image(&img, options.min_image_size) {
            remove_figure_wrapper(&img);
        }
    }
}

/// An image is small when either declared dimension is present and below
/// the threshold. A missing dimension never counts as small.
fn is_small_image(img: &Selection, min_size: u32) -> bool {
    let below = |name: &str| {
        dom::get_attribute(img, name)
            .and_then(|v| v.trim().parse::<u32>().ok())
            .is_some_and(|v| v < min_size)
    };
    below("width") || below("height")
}

/// Remove the outermost enclosing figure/caption wrapper, or the image
/// itself when it has none.
fn remove_figure_wrapper(img: &Selection) {
    let mut wrapper: Option<Selection> = None;
    let mut current = img.parent();
    while current.exists() {
        if preserve::preserve_rule_figure(&current) {
            wrapper = Some(current.clone());
            current = current.parent();
        } else {
            break;
        }
    }
    match wrapper {
        Some(sel) => sel.remove(),
        None => img.remove(),
    }
}
