//! Compiled regex patterns used across the pipeline.
//!
//! All patterns are compiled once at startup using `LazyLock` and organized
//! by the stage that consumes them.

#![allow(clippy::expect_used)]

use std::sync::LazyLock;

use regex::Regex;

// =============================================================================
// Serialization / Markdown Post-processing
// =============================================================================

/// Three or more consecutive newlines (two or more blank lines).
pub static MULTIPLE_NEWLINES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{3,}").expect("MULTIPLE_NEWLINES regex"));

/// Space(s) directly before a full-width CJK punctuation mark.
pub static SPACE_BEFORE_CJK_PUNCT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r" +([，。！？；：])").expect("SPACE_BEFORE_CJK_PUNCT regex")
});

/// Space(s) directly after a full-width CJK punctuation mark.
pub static SPACE_AFTER_CJK_PUNCT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([，。！？；：]) +").expect("SPACE_AFTER_CJK_PUNCT regex")
});

/// Runs of spaces and tabs inside a line.
pub static INLINE_WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ \t]+").expect("INLINE_WHITESPACE regex"));

// =============================================================================
// Link Classification
// =============================================================================

/// Hrefs that open the wiki editor, including red links to missing pages.
pub static EDIT_LINK_HREF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:\?|&)(?:ve)?action=edit|redlink=1").expect("EDIT_LINK_HREF regex")
});

/// Internal wiki article paths (`/wiki/...` or index.php style).
pub static WIKI_PATH_HREF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^/(?:wiki/|w/index\.php)").expect("WIKI_PATH_HREF regex")
});

// =============================================================================
// Cache Keying
// =============================================================================

/// Whitespace runs in page names, normalized to a single underscore.
pub static PAGE_NAME_WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\s_]+").expect("PAGE_NAME_WHITESPACE regex"));
