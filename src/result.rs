//! Result types for transformation output.
//!
//! The pipeline returns a `RenderedOutput` per request: the cleaned HTML,
//! the optional Markdown rendering, the harvested components, and summary
//! statistics. Everything here is immutable once produced and serializable
//! for caller-side JSON assembly.

use serde::{Deserialize, Serialize};

use crate::components::ContentComponents;

/// Lightweight page metadata handed in by the fetch layer.
///
/// The pipeline does not own or validate this beyond using the page
/// identity for cache keys and error context.
#[derive(Debug, Clone, Default)]
pub struct PageMeta {
    /// Requested page title / identity.
    pub page: String,

    /// Wiki namespace, if known (e.g. "Talk", "Category").
    pub namespace: Option<String>,

    /// URL the raw HTML was fetched from.
    pub source_url: Option<String>,
}

impl PageMeta {
    /// Convenience constructor for the common title-only case.
    #[must_use]
    pub fn new(page: impl Into<String>) -> Self {
        Self {
            page: page.into(),
            namespace: None,
            source_url: None,
        }
    }
}

/// Which output(s) a request materializes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Html,
    Markdown,
    Both,
}

impl OutputFormat {
    /// Stable name used in cache keys.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Html => "html",
            Self::Markdown => "markdown",
            Self::Both => "both",
        }
    }

    /// Whether this format requires the Markdown rendering pass.
    #[must_use]
    pub fn wants_markdown(self) -> bool {
        matches!(self, Self::Markdown | Self::Both)
    }
}

/// Summary statistics for a transformed page.
///
/// Image/table/section counts always equal the cardinalities of the
/// corresponding `ContentComponents` sequences.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageStats {
    pub word_count: usize,
    pub image_count: usize,
    pub table_count: usize,
    pub section_count: usize,
}

/// The per-format materialized result of one pipeline invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderedOutput {
    /// Cleaned and link-normalized markup.
    pub html: String,

    /// Rendered Markdown, present when the request asked for it.
    pub markdown: Option<String>,

    /// Structured records harvested from the cleaned tree.
    pub components: ContentComponents,

    /// Summary statistics.
    pub stats: PageStats,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_format_cache_names_are_stable() {
        assert_eq!(OutputFormat::Html.as_str(), "html");
        assert_eq!(OutputFormat::Markdown.as_str(), "markdown");
        assert_eq!(OutputFormat::Both.as_str(), "both");
    }

    #[test]
    fn both_and_markdown_want_markdown() {
        assert!(OutputFormat::Both.wants_markdown());
        assert!(OutputFormat::Markdown.wants_markdown());
        assert!(!OutputFormat::Html.wants_markdown());
    }

    #[test]
    fn page_meta_new_sets_title_only() {
        let meta = PageMeta::new("Tokyo");
        assert_eq!(meta.page, "Tokyo");
        assert!(meta.namespace.is_none());
        assert!(meta.source_url.is_none());
    }
}
