//! `rs-wikimark` turns raw MediaWiki page HTML into clean HTML and
//! GitHub-flavored Markdown.
//!
//! The pipeline sanitizes site chrome out of the tree, normalizes image
//! and link references, extracts structured components (sections, images,
//! tables, infoboxes, table of contents), renders Markdown through a
//! per-node rule engine, and memoizes results in a bounded LRU+TTL cache.
//!
//! # Example
//!
//! ```
//! use rs_wikimark::{transform, OutputFormat, PageMeta};
//!
//! let html = r#"<div id="content">
//!     <h1>Tokyo</h1>
//!     <p>Tokyo is the capital of Japan.</p>
//! </div>"#;
//!
//! let result = transform(html, &PageMeta::new("Tokyo"), OutputFormat::Both)?;
//! assert!(result.markdown.as_deref().is_some_and(|md| md.contains("# Tokyo")));
//! assert_eq!(result.stats.section_count, result.components.sections.len());
//! # Ok::<(), rs_wikimark::Error>(())
//! ```
//!
//! For repeated transformations of the same pages, construct a
//! [`Pipeline`] once and call [`Pipeline::transform_page`]; the free
//! functions below never cache.

mod cache;
mod components;
pub mod dom;
mod encoding;
mod error;
mod markdown;
mod normalize;
mod options;
mod patterns;
mod pipeline;
mod result;
mod sanitize;
pub mod selector;

pub use cache::{normalize_page_name, CacheKey, CacheStats, TransformCache};
pub use components::{
    ContentComponents, ImageRecord, InfoboxRecord, Section, TableRecord, TocEntry,
};
pub use encoding::{decode_html, sniff_charset};
pub use error::{Error, Result};
pub use markdown::NodeKind;
pub use normalize::LinkKind;
pub use options::Options;
pub use pipeline::Pipeline;
pub use result::{OutputFormat, PageMeta, PageStats, RenderedOutput};

/// Transform one page with default [`Options`] and no caching.
pub fn transform(html: &str, meta: &PageMeta, format: OutputFormat) -> Result<RenderedOutput> {
    transform_with_options(html, meta, format, &Options::default())
}

/// Transform one page with explicit [`Options`] and no caching.
pub fn transform_with_options(
    html: &str,
    meta: &PageMeta,
    format: OutputFormat,
    options: &Options,
) -> Result<RenderedOutput> {
    pipeline::run_pipeline(html, meta, format, options)
}

/// Transform a raw byte buffer, sniffing its charset first. Convenience
/// for callers holding an undecoded fetch body.
pub fn transform_bytes(
    html: &[u8],
    meta: &PageMeta,
    format: OutputFormat,
) -> Result<RenderedOutput> {
    transform_bytes_with_options(html, meta, format, &Options::default())
}

/// Byte-buffer variant of [`transform_with_options`].
pub fn transform_bytes_with_options(
    html: &[u8],
    meta: &PageMeta,
    format: OutputFormat,
    options: &Options,
) -> Result<RenderedOutput> {
    let decoded = encoding::decode_html(html);
    pipeline::run_pipeline(&decoded, meta, format, options)
}
