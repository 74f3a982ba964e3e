//! Pipeline orchestrator.
//!
//! Composes sanitizer → normalizer → extractor → markdown engine → cache
//! into the page-fetch-to-result flow, and decides per request which of
//! {html, markdown, both} to materialize. The transformation itself is
//! synchronous and CPU-bound; the cache is the only shared state.

use crate::cache::{CacheKey, TransformCache};
use crate::components;
use crate::error::{Error, Result};
use crate::markdown;
use crate::normalize;
use crate::options::Options;
use crate::result::{OutputFormat, PageMeta, RenderedOutput};
use crate::sanitize;

/// Cached transformation pipeline.
///
/// Owns the cache; each `transform_page` call works on its own private
/// tree, so a `Pipeline` can be shared across worker tasks.
pub struct Pipeline {
    options: Options,
    cache: TransformCache,
}

impl Pipeline {
    #[must_use]
    pub fn new(options: Options) -> Self {
        let cache = TransformCache::new(
            options.cache_enabled,
            options.cache_max_entries,
            options.cache_ttl,
        );
        Self { options, cache }
    }

    #[must_use]
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// The memoization cache, exposed for eviction and observability.
    #[must_use]
    pub fn cache(&self) -> &TransformCache {
        &self.cache
    }

    /// Transform a page, serving from the cache when possible.
    pub fn transform_page(
        &self,
        html: &str,
        meta: &PageMeta,
        format: OutputFormat,
    ) -> Result<RenderedOutput> {
        // A `both` request is satisfiable by a markdown entry, which always
        // carries the html rendering too.
        let lookup = match format {
            OutputFormat::Both => OutputFormat::Markdown,
            concrete => concrete,
        };
        let key = CacheKey::new(&meta.page, lookup);
        if let Some(hit) = self.cache.get(&key) {
            if cfg!(debug_assertions) {
                eprintln!("DEBUG: cache hit for '{}' ({})", meta.page, lookup.as_str());
            }
            return Ok(hit);
        }

        let output = run_pipeline(html, meta, format, &self.options)?;
        self.store(meta, format, &output);
        Ok(output)
    }

    fn store(&self, meta: &PageMeta, format: OutputFormat, output: &RenderedOutput) {
        match format {
            OutputFormat::Html => {
                self.cache
                    .set(CacheKey::new(&meta.page, OutputFormat::Html), output.clone());
            }
            OutputFormat::Markdown => {
                self.cache.set(
                    CacheKey::new(&meta.page, OutputFormat::Markdown),
                    output.clone(),
                );
            }
            OutputFormat::Both => {
                self.cache.set(
                    CacheKey::new(&meta.page, OutputFormat::Markdown),
                    output.clone(),
                );
                let html_only = RenderedOutput {
                    markdown: None,
                    ..output.clone()
                };
                self.cache
                    .set(CacheKey::new(&meta.page, OutputFormat::Html), html_only);
            }
        }
    }
}

/// Run the transformation stages once, without touching any cache.
pub(crate) fn run_pipeline(
    html: &str,
    meta: &PageMeta,
    format: OutputFormat,
    options: &Options,
) -> Result<RenderedOutput> {
    if cfg!(debug_assertions) {
        eprintln!(
            "DEBUG: transforming '{}' ({} chars, {})",
            meta.page,
            html.len(),
            format.as_str()
        );
    }

    let doc = sanitize::sanitize(html, &meta.page)?;
    normalize::normalize(&doc, &meta.page, options);

    // The structural markers were present on entry; if sanitization ate
    // them all, the page's content container carried chrome classes and
    // there is nothing left worth returning.
    if !doc.select(sanitize::CONTENT_MARKERS).exists() {
        return Err(Error::ExtractionError {
            page: meta.page.clone(),
            reason: "content container missing after sanitization".to_string(),
        });
    }

    let components = components::extract(&doc);
    let stats = components::page_stats(&doc, &components, options);

    let markdown = if format.wants_markdown() {
        Some(markdown::render(&doc, &meta.page)?)
    } else {
        None
    };

    Ok(RenderedOutput {
        html: sanitize::serialize(&doc),
        markdown,
        components,
        stats,
    })
}
