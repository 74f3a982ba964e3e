//! Configuration options for the transformation pipeline.
//!
//! The `Options` struct controls link/image normalization and caching.
//! All fields are public; use `Default::default()` for standard settings.

use std::time::Duration;

/// Configuration options for page transformation.
///
/// # Example
///
/// ```rust
/// use rs_wikimark::Options;
///
/// // Use defaults
/// let options = Options::default();
///
/// // Customize specific fields
/// let options = Options {
///     min_image_size: 100,
///     drop_small_images: true,
///     ..Options::default()
/// };
/// ```
#[derive(Debug, Clone)]
pub struct Options {
    /// Base origin used to resolve root-relative links and image sources.
    ///
    /// Default: `"https://en.wikipedia.org"`
    pub base_url: String,

    /// Host treated as the wiki's own. Anchors pointing at this host are
    /// internal wiki links; anchors to any other host are external and
    /// preserved verbatim.
    ///
    /// Default: `"en.wikipedia.org"`
    pub wiki_host: String,

    /// Remove figure/caption wrappers around images whose declared width
    /// or height is below `min_image_size`. An image with no declared
    /// dimensions is never dropped on this basis.
    ///
    /// Default: `true`
    pub drop_small_images: bool,

    /// Minimum declared pixel dimension for an image to survive the
    /// small-image drop.
    ///
    /// Default: `50`
    pub min_image_size: u32,

    /// Minimum character length for a token to count toward the word count.
    ///
    /// Default: `2`
    pub min_word_length: usize,

    /// Memoize pipeline output in the bounded cache.
    ///
    /// Default: `true`
    pub cache_enabled: bool,

    /// Maximum number of cache entries before LRU eviction kicks in.
    ///
    /// Default: `100`
    pub cache_max_entries: usize,

    /// Default time-to-live for cache entries. Per-call overrides are
    /// available through `TransformCache::set_with_ttl`.
    ///
    /// Default: 1 hour
    pub cache_ttl: Duration,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            base_url: "https://en.wikipedia.org".to_string(),
            wiki_host: "en.wikipedia.org".to_string(),
            drop_small_images: true,
            min_image_size: 50,
            min_word_length: 2,
            cache_enabled: true,
            cache_max_entries: 100,
            cache_ttl: Duration::from_secs(3600),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_options() {
        let opts = Options::default();
        assert_eq!(opts.base_url, "https://en.wikipedia.org");
        assert_eq!(opts.wiki_host, "en.wikipedia.org");
        assert!(opts.drop_small_images);
        assert_eq!(opts.min_image_size, 50);
        assert_eq!(opts.min_word_length, 2);
        assert!(opts.cache_enabled);
        assert_eq!(opts.cache_max_entries, 100);
        assert_eq!(opts.cache_ttl, Duration::from_secs(3600));
    }

    #[test]
    fn options_can_be_customized() {
        let opts = Options {
            base_url: "https://de.wikipedia.org".to_string(),
            wiki_host: "de.wikipedia.org".to_string(),
            drop_small_images: false,
            cache_max_entries: 10,
            ..Options::default()
        };
        assert_eq!(opts.wiki_host, "de.wikipedia.org");
        assert!(!opts.drop_small_images);
        assert_eq!(opts.cache_max_entries, 10);
    }
}
