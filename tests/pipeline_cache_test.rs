use std::time::Duration;

use rs_wikimark::{CacheKey, Options, OutputFormat, PageMeta, Pipeline};

fn page_html(title: &str, body: &str) -> String {
    format!(r#"<div id="content"><h1>{title}</h1><p>{body}</p></div>"#)
}

fn pipeline_with(max_entries: usize, ttl: Duration) -> Pipeline {
    Pipeline::new(Options {
        cache_max_entries: max_entries,
        cache_ttl: ttl,
        ..Options::default()
    })
}

#[test]
fn cached_result_is_served_without_reprocessing() {
    let pipeline = pipeline_with(10, Duration::from_secs(60));
    let meta = PageMeta::new("Tokyo");
    let first = pipeline
        .transform_page(
            &page_html("Tokyo", "the original body"),
            &meta,
            OutputFormat::Html,
        )
        .expect("first transform");
    // Different bytes for the same page: a hit means the old result comes back.
    let second = pipeline
        .transform_page(
            &page_html("Tokyo", "a changed body"),
            &meta,
            OutputFormat::Html,
        )
        .expect("second transform");
    assert_eq!(first.html, second.html);
    assert!(second.html.contains("the original body"));
}

#[test]
fn lru_eviction_respects_access_order() {
    let pipeline = pipeline_with(2, Duration::from_secs(60));
    for title in ["Alpha", "Beta"] {
        pipeline
            .transform_page(
                &page_html(title, "body"),
                &PageMeta::new(title),
                OutputFormat::Html,
            )
            .expect("transform");
    }
    // Touch Alpha so Beta is now the least recently used entry.
    pipeline
        .transform_page("ignored", &PageMeta::new("Alpha"), OutputFormat::Html)
        .expect("cache hit");
    pipeline
        .transform_page(
            &page_html("Gamma", "body"),
            &PageMeta::new("Gamma"),
            OutputFormat::Html,
        )
        .expect("transform");

    let cache = pipeline.cache();
    assert!(cache.has(&CacheKey::new("Alpha", OutputFormat::Html)));
    assert!(!cache.has(&CacheKey::new("Beta", OutputFormat::Html)));
    assert!(cache.has(&CacheKey::new("Gamma", OutputFormat::Html)));
}

#[test]
fn expired_entry_forces_reprocessing() {
    let pipeline = pipeline_with(10, Duration::from_millis(30));
    let meta = PageMeta::new("Tokyo");
    pipeline
        .transform_page(&page_html("Tokyo", "version one"), &meta, OutputFormat::Html)
        .expect("first transform");
    std::thread::sleep(Duration::from_millis(60));
    let fresh = pipeline
        .transform_page(&page_html("Tokyo", "version two"), &meta, OutputFormat::Html)
        .expect("second transform");
    assert!(fresh.html.contains("version two"));
}

#[test]
fn disabled_cache_reprocesses_every_request() {
    let pipeline = Pipeline::new(Options {
        cache_enabled: false,
        ..Options::default()
    });
    let meta = PageMeta::new("Tokyo");
    pipeline
        .transform_page(&page_html("Tokyo", "body"), &meta, OutputFormat::Html)
        .expect("transform");
    // No stored entry: garbage input now fails instead of hitting the cache.
    assert!(pipeline
        .transform_page("", &meta, OutputFormat::Html)
        .is_err());
}

#[test]
fn cache_stats_track_pipeline_usage() {
    let pipeline = pipeline_with(5, Duration::from_secs(120));
    pipeline
        .transform_page(
            &page_html("Tokyo", "body"),
            &PageMeta::new("Tokyo"),
            OutputFormat::Both,
        )
        .expect("transform");
    let stats = pipeline.cache().stats();
    assert!(stats.enabled);
    // A `both` request stores one html and one markdown entry.
    assert_eq!(stats.current_size, 2);
    assert_eq!(stats.max_size, 5);
    assert_eq!(stats.ttl_secs, 120);
}
