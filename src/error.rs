//! Error types for the transformation pipeline.
//!
//! Every failure carries the page identity and a reason so callers can map
//! it to a user-facing response without re-parsing anything. None of these
//! are retried inside the pipeline; retry policy lives in the fetch layer.

/// Error type for pipeline operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Input failed the structural sanity check: empty, not HTML, or missing
    /// every recognized content marker (main container, primary heading,
    /// parser-output wrapper).
    #[error("invalid document for page '{page}': {reason}")]
    InvalidDocument { page: String, reason: String },

    /// The primary content container disappeared after sanitization.
    /// Fatal for the request; never produces partial output.
    #[error("extraction failed for page '{page}': {reason}")]
    ExtractionError { page: String, reason: String },

    /// Markdown rendering received a non-renderable input.
    #[error("markdown conversion failed for page '{page}': {reason}")]
    ConversionError { page: String, reason: String },
}

impl Error {
    /// Page identity the failure belongs to.
    #[must_use]
    pub fn page(&self) -> &str {
        match self {
            Self::InvalidDocument { page, .. }
            | Self::ExtractionError { page, .. }
            | Self::ConversionError { page, .. } => page,
        }
    }
}

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages_include_page_and_reason() {
        let err = Error::InvalidDocument {
            page: "Rust_(programming_language)".to_string(),
            reason: "empty input".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("Rust_(programming_language)"));
        assert!(msg.contains("empty input"));
        assert_eq!(err.page(), "Rust_(programming_language)");
    }
}
