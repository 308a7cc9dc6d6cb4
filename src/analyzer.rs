//! Metadata derived from a flattened body

use crate::config::ParserConfig;
use crate::types::Metadata;
use regex::Regex;
use std::sync::LazyLock;

static URL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"https?://[^\s<>"{}|\\^`\[\]]+"#).unwrap());

/// Every `http`/`https` URL in `body`, in order of appearance
#[must_use]
pub fn extract_urls(body: &str) -> Vec<String> {
    URL_REGEX
        .find_iter(body)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Derive [`Metadata`] with the default reading speed
#[must_use]
pub fn analyze(body: &str) -> Metadata {
    Metadata::from_body(body, &ParserConfig::default())
}

impl Metadata {
    /// Derive counts and reading time for `body`
    #[must_use]
    pub fn from_body(body: &str, config: &ParserConfig) -> Self {
        let word_count = body.split_whitespace().count();
        let read_minutes = word_count
            .checked_div(config.words_per_minute)
            .unwrap_or(0)
            .max(1);

        Self {
            word_count,
            char_count: body.chars().count(),
            // Attachments are never inspected
            has_attachments: false,
            url_count: URL_REGEX.find_iter(body).count(),
            estimated_read_minutes: read_minutes,
        }
    }
}
