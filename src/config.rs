//! Parser configuration.
//!
//! Every field has a default, so a partial JSON document only needs to
//! name the values it overrides.

use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Tunables for body extraction, analysis and record defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Reading speed used for `estimated_read_minutes`.
    pub words_per_minute: usize,
    /// Deepest part-tree level that is still traversed; deeper subtrees
    /// contribute nothing.
    pub max_depth: usize,
    /// Line width for text rendered from HTML (0 = no wrapping, which
    /// keeps long URLs intact).
    pub html_wrap_width: usize,
    /// Repair invalid UTF-8 with U+FFFD instead of dropping the leaf.
    pub lossy_utf8: bool,
    /// Subject used when the header is missing.
    pub default_subject: String,
    /// Sender used when the `From` header is missing.
    pub default_sender: String,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            words_per_minute: 200,
            max_depth: 100,
            html_wrap_width: 0,
            lossy_utf8: false,
            default_subject: "No Subject".into(),
            default_sender: "Unknown".into(),
        }
    }
}

impl ParserConfig {
    /// Load a configuration from JSON, filling gaps with defaults
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
