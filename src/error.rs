//! Error types for message flattening

use thiserror::Error;

/// Non-fatal faults absorbed by the core and reported through
/// [`Diagnostics`](crate::Diagnostics).
///
/// None of these ever escape `normalize`, `extract`, `analyze` or
/// `assemble`; each one has a documented fallback value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Fault {
    /// Leaf body is not valid URL-safe base64; the leaf contributes `""`
    #[error("Failed to decode transport encoding: {reason}")]
    Decode { reason: String },

    /// Decoded bytes are not valid UTF-8; the leaf contributes `""`
    #[error("Decoded body is not valid UTF-8: {reason}")]
    InvalidUtf8 { reason: String },

    /// HTML-to-text conversion failed; the raw markup is kept instead
    #[error("Failed to convert HTML to text: {reason}")]
    MarkupConversion { reason: String },

    /// Date header present but unparsable; the record date becomes `""`
    #[error("Failed to parse date '{value}': {reason}")]
    DateParse { value: String, reason: String },

    /// Part tree nested deeper than the configured limit; subtree dropped
    #[error("Part tree exceeds maximum depth of {limit}")]
    DepthExceeded { limit: usize },
}

impl Fault {
    /// Short machine-friendly name used as a structured log field
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Decode { .. } => "decode",
            Self::InvalidUtf8 { .. } => "invalid_utf8",
            Self::MarkupConversion { .. } => "markup_conversion",
            Self::DateParse { .. } => "date_parse",
            Self::DepthExceeded { .. } => "depth_exceeded",
        }
    }
}

/// Errors from the adapters that turn external input into a
/// [`RawMessage`](crate::RawMessage)
#[derive(Error, Debug)]
pub enum ParseError {
    /// Malformed JSON (Gmail API message or configuration document)
    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Raw RFC 822 message could not be parsed
    #[error("Failed to parse email structure: {0}")]
    Structure(#[from] mailparse::MailParseError),
}

/// Result type for the fallible adapters
pub type Result<T> = std::result::Result<T, ParseError>;
