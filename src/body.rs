//! Body extraction: walks the part tree and flattens it to plain text.
//!
//! Leaves are decoded from URL-safe base64, `text/html` leaves are rendered
//! to text, anything else is dropped. Non-empty leaf texts are joined in
//! tree order with a blank line between them.

use crate::config::ParserConfig;
use crate::diagnostics::{Diagnostics, TracingDiagnostics};
use crate::error::Fault;
use crate::types::PartNode;
use base64::Engine;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use html2text::render::TextDecorator;
use tracing::trace;

/// Separator between the texts of sibling parts
pub const PART_SEPARATOR: &str = "\n\n";

/// Render width standing in for "no wrapping"
const UNWRAPPED_WIDTH: usize = 10_000;

/// URL-safe alphabet that tolerates missing padding
const TRANSPORT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_encode_padding(true)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// Content types a leaf may carry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LeafKind {
    Plain,
    Html,
}

impl LeafKind {
    fn from_mime(mime_type: &str) -> Option<Self> {
        let mime_type = mime_type.trim();
        if mime_type.eq_ignore_ascii_case("text/plain") {
            Some(Self::Plain)
        } else if mime_type.eq_ignore_ascii_case("text/html") {
            Some(Self::Html)
        } else {
            None
        }
    }
}

/// Flattens part trees using a configuration and a fault sink
#[derive(Debug, Clone, Copy)]
pub struct BodyExtractor<'a> {
    config: &'a ParserConfig,
    diagnostics: &'a dyn Diagnostics,
    message_id: Option<&'a str>,
}

impl<'a> BodyExtractor<'a> {
    #[must_use]
    pub const fn new(config: &'a ParserConfig, diagnostics: &'a dyn Diagnostics) -> Self {
        Self {
            config,
            diagnostics,
            message_id: None,
        }
    }

    /// Attribute reported faults to the message `id`
    #[must_use]
    pub const fn for_message(mut self, id: &'a str) -> Self {
        self.message_id = Some(id);
        self
    }

    fn report(&self, fault: &Fault) {
        self.diagnostics.report(self.message_id, fault);
    }

    /// Flatten `node` into one document. Never fails.
    #[must_use]
    pub fn extract(&self, node: &PartNode) -> String {
        self.extract_at(node, 0)
    }

    fn extract_at(&self, node: &PartNode, depth: usize) -> String {
        if depth > self.config.max_depth {
            self.report(&Fault::DepthExceeded {
                limit: self.config.max_depth,
            });
            return String::new();
        }

        match node {
            PartNode::Leaf { mime_type, body } => self.extract_leaf(mime_type, body.as_deref()),
            PartNode::Container { children, .. } => children
                .iter()
                .map(|child| self.extract_at(child, depth + 1))
                .filter(|text| !text.is_empty())
                .collect::<Vec<_>>()
                .join(PART_SEPARATOR),
        }
    }

    fn extract_leaf(&self, mime_type: &str, body: Option<&str>) -> String {
        let Some(kind) = LeafKind::from_mime(mime_type) else {
            trace!(mime_type, "Skipping non-text part");
            return String::new();
        };
        let Some(encoded) = body.filter(|b| !b.is_empty()) else {
            return String::new();
        };

        let text = match try_decode(encoded, self.config.lossy_utf8) {
            Ok(text) => text,
            Err(fault) => {
                self.report(&fault);
                return String::new();
            }
        };

        match kind {
            LeafKind::Plain => text,
            LeafKind::Html if text.is_empty() => text,
            LeafKind::Html => {
                let converted = html_to_text(&text, self.config.html_wrap_width);
                self.text_or_markup(text, converted)
            }
        }
    }

    /// Keep the rendered text, or the markup itself when rendering failed
    fn text_or_markup(&self, html: String, converted: Result<String, Fault>) -> String {
        match converted {
            Ok(text) => text,
            Err(fault) => {
                self.report(&fault);
                html
            }
        }
    }
}

/// Flatten `node` with the default configuration, logging faults via `tracing`
#[must_use]
pub fn extract(node: &PartNode) -> String {
    let config = ParserConfig::default();
    BodyExtractor::new(&config, &TracingDiagnostics).extract(node)
}

/// Decode a transport-encoded body, or `""` on any fault (logged via `tracing`)
#[must_use]
pub fn decode_body(encoded: &str) -> String {
    try_decode(encoded, false).unwrap_or_else(|fault| {
        TracingDiagnostics.report(None, &fault);
        String::new()
    })
}

/// Decode URL-safe base64 into UTF-8 text.
///
/// The standard `+`/`/` alphabet and ASCII whitespace are tolerated.
/// With `lossy` set, invalid UTF-8 is repaired instead of rejected.
pub fn try_decode(encoded: &str, lossy: bool) -> Result<String, Fault> {
    let cleaned: String = encoded
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .map(|c| match c {
            '+' => '-',
            '/' => '_',
            other => other,
        })
        .collect();

    let bytes = TRANSPORT.decode(cleaned).map_err(|e| Fault::Decode {
        reason: e.to_string(),
    })?;

    match String::from_utf8(bytes) {
        Ok(text) => Ok(text),
        Err(e) if lossy => Ok(String::from_utf8_lossy(e.as_bytes()).into_owned()),
        Err(e) => Err(Fault::InvalidUtf8 {
            reason: e.utf8_error().to_string(),
        }),
    }
}

/// Encode bytes the way leaf bodies are transported
#[must_use]
pub fn encode_body(bytes: &[u8]) -> String {
    TRANSPORT.encode(bytes)
}

/// Render HTML as plain text.
///
/// Links stay inline as `[text](href)`, images as `![alt](src)`, and
/// emphasis survives as `*`/`**` markers. Lines are wrapped at `width`
/// columns, with words longer than that split; `0` disables wrapping.
pub fn html_to_text(html: &str, width: usize) -> Result<String, Fault> {
    let width = if width == 0 { UNWRAPPED_WIDTH } else { width };

    html2text::config::with_decorator(InlineDecorator::default())
        .string_from_read(html.as_bytes(), width)
        .map(|text| text.trim_end().to_string())
        .map_err(|e| Fault::MarkupConversion {
            reason: e.to_string(),
        })
}

/// Markdown-style decorator that keeps link and image targets next to
/// their text instead of in footnotes
#[derive(Debug, Clone, Default)]
struct InlineDecorator {
    /// Targets of the links currently open
    links: Vec<String>,
}

impl TextDecorator for InlineDecorator {
    type Annotation = ();

    fn decorate_link_start(&mut self, url: &str) -> (String, Self::Annotation) {
        self.links.push(url.to_string());
        ("[".to_string(), ())
    }

    fn decorate_link_end(&mut self) -> String {
        self.links
            .pop()
            .map_or_else(|| "]".to_string(), |url| format!("]({url})"))
    }

    fn decorate_em_start(&self) -> (String, Self::Annotation) {
        ("*".to_string(), ())
    }

    fn decorate_em_end(&self) -> String {
        "*".to_string()
    }

    fn decorate_strong_start(&self) -> (String, Self::Annotation) {
        ("**".to_string(), ())
    }

    fn decorate_strong_end(&self) -> String {
        "**".to_string()
    }

    fn decorate_strikeout_start(&self) -> (String, Self::Annotation) {
        ("~~".to_string(), ())
    }

    fn decorate_strikeout_end(&self) -> String {
        "~~".to_string()
    }

    fn decorate_code_start(&self) -> (String, Self::Annotation) {
        ("`".to_string(), ())
    }

    fn decorate_code_end(&self) -> String {
        "`".to_string()
    }

    fn decorate_preformat_first(&self) -> Self::Annotation {}

    fn decorate_preformat_cont(&self) -> Self::Annotation {}

    fn decorate_image(&mut self, src: &str, title: &str) -> (String, Self::Annotation) {
        (format!("![{title}]({src})"), ())
    }

    fn header_prefix(&self, level: usize) -> String {
        "#".repeat(level) + " "
    }

    fn quote_prefix(&self) -> String {
        "> ".to_string()
    }

    fn unordered_item_prefix(&self) -> String {
        "* ".to_string()
    }

    fn ordered_item_prefix(&self, i: i64) -> String {
        format!("{i}. ")
    }

    fn make_subblock_decorator(&self) -> Self {
        Self::default()
    }
}
