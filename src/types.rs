//! Core types for raw and normalized messages

use crate::body::encode_body;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A message as handed over by the acquisition layer
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawMessage {
    /// Store-assigned message ID
    pub id: String,

    /// Store-assigned thread ID
    pub thread_id: String,

    /// Short preview text, passed through untouched
    pub snippet: String,

    /// Headers in wire order; names may repeat
    pub headers: Vec<(String, String)>,

    /// Root of the body part tree
    pub payload: PartNode,
}

impl RawMessage {
    pub fn new(id: impl Into<String>, thread_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            thread_id: thread_id.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    #[must_use]
    pub fn with_snippet(mut self, snippet: impl Into<String>) -> Self {
        self.snippet = snippet.into();
        self
    }

    #[must_use]
    pub fn with_payload(mut self, payload: PartNode) -> Self {
        self.payload = payload;
        self
    }
}

/// One node of a message's body tree.
///
/// A node either carries content (`Leaf`) or nests other nodes
/// (`Container`), never both. A leaf without a body is the empty part.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PartNode {
    Leaf {
        mime_type: String,
        /// URL-safe base64 of the part's bytes
        body: Option<String>,
    },
    Container {
        mime_type: String,
        children: Vec<PartNode>,
    },
}

impl Default for PartNode {
    fn default() -> Self {
        Self::empty()
    }
}

impl PartNode {
    /// Leaf with an already transport-encoded body
    pub fn leaf(mime_type: impl Into<String>, body: Option<String>) -> Self {
        Self::Leaf {
            mime_type: mime_type.into(),
            body,
        }
    }

    /// Leaf whose body is `text`, encoded for transport
    pub fn text(mime_type: impl Into<String>, text: &str) -> Self {
        Self::leaf(mime_type, Some(encode_body(text.as_bytes())))
    }

    /// Leaf with neither body nor children
    #[must_use]
    pub const fn empty() -> Self {
        Self::Leaf {
            mime_type: String::new(),
            body: None,
        }
    }

    pub fn container(mime_type: impl Into<String>, children: Vec<Self>) -> Self {
        Self::Container {
            mime_type: mime_type.into(),
            children,
        }
    }

    #[must_use]
    pub fn mime_type(&self) -> &str {
        match self {
            Self::Leaf { mime_type, .. } | Self::Container { mime_type, .. } => mime_type,
        }
    }

    #[must_use]
    pub const fn is_container(&self) -> bool {
        matches!(self, Self::Container { .. })
    }
}

/// The flattened, human-readable form of one message
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedRecord {
    pub id: String,

    pub thread_id: String,

    /// `Subject` header, or the configured default
    pub subject: String,

    /// Raw `From` header, or the configured default
    pub sender: String,

    /// Raw `To` header, empty when absent
    pub recipient: String,

    /// ISO-8601 timestamp with offset, empty when absent or unparsable
    pub date: String,

    /// All text leaves in tree order, separated by blank lines
    pub body: String,

    pub snippet: String,
}

impl fmt::Display for NormalizedRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} from {}", self.subject, self.sender)
    }
}

/// Figures derived from a record's body
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    /// Whitespace-delimited tokens
    pub word_count: usize,

    /// Unicode scalar values, not bytes
    pub char_count: usize,

    /// Always `false`: attachments are not inspected
    pub has_attachments: bool,

    /// `http`/`https` links found in the body
    pub url_count: usize,

    /// At least 1, even for an empty body
    pub estimated_read_minutes: usize,
}
