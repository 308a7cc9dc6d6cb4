//! Gmail API message resources (`users.messages.get`, format `full`)

use crate::error::Result;
use crate::types::{PartNode, RawMessage};
use serde::{Deserialize, Serialize};

/// A `Message` resource as returned by the Gmail API
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GmailMessage {
    pub id: String,
    pub thread_id: String,
    pub label_ids: Vec<String>,
    pub snippet: String,
    pub internal_date: Option<String>,
    pub payload: GmailPart,
}

/// A `MessagePart`; the root part also carries the message headers
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GmailPart {
    pub part_id: Option<String>,
    pub mime_type: String,
    pub filename: Option<String>,
    pub headers: Vec<GmailHeader>,
    pub body: GmailBody,
    pub parts: Vec<GmailPart>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GmailBody {
    pub attachment_id: Option<String>,
    pub size: u64,
    /// URL-safe base64 of the part's bytes
    pub data: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GmailHeader {
    pub name: String,
    pub value: String,
}

impl From<GmailPart> for PartNode {
    fn from(part: GmailPart) -> Self {
        // RFC 2045: a part without a content type is text/plain
        let mime_type = if part.mime_type.is_empty() {
            "text/plain".to_string()
        } else {
            part.mime_type
        };

        if part.parts.is_empty() {
            Self::leaf(mime_type, part.body.data.filter(|d| !d.is_empty()))
        } else {
            Self::container(mime_type, part.parts.into_iter().map(Self::from).collect())
        }
    }
}

impl From<GmailMessage> for RawMessage {
    fn from(mut message: GmailMessage) -> Self {
        let headers = std::mem::take(&mut message.payload.headers)
            .into_iter()
            .map(|h| (h.name, h.value))
            .collect();

        Self {
            id: message.id,
            thread_id: message.thread_id,
            snippet: message.snippet,
            headers,
            payload: message.payload.into(),
        }
    }
}

impl RawMessage {
    /// Decode a Gmail API `Message` JSON document
    pub fn from_gmail_json(json: &str) -> Result<Self> {
        let message: GmailMessage = serde_json::from_str(json)?;
        Ok(message.into())
    }
}
