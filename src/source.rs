//! Raw RFC 822 messages (`.eml` files, mbox entries) as [`RawMessage`]s

use crate::body::encode_body;
use crate::error::Result;
use crate::types::{PartNode, RawMessage};
use mailparse::{MailHeaderMap, ParsedMail};
use tracing::debug;

impl RawMessage {
    /// Parse a raw message into the same shape the mail store hands over.
    ///
    /// Text parts are decoded from their declared charset and re-encoded
    /// as UTF-8; other parts keep their transfer-decoded bytes. The thread
    /// ID is the `Message-ID` when present, otherwise `id`.
    pub fn from_rfc822(id: impl Into<String>, raw: &[u8]) -> Result<Self> {
        let parsed = mailparse::parse_mail(raw)?;
        let id = id.into();

        let headers = parsed
            .headers
            .iter()
            .map(|h| (h.get_key(), h.get_value()))
            .collect();
        let thread_id = parsed
            .headers
            .get_first_value("Message-ID")
            .unwrap_or_else(|| id.clone());
        let payload = part_from_mail(&parsed)?;

        debug!(%id, parts = parsed.subparts.len(), "Parsed RFC 822 message");

        Ok(Self {
            id,
            thread_id,
            snippet: String::new(),
            headers,
            payload,
        })
    }
}

fn part_from_mail(mail: &ParsedMail) -> Result<PartNode> {
    let mime_type = mail.ctype.mimetype.to_lowercase();

    if !mail.subparts.is_empty() {
        let children = mail
            .subparts
            .iter()
            .map(part_from_mail)
            .collect::<Result<Vec<_>>>()?;
        return Ok(PartNode::container(mime_type, children));
    }

    let bytes = if mime_type.starts_with("text/") {
        mail.get_body()?.into_bytes()
    } else {
        mail.get_body_raw()?
    };
    let body = (!bytes.is_empty()).then(|| encode_body(&bytes));

    Ok(PartNode::leaf(mime_type, body))
}
