//! Top-level entry point: raw message in, normalized record out

use crate::body::BodyExtractor;
use crate::config::ParserConfig;
use crate::diagnostics::{Diagnostics, TracingDiagnostics};
use crate::error::Fault;
use crate::headers::normalize;
use crate::types::{Metadata, NormalizedRecord, RawMessage};
use chrono::{DateTime, FixedOffset};
use std::sync::Arc;
use tracing::{debug, debug_span};

const WEEKDAYS: [&str; 7] = ["mon", "tue", "wed", "thu", "fri", "sat", "sun"];

/// Combines header normalization, body extraction and date parsing.
///
/// Stateless apart from its configuration, so one assembler can be shared
/// across threads working on different messages.
#[derive(Debug, Clone)]
pub struct MessageAssembler {
    config: ParserConfig,
    diagnostics: Arc<dyn Diagnostics>,
}

impl Default for MessageAssembler {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageAssembler {
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(ParserConfig::default())
    }

    #[must_use]
    pub fn with_config(config: ParserConfig) -> Self {
        Self {
            config,
            diagnostics: Arc::new(TracingDiagnostics),
        }
    }

    /// Route faults to `diagnostics` instead of `tracing`
    #[must_use]
    pub fn with_diagnostics(mut self, diagnostics: Arc<dyn Diagnostics>) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    #[must_use]
    pub const fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Build the normalized record for `message`. Never fails.
    #[must_use]
    pub fn assemble(&self, message: &RawMessage) -> NormalizedRecord {
        let _span = debug_span!("assemble", id = %message.id).entered();

        let headers = normalize(&message.headers);
        let body = BodyExtractor::new(&self.config, self.diagnostics.as_ref())
            .for_message(&message.id)
            .extract(&message.payload);

        let date = headers
            .get("date")
            .filter(|value| !value.is_empty())
            .map(|value| self.render_date(Some(&message.id), value))
            .unwrap_or_default();

        let record = NormalizedRecord {
            id: message.id.clone(),
            thread_id: message.thread_id.clone(),
            subject: headers
                .get("subject")
                .unwrap_or(self.config.default_subject.as_str())
                .to_string(),
            sender: headers
                .get("from")
                .unwrap_or(self.config.default_sender.as_str())
                .to_string(),
            recipient: headers.get("to").unwrap_or_default().to_string(),
            date,
            body,
            snippet: message.snippet.clone(),
        };

        debug!("Assembled message: {record}");
        record
    }

    /// Assemble every message; a corrupt one never stops the rest
    pub fn assemble_all<'m, I>(&self, messages: I) -> Vec<NormalizedRecord>
    where
        I: IntoIterator<Item = &'m RawMessage>,
    {
        messages.into_iter().map(|m| self.assemble(m)).collect()
    }

    /// Metadata for an assembled record's body
    #[must_use]
    pub fn analyze(&self, record: &NormalizedRecord) -> Metadata {
        Metadata::from_body(&record.body, &self.config)
    }

    /// ISO-8601 rendering of an RFC 5322 date, or `""` when unparsable
    #[must_use]
    pub fn format_date(&self, value: &str) -> String {
        self.render_date(None, value)
    }

    fn render_date(&self, message_id: Option<&str>, value: &str) -> String {
        match parse_rfc5322_date(value) {
            Ok(date) => date.to_rfc3339(),
            Err(fault) => {
                self.diagnostics.report(message_id, &fault);
                String::new()
            }
        }
    }
}

/// Assemble with the default configuration, logging faults via `tracing`
#[must_use]
pub fn assemble(message: &RawMessage) -> NormalizedRecord {
    MessageAssembler::new().assemble(message)
}

/// ISO-8601 rendering of an RFC 5322 date, or `""` when unparsable
#[must_use]
pub fn parse_date(value: &str) -> String {
    MessageAssembler::new().format_date(value)
}

/// Parse a date header such as `Mon, 6 Nov 2025 10:00:00 -0800`.
///
/// The day-of-week is not checked against the date, and a trailing
/// comment like `(UTC)` is ignored. A date without a zone offset is
/// rejected, since the result must name an instant.
pub fn parse_rfc5322_date(value: &str) -> Result<DateTime<FixedOffset>, Fault> {
    let mut date = value.trim();
    if let Some(start) = date.find('(') {
        date = date[..start].trim_end();
    }
    if let Some((day, rest)) = date.split_once(',')
        && WEEKDAYS.contains(&day.trim().to_lowercase().as_str())
    {
        date = rest.trim_start();
    }

    DateTime::parse_from_rfc2822(date).map_err(|e| Fault::DateParse {
        value: value.to_string(),
        reason: e.to_string(),
    })
}

/// Display name part of a sender, e.g. `Jane Doe` for
/// `"Jane Doe" <jane@example.com>`; the input unchanged if there is none
#[must_use]
pub fn extract_sender_name(sender: &str) -> String {
    sender
        .find('<')
        .map(|start| sender[..start].trim_end())
        .filter(|name| !name.is_empty())
        .map_or_else(|| sender.to_string(), |name| name.trim_matches('"').to_string())
}

/// Address part of a sender: the text inside `<...>`, the whole string if
/// it looks like a bare address, otherwise `""`
#[must_use]
pub fn extract_sender_email(sender: &str) -> String {
    if let Some(start) = sender.find('<')
        && let Some(len) = sender[start + 1..].find('>').filter(|len| *len > 0)
    {
        return sender[start + 1..start + 1 + len].to_string();
    }

    if sender.contains('@') {
        sender.to_string()
    } else {
        String::new()
    }
}
