// Enforce at crate level
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]
#![allow(clippy::significant_drop_tightening)]

//! Message Flattener
//!
//! Turns a MIME-like message tree (headers plus nested, individually
//! encoded body parts) into one normalized, human-readable record.
//!
//! # Features
//!
//! - Case-insensitive header map, last occurrence wins
//! - Recursive multipart flattening in tree order
//! - URL-safe base64 decoding and HTML-to-text conversion
//! - Word, character and URL counts with a reading-time estimate
//! - Total functions: bad parts and dates degrade to documented defaults
//!   and are reported through a [`Diagnostics`] sink
//!
//! # Example
//!
//! ```rust
//! use mail_flatten::{PartNode, RawMessage, analyze, assemble};
//!
//! let message = RawMessage::new("msg-1", "thread-1")
//!     .with_header("Subject", "Hello")
//!     .with_payload(PartNode::text("text/plain", "Hello world"));
//!
//! let record = assemble(&message);
//! assert_eq!(record.subject, "Hello");
//! assert_eq!(record.body, "Hello world");
//! assert_eq!(analyze(&record.body).word_count, 2);
//! ```

mod analyzer;
mod assembler;
mod body;
mod config;
mod diagnostics;
mod error;
mod gmail;
mod headers;
mod source;
mod types;

pub use analyzer::{analyze, extract_urls};
pub use assembler::{
    MessageAssembler, assemble, extract_sender_email, extract_sender_name, parse_date,
    parse_rfc5322_date,
};
pub use body::{
    BodyExtractor, PART_SEPARATOR, decode_body, encode_body, extract, html_to_text, try_decode,
};
pub use config::ParserConfig;
pub use diagnostics::{Diagnostics, RecordingDiagnostics, Report, TracingDiagnostics};
pub use error::{Fault, ParseError, Result};
pub use gmail::{GmailBody, GmailHeader, GmailMessage, GmailPart};
pub use headers::{NormalizedHeaders, normalize};
pub use types::*;
