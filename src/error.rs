//! Errors surfaced by record sources.
//!
//! Decoding itself has no error type. Malformed hex pairs become zero bytes and unmapped
//! manufacturer or model ids become the `Unknown` sentinel, so the only failures a caller sees are
//! from reading the payload in the first place.

use std::time::Duration;

use thiserror::Error;

/// Why an NDEF message could not be turned into a text payload
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NdefError {
    #[error("NDEF message is empty")]
    Empty,

    #[error("NDEF message truncated")]
    Truncated,

    /// Chunked records are spread across several records and are not reassembled.
    #[error("chunked NDEF records are not supported")]
    ChunkedRecord,

    /// A type, id or payload too long for its length field when serialising.
    #[error("NDEF record {0} field is too long")]
    FieldTooLong(&'static str),

    #[error("NDEF record is not a text record")]
    NotText,

    #[error("NDEF text record does not hold valid text")]
    InvalidText,
}

/// A record source could not produce a payload. The previously shown record stays in place.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The source does not exist or has no more data, e.g. the tag reader went away.
    #[error("source unavailable: {0}")]
    Unavailable(String),

    #[error("no valid `{name}` parameter found")]
    MissingParameter { name: &'static str },

    #[error("no data received within {0:?}")]
    Timeout(Duration),

    #[error("read failed: {0}")]
    Read(String),

    #[error("malformed tag message: {0}")]
    Ndef(#[from] NdefError),
}
