use alloc::string::String;

use thiserror::Error;

pub use crate::reader::{ReadError, SyntaxError};

/// Every failure a (de)serialization call can surface.
///
/// None of these are retried internally: a call either completes the whole
/// document or returns the first error it hits.
#[derive(Debug, Error, PartialEq)]
pub enum Error {
    /// The writer was driven out of order (a codec bug): a value where a name
    /// was expected, a mismatched `end_*`, a write after `close`, ...
    #[error("structural error: {0}")]
    Structural(&'static str),

    /// The reader hit invalid or truncated JSON, or a token other than the one
    /// the codec asked for.
    #[error("malformed input: {0}")]
    MalformedInput(#[from] ReadError),

    /// A non-finite number was written or read by a strict stream.
    #[error("numeric values must be finite, found {0}")]
    NumericFormat(String),

    /// `close()` was called before the document was complete.
    #[error("incomplete document: {open} container(s) still open")]
    IncompleteDocument { open: usize },

    /// A key codec could not decode a member name.
    #[error("unsupported map key {key:?}: {reason}")]
    UnsupportedKey { key: String, reason: &'static str },

    /// The character sink refused a write.
    #[error("sink error")]
    Sink,
}

impl From<core::fmt::Error> for Error {
    fn from(_: core::fmt::Error) -> Self {
        Error::Sink
    }
}

impl Error {
    pub(crate) fn unsupported_key(key: &str, reason: &'static str) -> Self {
        Error::UnsupportedKey {
            key: key.into(),
            reason,
        }
    }
}
