use alloc::string::String;

use thiserror::Error;

use super::Token;

/// A syntax error together with the position it was detected at.
#[derive(Error, Debug, PartialEq)]
#[error("{source} at {line}:{column}")]
pub struct ReadError {
    pub(crate) source: SyntaxError,
    pub line: usize,
    pub column: usize,
}

impl ReadError {
    #[must_use]
    pub fn syntax(&self) -> &SyntaxError {
        &self.source
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum SyntaxError {
    #[error("invalid character '{0}'")]
    InvalidCharacter(char),
    #[error("invalid unicode escape sequence at character: '{0}'")]
    InvalidUnicodeEscapeChar(char),
    #[error("invalid unicode escape sequence \\u{0:X}")]
    InvalidUnicodeEscapeSequence(u32),
    #[error("expected {expected:?} but found {found:?}")]
    UnexpectedToken { expected: Token, found: Token },
    #[error("number {0} does not fit the requested type")]
    NumberOutOfRange(String),
    #[error("{0}")]
    SyntaxError(&'static str),
    #[error("unexpected end of input")]
    UnexpectedEndOfInput,
}
