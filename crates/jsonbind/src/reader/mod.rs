//! Pull-based JSON token reader.
//!
//! [`JsonReader`] walks a complete `&str` document one token at a time. It
//! keeps the same scope stack as the writer, only in the consuming
//! direction: every `begin_*` must be matched by the corresponding `end_*`,
//! names are only handed out inside objects, and asking for a token kind
//! other than the next one fails without consuming it.
//!
//! Strings and numbers that contain no escapes are borrowed straight from the
//! input; escaped strings are decoded into owned buffers.
//!
//! ```rust
//! use jsonbind::{JsonReader, Token};
//!
//! let mut reader = JsonReader::new(r#"{"k": [1, "two"]}"#);
//! reader.begin_object()?;
//! assert_eq!(reader.next_name()?, "k");
//! reader.begin_array()?;
//! assert_eq!(reader.next_i64()?, 1);
//! assert_eq!(reader.peek()?, Token::String);
//! assert_eq!(reader.next_string()?, "two");
//! reader.end_array()?;
//! reader.end_object()?;
//! reader.close()?;
//! # Ok::<(), jsonbind::Error>(())
//! ```

mod error;
mod numbers;
#[cfg(test)]
mod tests;

use alloc::{borrow::Cow, format, string::String, vec, vec::Vec};

pub use error::{ReadError, SyntaxError};

use crate::{DeserializationContext, Error};

/// Kind of the next token in the stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    BeginArray,
    EndArray,
    BeginObject,
    EndObject,
    Name,
    String,
    Number,
    Boolean,
    Null,
    EndDocument,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scope {
    EmptyDocument,
    NonemptyDocument,
    EmptyArray,
    NonemptyArray,
    EmptyObject,
    DanglingName,
    NonemptyObject,
}

/// A lexed token waiting to be consumed.
#[derive(Debug, Clone, PartialEq)]
enum Peeked<'src> {
    BeginArray,
    EndArray,
    BeginObject,
    EndObject,
    Name(Cow<'src, str>),
    String(Cow<'src, str>),
    Number(&'src str),
    Boolean(bool),
    Null,
    EndDocument,
}

impl Peeked<'_> {
    fn token(&self) -> Token {
        match self {
            Peeked::BeginArray => Token::BeginArray,
            Peeked::EndArray => Token::EndArray,
            Peeked::BeginObject => Token::BeginObject,
            Peeked::EndObject => Token::EndObject,
            Peeked::Name(_) => Token::Name,
            Peeked::String(_) => Token::String,
            Peeked::Number(_) => Token::Number,
            Peeked::Boolean(_) => Token::Boolean,
            Peeked::Null => Token::Null,
            Peeked::EndDocument => Token::EndDocument,
        }
    }
}

/// Streaming JSON reader over a borrowed document.
#[derive(Debug)]
pub struct JsonReader<'src> {
    src: &'src str,
    /// Byte offset of the next unread character.
    pos: usize,
    line: usize,
    column: usize,
    scopes: Vec<Scope>,
    peeked: Option<Peeked<'src>>,
    lenient: bool,
}

impl<'src> JsonReader<'src> {
    /// Creates a strict reader over `src`.
    #[must_use]
    pub fn new(src: &'src str) -> Self {
        Self {
            src,
            pos: 0,
            line: 1,
            column: 1,
            scopes: vec![Scope::EmptyDocument],
            peeked: None,
            lenient: false,
        }
    }

    #[must_use]
    pub fn from_context(src: &'src str, ctx: &DeserializationContext) -> Self {
        let mut reader = Self::new(src);
        reader.set_lenient(ctx.lenient());
        reader
    }

    pub fn set_lenient(&mut self, lenient: bool) {
        self.lenient = lenient;
    }

    #[must_use]
    pub fn is_lenient(&self) -> bool {
        self.lenient
    }

    /// 1-based line of the next unread character.
    #[must_use]
    pub fn line(&self) -> usize {
        self.line
    }

    /// 1-based column of the next unread character.
    #[must_use]
    pub fn column(&self) -> usize {
        self.column
    }

    /// Number of arrays and objects entered but not yet left.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.scopes.len().saturating_sub(1)
    }

    /// Returns the kind of the next token without consuming it.
    pub fn peek(&mut self) -> Result<Token, Error> {
        let peeked = self.take()?;
        let token = peeked.token();
        self.peeked = Some(peeked);
        Ok(token)
    }

    /// Whether the current array or object has another element.
    pub fn has_next(&mut self) -> Result<bool, Error> {
        Ok(!matches!(
            self.peek()?,
            Token::EndArray | Token::EndObject | Token::EndDocument
        ))
    }

    pub fn begin_array(&mut self) -> Result<(), Error> {
        match self.take()? {
            Peeked::BeginArray => {
                self.scopes.push(Scope::EmptyArray);
                Ok(())
            }
            other => Err(self.unexpected(Token::BeginArray, other)),
        }
    }

    pub fn end_array(&mut self) -> Result<(), Error> {
        match self.take()? {
            Peeked::EndArray => {
                self.scopes.pop();
                Ok(())
            }
            other => Err(self.unexpected(Token::EndArray, other)),
        }
    }

    pub fn begin_object(&mut self) -> Result<(), Error> {
        match self.take()? {
            Peeked::BeginObject => {
                self.scopes.push(Scope::EmptyObject);
                Ok(())
            }
            other => Err(self.unexpected(Token::BeginObject, other)),
        }
    }

    pub fn end_object(&mut self) -> Result<(), Error> {
        match self.take()? {
            Peeked::EndObject => {
                self.scopes.pop();
                Ok(())
            }
            other => Err(self.unexpected(Token::EndObject, other)),
        }
    }

    pub fn next_name(&mut self) -> Result<Cow<'src, str>, Error> {
        match self.take()? {
            Peeked::Name(name) => Ok(name),
            other => Err(self.unexpected(Token::Name, other)),
        }
    }

    pub fn next_string(&mut self) -> Result<Cow<'src, str>, Error> {
        match self.take()? {
            Peeked::String(value) => Ok(value),
            other => Err(self.unexpected(Token::String, other)),
        }
    }

    pub fn next_bool(&mut self) -> Result<bool, Error> {
        match self.take()? {
            Peeked::Boolean(value) => Ok(value),
            other => Err(self.unexpected(Token::Boolean, other)),
        }
    }

    pub fn next_null(&mut self) -> Result<(), Error> {
        match self.take()? {
            Peeked::Null => Ok(()),
            other => Err(self.unexpected(Token::Null, other)),
        }
    }

    /// Returns the next number exactly as written in the input.
    pub fn next_number_literal(&mut self) -> Result<&'src str, Error> {
        match self.take()? {
            Peeked::Number(literal) => Ok(literal),
            other => Err(self.unexpected(Token::Number, other)),
        }
    }

    pub fn next_f64(&mut self) -> Result<f64, Error> {
        let literal = self.next_number_literal()?;
        match literal {
            "NaN" => Ok(f64::NAN),
            "Infinity" => Ok(f64::INFINITY),
            "-Infinity" => Ok(f64::NEG_INFINITY),
            _ => literal
                .parse()
                .map_err(|_| self.error_here(SyntaxError::NumberOutOfRange(literal.into()))),
        }
    }

    /// Reads an integer. Literals with a fraction or exponent are accepted as
    /// long as their text denotes a whole number in range (`1e3`, `2.0`).
    pub fn next_i64(&mut self) -> Result<i64, Error> {
        let literal = self.next_number_literal()?;
        if let Ok(value) = literal.parse::<i64>() {
            return Ok(value);
        }
        let parsed = numbers::whole_number(literal).and_then(|(negative, digits)| {
            if negative {
                format!("-{digits}").parse::<i64>().ok()
            } else {
                digits.parse::<i64>().ok()
            }
        });
        parsed.ok_or_else(|| self.error_here(SyntaxError::NumberOutOfRange(literal.into())))
    }

    /// Like [`next_i64`](Self::next_i64) for unsigned values.
    pub fn next_u64(&mut self) -> Result<u64, Error> {
        let literal = self.next_number_literal()?;
        if let Ok(value) = literal.parse::<u64>() {
            return Ok(value);
        }
        let parsed = numbers::whole_number(literal).and_then(|(negative, digits)| {
            if negative && digits != "0" {
                return None;
            }
            digits.parse::<u64>().ok()
        });
        parsed.ok_or_else(|| self.error_here(SyntaxError::NumberOutOfRange(literal.into())))
    }

    /// Skips the next value, including everything nested inside it. A pending
    /// member name is skipped together with its value.
    pub fn skip_value(&mut self) -> Result<(), Error> {
        let mut depth = 0usize;
        loop {
            let peeked = self.take()?;
            let token = peeked.token();
            match peeked {
                Peeked::BeginArray => {
                    self.scopes.push(Scope::EmptyArray);
                    depth += 1;
                }
                Peeked::BeginObject => {
                    self.scopes.push(Scope::EmptyObject);
                    depth += 1;
                }
                Peeked::EndArray | Peeked::EndObject | Peeked::EndDocument if depth == 0 => {
                    self.peeked = Some(peeked);
                    return Err(self.error_here(SyntaxError::SyntaxError("expected a value to skip")));
                }
                Peeked::EndArray | Peeked::EndObject => {
                    self.scopes.pop();
                    depth -= 1;
                }
                _ => {}
            }
            if depth == 0 && token != Token::Name {
                return Ok(());
            }
        }
    }

    /// Checks that the root value was fully consumed and that nothing but
    /// whitespace follows it.
    pub fn close(&mut self) -> Result<(), Error> {
        let open = self.depth();
        if open > 0 {
            return Err(Error::IncompleteDocument { open });
        }
        match self.take()? {
            Peeked::EndDocument => {
                self.scopes.clear();
                Ok(())
            }
            other => Err(self.unexpected(Token::EndDocument, other)),
        }
    }

    fn take(&mut self) -> Result<Peeked<'src>, Error> {
        match self.peeked.take() {
            Some(peeked) => Ok(peeked),
            None => self.do_peek(),
        }
    }

    /// Builds a type mismatch error and puts the offending token back.
    fn unexpected(&mut self, expected: Token, found: Peeked<'src>) -> Error {
        let err = self.error_here(SyntaxError::UnexpectedToken {
            expected,
            found: found.token(),
        });
        self.peeked = Some(found);
        err
    }

    /// Wraps `source` with the current input position.
    pub(crate) fn error_here(&self, source: SyntaxError) -> Error {
        Error::MalformedInput(ReadError {
            source,
            line: self.line,
            column: self.column,
        })
    }

    fn invalid(&self, c: char) -> Error {
        self.error_here(SyntaxError::InvalidCharacter(c))
    }

    fn set_top(&mut self, scope: Scope) {
        if let Some(top) = self.scopes.last_mut() {
            *top = scope;
        }
    }

    fn do_peek(&mut self) -> Result<Peeked<'src>, Error> {
        let Some(&scope) = self.scopes.last() else {
            return Err(self.error_here(SyntaxError::SyntaxError("reader is closed")));
        };
        match scope {
            Scope::EmptyArray | Scope::NonemptyArray => {
                let c = self.require_char()?;
                if c == ']' {
                    self.bump();
                    return Ok(Peeked::EndArray);
                }
                if scope == Scope::NonemptyArray {
                    if c != ',' {
                        return Err(self.invalid(c));
                    }
                    self.bump();
                }
                self.set_top(Scope::NonemptyArray);
                self.read_value()
            }
            Scope::EmptyObject | Scope::NonemptyObject => {
                let mut c = self.require_char()?;
                if c == '}' {
                    self.bump();
                    return Ok(Peeked::EndObject);
                }
                if scope == Scope::NonemptyObject {
                    if c != ',' {
                        return Err(self.invalid(c));
                    }
                    self.bump();
                    c = self.require_char()?;
                }
                if c != '"' {
                    return Err(self.invalid(c));
                }
                self.bump();
                let name = self.read_string_body()?;
                self.set_top(Scope::DanglingName);
                Ok(Peeked::Name(name))
            }
            Scope::DanglingName => {
                let c = self.require_char()?;
                if c != ':' {
                    return Err(self.invalid(c));
                }
                self.bump();
                self.set_top(Scope::NonemptyObject);
                self.read_value()
            }
            Scope::EmptyDocument => {
                self.set_top(Scope::NonemptyDocument);
                let value = self.read_value()?;
                if !self.lenient && !matches!(value, Peeked::BeginArray | Peeked::BeginObject) {
                    return Err(self.error_here(SyntaxError::SyntaxError(
                        "JSON must start with an array or an object",
                    )));
                }
                self.root_scalar_ends(value)
            }
            Scope::NonemptyDocument => {
                self.skip_whitespace();
                match self.peek_char() {
                    None => Ok(Peeked::EndDocument),
                    Some(_) if self.lenient => {
                        let value = self.read_value()?;
                        self.root_scalar_ends(value)
                    }
                    Some(_) => Err(self.error_here(SyntaxError::SyntaxError(
                        "unexpected data after the root value",
                    ))),
                }
            }
        }
    }

    /// A keyword or number at the top level must be followed by whitespace,
    /// a structural character or the end of input, so `nullnull` is not read
    /// as two roots.
    fn root_scalar_ends(&self, value: Peeked<'src>) -> Result<Peeked<'src>, Error> {
        if !matches!(value, Peeked::Number(_) | Peeked::Boolean(_) | Peeked::Null) {
            return Ok(value);
        }
        match self.peek_char() {
            None | Some(' ' | '\t' | '\n' | '\r' | '[' | ']' | '{' | '}' | ',' | ':' | '"') => {
                Ok(value)
            }
            Some(c) => Err(self.invalid(c)),
        }
    }

    fn read_value(&mut self) -> Result<Peeked<'src>, Error> {
        let c = self.require_char()?;
        match c {
            '{' => {
                self.bump();
                Ok(Peeked::BeginObject)
            }
            '[' => {
                self.bump();
                Ok(Peeked::BeginArray)
            }
            '"' => {
                self.bump();
                Ok(Peeked::String(self.read_string_body()?))
            }
            't' => self.read_keyword("true").map(|()| Peeked::Boolean(true)),
            'f' => self.read_keyword("false").map(|()| Peeked::Boolean(false)),
            'n' => self.read_keyword("null").map(|()| Peeked::Null),
            'N' => self.read_non_finite("NaN"),
            'I' => self.read_non_finite("Infinity"),
            '-' if self.src[self.pos..].starts_with("-I") => self.read_non_finite("-Infinity"),
            '-' | '0'..='9' => self.read_number(),
            c => Err(self.invalid(c)),
        }
    }

    fn read_keyword(&mut self, word: &'static str) -> Result<(), Error> {
        for expected in word.chars() {
            match self.bump() {
                Some(c) if c == expected => {}
                Some(c) => return Err(self.invalid(c)),
                None => return Err(self.error_here(SyntaxError::UnexpectedEndOfInput)),
            }
        }
        Ok(())
    }

    fn read_non_finite(&mut self, word: &'static str) -> Result<Peeked<'src>, Error> {
        let start = self.pos;
        self.read_keyword(word)?;
        if !self.lenient {
            return Err(Error::NumericFormat(word.into()));
        }
        Ok(Peeked::Number(&self.src[start..self.pos]))
    }

    fn read_number(&mut self) -> Result<Peeked<'src>, Error> {
        let start = self.pos;
        if self.peek_char() == Some('-') {
            self.bump();
        }
        match self.bump() {
            Some('0') => {}
            Some('1'..='9') => self.skip_digits(),
            Some(c) => return Err(self.invalid(c)),
            None => return Err(self.error_here(SyntaxError::UnexpectedEndOfInput)),
        }
        if self.peek_char() == Some('.') {
            self.bump();
            self.require_digits()?;
        }
        if matches!(self.peek_char(), Some('e' | 'E')) {
            self.bump();
            if matches!(self.peek_char(), Some('+' | '-')) {
                self.bump();
            }
            self.require_digits()?;
        }
        Ok(Peeked::Number(&self.src[start..self.pos]))
    }

    fn require_digits(&mut self) -> Result<(), Error> {
        match self.bump() {
            Some('0'..='9') => {
                self.skip_digits();
                Ok(())
            }
            Some(c) => Err(self.invalid(c)),
            None => Err(self.error_here(SyntaxError::UnexpectedEndOfInput)),
        }
    }

    fn skip_digits(&mut self) {
        while matches!(self.peek_char(), Some('0'..='9')) {
            self.bump();
        }
    }

    /// Reads up to and including the closing quote; the opening quote has
    /// already been consumed.
    fn read_string_body(&mut self) -> Result<Cow<'src, str>, Error> {
        let start = self.pos;
        let mut run_start = start;
        let mut decoded: Option<String> = None;
        loop {
            let Some(c) = self.bump() else {
                return Err(self.error_here(SyntaxError::UnexpectedEndOfInput));
            };
            match c {
                '"' => {
                    let end = self.pos - 1;
                    return Ok(match decoded {
                        None => Cow::Borrowed(&self.src[start..end]),
                        Some(mut buf) => {
                            buf.push_str(&self.src[run_start..end]);
                            Cow::Owned(buf)
                        }
                    });
                }
                '\\' => {
                    let buf = decoded.get_or_insert_with(String::new);
                    buf.push_str(&self.src[run_start..self.pos - 1]);
                    buf.push(self.read_escape()?);
                    run_start = self.pos;
                }
                c if (c as u32) < 0x20 => return Err(self.invalid(c)),
                _ => {}
            }
        }
    }

    fn read_escape(&mut self) -> Result<char, Error> {
        let c = match self.bump() {
            Some('"') => '"',
            Some('\\') => '\\',
            Some('/') => '/',
            Some('b') => '\u{8}',
            Some('f') => '\u{c}',
            Some('n') => '\n',
            Some('r') => '\r',
            Some('t') => '\t',
            Some('u') => return self.read_unicode_escape(),
            Some(c) => return Err(self.invalid(c)),
            None => return Err(self.error_here(SyntaxError::UnexpectedEndOfInput)),
        };
        Ok(c)
    }

    /// Decodes `XXXX` after `\u`, pairing a high surrogate with the low
    /// surrogate escape that must follow it.
    fn read_unicode_escape(&mut self) -> Result<char, Error> {
        let high = self.read_hex4()?;
        if !(0xD800..0xDC00).contains(&high) {
            return char::from_u32(high)
                .ok_or_else(|| self.error_here(SyntaxError::InvalidUnicodeEscapeSequence(high)));
        }
        if self.bump() != Some('\\') || self.bump() != Some('u') {
            return Err(self.error_here(SyntaxError::InvalidUnicodeEscapeSequence(high)));
        }
        let low = self.read_hex4()?;
        if !(0xDC00..0xE000).contains(&low) {
            return Err(self.error_here(SyntaxError::InvalidUnicodeEscapeSequence(low)));
        }
        let code = 0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00);
        char::from_u32(code)
            .ok_or_else(|| self.error_here(SyntaxError::InvalidUnicodeEscapeSequence(code)))
    }

    fn read_hex4(&mut self) -> Result<u32, Error> {
        let mut acc = 0u32;
        for _ in 0..4 {
            let Some(c) = self.bump() else {
                return Err(self.error_here(SyntaxError::UnexpectedEndOfInput));
            };
            let digit = c
                .to_digit(16)
                .ok_or_else(|| self.error_here(SyntaxError::InvalidUnicodeEscapeChar(c)))?;
            acc = (acc << 4) | digit;
        }
        Ok(acc)
    }

    fn require_char(&mut self) -> Result<char, Error> {
        self.skip_whitespace();
        self.peek_char()
            .ok_or_else(|| self.error_here(SyntaxError::UnexpectedEndOfInput))
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek_char(), Some(' ' | '\t' | '\n' | '\r')) {
            self.bump();
        }
    }

    #[inline]
    fn peek_char(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek_char()?;
        self.pos += c.len_utf8();
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }
}
