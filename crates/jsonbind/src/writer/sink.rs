use alloc::string::String;

use crate::Error;

/// The character sink a [`JsonWriter`](super::JsonWriter) emits into.
///
/// The writer only ever hands complete UTF-8 fragments to the sink; it never
/// performs I/O of its own.
pub trait CharSink {
    fn write_str(&mut self, s: &str) -> Result<(), Error>;

    fn flush(&mut self) -> Result<(), Error> {
        Ok(())
    }

    /// Called once by [`JsonWriter::close`](super::JsonWriter::close) after the
    /// document is known to be complete.
    fn close(&mut self) -> Result<(), Error> {
        self.flush()
    }
}

impl CharSink for String {
    #[inline]
    fn write_str(&mut self, s: &str) -> Result<(), Error> {
        self.push_str(s);
        Ok(())
    }
}

impl<S: CharSink + ?Sized> CharSink for &mut S {
    #[inline]
    fn write_str(&mut self, s: &str) -> Result<(), Error> {
        (**self).write_str(s)
    }

    fn flush(&mut self) -> Result<(), Error> {
        (**self).flush()
    }

    fn close(&mut self) -> Result<(), Error> {
        (**self).close()
    }
}

/// Adapts any [`std::io::Write`] into a [`CharSink`].
#[cfg(feature = "std")]
#[derive(Debug)]
pub struct IoSink<W: std::io::Write> {
    inner: W,
}

#[cfg(feature = "std")]
impl<W: std::io::Write> IoSink<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

#[cfg(feature = "std")]
impl<W: std::io::Write> CharSink for IoSink<W> {
    fn write_str(&mut self, s: &str) -> Result<(), Error> {
        self.inner.write_all(s.as_bytes()).map_err(|_| Error::Sink)
    }

    fn flush(&mut self) -> Result<(), Error> {
        self.inner.flush().map_err(|_| Error::Sink)
    }
}

/// Writes `s` as a quoted JSON string literal.
///
/// Quotes, backslashes and control characters are escaped, as are U+2028 and
/// U+2029 which older JavaScript parsers treat as line terminators.
pub(crate) fn write_quoted<S: CharSink + ?Sized>(sink: &mut S, s: &str) -> Result<(), Error> {
    sink.write_str("\"")?;
    let mut run_start = 0;
    for (i, c) in s.char_indices() {
        let short = match c {
            '"' => Some("\\\""),
            '\\' => Some("\\\\"),
            '\n' => Some("\\n"),
            '\r' => Some("\\r"),
            '\t' => Some("\\t"),
            '\u{8}' => Some("\\b"),
            '\u{c}' => Some("\\f"),
            _ => None,
        };
        if short.is_none() && !c.is_control() && c != '\u{2028}' && c != '\u{2029}' {
            continue;
        }
        sink.write_str(&s[run_start..i])?;
        match short {
            Some(esc) => sink.write_str(esc)?,
            None => write_unicode_escape(sink, c as u32)?,
        }
        run_start = i + c.len_utf8();
    }
    sink.write_str(&s[run_start..])?;
    sink.write_str("\"")
}

fn write_unicode_escape<S: CharSink + ?Sized>(sink: &mut S, code: u32) -> Result<(), Error> {
    const HEX: &[u8; 16] = b"0123456789abcdef";
    let mut buf = *b"\\u0000";
    for (slot, shift) in buf[2..].iter_mut().zip([12u32, 8, 4, 0]) {
        *slot = HEX[((code >> shift) & 0xF) as usize];
    }
    // Only ASCII was written into `buf`.
    let escaped = core::str::from_utf8(&buf).map_err(|_| Error::Sink)?;
    sink.write_str(escaped)
}
