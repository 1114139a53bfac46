//! Token-level JSON writer.
//!
//! [`JsonWriter`] keeps a stack of open containers and refuses any call that
//! would produce an unbalanced or ill-formed token stream. Object member names
//! are staged in the top frame and only reach the sink once the member's value
//! is written, which is what lets `null` members be dropped without a trace.
//!
//! ```rust
//! use jsonbind::JsonWriter;
//!
//! let mut writer = JsonWriter::new(String::new());
//! writer.begin_object()?;
//! writer.name("answer")?;
//! writer.i64_value(42)?;
//! writer.name("skipped")?;
//! writer.cancel_name()?;
//! writer.end_object()?;
//! writer.close()?;
//! assert_eq!(writer.output(), r#"{"answer":42}"#);
//! # Ok::<(), jsonbind::Error>(())
//! ```

mod sink;
#[cfg(test)]
mod tests;

use alloc::{
    format,
    string::{String, ToString},
    vec::Vec,
};

#[cfg(feature = "std")]
pub use sink::IoSink;
pub use sink::CharSink;
pub(crate) use sink::write_quoted;

use crate::{Error, SerializationContext};

/// Where the writer currently stands, as seen from the innermost open frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriterState {
    /// Nothing written yet.
    EmptyDocument,
    /// The root value is complete.
    NonemptyDocument,
    EmptyArray,
    NonemptyArray,
    EmptyObject,
    /// A member name is staged and waits for its value.
    DanglingName,
    NonemptyObject,
    /// `close()` succeeded; every further call fails.
    Closed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FrameKind {
    Document,
    Array,
    Object,
}

/// One open container (or the document itself, which is never popped).
#[derive(Debug)]
struct Frame {
    kind: FrameKind,
    nonempty: bool,
    /// Name written by `name()` but not yet committed to the sink.
    pending_name: Option<String>,
    serialize_nulls: bool,
}

impl Frame {
    fn new(kind: FrameKind, serialize_nulls: bool) -> Self {
        Self {
            kind,
            nonempty: false,
            pending_name: None,
            serialize_nulls,
        }
    }
}

/// Streaming JSON writer over a [`CharSink`].
#[derive(Debug)]
pub struct JsonWriter<S: CharSink> {
    sink: S,
    frames: Vec<Frame>,
    indent: String,
    lenient: bool,
    serialize_nulls: bool,
    whole_floats_with_fraction: bool,
    closed: bool,
}

impl<S: CharSink> JsonWriter<S> {
    /// Creates a compact, strict writer that writes `null` members.
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            frames: alloc::vec![Frame::new(FrameKind::Document, true)],
            indent: String::new(),
            lenient: false,
            serialize_nulls: true,
            whole_floats_with_fraction: true,
            closed: false,
        }
    }

    /// Creates a writer configured from the stream options of `ctx`.
    pub fn from_context(sink: S, ctx: &SerializationContext) -> Self {
        let mut writer = Self::new(sink);
        writer.set_indent(ctx.indent());
        writer.set_lenient(ctx.lenient());
        writer.set_serialize_nulls(ctx.serialize_nulls());
        writer.whole_floats_with_fraction = ctx.whole_floats_with_fraction();
        writer
    }

    pub fn set_indent(&mut self, indent: &str) {
        self.indent = indent.into();
    }

    pub fn set_lenient(&mut self, lenient: bool) {
        self.lenient = lenient;
    }

    /// Sets the null-member policy for objects opened with
    /// [`begin_object`](Self::begin_object) from now on.
    pub fn set_serialize_nulls(&mut self, serialize_nulls: bool) {
        self.serialize_nulls = serialize_nulls;
    }

    #[must_use]
    pub fn is_lenient(&self) -> bool {
        self.lenient
    }

    #[must_use]
    pub fn serialize_nulls(&self) -> bool {
        self.serialize_nulls
    }

    /// Number of open arrays and objects.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.frames.len() - 1
    }

    #[must_use]
    pub fn state(&self) -> WriterState {
        if self.closed {
            return WriterState::Closed;
        }
        let Some(top) = self.frames.last() else {
            return WriterState::Closed;
        };
        match (top.kind, top.nonempty) {
            (FrameKind::Document, false) => WriterState::EmptyDocument,
            (FrameKind::Document, true) => WriterState::NonemptyDocument,
            (FrameKind::Array, false) => WriterState::EmptyArray,
            (FrameKind::Array, true) => WriterState::NonemptyArray,
            (FrameKind::Object, _) if top.pending_name.is_some() => WriterState::DanglingName,
            (FrameKind::Object, false) => WriterState::EmptyObject,
            (FrameKind::Object, true) => WriterState::NonemptyObject,
        }
    }

    /// Whether the innermost object has a staged name awaiting its value.
    #[must_use]
    pub fn has_pending_name(&self) -> bool {
        !self.closed && self.frames.last().is_some_and(|f| f.pending_name.is_some())
    }

    pub fn begin_array(&mut self) -> Result<&mut Self, Error> {
        let serialize_nulls = self.serialize_nulls;
        self.open(FrameKind::Array, "[", serialize_nulls)
    }

    pub fn end_array(&mut self) -> Result<&mut Self, Error> {
        self.close_frame(FrameKind::Array, "]")
    }

    pub fn begin_object(&mut self) -> Result<&mut Self, Error> {
        let serialize_nulls = self.serialize_nulls;
        self.open(FrameKind::Object, "{", serialize_nulls)
    }

    /// Opens an object whose `null` members follow `serialize_nulls` instead
    /// of the writer-wide policy.
    pub fn begin_object_with(&mut self, serialize_nulls: bool) -> Result<&mut Self, Error> {
        self.open(FrameKind::Object, "{", serialize_nulls)
    }

    pub fn end_object(&mut self) -> Result<&mut Self, Error> {
        self.close_frame(FrameKind::Object, "}")
    }

    /// Stages the name of the next object member.
    ///
    /// Nothing reaches the sink until the member's value does.
    pub fn name(&mut self, name: impl Into<String>) -> Result<&mut Self, Error> {
        let top = self.top_mut()?;
        if top.kind != FrameKind::Object {
            return Err(Error::Structural("name written outside of an object"));
        }
        if top.pending_name.is_some() {
            return Err(Error::Structural("name written while another name awaits its value"));
        }
        top.pending_name = Some(name.into());
        Ok(self)
    }

    /// Rolls back the staged member name; nothing of the member is emitted.
    pub fn cancel_name(&mut self) -> Result<&mut Self, Error> {
        if self.top_mut()?.pending_name.take().is_none() {
            return Err(Error::Structural("no pending name to cancel"));
        }
        Ok(self)
    }

    pub fn string_value(&mut self, value: &str) -> Result<&mut Self, Error> {
        self.before_value(true)?;
        write_quoted(&mut self.sink, value)?;
        Ok(self)
    }

    pub fn bool_value(&mut self, value: bool) -> Result<&mut Self, Error> {
        self.before_value(true)?;
        self.sink.write_str(if value { "true" } else { "false" })?;
        Ok(self)
    }

    /// Writes `null`, or drops the whole member when the enclosing object does
    /// not serialize nulls.
    pub fn null_value(&mut self) -> Result<&mut Self, Error> {
        let top = self.top_mut()?;
        if top.kind == FrameKind::Object && !top.serialize_nulls && top.pending_name.is_some() {
            top.pending_name = None;
            return Ok(self);
        }
        self.before_value(true)?;
        self.sink.write_str("null")?;
        Ok(self)
    }

    /// Writes a floating point number.
    ///
    /// Non-finite values are only accepted by a lenient writer, which spells
    /// them `NaN`, `Infinity` and `-Infinity`.
    pub fn f64_value(&mut self, value: f64) -> Result<&mut Self, Error> {
        if !value.is_finite() {
            let literal = non_finite_literal(value);
            if !self.lenient {
                return Err(Error::NumericFormat(literal.into()));
            }
            self.before_value(true)?;
            self.sink.write_str(literal)?;
            return Ok(self);
        }
        self.finite_float(format!("{value:?}"))
    }

    /// Writes an `f32` in its own shortest form (`0.1`, not the digits of the
    /// widened `f64`).
    pub fn f32_value(&mut self, value: f32) -> Result<&mut Self, Error> {
        if !value.is_finite() {
            return self.f64_value(f64::from(value));
        }
        self.finite_float(format!("{value:?}"))
    }

    pub fn i64_value(&mut self, value: i64) -> Result<&mut Self, Error> {
        self.before_value(true)?;
        self.sink.write_str(&value.to_string())?;
        Ok(self)
    }

    pub fn u64_value(&mut self, value: u64) -> Result<&mut Self, Error> {
        self.before_value(true)?;
        self.sink.write_str(&value.to_string())?;
        Ok(self)
    }

    /// Writes an already rendered numeric literal (e.g. a big decimal).
    ///
    /// The literal is trusted apart from the non-finite spellings, which are
    /// subject to the same leniency rule as [`f64_value`](Self::f64_value).
    pub fn number_value(&mut self, literal: &str) -> Result<&mut Self, Error> {
        if matches!(literal, "NaN" | "Infinity" | "-Infinity") && !self.lenient {
            return Err(Error::NumericFormat(literal.into()));
        }
        self.before_value(true)?;
        self.sink.write_str(literal)?;
        Ok(self)
    }

    /// Writes `json` verbatim as the next value. The caller guarantees it is
    /// a single well-formed JSON value.
    pub fn raw_value(&mut self, json: &str) -> Result<&mut Self, Error> {
        self.before_value(false)?;
        self.sink.write_str(json)?;
        Ok(self)
    }

    pub fn flush(&mut self) -> Result<(), Error> {
        if self.closed {
            return Err(Error::Structural("writer is closed"));
        }
        self.sink.flush()
    }

    /// Checks that exactly one complete document was written and closes the
    /// sink. Closing twice is a no-op.
    pub fn close(&mut self) -> Result<(), Error> {
        if self.closed {
            return Ok(());
        }
        let open = self.depth();
        if open > 0 || self.state() != WriterState::NonemptyDocument {
            return Err(Error::IncompleteDocument { open });
        }
        self.sink.close()?;
        self.closed = true;
        Ok(())
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_inner(self) -> S {
        self.sink
    }

    fn finite_float(&mut self, mut rendered: String) -> Result<&mut Self, Error> {
        if !self.whole_floats_with_fraction && rendered.ends_with(".0") {
            rendered.truncate(rendered.len() - 2);
        }
        self.before_value(true)?;
        self.sink.write_str(&rendered)?;
        Ok(self)
    }

    fn top_mut(&mut self) -> Result<&mut Frame, Error> {
        if self.closed {
            return Err(Error::Structural("writer is closed"));
        }
        self.frames
            .last_mut()
            .ok_or(Error::Structural("writer is closed"))
    }

    fn open(
        &mut self,
        kind: FrameKind,
        bracket: &str,
        serialize_nulls: bool,
    ) -> Result<&mut Self, Error> {
        self.before_value(false)?;
        self.sink.write_str(bracket)?;
        self.frames.push(Frame::new(kind, serialize_nulls));
        Ok(self)
    }

    fn close_frame(&mut self, kind: FrameKind, bracket: &str) -> Result<&mut Self, Error> {
        let top = self.top_mut()?;
        if top.kind != kind {
            return Err(match (top.kind, kind) {
                (FrameKind::Document, _) => Error::Structural("no open container to end"),
                (_, FrameKind::Array) => Error::Structural("end_array called inside an object"),
                _ => Error::Structural("end_object called inside an array"),
            });
        }
        if top.pending_name.is_some() {
            return Err(Error::Structural("dangling name at end of object"));
        }
        let nonempty = top.nonempty;
        self.frames.pop();
        if nonempty {
            self.newline()?;
        }
        self.sink.write_str(bracket)?;
        Ok(self)
    }

    /// Commits whatever has to precede the next value: a separator, the
    /// staged member name, indentation.
    fn before_value(&mut self, scalar: bool) -> Result<(), Error> {
        #[cfg(any(test, feature = "fuzzing"))]
        assert!(
            self.frames
                .iter()
                .rev()
                .skip(1)
                .all(|f| f.pending_name.is_none()),
            "Internal error: name pending in an enclosing frame"
        );
        let lenient = self.lenient;
        let top = self.top_mut()?;
        let had_children = top.nonempty;
        match top.kind {
            FrameKind::Document => {
                if had_children && !lenient {
                    return Err(Error::Structural("JSON must have only one top-level value"));
                }
                if scalar && !lenient {
                    return Err(Error::Structural("JSON must start with an array or an object"));
                }
                top.nonempty = true;
                if had_children {
                    self.sink.write_str("\n")?;
                }
            }
            FrameKind::Array => {
                top.nonempty = true;
                if had_children {
                    self.sink.write_str(",")?;
                }
                self.newline()?;
            }
            FrameKind::Object => {
                let Some(name) = top.pending_name.take() else {
                    return Err(Error::Structural("value written inside an object without a name"));
                };
                top.nonempty = true;
                if had_children {
                    self.sink.write_str(",")?;
                }
                self.newline()?;
                write_quoted(&mut self.sink, &name)?;
                self.sink
                    .write_str(if self.indent.is_empty() { ":" } else { ": " })?;
            }
        }
        Ok(())
    }

    fn newline(&mut self) -> Result<(), Error> {
        if self.indent.is_empty() {
            return Ok(());
        }
        self.sink.write_str("\n")?;
        for _ in 0..self.depth() {
            self.sink.write_str(&self.indent)?;
        }
        Ok(())
    }
}

impl JsonWriter<String> {
    /// Text written so far.
    #[must_use]
    pub fn output(&self) -> &str {
        &self.sink
    }

    #[must_use]
    pub fn into_output(self) -> String {
        self.sink
    }
}

pub(crate) fn non_finite_literal(value: f64) -> &'static str {
    if value.is_nan() {
        "NaN"
    } else if value.is_sign_positive() {
        "Infinity"
    } else {
        "-Infinity"
    }
}
