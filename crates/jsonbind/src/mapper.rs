//! Top-level entry point tying a root codec to streams and contexts.

use alloc::string::String;

use log::debug;

use crate::{
    CharSink, DeserializationContext, Error, JsonReader, JsonWriter, SerializationContext,
    codec::{JsonDeserializer, JsonSerializer},
    reader::SyntaxError,
};

/// Root name used by [`JsonMapper::new`] when root wrapping is enabled.
pub const DEFAULT_ROOT_NAME: &str = "root";

/// Reads and writes whole documents with one root codec.
///
/// A mapper runs one top-level operation per call: it builds the stream from
/// the context, wraps or unwraps the root value when the context asks for it,
/// drives the codec and closes the stream, so a successful call always
/// produces or consumes exactly one complete document.
///
/// ```rust
/// use jsonbind::codec::{CollectionCodec, IntCodec};
/// use jsonbind::{DeserializationContext, JsonMapper, SerializationContext};
///
/// let mapper = JsonMapper::new(CollectionCodec::sequence(IntCodec)).with_root_name("ids");
///
/// let ctx = SerializationContext::builder().wrap_root_value(true).build();
/// let json = mapper.write_with(&vec![1u32, 2], &ctx)?;
/// assert_eq!(json, r#"{"ids":[1,2]}"#);
///
/// let ctx = DeserializationContext::builder().wrap_root_value(true).build();
/// let ids: Vec<u32> = mapper.read_with(&json, &ctx)?;
/// assert_eq!(ids, [1, 2]);
/// # Ok::<(), jsonbind::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct JsonMapper<C> {
    codec: C,
    root_name: String,
}

impl<C> JsonMapper<C> {
    pub fn new(codec: C) -> Self {
        Self {
            codec,
            root_name: DEFAULT_ROOT_NAME.into(),
        }
    }

    /// Sets the member name the root value is wrapped in.
    #[must_use]
    pub fn with_root_name(mut self, name: impl Into<String>) -> Self {
        self.root_name = name.into();
        self
    }

    pub fn codec(&self) -> &C {
        &self.codec
    }

    pub fn root_name(&self) -> &str {
        &self.root_name
    }

    /// Serializes `value` with the default options.
    pub fn write<T: ?Sized>(&self, value: &T) -> Result<String, Error>
    where
        C: JsonSerializer<T>,
    {
        self.write_with(value, &SerializationContext::default())
    }

    pub fn write_with<T: ?Sized>(&self, value: &T, ctx: &SerializationContext) -> Result<String, Error>
    where
        C: JsonSerializer<T>,
    {
        let mut writer = JsonWriter::from_context(String::new(), ctx);
        self.write_to(&mut writer, value, ctx)?;
        Ok(writer.into_output())
    }

    /// Writes `value` as the document of `writer` and closes it.
    pub fn write_to<S: CharSink, T: ?Sized>(
        &self,
        writer: &mut JsonWriter<S>,
        value: &T,
        ctx: &SerializationContext,
    ) -> Result<(), Error>
    where
        C: JsonSerializer<T>,
    {
        if ctx.wrap_root_value() {
            debug!("writing document wrapped in {:?}", self.root_name);
            writer.begin_object()?;
            writer.name(self.root_name.as_str())?;
            self.codec.serialize(writer, value, ctx)?;
            writer.end_object()?;
        } else {
            debug!("writing document");
            self.codec.serialize(writer, value, ctx)?;
        }
        writer.close()
    }

    /// Deserializes `src` with the default options.
    pub fn read<T>(&self, src: &str) -> Result<T, Error>
    where
        C: JsonDeserializer<T>,
    {
        self.read_with(src, &DeserializationContext::default())
    }

    pub fn read_with<T>(&self, src: &str, ctx: &DeserializationContext) -> Result<T, Error>
    where
        C: JsonDeserializer<T>,
    {
        let mut reader = JsonReader::from_context(src, ctx);
        let value = self.read_from(&mut reader, ctx)?;
        reader.close()?;
        Ok(value)
    }

    /// Reads one root value from `reader`, unwrapping it when the context
    /// asks for it. The reader is left open.
    pub fn read_from<T>(&self, reader: &mut JsonReader<'_>, ctx: &DeserializationContext) -> Result<T, Error>
    where
        C: JsonDeserializer<T>,
    {
        if !ctx.wrap_root_value() {
            debug!("reading document");
            return self.codec.deserialize(reader, ctx);
        }
        debug!("reading document wrapped in {:?}", self.root_name);
        reader.begin_object()?;
        if reader.next_name()? != self.root_name.as_str() {
            return Err(reader.error_here(SyntaxError::SyntaxError(
                "root value is not wrapped in the expected name",
            )));
        }
        let value = self.codec.deserialize(reader, ctx)?;
        reader.end_object()?;
        Ok(value)
    }
}
