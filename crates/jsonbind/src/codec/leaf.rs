//! Codecs for single scalar values.

use alloc::{
    format,
    string::{String, ToString},
};

use super::{JsonDeserializer, JsonSerializer};
use crate::{
    CharSink, DeserializationContext, Error, JsonReader, JsonWriter, SerializationContext, Token,
    reader::SyntaxError,
};

/// `String` as a JSON string.
#[derive(Debug, Clone, Copy, Default)]
pub struct StringCodec;

impl JsonSerializer<String> for StringCodec {
    fn serialize<S: CharSink>(
        &self,
        writer: &mut JsonWriter<S>,
        value: &String,
        _ctx: &SerializationContext,
    ) -> Result<(), Error> {
        writer.string_value(value)?;
        Ok(())
    }
}

impl JsonSerializer<str> for StringCodec {
    fn serialize<S: CharSink>(
        &self,
        writer: &mut JsonWriter<S>,
        value: &str,
        _ctx: &SerializationContext,
    ) -> Result<(), Error> {
        writer.string_value(value)?;
        Ok(())
    }
}

impl JsonDeserializer<String> for StringCodec {
    fn deserialize(
        &self,
        reader: &mut JsonReader<'_>,
        _ctx: &DeserializationContext,
    ) -> Result<String, Error> {
        Ok(reader.next_string()?.into_owned())
    }
}

/// `bool` as `true` / `false`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BoolCodec;

impl JsonSerializer<bool> for BoolCodec {
    fn serialize<S: CharSink>(
        &self,
        writer: &mut JsonWriter<S>,
        value: &bool,
        _ctx: &SerializationContext,
    ) -> Result<(), Error> {
        writer.bool_value(*value)?;
        Ok(())
    }
}

impl JsonDeserializer<bool> for BoolCodec {
    fn deserialize(
        &self,
        reader: &mut JsonReader<'_>,
        _ctx: &DeserializationContext,
    ) -> Result<bool, Error> {
        reader.next_bool()
    }
}

/// `char` as a one-character JSON string.
#[derive(Debug, Clone, Copy, Default)]
pub struct CharCodec;

impl JsonSerializer<char> for CharCodec {
    fn serialize<S: CharSink>(
        &self,
        writer: &mut JsonWriter<S>,
        value: &char,
        _ctx: &SerializationContext,
    ) -> Result<(), Error> {
        let mut buf = [0u8; 4];
        writer.string_value(value.encode_utf8(&mut buf))?;
        Ok(())
    }
}

impl JsonDeserializer<char> for CharCodec {
    fn deserialize(
        &self,
        reader: &mut JsonReader<'_>,
        _ctx: &DeserializationContext,
    ) -> Result<char, Error> {
        let s = reader.next_string()?;
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(c),
            _ => Err(reader.error_here(SyntaxError::SyntaxError(
                "expected a string of exactly one character",
            ))),
        }
    }
}

/// Every primitive integer type as a JSON number.
#[derive(Debug, Clone, Copy, Default)]
pub struct IntCodec;

macro_rules! int_codec {
    ($via:ident, $next:ident: $($ty:ty),*) => {$(
        impl JsonSerializer<$ty> for IntCodec {
            fn serialize<S: CharSink>(
                &self,
                writer: &mut JsonWriter<S>,
                value: &$ty,
                _ctx: &SerializationContext,
            ) -> Result<(), Error> {
                writer.$via((*value).into())?;
                Ok(())
            }
        }

        impl JsonDeserializer<$ty> for IntCodec {
            fn deserialize(
                &self,
                reader: &mut JsonReader<'_>,
                _ctx: &DeserializationContext,
            ) -> Result<$ty, Error> {
                let wide = reader.$next()?;
                <$ty>::try_from(wide).map_err(|_| {
                    reader.error_here(SyntaxError::NumberOutOfRange(wide.to_string()))
                })
            }
        }
    )*};
}

int_codec!(i64_value, next_i64: i8, i16, i32, i64);
int_codec!(u64_value, next_u64: u8, u16, u32, u64);

macro_rules! size_codec {
    ($via:ident, $next:ident, $wide:ty: $ty:ty) => {
        impl JsonSerializer<$ty> for IntCodec {
            fn serialize<S: CharSink>(
                &self,
                writer: &mut JsonWriter<S>,
                value: &$ty,
                _ctx: &SerializationContext,
            ) -> Result<(), Error> {
                let wide = <$wide>::try_from(*value)
                    .map_err(|_| Error::NumericFormat(format!("{value}")))?;
                writer.$via(wide)?;
                Ok(())
            }
        }

        impl JsonDeserializer<$ty> for IntCodec {
            fn deserialize(
                &self,
                reader: &mut JsonReader<'_>,
                _ctx: &DeserializationContext,
            ) -> Result<$ty, Error> {
                let wide = reader.$next()?;
                <$ty>::try_from(wide).map_err(|_| {
                    reader.error_here(SyntaxError::NumberOutOfRange(wide.to_string()))
                })
            }
        }
    };
}

size_codec!(i64_value, next_i64, i64: isize);
size_codec!(u64_value, next_u64, u64: usize);

/// `f64` and `f32` as JSON numbers; non-finite values follow the writer's
/// leniency.
#[derive(Debug, Clone, Copy, Default)]
pub struct FloatCodec;

impl JsonSerializer<f64> for FloatCodec {
    fn serialize<S: CharSink>(
        &self,
        writer: &mut JsonWriter<S>,
        value: &f64,
        _ctx: &SerializationContext,
    ) -> Result<(), Error> {
        writer.f64_value(*value)?;
        Ok(())
    }
}

impl JsonDeserializer<f64> for FloatCodec {
    fn deserialize(
        &self,
        reader: &mut JsonReader<'_>,
        _ctx: &DeserializationContext,
    ) -> Result<f64, Error> {
        reader.next_f64()
    }
}

impl JsonSerializer<f32> for FloatCodec {
    fn serialize<S: CharSink>(
        &self,
        writer: &mut JsonWriter<S>,
        value: &f32,
        _ctx: &SerializationContext,
    ) -> Result<(), Error> {
        writer.f32_value(*value)?;
        Ok(())
    }
}

impl JsonDeserializer<f32> for FloatCodec {
    #[allow(clippy::cast_possible_truncation)]
    fn deserialize(
        &self,
        reader: &mut JsonReader<'_>,
        _ctx: &DeserializationContext,
    ) -> Result<f32, Error> {
        Ok(reader.next_f64()? as f32)
    }
}

/// `Option<T>` where `None` is JSON `null`.
///
/// Inside an object that does not serialize nulls, `None` removes the whole
/// member.
#[derive(Debug, Clone, Copy, Default)]
pub struct OptionCodec<C>(pub C);

impl<T, C: JsonSerializer<T>> JsonSerializer<Option<T>> for OptionCodec<C> {
    fn serialize<S: CharSink>(
        &self,
        writer: &mut JsonWriter<S>,
        value: &Option<T>,
        ctx: &SerializationContext,
    ) -> Result<(), Error> {
        match value {
            Some(inner) => self.0.serialize(writer, inner, ctx),
            None => {
                writer.null_value()?;
                Ok(())
            }
        }
    }
}

impl<T, C: JsonDeserializer<T>> JsonDeserializer<Option<T>> for OptionCodec<C> {
    fn deserialize(
        &self,
        reader: &mut JsonReader<'_>,
        ctx: &DeserializationContext,
    ) -> Result<Option<T>, Error> {
        if reader.peek()? == Token::Null {
            reader.next_null()?;
            return Ok(None);
        }
        self.0.deserialize(reader, ctx).map(Some)
    }
}
