//! Untyped JSON values.
//!
//! [`Value`] holds any JSON document whose shape is not known up front, and
//! [`ValueCodec`] moves it through the same writer and reader as the typed
//! codecs, so it can also sit inside them (e.g. as the value codec of a map).

use alloc::{collections::BTreeMap, string::String, vec::Vec};
use core::fmt;

use crate::{
    CharSink, DeserializationContext, Error, JsonReader, JsonWriter, SerializationContext, Token,
    codec::{JsonDeserializer, JsonSerializer},
    reader::SyntaxError,
};

pub type Map = BTreeMap<String, Value>;
pub type Array = Vec<Value>;

/// Containers nested deeper than this are rejected on read.
const MAX_DEPTH: usize = 256;

/// Largest magnitude up to which every whole `f64` is an exact integer.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_992.0;

/// A JSON value as defined by [RFC 8259].
///
/// # Examples
///
/// ```
/// use jsonbind::{Map, Value};
///
/// let mut map = Map::new();
/// map.insert("key".to_string(), Value::String("value".into()));
/// map.insert("n".to_string(), Value::Number(2.0));
/// let v = Value::Object(map);
/// assert_eq!(v.to_string(), r#"{"key":"value","n":2}"#);
/// ```
///
/// [RFC 8259]: https://datatracker.ietf.org/doc/html/rfc8259
#[derive(Clone, Debug, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Boolean(bool),
    Number(f64),
    String(String),
    Array(Array),
    Object(Map),
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Boolean(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(v.into())
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Self::Array(v)
    }
}

impl From<BTreeMap<String, Value>> for Value {
    fn from(v: BTreeMap<String, Value>) -> Self {
        Self::Object(v)
    }
}

impl Value {
    /// Returns `true` if the value is [`Null`].
    ///
    /// [`Null`]: Value::Null
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_array(&self) -> Option<&Array> {
        match self {
            Self::Array(a) => Some(a),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_object(&self) -> Option<&Map> {
        match self {
            Self::Object(m) => Some(m),
            _ => None,
        }
    }
}

/// Compact, lenient rendering: non-finite numbers print as `NaN`,
/// `Infinity` and `-Infinity`.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ctx = SerializationContext::builder().lenient(true).build();
        let mut writer = JsonWriter::from_context(String::new(), &ctx);
        ValueCodec
            .serialize(&mut writer, self, &ctx)
            .map_err(|_| fmt::Error)?;
        f.write_str(writer.output())
    }
}

/// Codec for [`Value`].
///
/// Whole numbers within the exactly representable integer range are written
/// without a fraction; everything else goes through the writer's float
/// formatting.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValueCodec;

impl JsonSerializer<Value> for ValueCodec {
    #[allow(clippy::cast_possible_truncation)]
    fn serialize<S: CharSink>(
        &self,
        writer: &mut JsonWriter<S>,
        value: &Value,
        ctx: &SerializationContext,
    ) -> Result<(), Error> {
        match value {
            Value::Null => {
                writer.null_value()?;
            }
            Value::Boolean(b) => {
                writer.bool_value(*b)?;
            }
            Value::Number(n) if n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER => {
                writer.i64_value(*n as i64)?;
            }
            Value::Number(n) => {
                writer.f64_value(*n)?;
            }
            Value::String(s) => {
                writer.string_value(s)?;
            }
            Value::Array(items) => {
                writer.begin_array()?;
                for item in items {
                    self.serialize(writer, item, ctx)?;
                }
                writer.end_array()?;
            }
            Value::Object(members) => {
                writer.begin_object()?;
                for (name, member) in members {
                    writer.name(name.as_str())?;
                    self.serialize(writer, member, ctx)?;
                }
                writer.end_object()?;
            }
        }
        Ok(())
    }
}

impl JsonDeserializer<Value> for ValueCodec {
    fn deserialize(
        &self,
        reader: &mut JsonReader<'_>,
        ctx: &DeserializationContext,
    ) -> Result<Value, Error> {
        match reader.peek()? {
            Token::BeginArray => {
                if reader.depth() >= MAX_DEPTH {
                    return Err(reader.error_here(SyntaxError::SyntaxError("nesting too deep")));
                }
                reader.begin_array()?;
                let mut items = Array::new();
                while reader.has_next()? {
                    items.push(self.deserialize(reader, ctx)?);
                }
                reader.end_array()?;
                Ok(Value::Array(items))
            }
            Token::BeginObject => {
                if reader.depth() >= MAX_DEPTH {
                    return Err(reader.error_here(SyntaxError::SyntaxError("nesting too deep")));
                }
                reader.begin_object()?;
                let mut members = Map::new();
                while reader.has_next()? {
                    let name = reader.next_name()?.into_owned();
                    members.insert(name, self.deserialize(reader, ctx)?);
                }
                reader.end_object()?;
                Ok(Value::Object(members))
            }
            Token::String => Ok(Value::String(reader.next_string()?.into_owned())),
            Token::Number => Ok(Value::Number(reader.next_f64()?)),
            Token::Boolean => Ok(Value::Boolean(reader.next_bool()?)),
            Token::Null => {
                reader.next_null()?;
                Ok(Value::Null)
            }
            Token::Name | Token::EndArray | Token::EndObject | Token::EndDocument => {
                Err(reader.error_here(SyntaxError::SyntaxError("expected a value")))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::{string::ToString, vec};

    use super::*;
    use crate::JsonMapper;

    #[test]
    fn display_is_compact_json() {
        let v = Value::Array(vec![
            Value::Null,
            true.into(),
            Value::Number(1.5),
            Value::Number(-3.0),
            "q\"".into(),
            Value::Object(Map::from([("k".into(), Value::Array(vec![]))])),
        ]);
        assert_eq!(v.to_string(), r#"[null,true,1.5,-3,"q\"",{"k":[]}]"#);
        assert_eq!(Value::Number(f64::NAN).to_string(), "NaN");
    }

    #[test]
    fn reads_what_serde_json_writes() {
        let src = serde_json::json!({
            "a": [1, 2.5, null, {"b": false}],
            "s": "text \u{e9}",
        })
        .to_string();
        let value = JsonMapper::new(ValueCodec).read::<Value>(&src).unwrap();
        let a = value.as_object().unwrap()["a"].as_array().unwrap();
        assert_eq!(a[1].as_f64(), Some(2.5));
        assert!(a[2].is_null());
        assert_eq!(value.as_object().unwrap()["s"].as_str(), Some("text \u{e9}"));
        let reparsed: serde_json::Value = serde_json::from_str(&value.to_string()).unwrap();
        assert_eq!(reparsed, serde_json::from_str::<serde_json::Value>(&src).unwrap());
    }

    #[test]
    fn rejects_runaway_nesting() {
        let src = "[".repeat(MAX_DEPTH + 1) + &"]".repeat(MAX_DEPTH + 1);
        let err = JsonMapper::new(ValueCodec).read::<Value>(&src).unwrap_err();
        assert!(matches!(err, Error::MalformedInput(_)));

        let ok = "[".repeat(MAX_DEPTH) + &"]".repeat(MAX_DEPTH);
        assert!(JsonMapper::new(ValueCodec).read::<Value>(&ok).is_ok());
    }
}
