//! Codec traits and the codecs built on them.
//!
//! A codec converts one Rust type to and from JSON by driving a
//! [`JsonWriter`] or [`JsonReader`]. Codecs for containers hold the codecs of
//! their parts and delegate every element to them, threading the same stream
//! and context through the whole call tree:
//!
//! ```rust
//! use std::collections::BTreeMap;
//!
//! use jsonbind::codec::{CollectionCodec, IntCodec, IntKeyCodec, MapCodec, StringCodec};
//! use jsonbind::JsonMapper;
//!
//! // BTreeMap<u32, Vec<String>>
//! let codec = MapCodec::new(IntKeyCodec, CollectionCodec::sequence(StringCodec));
//! let mapper = JsonMapper::new(codec);
//!
//! let mut value = BTreeMap::new();
//! value.insert(7u32, vec!["a".to_string(), "b".to_string()]);
//! let json = mapper.write(&value)?;
//! assert_eq!(json, r#"{"7":["a","b"]}"#);
//! assert_eq!(mapper.read::<BTreeMap<u32, Vec<String>>>(&json)?, value);
//! # Ok::<(), jsonbind::Error>(())
//! ```
//!
//! Codecs carry no per-call state, so one instance can be built once and
//! shared; `&C` and `Arc<C>` are codecs whenever `C` is.

mod collection;
mod key;
mod leaf;
mod map;

use alloc::{boxed::Box, string::String, sync::Arc};

pub use collection::{CollectionCodec, CollectionKind, JsonCollection};
pub use key::{BoolKeyCodec, CharKeyCodec, FnKeyCodec, IntKeyCodec, OptionKeyCodec, StringKeyCodec};
pub use leaf::{BoolCodec, CharCodec, FloatCodec, IntCodec, OptionCodec, StringCodec};
pub use map::{ByKey, ByMemberName, JsonMap, JsonMultimap, KeyOrder, MapCodec, MultimapCodec};

use crate::{CharSink, DeserializationContext, Error, JsonReader, JsonWriter, SerializationContext};

/// Writes values of type `T`.
pub trait JsonSerializer<T: ?Sized> {
    fn serialize<S: CharSink>(
        &self,
        writer: &mut JsonWriter<S>,
        value: &T,
        ctx: &SerializationContext,
    ) -> Result<(), Error>;
}

/// Reads values of type `T`.
pub trait JsonDeserializer<T> {
    fn deserialize(
        &self,
        reader: &mut JsonReader<'_>,
        ctx: &DeserializationContext,
    ) -> Result<T, Error>;
}

/// Encodes a map key as an object member name.
///
/// The encoding must be injective over the keys in use. `Ok(None)` means the
/// key has no name (a null key) and the entry is left out.
pub trait KeySerializer<K: ?Sized> {
    fn serialize_key(&self, key: &K, ctx: &SerializationContext) -> Result<Option<String>, Error>;
}

/// Decodes an object member name back into a map key.
///
/// Must invert [`KeySerializer::serialize_key`]; names it cannot decode fail
/// with [`Error::UnsupportedKey`].
pub trait KeyDeserializer<K> {
    fn deserialize_key(&self, key: &str, ctx: &DeserializationContext) -> Result<K, Error>;
}

macro_rules! forward_codec {
    ($($wrapper:ty),*) => {$(
        impl<T: ?Sized, C: JsonSerializer<T> + ?Sized> JsonSerializer<T> for $wrapper {
            #[inline]
            fn serialize<S: CharSink>(
                &self,
                writer: &mut JsonWriter<S>,
                value: &T,
                ctx: &SerializationContext,
            ) -> Result<(), Error> {
                (**self).serialize(writer, value, ctx)
            }
        }

        impl<T, C: JsonDeserializer<T> + ?Sized> JsonDeserializer<T> for $wrapper {
            #[inline]
            fn deserialize(
                &self,
                reader: &mut JsonReader<'_>,
                ctx: &DeserializationContext,
            ) -> Result<T, Error> {
                (**self).deserialize(reader, ctx)
            }
        }

        impl<K: ?Sized, C: KeySerializer<K> + ?Sized> KeySerializer<K> for $wrapper {
            #[inline]
            fn serialize_key(
                &self,
                key: &K,
                ctx: &SerializationContext,
            ) -> Result<Option<String>, Error> {
                (**self).serialize_key(key, ctx)
            }
        }

        impl<K, C: KeyDeserializer<K> + ?Sized> KeyDeserializer<K> for $wrapper {
            #[inline]
            fn deserialize_key(&self, key: &str, ctx: &DeserializationContext) -> Result<K, Error> {
                (**self).deserialize_key(key, ctx)
            }
        }
    )*};
}

forward_codec!(&C, Box<C>, Arc<C>);
