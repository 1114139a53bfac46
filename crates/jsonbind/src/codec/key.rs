//! Codecs between map keys and object member names.

use alloc::string::{String, ToString};
use core::fmt;

use super::{KeyDeserializer, KeySerializer};
use crate::{DeserializationContext, Error, SerializationContext};

/// String keys, used as member names unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct StringKeyCodec;

impl KeySerializer<String> for StringKeyCodec {
    fn serialize_key(&self, key: &String, _ctx: &SerializationContext) -> Result<Option<String>, Error> {
        Ok(Some(key.clone()))
    }
}

impl KeySerializer<str> for StringKeyCodec {
    fn serialize_key(&self, key: &str, _ctx: &SerializationContext) -> Result<Option<String>, Error> {
        Ok(Some(key.into()))
    }
}

impl KeyDeserializer<String> for StringKeyCodec {
    fn deserialize_key(&self, key: &str, _ctx: &DeserializationContext) -> Result<String, Error> {
        Ok(key.into())
    }
}

/// Integer keys in their decimal form, e.g. `{"1":"x"}`.
#[derive(Debug, Clone, Copy, Default)]
pub struct IntKeyCodec;

macro_rules! int_key_codec {
    ($($ty:ty),*) => {$(
        impl KeySerializer<$ty> for IntKeyCodec {
            fn serialize_key(
                &self,
                key: &$ty,
                _ctx: &SerializationContext,
            ) -> Result<Option<String>, Error> {
                Ok(Some(key.to_string()))
            }
        }

        impl KeyDeserializer<$ty> for IntKeyCodec {
            fn deserialize_key(
                &self,
                key: &str,
                _ctx: &DeserializationContext,
            ) -> Result<$ty, Error> {
                key.parse()
                    .map_err(|_| Error::unsupported_key(key, concat!("not a valid ", stringify!($ty))))
            }
        }
    )*};
}

int_key_codec!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

/// `true` / `false` keys.
#[derive(Debug, Clone, Copy, Default)]
pub struct BoolKeyCodec;

impl KeySerializer<bool> for BoolKeyCodec {
    fn serialize_key(&self, key: &bool, _ctx: &SerializationContext) -> Result<Option<String>, Error> {
        Ok(Some(key.to_string()))
    }
}

impl KeyDeserializer<bool> for BoolKeyCodec {
    fn deserialize_key(&self, key: &str, _ctx: &DeserializationContext) -> Result<bool, Error> {
        match key {
            "true" => Ok(true),
            "false" => Ok(false),
            _ => Err(Error::unsupported_key(key, "not a boolean")),
        }
    }
}

/// Single character keys.
#[derive(Debug, Clone, Copy, Default)]
pub struct CharKeyCodec;

impl KeySerializer<char> for CharKeyCodec {
    fn serialize_key(&self, key: &char, _ctx: &SerializationContext) -> Result<Option<String>, Error> {
        Ok(Some(key.to_string()))
    }
}

impl KeyDeserializer<char> for CharKeyCodec {
    fn deserialize_key(&self, key: &str, _ctx: &DeserializationContext) -> Result<char, Error> {
        let mut chars = key.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(c),
            _ => Err(Error::unsupported_key(key, "not a single character")),
        }
    }
}

/// `Option<K>` keys. `None` has no member name, so its entry is skipped on
/// write; every name read back decodes to `Some`.
#[derive(Debug, Clone, Copy, Default)]
pub struct OptionKeyCodec<C>(pub C);

impl<K, C: KeySerializer<K>> KeySerializer<Option<K>> for OptionKeyCodec<C> {
    fn serialize_key(&self, key: &Option<K>, ctx: &SerializationContext) -> Result<Option<String>, Error> {
        match key {
            Some(key) => self.0.serialize_key(key, ctx),
            None => Ok(None),
        }
    }
}

impl<K, C: KeyDeserializer<K>> KeyDeserializer<Option<K>> for OptionKeyCodec<C> {
    fn deserialize_key(&self, key: &str, ctx: &DeserializationContext) -> Result<Option<K>, Error> {
        self.0.deserialize_key(key, ctx).map(Some)
    }
}

/// Key codec made of a pair of closures, for enums and small value types.
///
/// ```rust
/// use jsonbind::codec::{FnKeyCodec, KeyDeserializer, KeySerializer};
/// use jsonbind::{DeserializationContext, SerializationContext};
///
/// #[derive(Debug, PartialEq)]
/// enum Color { Red, Blue }
///
/// let codec = FnKeyCodec::new(
///     |c: &Color| match c { Color::Red => "red".to_string(), Color::Blue => "blue".to_string() },
///     |s: &str| match s { "red" => Some(Color::Red), "blue" => Some(Color::Blue), _ => None },
/// );
/// let name = codec.serialize_key(&Color::Blue, &SerializationContext::default())?;
/// assert_eq!(name.as_deref(), Some("blue"));
/// let unknown: Result<Color, _> = codec.deserialize_key("green", &DeserializationContext::default());
/// assert!(unknown.is_err());
/// # Ok::<(), jsonbind::Error>(())
/// ```
#[derive(Clone, Copy)]
pub struct FnKeyCodec<E, D> {
    encode: E,
    decode: D,
}

impl<E, D> FnKeyCodec<E, D> {
    pub const fn new(encode: E, decode: D) -> Self {
        Self { encode, decode }
    }
}

impl<E, D> fmt::Debug for FnKeyCodec<E, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnKeyCodec").finish_non_exhaustive()
    }
}

impl<K, E: Fn(&K) -> String, D> KeySerializer<K> for FnKeyCodec<E, D> {
    fn serialize_key(&self, key: &K, _ctx: &SerializationContext) -> Result<Option<String>, Error> {
        Ok(Some((self.encode)(key)))
    }
}

impl<K, E, D: Fn(&str) -> Option<K>> KeyDeserializer<K> for FnKeyCodec<E, D> {
    fn deserialize_key(&self, key: &str, _ctx: &DeserializationContext) -> Result<K, Error> {
        (self.decode)(key).ok_or_else(|| Error::unsupported_key(key, "unknown key"))
    }
}

#[cfg(test)]
mod tests {
    use quickcheck_macros::quickcheck;
    use rstest::rstest;

    use super::*;

    fn ser() -> SerializationContext {
        SerializationContext::default()
    }

    fn de() -> DeserializationContext {
        DeserializationContext::default()
    }

    #[test]
    fn integer_keys_are_decimal() {
        assert_eq!(IntKeyCodec.serialize_key(&-12i32, &ser()).unwrap().as_deref(), Some("-12"));
        let key: u16 = IntKeyCodec.deserialize_key("65535", &de()).unwrap();
        assert_eq!(key, u16::MAX);
    }

    #[rstest]
    #[case("")]
    #[case("x1")]
    #[case("1.5")]
    #[case("70000")]
    fn integer_keys_reject_garbage(#[case] name: &str) {
        let err = KeyDeserializer::<u16>::deserialize_key(&IntKeyCodec, name, &de()).unwrap_err();
        assert_eq!(
            err,
            Error::UnsupportedKey {
                key: name.into(),
                reason: "not a valid u16",
            }
        );
    }

    fn decoded<K, C: KeySerializer<K> + KeyDeserializer<K>>(codec: &C, key: &K) -> Option<K> {
        let name = codec.serialize_key(key, &ser()).ok()??;
        codec.deserialize_key(&name, &de()).ok()
    }

    #[quickcheck]
    fn integer_keys_decode_to_themselves(small: i8, signed: i64, wide: u128) -> bool {
        decoded(&IntKeyCodec, &small) == Some(small)
            && decoded(&IntKeyCodec, &signed) == Some(signed)
            && decoded(&IntKeyCodec, &wide) == Some(wide)
    }

    #[quickcheck]
    fn text_keys_decode_to_themselves(text: String, c: char, b: bool) -> bool {
        decoded(&StringKeyCodec, &text).as_ref() == Some(&text)
            && decoded(&CharKeyCodec, &c) == Some(c)
            && decoded(&BoolKeyCodec, &b) == Some(b)
            && decoded(&OptionKeyCodec(StringKeyCodec), &Some(text.clone())) == Some(Some(text))
    }

    #[test]
    fn bool_and_char_keys() {
        assert!(BoolKeyCodec.deserialize_key("true", &de()).unwrap());
        assert!(BoolKeyCodec.deserialize_key("yes", &de()).is_err());
        assert_eq!(CharKeyCodec.deserialize_key("é", &de()).unwrap(), 'é');
        assert!(CharKeyCodec.deserialize_key("ab", &de()).is_err());
    }

    #[test]
    fn none_keys_have_no_name() {
        let codec = OptionKeyCodec(StringKeyCodec);
        assert_eq!(codec.serialize_key(&None::<String>, &ser()).unwrap(), None);
        assert_eq!(
            codec.serialize_key(&Some(String::from("k")), &ser()).unwrap().as_deref(),
            Some("k")
        );
        let back: Option<String> = codec.deserialize_key("k", &de()).unwrap();
        assert_eq!(back.as_deref(), Some("k"));
    }
}
