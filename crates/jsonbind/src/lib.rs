//! Reflection-free JSON data binding.
//!
//! Values are converted by codec objects that are assembled by hand (or by a
//! code generator) instead of being discovered at runtime. Scalar codecs drive
//! one token each; container codecs wrap the codecs of their parts, so a
//! `BTreeMap<u32, Multiset<String>>` is handled by a `MapCodec` holding an
//! `IntKeyCodec` and a `CollectionCodec<StringCodec, _>`. Every call threads a
//! streaming [`JsonWriter`] or [`JsonReader`] and a read-only context through
//! the whole tree.

#![no_std]
#![allow(missing_docs)]
extern crate alloc;

#[cfg(any(test, feature = "std"))]
extern crate std;

pub mod codec;
mod collections;
mod context;
mod error;
mod mapper;
mod reader;
mod value;
mod writer;


pub use collections::{LinkedMultiset, LinkedSet, Multiset};
pub use context::{
    DeserializationContext, DeserializationContextBuilder, SerializationContext,
    SerializationContextBuilder,
};
pub use error::{Error, ReadError, SyntaxError};
pub use mapper::{DEFAULT_ROOT_NAME, JsonMapper};
pub use reader::{JsonReader, Token};
pub use value::{Array, Map, Value, ValueCodec};
#[cfg(feature = "std")]
pub use writer::IoSink;
pub use writer::{CharSink, JsonWriter, WriterState};
