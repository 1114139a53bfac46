//! Sequences, sets and multisets as JSON arrays.

use alloc::collections::{BTreeSet, LinkedList, VecDeque};
use alloc::vec::Vec;
#[cfg(feature = "std")]
use core::hash::{BuildHasher, Hash};
#[cfg(feature = "std")]
use std::collections::HashSet;

use log::{debug, trace};

use super::{JsonDeserializer, JsonSerializer};
use crate::{CharSink, DeserializationContext, Error, JsonReader, JsonWriter, SerializationContext, Token};

/// A container that travels as a flat JSON array.
///
/// `occurrences` yields every element as many times as it occurs, in the
/// container's own order; `accumulate` adds one decoded element the way the
/// container adds elements (appending, deduplicating or counting).
pub trait JsonCollection {
    type Item;

    fn occurrences(&self) -> impl Iterator<Item = &Self::Item>;

    fn accumulate(&mut self, item: Self::Item);

    /// Total number of occurrences.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T> JsonCollection for Vec<T> {
    type Item = T;

    fn occurrences(&self) -> impl Iterator<Item = &T> {
        self.iter()
    }

    fn accumulate(&mut self, item: T) {
        self.push(item);
    }

    fn len(&self) -> usize {
        Vec::len(self)
    }
}

impl<T> JsonCollection for VecDeque<T> {
    type Item = T;

    fn occurrences(&self) -> impl Iterator<Item = &T> {
        self.iter()
    }

    fn accumulate(&mut self, item: T) {
        self.push_back(item);
    }

    fn len(&self) -> usize {
        VecDeque::len(self)
    }
}

impl<T> JsonCollection for LinkedList<T> {
    type Item = T;

    fn occurrences(&self) -> impl Iterator<Item = &T> {
        self.iter()
    }

    fn accumulate(&mut self, item: T) {
        self.push_back(item);
    }

    fn len(&self) -> usize {
        LinkedList::len(self)
    }
}

impl<T: Ord> JsonCollection for BTreeSet<T> {
    type Item = T;

    fn occurrences(&self) -> impl Iterator<Item = &T> {
        self.iter()
    }

    fn accumulate(&mut self, item: T) {
        self.insert(item);
    }

    fn len(&self) -> usize {
        BTreeSet::len(self)
    }
}

#[cfg(feature = "std")]
impl<T: Eq + Hash, H: BuildHasher> JsonCollection for HashSet<T, H> {
    type Item = T;

    fn occurrences(&self) -> impl Iterator<Item = &T> {
        self.iter()
    }

    fn accumulate(&mut self, item: T) {
        self.insert(item);
    }

    fn len(&self) -> usize {
        HashSet::len(self)
    }
}

/// Which family a [`CollectionCodec`] was built for. The wire format is the
/// same for all three; the kind only shows up in diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionKind {
    Sequence,
    Set,
    Multiset,
}

/// Array codec over any [`JsonCollection`], delegating each element to `E`.
#[derive(Debug)]
pub struct CollectionCodec<E, C> {
    element: E,
    new_collection: fn() -> C,
    kind: CollectionKind,
}

impl<E: Clone, C> Clone for CollectionCodec<E, C> {
    fn clone(&self) -> Self {
        Self::new(self.element.clone(), self.new_collection, self.kind)
    }
}

impl<E, C> CollectionCodec<E, C> {
    /// Builds a codec whose deserializer starts every collection from
    /// `new_collection()`.
    pub const fn new(element: E, new_collection: fn() -> C, kind: CollectionKind) -> Self {
        Self {
            element,
            new_collection,
            kind,
        }
    }

    pub fn element(&self) -> &E {
        &self.element
    }

    pub fn kind(&self) -> CollectionKind {
        self.kind
    }
}

impl<E, C: Default> CollectionCodec<E, C> {
    pub fn sequence(element: E) -> Self {
        Self::new(element, C::default, CollectionKind::Sequence)
    }

    pub fn set(element: E) -> Self {
        Self::new(element, C::default, CollectionKind::Set)
    }

    pub fn multiset(element: E) -> Self {
        Self::new(element, C::default, CollectionKind::Multiset)
    }
}

impl<E, C> JsonSerializer<C> for CollectionCodec<E, C>
where
    C: JsonCollection,
    E: JsonSerializer<C::Item>,
{
    fn serialize<S: CharSink>(
        &self,
        writer: &mut JsonWriter<S>,
        value: &C,
        ctx: &SerializationContext,
    ) -> Result<(), Error> {
        let len = value.len();
        if len == 0 && !ctx.write_empty_json_arrays() && writer.has_pending_name() {
            debug!("skipping empty {:?} member", self.kind);
            writer.cancel_name()?;
            return Ok(());
        }
        if len == 1 && ctx.write_single_elem_arrays_unwrapped() {
            if let Some(only) = value.occurrences().next() {
                return self.element.serialize(writer, only, ctx);
            }
        }
        trace!("writing {:?} of {len} elements", self.kind);
        writer.begin_array()?;
        for item in value.occurrences() {
            self.element.serialize(writer, item, ctx)?;
        }
        writer.end_array()?;
        Ok(())
    }
}

impl<E, C> JsonDeserializer<C> for CollectionCodec<E, C>
where
    C: JsonCollection,
    E: JsonDeserializer<C::Item>,
{
    fn deserialize(
        &self,
        reader: &mut JsonReader<'_>,
        ctx: &DeserializationContext,
    ) -> Result<C, Error> {
        let mut collection = (self.new_collection)();
        if ctx.accept_single_value_as_array() && reader.peek()? != Token::BeginArray {
            debug!("accepting a single value as a {:?}", self.kind);
            collection.accumulate(self.element.deserialize(reader, ctx)?);
            return Ok(collection);
        }
        trace!("reading {:?}", self.kind);
        reader.begin_array()?;
        while reader.has_next()? {
            collection.accumulate(self.element.deserialize(reader, ctx)?);
        }
        reader.end_array()?;
        Ok(collection)
    }
}
