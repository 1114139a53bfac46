//! Maps and multimaps as JSON objects.
//!
//! Keys become member names through a key codec, values go through an
//! ordinary value codec. A multimap is a map whose values are collections
//! (`{"k": [v1, v2]}`); reading the same name twice merges both groups.

use alloc::{collections::BTreeMap, vec::Vec};
use core::cmp::Ordering;
#[cfg(feature = "std")]
use core::hash::{BuildHasher, Hash};
#[cfg(feature = "std")]
use std::collections::HashMap;

use log::{debug, trace};

use super::{JsonCollection, JsonDeserializer, JsonSerializer, KeyDeserializer, KeySerializer};
use crate::{CharSink, DeserializationContext, Error, JsonReader, JsonWriter, SerializationContext};

/// A key/value container that travels as a JSON object.
pub trait JsonMap {
    type Key;
    type Value;

    fn entries(&self) -> impl Iterator<Item = (&Self::Key, &Self::Value)>;

    /// Adds a decoded entry. A later entry for an existing key replaces the
    /// earlier one.
    fn insert_entry(&mut self, key: Self::Key, value: Self::Value);

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<K: Ord, V> JsonMap for BTreeMap<K, V> {
    type Key = K;
    type Value = V;

    fn entries(&self) -> impl Iterator<Item = (&K, &V)> {
        self.iter()
    }

    fn insert_entry(&mut self, key: K, value: V) {
        self.insert(key, value);
    }

    fn len(&self) -> usize {
        BTreeMap::len(self)
    }
}

#[cfg(feature = "std")]
impl<K: Eq + Hash, V, H: BuildHasher> JsonMap for HashMap<K, V, H> {
    type Key = K;
    type Value = V;

    fn entries(&self) -> impl Iterator<Item = (&K, &V)> {
        self.iter()
    }

    fn insert_entry(&mut self, key: K, value: V) {
        self.insert(key, value);
    }

    fn len(&self) -> usize {
        HashMap::len(self)
    }
}

/// Association list that keeps the document's member order.
impl<K: PartialEq, V> JsonMap for Vec<(K, V)> {
    type Key = K;
    type Value = V;

    fn entries(&self) -> impl Iterator<Item = (&K, &V)> {
        self.iter().map(|(k, v)| (k, v))
    }

    fn insert_entry(&mut self, key: K, value: V) {
        match self.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.push((key, value)),
        }
    }

    fn len(&self) -> usize {
        Vec::len(self)
    }
}

/// A map from keys to groups of values.
pub trait JsonMultimap {
    type Key;
    type Group: JsonCollection;

    fn groups(&self) -> impl Iterator<Item = (&Self::Key, &Self::Group)>;

    /// Adds a decoded group, merging it into the group already stored under
    /// `key` if there is one.
    fn insert_group(&mut self, key: Self::Key, group: Self::Group);

    /// Number of distinct keys.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn merge_into<G>(existing: &mut G, group: G)
where
    G: JsonCollection + IntoIterator<Item = <G as JsonCollection>::Item>,
{
    for item in group {
        existing.accumulate(item);
    }
}

impl<K, G> JsonMultimap for BTreeMap<K, G>
where
    K: Ord,
    G: JsonCollection + IntoIterator<Item = <G as JsonCollection>::Item>,
{
    type Key = K;
    type Group = G;

    fn groups(&self) -> impl Iterator<Item = (&K, &G)> {
        self.iter()
    }

    fn insert_group(&mut self, key: K, group: G) {
        match self.get_mut(&key) {
            Some(existing) => merge_into(existing, group),
            None => {
                self.insert(key, group);
            }
        }
    }

    fn len(&self) -> usize {
        BTreeMap::len(self)
    }
}

#[cfg(feature = "std")]
impl<K, G, H> JsonMultimap for HashMap<K, G, H>
where
    K: Eq + Hash,
    G: JsonCollection + IntoIterator<Item = <G as JsonCollection>::Item>,
    H: BuildHasher,
{
    type Key = K;
    type Group = G;

    fn groups(&self) -> impl Iterator<Item = (&K, &G)> {
        self.iter()
    }

    fn insert_group(&mut self, key: K, group: G) {
        match self.get_mut(&key) {
            Some(existing) => merge_into(existing, group),
            None => {
                self.insert(key, group);
            }
        }
    }

    fn len(&self) -> usize {
        HashMap::len(self)
    }
}

/// How map entries are sorted when `order_map_entries_by_keys` is on.
///
/// Each side is given as the key and the member name it was encoded to.
pub trait KeyOrder<K: ?Sized> {
    fn compare(&self, a: (&K, &str), b: (&K, &str)) -> Ordering;
}

/// Sorts entries by their encoded member name, so integer keys `2` and `10`
/// come out as `"10"`, `"2"`. Works for every key type.
#[derive(Debug, Clone, Copy, Default)]
pub struct ByMemberName;

impl<K: ?Sized> KeyOrder<K> for ByMemberName {
    fn compare(&self, a: (&K, &str), b: (&K, &str)) -> Ordering {
        a.1.cmp(b.1)
    }
}

/// Sorts entries by the keys' own [`Ord`], the order of a sorted map.
#[derive(Debug, Clone, Copy, Default)]
pub struct ByKey;

impl<K: Ord + ?Sized> KeyOrder<K> for ByKey {
    fn compare(&self, a: (&K, &str), b: (&K, &str)) -> Ordering {
        a.0.cmp(b.0)
    }
}

/// Writes one object body from `entries`, honouring key skipping and
/// `order_map_entries_by_keys`. `skip` drops entries by value.
fn write_members<'v, S, K, V, KC, VC, O>(
    writer: &mut JsonWriter<S>,
    entries: impl Iterator<Item = (&'v K, &'v V)>,
    key_codec: &KC,
    value_codec: &VC,
    order: &O,
    ctx: &SerializationContext,
    skip: impl Fn(&V) -> bool,
) -> Result<(), Error>
where
    S: CharSink,
    K: 'v,
    V: 'v,
    KC: KeySerializer<K>,
    VC: JsonSerializer<V>,
    O: KeyOrder<K>,
{
    let mut named = Vec::new();
    for (key, value) in entries {
        if skip(value) {
            continue;
        }
        match key_codec.serialize_key(key, ctx)? {
            Some(name) if ctx.order_map_entries_by_keys() => named.push((key, name, value)),
            Some(name) => {
                writer.name(name)?;
                value_codec.serialize(writer, value, ctx)?;
            }
            None => debug!("skipping map entry without a member name"),
        }
    }
    named.sort_by(|a, b| order.compare((a.0, a.1.as_str()), (b.0, b.1.as_str())));
    for (_, name, value) in named {
        writer.name(name)?;
        value_codec.serialize(writer, value, ctx)?;
    }
    Ok(())
}

/// Object codec for any [`JsonMap`].
///
/// `O` picks the entry order used when the context asks for ordered output;
/// see [`order_by_key`](Self::order_by_key).
#[derive(Debug)]
pub struct MapCodec<KC, VC, M, O = ByMemberName> {
    key: KC,
    value: VC,
    new_map: fn() -> M,
    order: O,
}

impl<KC: Clone, VC: Clone, M, O: Clone> Clone for MapCodec<KC, VC, M, O> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            value: self.value.clone(),
            new_map: self.new_map,
            order: self.order.clone(),
        }
    }
}

impl<KC, VC, M: Default> MapCodec<KC, VC, M> {
    pub fn new(key: KC, value: VC) -> Self {
        Self::with_factory(key, value, M::default)
    }
}

impl<KC, VC, M> MapCodec<KC, VC, M> {
    pub const fn with_factory(key: KC, value: VC, new_map: fn() -> M) -> Self {
        Self {
            key,
            value,
            new_map,
            order: ByMemberName,
        }
    }
}

impl<KC, VC, M, O> MapCodec<KC, VC, M, O> {
    /// Orders entries by key instead of by member name.
    pub fn order_by_key(self) -> MapCodec<KC, VC, M, ByKey> {
        self.with_order(ByKey)
    }

    pub fn with_order<P>(self, order: P) -> MapCodec<KC, VC, M, P> {
        MapCodec {
            key: self.key,
            value: self.value,
            new_map: self.new_map,
            order,
        }
    }
}

impl<KC, VC, M, O> JsonSerializer<M> for MapCodec<KC, VC, M, O>
where
    M: JsonMap,
    KC: KeySerializer<M::Key>,
    VC: JsonSerializer<M::Value>,
    O: KeyOrder<M::Key>,
{
    fn serialize<S: CharSink>(
        &self,
        writer: &mut JsonWriter<S>,
        value: &M,
        ctx: &SerializationContext,
    ) -> Result<(), Error> {
        trace!("writing map of {} entries", value.len());
        writer.begin_object_with(ctx.write_null_map_values())?;
        let entries = value.entries();
        write_members(writer, entries, &self.key, &self.value, &self.order, ctx, |_| false)?;
        writer.end_object()?;
        Ok(())
    }
}

impl<KC, VC, M, O> JsonDeserializer<M> for MapCodec<KC, VC, M, O>
where
    M: JsonMap,
    KC: KeyDeserializer<M::Key>,
    VC: JsonDeserializer<M::Value>,
{
    fn deserialize(
        &self,
        reader: &mut JsonReader<'_>,
        ctx: &DeserializationContext,
    ) -> Result<M, Error> {
        trace!("reading map");
        let mut map = (self.new_map)();
        reader.begin_object()?;
        while reader.has_next()? {
            let name = reader.next_name()?;
            let key = self.key.deserialize_key(&name, ctx)?;
            let value = self.value.deserialize(reader, ctx)?;
            map.insert_entry(key, value);
        }
        reader.end_object()?;
        Ok(map)
    }
}

/// Object-of-arrays codec for any [`JsonMultimap`].
///
/// `group` is the codec of a whole group, typically a
/// [`CollectionCodec`](super::CollectionCodec).
#[derive(Debug)]
pub struct MultimapCodec<KC, GC, M, O = ByMemberName> {
    key: KC,
    group: GC,
    new_map: fn() -> M,
    order: O,
}

impl<KC: Clone, GC: Clone, M, O: Clone> Clone for MultimapCodec<KC, GC, M, O> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            group: self.group.clone(),
            new_map: self.new_map,
            order: self.order.clone(),
        }
    }
}

impl<KC, GC, M: Default> MultimapCodec<KC, GC, M> {
    pub fn new(key: KC, group: GC) -> Self {
        Self::with_factory(key, group, M::default)
    }
}

impl<KC, GC, M> MultimapCodec<KC, GC, M> {
    pub const fn with_factory(key: KC, group: GC, new_map: fn() -> M) -> Self {
        Self {
            key,
            group,
            new_map,
            order: ByMemberName,
        }
    }
}

impl<KC, GC, M, O> MultimapCodec<KC, GC, M, O> {
    pub fn order_by_key(self) -> MultimapCodec<KC, GC, M, ByKey> {
        self.with_order(ByKey)
    }

    pub fn with_order<P>(self, order: P) -> MultimapCodec<KC, GC, M, P> {
        MultimapCodec {
            key: self.key,
            group: self.group,
            new_map: self.new_map,
            order,
        }
    }
}

impl<KC, GC, M, O> JsonSerializer<M> for MultimapCodec<KC, GC, M, O>
where
    M: JsonMultimap,
    KC: KeySerializer<M::Key>,
    GC: JsonSerializer<M::Group>,
    O: KeyOrder<M::Key>,
{
    fn serialize<S: CharSink>(
        &self,
        writer: &mut JsonWriter<S>,
        value: &M,
        ctx: &SerializationContext,
    ) -> Result<(), Error> {
        trace!("writing multimap of {} keys", value.len());
        writer.begin_object_with(ctx.write_null_map_values())?;
        write_members(
            writer,
            value.groups(),
            &self.key,
            &self.group,
            &self.order,
            ctx,
            |group| group.is_empty(),
        )?;
        writer.end_object()?;
        Ok(())
    }
}

impl<KC, GC, M, O> JsonDeserializer<M> for MultimapCodec<KC, GC, M, O>
where
    M: JsonMultimap,
    KC: KeyDeserializer<M::Key>,
    GC: JsonDeserializer<M::Group>,
{
    fn deserialize(
        &self,
        reader: &mut JsonReader<'_>,
        ctx: &DeserializationContext,
    ) -> Result<M, Error> {
        trace!("reading multimap");
        let mut map = (self.new_map)();
        reader.begin_object()?;
        while reader.has_next()? {
            let name = reader.next_name()?;
            let key = self.key.deserialize_key(&name, ctx)?;
            let group = self.group.deserialize(reader, ctx)?;
            map.insert_group(key, group);
        }
        reader.end_object()?;
        Ok(map)
    }
}
