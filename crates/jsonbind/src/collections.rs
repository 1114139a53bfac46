//! Multisets and an insertion-ordered set.
//!
//! Both multisets count equal elements instead of storing them twice, and
//! serialize as flat arrays with one entry per occurrence:
//!
//! ```rust
//! use jsonbind::codec::{CollectionCodec, StringCodec};
//! use jsonbind::{JsonMapper, Multiset};
//!
//! let bag: Multiset<String> = ["b", "a", "a", "a"].into_iter().map(String::from).collect();
//! assert_eq!(bag.count("a"), 3);
//!
//! let mapper = JsonMapper::new(CollectionCodec::multiset(StringCodec));
//! assert_eq!(mapper.write(&bag)?, r#"["a","a","a","b"]"#);
//! # Ok::<(), jsonbind::Error>(())
//! ```

use alloc::{
    collections::{BTreeMap, BTreeSet, btree_map},
    vec,
    vec::Vec,
};
use core::{
    borrow::Borrow,
    iter::{FlatMap, RepeatN, repeat_n},
};

use crate::codec::JsonCollection;

/// Sorted multiset.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Multiset<T: Ord> {
    counts: BTreeMap<T, usize>,
    len: usize,
}

impl<T: Ord> Default for Multiset<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Ord> Multiset<T> {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            counts: BTreeMap::new(),
            len: 0,
        }
    }

    /// Adds one occurrence of `item`.
    pub fn add(&mut self, item: T) {
        self.add_n(item, 1);
    }

    /// Adds `n` occurrences of `item`. Adding zero occurrences is a no-op.
    pub fn add_n(&mut self, item: T, n: usize) {
        if n == 0 {
            return;
        }
        *self.counts.entry(item).or_insert(0) += n;
        self.len += n;
    }

    /// Removes one occurrence of `item`, returning whether there was one.
    pub fn remove<Q>(&mut self, item: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let Some(count) = self.counts.get_mut(item) else {
            return false;
        };
        *count -= 1;
        if *count == 0 {
            self.counts.remove(item);
        }
        self.len -= 1;
        true
    }

    pub fn count<Q>(&self, item: &Q) -> usize
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.counts.get(item).copied().unwrap_or(0)
    }

    pub fn contains<Q>(&self, item: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.counts.contains_key(item)
    }

    /// Total number of occurrences.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of distinct elements.
    #[must_use]
    pub fn distinct_len(&self) -> usize {
        self.counts.len()
    }

    /// Distinct elements with their counts, in ascending order.
    pub fn entries(&self) -> impl Iterator<Item = (&T, usize)> {
        self.counts.iter().map(|(item, &n)| (item, n))
    }

    /// Every occurrence, equal elements adjacent.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.entries().flat_map(|(item, n)| repeat_n(item, n))
    }
}

impl<T: Ord> FromIterator<T> for Multiset<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

impl<T: Ord> Extend<T> for Multiset<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for item in iter {
            self.add(item);
        }
    }
}

type Occurrences<T> = FlatMap<btree_map::IntoIter<T, usize>, RepeatN<T>, fn((T, usize)) -> RepeatN<T>>;

impl<T: Ord + Clone> IntoIterator for Multiset<T> {
    type Item = T;
    type IntoIter = Occurrences<T>;

    fn into_iter(self) -> Self::IntoIter {
        let expand: fn((T, usize)) -> RepeatN<T> = |(item, n)| repeat_n(item, n);
        self.counts.into_iter().flat_map(expand)
    }
}

impl<T: Ord> JsonCollection for Multiset<T> {
    type Item = T;

    fn occurrences(&self) -> impl Iterator<Item = &T> {
        self.iter()
    }

    fn accumulate(&mut self, item: T) {
        self.add(item);
    }

    fn len(&self) -> usize {
        self.len
    }
}

/// Multiset that iterates distinct elements in first-insertion order.
///
/// Equality ignores that order and compares counts only.
#[derive(Debug, Clone)]
pub struct LinkedMultiset<T: Ord + Clone> {
    entries: Vec<(T, usize)>,
    index: BTreeMap<T, usize>,
    len: usize,
}

impl<T: Ord + Clone> Default for LinkedMultiset<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Ord + Clone> LinkedMultiset<T> {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
            index: BTreeMap::new(),
            len: 0,
        }
    }

    pub fn add(&mut self, item: T) {
        self.add_n(item, 1);
    }

    pub fn add_n(&mut self, item: T, n: usize) {
        if n == 0 {
            return;
        }
        match self.index.get(&item) {
            Some(&slot) => self.entries[slot].1 += n,
            None => {
                self.index.insert(item.clone(), self.entries.len());
                self.entries.push((item, n));
            }
        }
        self.len += n;
    }

    pub fn count<Q>(&self, item: &Q) -> usize
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.index.get(item).map_or(0, |&slot| self.entries[slot].1)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[must_use]
    pub fn distinct_len(&self) -> usize {
        self.entries.len()
    }

    pub fn entries(&self) -> impl Iterator<Item = (&T, usize)> {
        self.entries.iter().map(|(item, n)| (item, *n))
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.entries().flat_map(|(item, n)| repeat_n(item, n))
    }
}

impl<T: Ord + Clone> PartialEq for LinkedMultiset<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len
            && self.distinct_len() == other.distinct_len()
            && self.entries().all(|(item, n)| other.count(item) == n)
    }
}

impl<T: Ord + Clone> Eq for LinkedMultiset<T> {}

impl<T: Ord + Clone> FromIterator<T> for LinkedMultiset<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

impl<T: Ord + Clone> Extend<T> for LinkedMultiset<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for item in iter {
            self.add(item);
        }
    }
}

impl<T: Ord + Clone> IntoIterator for LinkedMultiset<T> {
    type Item = T;
    type IntoIter = FlatMap<vec::IntoIter<(T, usize)>, RepeatN<T>, fn((T, usize)) -> RepeatN<T>>;

    fn into_iter(self) -> Self::IntoIter {
        let expand: fn((T, usize)) -> RepeatN<T> = |(item, n)| repeat_n(item, n);
        self.entries.into_iter().flat_map(expand)
    }
}

impl<T: Ord + Clone> JsonCollection for LinkedMultiset<T> {
    type Item = T;

    fn occurrences(&self) -> impl Iterator<Item = &T> {
        self.iter()
    }

    fn accumulate(&mut self, item: T) {
        self.add(item);
    }

    fn len(&self) -> usize {
        self.len
    }
}

/// Set that iterates in insertion order.
#[derive(Debug, Clone)]
pub struct LinkedSet<T: Ord + Clone> {
    order: Vec<T>,
    members: BTreeSet<T>,
}

impl<T: Ord + Clone> Default for LinkedSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Ord + Clone> LinkedSet<T> {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            order: Vec::new(),
            members: BTreeSet::new(),
        }
    }

    /// Inserts `item` unless an equal element is present. Returns whether it
    /// was inserted.
    pub fn insert(&mut self, item: T) -> bool {
        if !self.members.insert(item.clone()) {
            return false;
        }
        self.order.push(item);
        true
    }

    pub fn contains<Q>(&self, item: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.members.contains(item)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn iter(&self) -> core::slice::Iter<'_, T> {
        self.order.iter()
    }
}

impl<T: Ord + Clone> PartialEq for LinkedSet<T> {
    fn eq(&self, other: &Self) -> bool {
        self.members == other.members
    }
}

impl<T: Ord + Clone> Eq for LinkedSet<T> {}

impl<T: Ord + Clone> FromIterator<T> for LinkedSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = Self::new();
        for item in iter {
            set.insert(item);
        }
        set
    }
}

impl<T: Ord + Clone> IntoIterator for LinkedSet<T> {
    type Item = T;
    type IntoIter = vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.order.into_iter()
    }
}

impl<T: Ord + Clone> JsonCollection for LinkedSet<T> {
    type Item = T;

    fn occurrences(&self) -> impl Iterator<Item = &T> {
        self.order.iter()
    }

    fn accumulate(&mut self, item: T) {
        self.insert(item);
    }

    fn len(&self) -> usize {
        self.order.len()
    }
}
