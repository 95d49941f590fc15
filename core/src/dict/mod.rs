//! Associative containers: a linear array-backed dictionary and a chained hash dictionary that
//! uses it as its bucket type. Both are reached through the [`Dictionary`] trait so callers can
//! swap one for the other.

use crate::Result;
use std::borrow::Borrow;
use std::hash::Hash;

pub mod array;
pub mod chained;

pub use array::ArrayDictionary;
pub use chained::ChainedHashDictionary;

/// Key/value mapping with no duplicate keys.
///
/// Lookups accept any borrowed form of the key (`&str` for `String` keys), following the
/// convention of `std::collections::HashMap`.
pub trait Dictionary<K, V> {
    type Iter<'a>: Iterator<Item = (&'a K, &'a V)>
    where
        Self: 'a,
        K: 'a,
        V: 'a;

    /// Returns the value stored under `key`, or [`Error::KeyNotFound`](crate::Error::KeyNotFound).
    fn get<Q>(&self, key: &Q) -> Result<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized;

    fn get_mut<Q>(&mut self, key: &Q) -> Result<&mut V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized;

    /// Inserts or overwrites, returning the previous value if there was one.
    fn put(&mut self, key: K, value: V) -> Option<V>;

    /// Removes `key` and returns its value, or [`Error::KeyNotFound`](crate::Error::KeyNotFound).
    fn remove<Q>(&mut self, key: &Q) -> Result<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized;

    fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn iter(&self) -> Self::Iter<'_>;
}
