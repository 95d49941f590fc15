use crate::dict::{chained, ArrayDictionary, ChainedHashDictionary, Dictionary};
use crate::Result;
use std::borrow::Borrow;
use std::hash::Hash;

/// Set adapter over a [`ChainedHashDictionary`] mapping each element to a presence flag.
#[derive(Debug, Clone)]
pub struct ChainedHashSet<T> {
    map: ChainedHashDictionary<T, bool>,
}

impl<T: Hash + Eq> ChainedHashSet<T> {
    pub fn new() -> Self {
        Self { map: ChainedHashDictionary::new() }
    }

    /// Adds `item`, returning `true` if it was not already present.
    pub fn add(&mut self, item: T) -> bool {
        self.map.put(item, true).is_none()
    }

    /// Removes `item`, or fails with `KeyNotFound` if it is absent.
    pub fn remove<Q>(&mut self, item: &Q) -> Result<()>
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.map.remove(item).map(|_| ())
    }

    pub fn contains<Q>(&self, item: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.map.contains_key(item)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn iter(&self) -> Iter<'_, T> {
        Iter { pairs: self.map.iter() }
    }
}

impl<T: Hash + Eq> Default for ChainedHashSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

pub struct Iter<'a, T: Eq + 'a> {
    pairs: chained::Iter<'a, T, bool, ArrayDictionary<T, bool>>,
}

impl<'a, T: Eq + 'a> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        self.pairs.next().map(|(item, _)| item)
    }
}

impl<'a, T: Hash + Eq> IntoIterator for &'a ChainedHashSet<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T: Hash + Eq> FromIterator<T> for ChainedHashSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = Self::new();
        for item in iter {
            set.add(item);
        }
        set
    }
}
