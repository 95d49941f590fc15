use super::Dictionary;
use crate::{Error, Result};
use std::borrow::Borrow;
use std::hash::Hash;

pub const DEFAULT_CAPACITY: usize = 10;

/// Unordered dictionary over a contiguous slot buffer with O(n) lookup.
///
/// Slots `0..size` are occupied and slots `size..capacity` are empty. Removal shifts the tail
/// down so the occupied prefix never has gaps, which keeps iteration in insertion order.
#[derive(Debug, Clone)]
pub struct ArrayDictionary<K, V> {
    pairs: Vec<Option<(K, V)>>,
    size: usize,
}

impl<K, V> ArrayDictionary<K, V> {
    pub fn new() -> Self {
        Self { pairs: empty_slots(DEFAULT_CAPACITY), size: 0 }
    }

    pub fn with_capacity(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(Error::invalid("array dictionary capacity must be positive"));
        }
        Ok(Self { pairs: empty_slots(capacity), size: 0 })
    }

    pub fn capacity(&self) -> usize {
        self.pairs.len()
    }

    fn ensure_capacity(&mut self, required: usize) {
        let capacity = self.pairs.len();
        if required > capacity {
            let grown = (capacity * 2 + 1).max(required);
            self.pairs.resize_with(grown, || None);
        }
    }
}

impl<K: Eq, V> ArrayDictionary<K, V> {
    fn position<Q>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
    {
        self.pairs[..self.size]
            .iter()
            .position(|slot| matches!(slot, Some((k, _)) if <K as Borrow<Q>>::borrow(k) == key))
    }
}

fn empty_slots<K, V>(capacity: usize) -> Vec<Option<(K, V)>> {
    (0..capacity).map(|_| None).collect()
}

impl<K, V> Default for ArrayDictionary<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Eq, V> Dictionary<K, V> for ArrayDictionary<K, V> {
    type Iter<'a> = Iter<'a, K, V> where Self: 'a, K: 'a, V: 'a;

    fn get<Q>(&self, key: &Q) -> Result<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let index = self.position(key).ok_or(Error::KeyNotFound)?;
        match &self.pairs[index] {
            Some((_, value)) => Ok(value),
            None => Err(Error::KeyNotFound),
        }
    }

    fn get_mut<Q>(&mut self, key: &Q) -> Result<&mut V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let index = self.position(key).ok_or(Error::KeyNotFound)?;
        match &mut self.pairs[index] {
            Some((_, value)) => Ok(value),
            None => Err(Error::KeyNotFound),
        }
    }

    fn put(&mut self, key: K, value: V) -> Option<V> {
        if let Some(index) = self.position(&key) {
            let previous = self.pairs[index].replace((key, value));
            return previous.map(|(_, v)| v);
        }
        self.ensure_capacity(self.size + 1);
        self.pairs[self.size] = Some((key, value));
        self.size += 1;
        None
    }

    fn remove<Q>(&mut self, key: &Q) -> Result<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let index = self.position(key).ok_or(Error::KeyNotFound)?;
        let removed = self.pairs[index].take();
        // Rotating moves the emptied slot to the end of the occupied prefix.
        self.pairs[index..self.size].rotate_left(1);
        self.size -= 1;
        removed.map(|(_, v)| v).ok_or(Error::KeyNotFound)
    }

    fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.position(key).is_some()
    }

    fn len(&self) -> usize {
        self.size
    }

    fn iter(&self) -> Self::Iter<'_> {
        Iter { slots: self.pairs[..self.size].iter() }
    }
}

/// Borrowing cursor over the occupied slots.
#[derive(Debug, Clone)]
pub struct Iter<'a, K, V> {
    slots: std::slice::Iter<'a, Option<(K, V)>>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        for slot in self.slots.by_ref() {
            if let Some((key, value)) = slot {
                return Some((key, value));
            }
        }
        None
    }
}

impl<'a, K: Eq, V> IntoIterator for &'a ArrayDictionary<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K, V> IntoIterator for ArrayDictionary<K, V> {
    type Item = (K, V);
    type IntoIter = std::iter::Flatten<std::vec::IntoIter<Option<(K, V)>>>;

    fn into_iter(self) -> Self::IntoIter {
        self.pairs.into_iter().flatten()
    }
}

impl<K: Eq, V> FromIterator<(K, V)> for ArrayDictionary<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut dict = Self::new();
        for (key, value) in iter {
            dict.put(key, value);
        }
        dict
    }
}
