use super::{ArrayDictionary, Dictionary};
use crate::{Error, Result};
use std::borrow::Borrow;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use tracing::debug;

pub const DEFAULT_CAPACITY: usize = 11;
pub const DEFAULT_LOAD_FACTOR: f32 = 0.75;

/// Hash table with separate chaining. Each bucket is either empty or a dictionary of type `B`
/// holding every pair whose key hashes to that bucket.
///
/// Before an insert, if `len / capacity >= load_factor`, the bucket array doubles and every pair
/// is rehashed into fresh buckets.
#[derive(Debug, Clone)]
pub struct ChainedHashDictionary<K, V, B = ArrayDictionary<K, V>> {
    chains: Vec<Option<B>>,
    size: usize,
    load_factor: f32,
    _pairs: PhantomData<fn() -> (K, V)>,
}

impl<K, V, B> ChainedHashDictionary<K, V, B> {
    pub fn new() -> Self {
        Self {
            chains: empty_chains(DEFAULT_CAPACITY),
            size: 0,
            load_factor: DEFAULT_LOAD_FACTOR,
            _pairs: PhantomData,
        }
    }

    pub fn with_capacity(capacity: usize) -> Result<Self> {
        Self::with_capacity_and_load_factor(capacity, DEFAULT_LOAD_FACTOR)
    }

    pub fn with_load_factor(load_factor: f32) -> Result<Self> {
        Self::with_capacity_and_load_factor(DEFAULT_CAPACITY, load_factor)
    }

    pub fn with_capacity_and_load_factor(capacity: usize, load_factor: f32) -> Result<Self> {
        if capacity == 0 {
            return Err(Error::invalid("hash dictionary capacity must be positive"));
        }
        if !(load_factor.is_finite() && load_factor > 0.0) {
            return Err(Error::invalid(format!("load factor must be a positive number, got {load_factor}")));
        }
        Ok(Self { chains: empty_chains(capacity), size: 0, load_factor, _pairs: PhantomData })
    }

    /// Number of buckets.
    pub fn capacity(&self) -> usize {
        self.chains.len()
    }

    pub fn load_factor(&self) -> f32 {
        self.load_factor
    }
}

impl<K, V, B> Default for ChainedHashDictionary<K, V, B> {
    fn default() -> Self {
        Self::new()
    }
}

fn empty_chains<B>(capacity: usize) -> Vec<Option<B>> {
    (0..capacity).map(|_| None).collect()
}

fn bucket_index<Q: Hash + ?Sized>(key: &Q, capacity: usize) -> usize {
    let mut hasher = DefaultHasher::new();
    key.hash(&mut hasher);
    (hasher.finish() % capacity as u64) as usize
}

impl<K, V, B> ChainedHashDictionary<K, V, B>
where
    K: Hash + Eq,
    B: Dictionary<K, V> + Default + IntoIterator<Item = (K, V)>,
{
    fn bucket<Q>(&self, key: &Q) -> Option<&B>
    where
        Q: Hash + ?Sized,
    {
        self.chains[bucket_index(key, self.chains.len())].as_ref()
    }

    fn grow(&mut self) {
        let capacity = self.chains.len() * 2;
        let old = std::mem::replace(&mut self.chains, empty_chains(capacity));
        for chain in old.into_iter().flatten() {
            for (key, value) in chain {
                let index = bucket_index(&key, capacity);
                self.chains[index].get_or_insert_with(B::default).put(key, value);
            }
        }
        debug!(capacity, size = self.size, "rehashed chained dictionary");
    }
}

impl<K, V, B> Dictionary<K, V> for ChainedHashDictionary<K, V, B>
where
    K: Hash + Eq,
    B: Dictionary<K, V> + Default + IntoIterator<Item = (K, V)>,
{
    type Iter<'a> = Iter<'a, K, V, B> where Self: 'a, K: 'a, V: 'a;

    fn get<Q>(&self, key: &Q) -> Result<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.bucket(key).ok_or(Error::KeyNotFound)?.get(key)
    }

    fn get_mut<Q>(&mut self, key: &Q) -> Result<&mut V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let index = bucket_index(key, self.chains.len());
        self.chains[index].as_mut().ok_or(Error::KeyNotFound)?.get_mut(key)
    }

    fn put(&mut self, key: K, value: V) -> Option<V> {
        if self.size as f32 / self.chains.len() as f32 >= self.load_factor {
            self.grow();
        }
        let index = bucket_index(&key, self.chains.len());
        let previous = self.chains[index].get_or_insert_with(B::default).put(key, value);
        if previous.is_none() {
            self.size += 1;
        }
        previous
    }

    fn remove<Q>(&mut self, key: &Q) -> Result<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let index = bucket_index(key, self.chains.len());
        let chain = self.chains[index].as_mut().ok_or(Error::KeyNotFound)?;
        let value = chain.remove(key)?;
        if chain.is_empty() {
            self.chains[index] = None;
        }
        self.size -= 1;
        Ok(value)
    }

    fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.bucket(key).is_some_and(|chain| chain.contains_key(key))
    }

    fn len(&self) -> usize {
        self.size
    }

    fn iter(&self) -> Self::Iter<'_> {
        Iter { chains: self.chains.iter(), current: None }
    }
}

/// Cursor over every pair: buckets in index order, each bucket in its own order.
///
/// The cursor owns its position, so independent iterations over one dictionary never interfere.
pub struct Iter<'a, K, V, B>
where
    B: Dictionary<K, V> + 'a,
    K: 'a,
    V: 'a,
{
    chains: std::slice::Iter<'a, Option<B>>,
    current: Option<B::Iter<'a>>,
}

impl<'a, K, V, B> Iterator for Iter<'a, K, V, B>
where
    B: Dictionary<K, V> + 'a,
    K: 'a,
    V: 'a,
{
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(pair) = self.current.as_mut().and_then(Iterator::next) {
                return Some(pair);
            }
            // Current bucket exhausted: scan forward to the next occupied one.
            let chain = self.chains.next()?;
            self.current = chain.as_ref().map(|chain| chain.iter());
        }
    }
}

impl<'a, K, V, B> IntoIterator for &'a ChainedHashDictionary<K, V, B>
where
    K: Hash + Eq + 'a,
    V: 'a,
    B: Dictionary<K, V> + Default + IntoIterator<Item = (K, V)> + 'a,
{
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V, B>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K, V, B> FromIterator<(K, V)> for ChainedHashDictionary<K, V, B>
where
    K: Hash + Eq,
    B: Dictionary<K, V> + Default + IntoIterator<Item = (K, V)>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut dict = Self::new();
        dict.extend(iter);
        dict
    }
}

impl<K, V, B> Extend<(K, V)> for ChainedHashDictionary<K, V, B>
where
    K: Hash + Eq,
    B: Dictionary<K, V> + Default + IntoIterator<Item = (K, V)>,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.put(key, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn put_get_remove() {
        let mut dict: ChainedHashDictionary<String, i32> = ChainedHashDictionary::new();
        dict.put("alpha".into(), 1);
        dict.put("beta".into(), 2);
        assert_eq!(dict.get("alpha"), Ok(&1));
        assert_eq!(dict.put("alpha".into(), 10), Some(1));
        assert_eq!(dict.len(), 2);
        assert_eq!(dict.remove("alpha"), Ok(10));
        assert!(!dict.contains_key("alpha"));
        assert_eq!(dict.get("alpha"), Err(Error::KeyNotFound));
        assert_eq!(dict.remove("alpha"), Err(Error::KeyNotFound));
        assert_eq!(dict.len(), 1);
    }

    #[test]
    fn doubles_capacity_at_load_factor() {
        let mut dict: ChainedHashDictionary<u32, u32> = ChainedHashDictionary::with_capacity(4).unwrap();
        for i in 0..3 {
            dict.put(i, i);
        }
        // 3 / 4 == 0.75, so the next insert rehashes first.
        assert_eq!(dict.capacity(), 4);
        dict.put(3, 3);
        assert_eq!(dict.capacity(), 8);
        for i in 0..4 {
            assert_eq!(dict.get(&i), Ok(&i));
        }
    }

    #[test]
    fn iteration_survives_many_rehashes() {
        let mut dict: ChainedHashDictionary<u32, u32> = ChainedHashDictionary::with_capacity(1).unwrap();
        for i in 0..500 {
            dict.put(i, i * 2);
        }
        assert_eq!(dict.len(), 500);
        let seen: HashSet<u32> = dict.iter().map(|(k, v)| {
            assert_eq!(*v, k * 2);
            *k
        }).collect();
        assert_eq!(seen.len(), 500);
        assert_eq!(dict.iter().count(), 500);
    }

    #[test]
    fn concurrent_cursors_are_independent() {
        let dict: ChainedHashDictionary<u32, ()> = (0..20).map(|i| (i, ())).collect();
        let mut first = dict.iter();
        first.next();
        first.next();
        assert_eq!(dict.iter().count(), 20);
        assert_eq!(first.count(), 18);
    }

    #[test]
    fn empty_dictionary_iterates_nothing() {
        let dict: ChainedHashDictionary<u32, u32> = ChainedHashDictionary::new();
        assert_eq!(dict.iter().next(), None);
        assert!(dict.is_empty());
    }

    #[test]
    fn rejects_bad_construction() {
        assert!(matches!(
            ChainedHashDictionary::<u8, u8>::with_capacity(0),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            ChainedHashDictionary::<u8, u8>::with_load_factor(0.0),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            ChainedHashDictionary::<u8, u8>::with_load_factor(f32::NAN),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn load_factor_above_one_allows_longer_chains() {
        type Explicit = ChainedHashDictionary<u16, u16, ArrayDictionary<u16, u16>>;
        let mut dict = Explicit::with_capacity_and_load_factor(3, 2.0).unwrap();
        for i in 0..10 {
            dict.put(i, i + 1);
        }
        assert_eq!(dict.capacity(), 6);
        assert_eq!(dict.get(&9), Ok(&10));
    }

    #[test]
    fn get_mut_on_missing_bucket_is_key_not_found() {
        let mut dict: ChainedHashDictionary<&str, f64> = ChainedHashDictionary::new();
        assert_eq!(dict.get_mut("missing"), Err(Error::KeyNotFound));
        dict.put("x", 1.0);
        *dict.get_mut("x").unwrap() *= 4.0;
        assert_eq!(dict.get("x"), Ok(&4.0));
    }
}
