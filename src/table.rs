//! HashTable: separate chaining over a `Sequence` of `Chain` buckets.

use crate::chain::{self, Chain};
use crate::reentrancy::DebugReentrancy;
use crate::sequence::Sequence;
use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use hashbrown::hash_map::DefaultHashBuilder;

/// Bucket count of a freshly created table.
pub const INITIAL_BUCKETS: usize = 16;

/// Growth threshold: a `set` that leaves `size / bucket_count` above this
/// doubles the bucket array before returning.
pub const MAX_LOAD_FACTOR: f64 = 0.7;

#[derive(Debug)]
struct Entry<K, V> {
    key: K,
    value: V,
}

type Bucket<K, V> = Chain<Entry<K, V>>;

pub struct HashTable<K, V, S = DefaultHashBuilder> {
    hasher: S,
    buckets: Sequence<Bucket<K, V>>,
    size: usize,
    reentrancy: DebugReentrancy,
}

fn empty_buckets<K, V>(count: usize) -> Sequence<Bucket<K, V>> {
    (0..count).map(|_| Chain::new()).collect()
}

impl<K, V> HashTable<K, V>
where
    K: Eq + Hash,
{
    pub fn new() -> Self {
        Self::with_hasher(Default::default())
    }
}

impl<K, V> Default for HashTable<K, V>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, S> HashTable<K, V, S> {
    /// Number of stored entries.
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    pub fn load_factor(&self) -> f64 {
        self.size as f64 / self.buckets.len() as f64
    }

    /// Visit every entry, bucket by bucket and head to tail within a bucket.
    /// This is not insertion order once the table has grown.
    pub fn for_each<F>(&self, mut action: F)
    where
        F: FnMut(&K, &V),
    {
        for bucket in &self.buckets {
            bucket.for_each(|e| action(&e.key, &e.value));
        }
    }

    /// Like `for_each`, with mutable access to values.
    pub fn for_each_mut<F>(&mut self, mut action: F)
    where
        F: FnMut(&K, &mut V),
    {
        for bucket in self.buckets.iter_mut() {
            bucket.for_each_mut(|e| action(&e.key, &mut e.value));
        }
    }

    /// Iterator in the same order as `for_each`.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            buckets: self.buckets.iter(),
            current: None,
            remaining: self.size,
        }
    }
}

impl<K, V, S> HashTable<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    pub fn with_hasher(hasher: S) -> Self {
        Self {
            hasher,
            buckets: empty_buckets(INITIAL_BUCKETS),
            size: 0,
            reentrancy: DebugReentrancy::new(),
        }
    }

    fn bucket_index<Q>(&self, q: &Q) -> usize
    where
        Q: ?Sized + Hash,
    {
        (self.hasher.hash_one(q) % self.buckets.len() as u64) as usize
    }

    /// Insert or overwrite. Returns the previous value when `key` was
    /// already present; in that case `size` is unchanged and no growth
    /// check runs.
    pub fn set(&mut self, key: K, value: V) -> Option<V> {
        {
            let _g = self.reentrancy.enter("set");
            let idx = self.bucket_index(&key);
            let bucket = &mut self.buckets[idx];
            if let Some(entry) = bucket.find_mut(|e| e.key == key) {
                return Some(core::mem::replace(&mut entry.value, value));
            }
            bucket.append(Entry { key, value });
            self.size += 1;
            tracing::trace!(bucket = idx, size = self.size, "inserted new entry");
        }
        if self.load_factor() > MAX_LOAD_FACTOR {
            self.resize();
        }
        None
    }

    /// Double the bucket array and move every entry to its new bucket.
    ///
    /// Entries are placed directly, in old-bucket then chain order. The
    /// guard is held throughout: routing the rehash back through `set`
    /// would trip it in debug builds.
    fn resize(&mut self) {
        let _g = self.reentrancy.enter("resize");
        let from = self.buckets.len();
        let to = from * 2;
        tracing::debug!(from, to, size = self.size, "growing bucket array");
        let old = core::mem::replace(&mut self.buckets, empty_buckets(to));
        for bucket in old {
            for entry in bucket {
                let idx = self.bucket_index(&entry.key);
                self.buckets[idx].append(entry);
            }
        }
    }

    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let _g = self.reentrancy.enter("get");
        let idx = self.bucket_index(key);
        self.buckets[idx]
            .find(|e| e.key.borrow() == key)
            .map(|e| &e.value)
    }

    /// `get`, falling back to `default` when `key` is absent.
    pub fn get_or<'a, Q>(&'a self, key: &Q, default: &'a V) -> &'a V
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.get(key).unwrap_or(default)
    }

    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let _g = self.reentrancy.enter("get_mut");
        let idx = self.bucket_index(key);
        self.buckets[idx]
            .find_mut(|e| e.key.borrow() == key)
            .map(|e| &mut e.value)
    }

    /// Remove `key`, returning its value. The bucket array never shrinks.
    pub fn delete<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let _g = self.reentrancy.enter("delete");
        let idx = self.bucket_index(key);
        let removed = self.buckets[idx].remove_first(|e| e.key.borrow() == key)?;
        self.size -= 1;
        Some(removed.value)
    }

    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.get(key).is_some()
    }
}

impl<K, V, S> fmt::Debug for HashTable<K, V, S>
where
    K: fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V, S> FromIterator<(K, V)> for HashTable<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher + Default,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut table = HashTable::with_hasher(S::default());
        table.extend(iter);
        table
    }
}

impl<K, V, S> Extend<(K, V)> for HashTable<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.set(k, v);
        }
    }
}

/// Iterator over `(&K, &V)` in bucket order.
pub struct Iter<'a, K, V> {
    buckets: core::slice::Iter<'a, Bucket<K, V>>,
    current: Option<chain::Iter<'a, Entry<K, V>>>,
    remaining: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(entry) = self.current.as_mut().and_then(|it| it.next()) {
                self.remaining -= 1;
                return Some((&entry.key, &entry.value));
            }
            self.current = Some(self.buckets.next()?.iter());
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<'a, K, V, S> IntoIterator for &'a HashTable<K, V, S> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
impl<K, V, S> HashTable<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    /// Assert the placement and size invariants over every bucket.
    pub(crate) fn assert_invariants(&self) {
        let mut total = 0;
        for (i, bucket) in self.buckets.iter().enumerate() {
            bucket.assert_links();
            for entry in bucket {
                assert_eq!(self.bucket_index(&entry.key), i, "entry in wrong bucket");
                let dupes = bucket.iter().filter(|e| e.key == entry.key).count();
                assert_eq!(dupes, 1, "duplicate key in bucket");
            }
            total += bucket.len();
        }
        assert_eq!(total, self.size, "size out of sync with buckets");
        assert!(self.bucket_count() >= INITIAL_BUCKETS);
        assert!(self.bucket_count().is_power_of_two());
        assert!(self.load_factor() <= MAX_LOAD_FACTOR);
    }
}
