use alloc::vec::Vec;
use core::fmt::Debug;
use core::hash::BuildHasher;
use core::hash::Hash;
use core::iter::FusedIterator;
use core::ops::Index;

use crate::error::Error;
use crate::error::Result;
use crate::hash_table::DEFAULT_CAPACITY;
use crate::hash_table::Entry as TableEntry;
use crate::hash_table::HashTable;
use crate::hash_table::LoadFactors;

/// A key-unique hash map backed by a separately-chained [`HashTable`].
///
/// `HashMap<K, V, S>` stores key-value pairs where keys implement
/// `Hash + Eq` and uses a configurable hasher builder `S` to hash keys. A
/// key lives in bucket `hash(key) & (capacity - 1)`; after every insertion
/// and removal the map grows or shrinks its power-of-two bucket array to
/// keep `len / capacity` within its [`LoadFactors`].
///
/// [`insert`](HashMap::insert) refuses to overwrite an existing key; use
/// [`insert_or_update`](HashMap::insert_or_update) or the entry API for
/// upserts.
///
/// The map is not internally synchronized. Sharing it across threads
/// requires an external lock.
#[derive(Clone)]
pub struct HashMap<K, V, S> {
    table: HashTable<(K, V)>,
    hash_builder: S,
}

impl<K, V, S> Debug for HashMap<K, V, S>
where
    K: Debug,
    V: Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let mut map = f.debug_map();
        for (k, v) in self.table.iter() {
            map.entry(k, v);
        }
        map.finish()
    }
}

impl<K, V, S> HashMap<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    /// Creates an empty map with 16 buckets and the given hasher builder.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use core::hash::BuildHasher;
    /// # use siphasher::sip::SipHasher;
    /// #
    /// # use bucket_hash::HashMap;
    /// #
    /// # struct SimpleHasher;
    /// # impl BuildHasher for SimpleHasher {
    /// #     type Hasher = SipHasher;
    /// #
    /// #     fn build_hasher(&self) -> Self::Hasher {
    /// #         SipHasher::new()
    /// #     }
    /// # }
    /// #
    /// let map: HashMap<i32, String, _> = HashMap::with_hasher(SimpleHasher);
    /// assert!(map.is_empty());
    /// assert_eq!(map.capacity(), 16);
    /// ```
    pub fn with_hasher(hash_builder: S) -> Self {
        Self::with_capacity_and_hasher(DEFAULT_CAPACITY, hash_builder)
    }

    /// Creates an empty map with at least `capacity` buckets and the given
    /// hasher builder.
    ///
    /// The bucket count is rounded up to a power of two.
    pub fn with_capacity_and_hasher(capacity: usize, hash_builder: S) -> Self {
        Self {
            table: HashTable::with_capacity(capacity),
            hash_builder,
        }
    }

    /// Creates an empty map with 16 buckets, custom resize bounds and the
    /// given hasher builder.
    pub fn with_load_factors_and_hasher(load_factors: LoadFactors, hash_builder: S) -> Self {
        Self {
            table: HashTable::with_capacity_and_load_factors(DEFAULT_CAPACITY, load_factors),
            hash_builder,
        }
    }

    /// Builds a map from parallel key and value sequences, pairing the
    /// `i`-th key with the `i`-th value.
    ///
    /// A key that appears more than once ends up with the value paired with
    /// its last occurrence.
    ///
    /// # Errors
    ///
    /// Returns [`Error::LengthMismatch`] if the sequences differ in length.
    pub fn from_keys_values_with_hasher(
        keys: Vec<K>,
        values: Vec<V>,
        hash_builder: S,
    ) -> Result<Self> {
        if keys.len() != values.len() {
            log::trace!(
                "rejected bulk load of {} keys and {} values",
                keys.len(),
                values.len()
            );
            return Err(Error::length_mismatch(keys.len(), values.len()));
        }

        let mut map = Self::with_hasher(hash_builder);
        for (key, value) in keys.into_iter().zip(values) {
            map.insert_or_update(key, value);
        }
        Ok(map)
    }

    /// Returns the number of elements in the map.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns `true` if the map contains no elements.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Returns the number of buckets. Always a power of two.
    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }

    /// Returns `len / capacity`.
    pub fn load_factor(&self) -> f64 {
        self.table.load_factor()
    }

    /// Returns the resize bounds of this map.
    pub fn load_factors(&self) -> LoadFactors {
        self.table.load_factors()
    }

    /// Returns a reference to the map's hasher builder.
    pub fn hasher(&self) -> &S {
        &self.hash_builder
    }

    /// Removes all elements from the map, keeping the bucket count.
    pub fn clear(&mut self) {
        self.table.clear();
    }

    /// Inserts a key-value pair, failing if the key is already present.
    ///
    /// On failure the map is left unchanged and the rejected key and value
    /// are dropped.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateKey`] if the map already contains `key`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use bucket_hash::BucketHashTable;
    /// # use bucket_hash::Error;
    /// #
    /// let mut map = BucketHashTable::new();
    /// assert_eq!(map.insert(37, "a"), Ok(()));
    /// assert_eq!(map.insert(37, "b"), Err(Error::DuplicateKey));
    /// assert_eq!(map.at(&37), Ok(&"a"));
    /// ```
    pub fn insert(&mut self, key: K, value: V) -> Result<()> {
        let hash = self.hash_builder.hash_one(&key);
        match self.table.entry(hash, |(k, _)| k == &key) {
            TableEntry::Occupied(_) => Err(Error::DuplicateKey),
            TableEntry::Vacant(entry) => {
                entry.insert((key, value));
                Ok(())
            }
        }
    }

    /// Inserts a key-value pair, replacing the value of an existing key.
    ///
    /// Returns the previous value if the key was present.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use bucket_hash::BucketHashTable;
    /// #
    /// let mut map = BucketHashTable::new();
    /// assert_eq!(map.insert_or_update(37, "a"), None);
    /// assert_eq!(map.insert_or_update(37, "b"), Some("a"));
    /// assert_eq!(map.get(&37), Some(&"b"));
    /// ```
    pub fn insert_or_update(&mut self, key: K, value: V) -> Option<V> {
        let hash = self.hash_builder.hash_one(&key);
        match self.table.entry(hash, |(k, _)| k == &key) {
            TableEntry::Occupied(mut entry) => {
                let old_value = core::mem::replace(&mut entry.get_mut().1, value);
                Some(old_value)
            }
            TableEntry::Vacant(entry) => {
                entry.insert((key, value));
                None
            }
        }
    }

    /// Returns `true` if the map contains a value for the specified key.
    pub fn contains_key(&self, key: &K) -> bool {
        if self.is_empty() {
            return false;
        }
        self.get(key).is_some()
    }

    /// Returns a reference to the value corresponding to the key.
    pub fn get(&self, key: &K) -> Option<&V> {
        let hash = self.hash_builder.hash_one(key);
        self.table.find(hash, |(k, _)| k == key).map(|(_, v)| v)
    }

    /// Returns a mutable reference to the value corresponding to the key.
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let hash = self.hash_builder.hash_one(key);
        self.table.find_mut(hash, |(k, _)| k == key).map(|(_, v)| v)
    }

    /// Returns a reference to the value corresponding to the key.
    ///
    /// # Errors
    ///
    /// Returns [`Error::KeyNotFound`] if the key is absent.
    pub fn at(&self, key: &K) -> Result<&V> {
        self.get(key).ok_or(Error::KeyNotFound)
    }

    /// Returns a mutable reference to the value corresponding to the key.
    ///
    /// # Errors
    ///
    /// Returns [`Error::KeyNotFound`] if the key is absent.
    pub fn at_mut(&mut self, key: &K) -> Result<&mut V> {
        self.get_mut(key).ok_or(Error::KeyNotFound)
    }

    /// Returns a mutable reference to the value for `key`, inserting
    /// `V::default()` first if the key is absent.
    ///
    /// Unlike [`at`](HashMap::at), a miss is not an error: the key is added
    /// to the map, which may trigger a resize.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use bucket_hash::BucketHashTable;
    /// #
    /// let mut counts: BucketHashTable<&str, u32> = BucketHashTable::new();
    /// *counts.get_or_insert_default("spam") += 1;
    /// *counts.get_or_insert_default("spam") += 1;
    /// assert_eq!(counts.at(&"spam"), Ok(&2));
    /// assert_eq!(counts.len(), 1);
    /// ```
    pub fn get_or_insert_default(&mut self, key: K) -> &mut V
    where
        V: Default,
    {
        self.entry(key).or_default()
    }

    /// Removes a key from the map, returning whether it was present.
    ///
    /// A successful removal may shrink the map.
    pub fn erase(&mut self, key: &K) -> bool {
        self.remove(key).is_some()
    }

    /// Removes a key from the map, returning the value at the key if the key
    /// was previously in the map.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.remove_entry(key).map(|(_, v)| v)
    }

    /// Removes a key from the map, returning the stored key and value if the
    /// key was previously in the map.
    pub fn remove_entry(&mut self, key: &K) -> Option<(K, V)> {
        let hash = self.hash_builder.hash_one(key);
        self.table.remove(hash, |(k, _)| k == key)
    }

    /// Returns the index of the bucket holding `key`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::KeyNotFound`] if the key is absent.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use bucket_hash::BucketHashTable;
    /// # use bucket_hash::Error;
    /// #
    /// let mut map = BucketHashTable::new();
    /// map.insert("key", 1).unwrap();
    ///
    /// let index = map.bucket_index(&"key").unwrap();
    /// assert!(index < map.capacity());
    /// assert_eq!(map.bucket_index(&"missing"), Err(Error::KeyNotFound));
    /// ```
    pub fn bucket_index(&self, key: &K) -> Result<usize> {
        let hash = self.hash_builder.hash_one(key);
        match self.table.find(hash, |(k, _)| k == key) {
            Some(_) => Ok(self.table.bucket_index(hash)),
            None => Err(Error::KeyNotFound),
        }
    }

    /// Returns the number of entries in the bucket holding `key`, the key
    /// itself included.
    ///
    /// # Errors
    ///
    /// Returns [`Error::KeyNotFound`] if the key is absent.
    pub fn bucket_size(&self, key: &K) -> Result<usize> {
        let index = self.bucket_index(key)?;
        Ok(self.table.bucket_len(index))
    }

    /// Gets the given key's corresponding entry in the map for in-place
    /// manipulation.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use bucket_hash::BucketHashTable;
    /// #
    /// let mut map = BucketHashTable::new();
    ///
    /// map.entry(1).or_insert("a");
    /// map.entry(2).or_insert("b");
    /// map.entry(1).or_insert("c");
    ///
    /// assert_eq!(map.get(&1), Some(&"a"));
    /// assert_eq!(map.get(&2), Some(&"b"));
    /// ```
    pub fn entry(&mut self, key: K) -> Entry<'_, K, V> {
        let hash = self.hash_builder.hash_one(&key);
        match self.table.entry(hash, |(k, _)| k == &key) {
            TableEntry::Occupied(entry) => Entry::Occupied(OccupiedEntry { entry }),
            TableEntry::Vacant(entry) => Entry::Vacant(VacantEntry { entry, key }),
        }
    }

    /// Returns an iterator over the key-value pairs of the map.
    ///
    /// Pairs are yielded in bucket order, not key or insertion order. The
    /// iterator borrows the map, so the map cannot be modified while it is
    /// alive.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            inner: self.table.iter(),
        }
    }

    /// Returns an iterator over the key-value pairs with mutable values.
    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        IterMut {
            inner: self.table.iter_mut(),
        }
    }

    /// Returns an iterator over the keys of the map.
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys { inner: self.iter() }
    }

    /// Returns an iterator over the values of the map.
    pub fn values(&self) -> Values<'_, K, V> {
        Values { inner: self.iter() }
    }

    /// Returns an iterator over mutable references to the values of the map.
    pub fn values_mut(&mut self) -> ValuesMut<'_, K, V> {
        ValuesMut {
            inner: self.iter_mut(),
        }
    }

    /// Returns an iterator that removes and yields all key-value pairs from the
    /// map.
    ///
    /// After calling `drain()`, the map will be empty with its bucket count
    /// unchanged.
    pub fn drain(&mut self) -> Drain<'_, K, V> {
        Drain {
            inner: self.table.drain(),
        }
    }

    /// Returns a histogram of chain lengths: element `n` is the number of
    /// buckets holding exactly `n` entries.
    ///
    /// Available with the `stats` feature.
    #[cfg(any(test, feature = "stats"))]
    pub fn chain_histogram(&self) -> Vec<usize> {
        self.table.chain_histogram()
    }

    /// Returns utilization statistics of the underlying table.
    ///
    /// Available with the `stats` feature.
    #[cfg(any(test, feature = "stats"))]
    pub fn debug_stats(&self) -> crate::hash_table::DebugStats {
        self.table.debug_stats()
    }
}

impl<K, V, S> HashMap<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher + Default,
{
    /// Creates an empty map with 16 buckets using the default hasher builder.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use bucket_hash::BucketHashTable;
    /// #
    /// let map: BucketHashTable<i32, String> = BucketHashTable::new();
    /// assert!(map.is_empty());
    /// assert_eq!(map.capacity(), 16);
    /// ```
    pub fn new() -> Self {
        Self::with_hasher(S::default())
    }

    /// Creates an empty map with at least `capacity` buckets using the
    /// default hasher builder.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_hasher(capacity, S::default())
    }

    /// Creates an empty map with custom resize bounds using the default
    /// hasher builder.
    pub fn with_load_factors(load_factors: LoadFactors) -> Self {
        Self::with_load_factors_and_hasher(load_factors, S::default())
    }

    /// Builds a map from parallel key and value sequences using the default
    /// hasher builder. Later duplicate keys overwrite earlier ones.
    ///
    /// # Errors
    ///
    /// Returns [`Error::LengthMismatch`] if the sequences differ in length.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use bucket_hash::BucketHashTable;
    /// # use bucket_hash::Error;
    /// #
    /// let map = BucketHashTable::from_keys_values(vec!["a", "b", "a"], vec![1, 2, 3]).unwrap();
    /// assert_eq!(map.len(), 2);
    /// assert_eq!(map.at(&"a"), Ok(&3));
    /// assert_eq!(map.at(&"b"), Ok(&2));
    ///
    /// let err = BucketHashTable::<&str, i32>::from_keys_values(vec!["a"], vec![]).unwrap_err();
    /// assert_eq!(err, Error::LengthMismatch { keys: 1, values: 0 });
    /// ```
    pub fn from_keys_values(keys: Vec<K>, values: Vec<V>) -> Result<Self> {
        Self::from_keys_values_with_hasher(keys, values, S::default())
    }
}

impl<K, V, S> Default for HashMap<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher + Default,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, S> PartialEq for HashMap<K, V, S>
where
    K: Hash + Eq,
    V: PartialEq,
    S: BuildHasher,
{
    /// Two maps are equal when they hold the same keys mapped to equal
    /// values. Bucket layout, capacity and load factors are not compared.
    fn eq(&self, other: &Self) -> bool {
        if self.len() != other.len() {
            return false;
        }
        self.iter()
            .all(|(key, value)| other.get(key).is_some_and(|v| v == value))
    }
}

impl<K, V, S> Eq for HashMap<K, V, S>
where
    K: Hash + Eq,
    V: Eq,
    S: BuildHasher,
{
}

impl<K, V, S> Index<&K> for HashMap<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    type Output = V;

    /// Returns a reference to the value corresponding to the key.
    ///
    /// # Panics
    ///
    /// Panics if the key is not present. Use [`HashMap::at`] for a fallible
    /// lookup.
    fn index(&self, key: &K) -> &V {
        self.get(key).expect("key not found in table")
    }
}

impl<K, V, S> Extend<(K, V)> for HashMap<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (key, value) in iter {
            self.insert_or_update(key, value);
        }
    }
}

impl<K, V, S> FromIterator<(K, V)> for HashMap<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher + Default,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<K, V, S> IntoIterator for HashMap<K, V, S> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            inner: self.table.into_iter(),
        }
    }
}

impl<'a, K, V, S> IntoIterator for &'a HashMap<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, K, V, S> IntoIterator for &'a mut HashMap<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    type Item = (&'a K, &'a mut V);
    type IntoIter = IterMut<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

/// A view into a single entry in the map, which may either be vacant or
/// occupied.
///
/// This enum is constructed from the [`entry`] method on [`HashMap`].
///
/// [`entry`]: HashMap::entry
pub enum Entry<'a, K, V> {
    /// A vacant entry.
    Vacant(VacantEntry<'a, K, V>),
    /// An occupied entry.
    Occupied(OccupiedEntry<'a, K, V>),
}

impl<'a, K, V> Entry<'a, K, V> {
    /// Inserts a default value if the entry is vacant and returns a mutable
    /// reference.
    pub fn or_insert(self, default: V) -> &'a mut V {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(default),
        }
    }

    /// Inserts a value computed from a closure if the entry is vacant and
    /// returns a mutable reference.
    pub fn or_insert_with<F>(self, default: F) -> &'a mut V
    where
        F: FnOnce() -> V,
    {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(default()),
        }
    }

    /// Provides in-place mutable access to an occupied entry before any
    /// potential inserts.
    pub fn and_modify<F>(self, f: F) -> Self
    where
        F: FnOnce(&mut V),
    {
        match self {
            Entry::Occupied(mut entry) => {
                f(entry.get_mut());
                Entry::Occupied(entry)
            }
            Entry::Vacant(entry) => Entry::Vacant(entry),
        }
    }

    /// Returns a reference to this entry's key.
    pub fn key(&self) -> &K {
        match self {
            Entry::Occupied(entry) => entry.key(),
            Entry::Vacant(entry) => entry.key(),
        }
    }
}

impl<'a, K, V> Entry<'a, K, V>
where
    V: Default,
{
    /// Inserts the default value if the entry is vacant and returns a mutable
    /// reference.
    pub fn or_default(self) -> &'a mut V {
        self.or_insert_with(Default::default)
    }
}

/// A view into a vacant entry in the map.
pub struct VacantEntry<'a, K, V> {
    entry: crate::hash_table::VacantEntry<'a, (K, V)>,
    key: K,
}

impl<'a, K, V> VacantEntry<'a, K, V> {
    /// Gets a reference to the key that would be used when inserting a value.
    pub fn key(&self) -> &K {
        &self.key
    }

    /// Inserts the value into the map and returns a mutable reference to it.
    pub fn insert(self, value: V) -> &'a mut V {
        &mut self.entry.insert((self.key, value)).1
    }
}

/// A view into an occupied entry in the map.
pub struct OccupiedEntry<'a, K, V> {
    entry: crate::hash_table::OccupiedEntry<'a, (K, V)>,
}

impl<'a, K, V> OccupiedEntry<'a, K, V> {
    /// Gets a reference to the key in the entry.
    pub fn key(&self) -> &K {
        &self.entry.get().0
    }

    /// Gets a reference to the value in the entry.
    pub fn get(&self) -> &V {
        &self.entry.get().1
    }

    /// Gets a mutable reference to the value in the entry.
    pub fn get_mut(&mut self) -> &mut V {
        &mut self.entry.get_mut().1
    }

    /// Converts the entry into a mutable reference to the value.
    pub fn into_mut(self) -> &'a mut V {
        &mut self.entry.into_mut().1
    }

    /// Inserts a value into the entry and returns the old value.
    pub fn insert(&mut self, value: V) -> V {
        core::mem::replace(&mut self.entry.get_mut().1, value)
    }

    /// Removes the entry from the map and returns the value.
    pub fn remove(self) -> V {
        self.entry.remove().1
    }

    /// Removes the entry from the map and returns the key and value.
    pub fn remove_entry(self) -> (K, V) {
        self.entry.remove()
    }
}

/// An iterator over the key-value pairs of a `HashMap`.
///
/// See [`hash_table::Iter`](crate::hash_table::Iter) for the cursor
/// semantics exposed by [`position`](Iter::position) and
/// [`current`](Iter::current).
pub struct Iter<'a, K, V> {
    inner: crate::hash_table::Iter<'a, (K, V)>,
}

impl<'a, K, V> Iter<'a, K, V> {
    /// Returns the cursor as `(bucket_index, position_in_bucket)`.
    pub fn position(&self) -> (usize, usize) {
        self.inner.position()
    }

    /// Returns `true` once every pair has been yielded.
    pub fn is_end(&self) -> bool {
        self.inner.is_end()
    }

    /// Returns the pair under the cursor without advancing.
    pub fn current(&self) -> Option<(&'a K, &'a V)> {
        self.inner.current().map(|(k, v)| (k, v))
    }
}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<K, V> PartialEq for Iter<'_, K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl<K, V> Eq for Iter<'_, K, V> {}

impl<K, V> Debug for Iter<'_, K, V> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        self.inner.fmt(f)
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, v)| (k, v))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<K, V> FusedIterator for Iter<'_, K, V> {}

/// A mutable iterator over the key-value pairs of a `HashMap`.
pub struct IterMut<'a, K, V> {
    inner: crate::hash_table::IterMut<'a, (K, V)>,
}

impl<'a, K, V> Iterator for IterMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|entry| (&entry.0, &mut entry.1))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for IterMut<'_, K, V> {}

impl<K, V> FusedIterator for IterMut<'_, K, V> {}

/// An iterator over the keys of a `HashMap`.
pub struct Keys<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Keys<'_, K, V> {}

impl<K, V> FusedIterator for Keys<'_, K, V> {}

/// An iterator over the values of a `HashMap`.
pub struct Values<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Values<'_, K, V> {}

impl<K, V> FusedIterator for Values<'_, K, V> {}

/// A mutable iterator over the values of a `HashMap`.
pub struct ValuesMut<'a, K, V> {
    inner: IterMut<'a, K, V>,
}

impl<'a, K, V> Iterator for ValuesMut<'a, K, V> {
    type Item = &'a mut V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for ValuesMut<'_, K, V> {}

impl<K, V> FusedIterator for ValuesMut<'_, K, V> {}

/// A draining iterator over the key-value pairs of a `HashMap`.
pub struct Drain<'a, K, V> {
    inner: crate::hash_table::Drain<'a, (K, V)>,
}

impl<'a, K, V> Iterator for Drain<'a, K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Drain<'_, K, V> {}

impl<K, V> FusedIterator for Drain<'_, K, V> {}

/// An owning iterator over the key-value pairs of a `HashMap`.
pub struct IntoIter<K, V> {
    inner: crate::hash_table::IntoIter<(K, V)>,
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {}

impl<K, V> FusedIterator for IntoIter<K, V> {}

#[cfg(test)]
mod tests {
    use alloc::format;
    use alloc::string::String;
    use alloc::string::ToString;
    use alloc::vec;
    use core::hash::BuildHasher;

    use rand::Rng;
    use rand::SeedableRng;
    use rand::TryRngCore;
    use rand::rngs::OsRng;
    use rand::rngs::SmallRng;
    use siphasher::sip::SipHasher;

    use super::*;

    #[derive(Clone)]
    struct SipHashBuilder {
        k1: u64,
        k2: u64,
    }

    impl BuildHasher for SipHashBuilder {
        type Hasher = SipHasher;

        fn build_hasher(&self) -> Self::Hasher {
            SipHasher::new_with_keys(self.k1, self.k2)
        }
    }

    impl Default for SipHashBuilder {
        fn default() -> Self {
            let mut rng = OsRng;
            Self {
                k1: rng.try_next_u64().unwrap(),
                k2: rng.try_next_u64().unwrap(),
            }
        }
    }

    type Map<K, V> = HashMap<K, V, SipHashBuilder>;

    fn assert_within_bounds<K, V, S>(map: &HashMap<K, V, S>)
    where
        K: Hash + Eq,
        S: BuildHasher,
    {
        assert!(map.capacity().is_power_of_two());
        if map.capacity() > 1 && !map.is_empty() {
            let lf = map.load_factor();
            assert!(
                (0.25..=0.75).contains(&lf),
                "load factor {lf} with {} entries in {} buckets",
                map.len(),
                map.capacity()
            );
        }
    }

    #[test]
    fn test_new_and_with_hasher() {
        let map: Map<i32, String> = HashMap::new();
        assert!(map.is_empty());
        assert_eq!(map.len(), 0);
        assert_eq!(map.capacity(), 16);
        assert_eq!(map.load_factor(), 0.0);

        let map2 = HashMap::<i32, String, _>::with_hasher(SipHashBuilder::default());
        assert!(map2.is_empty());
        assert_eq!(map2.capacity(), 16);
    }

    #[test]
    fn test_with_capacity() {
        let map: Map<i32, String> = HashMap::with_capacity(100);
        assert_eq!(map.capacity(), 128);
        assert!(map.is_empty());

        let map2 =
            HashMap::<i32, String, _>::with_capacity_and_hasher(0, SipHashBuilder::default());
        assert_eq!(map2.capacity(), 1);
    }

    #[test]
    fn test_insert_and_at() {
        let mut map: Map<i32, String> = HashMap::new();

        assert_eq!(map.insert(1, "hello".to_string()), Ok(()));
        assert_eq!(map.len(), 1);
        assert!(!map.is_empty());

        assert_eq!(map.at(&1), Ok(&"hello".to_string()));
        assert_eq!(map.at(&2), Err(Error::KeyNotFound));
        assert_eq!(map.get(&2), None);
    }

    #[test]
    fn test_insert_duplicate_leaves_map_unchanged() {
        let mut map: Map<i32, String> = HashMap::new();
        map.insert(1, "hello".to_string()).unwrap();
        let capacity = map.capacity();

        assert_eq!(
            map.insert(1, "world".to_string()),
            Err(Error::DuplicateKey)
        );
        assert_eq!(map.len(), 1);
        assert_eq!(map.capacity(), capacity);
        assert_eq!(map.at(&1), Ok(&"hello".to_string()));
    }

    #[test]
    fn test_insert_or_update() {
        let mut map: Map<i32, String> = HashMap::new();
        assert_eq!(map.insert_or_update(1, "hello".to_string()), None);
        assert_eq!(
            map.insert_or_update(1, "world".to_string()),
            Some("hello".to_string())
        );
        assert_eq!(map.len(), 1);
        assert_eq!(map.get(&1), Some(&"world".to_string()));
    }

    #[test]
    fn test_at_mut_and_get_mut() {
        let mut map: Map<i32, String> = HashMap::new();
        map.insert(1, "hello".to_string()).unwrap();

        map.at_mut(&1).unwrap().push_str(" world");
        assert_eq!(map.get(&1), Some(&"hello world".to_string()));

        if let Some(value) = map.get_mut(&1) {
            value.push('!');
        }
        assert_eq!(map.get(&1), Some(&"hello world!".to_string()));

        assert_eq!(map.at_mut(&2), Err(Error::KeyNotFound));
        assert_eq!(map.get_mut(&2), None);
    }

    #[test]
    fn test_get_or_insert_default() {
        let mut map: Map<&str, Vec<i32>> = HashMap::new();

        map.get_or_insert_default("a").push(1);
        map.get_or_insert_default("a").push(2);
        assert_eq!(map.len(), 1);
        assert_eq!(map.at(&"a"), Ok(&vec![1, 2]));

        // A miss creates the key even when nothing is written through.
        let _ = map.get_or_insert_default("b");
        assert_eq!(map.len(), 2);
        assert_eq!(map.at(&"b"), Ok(&vec![]));
    }

    #[test]
    fn test_get_or_insert_default_resizes() {
        let mut map: Map<u32, u32> = HashMap::new();
        for i in 0..100 {
            *map.get_or_insert_default(i) += i;
            assert_within_bounds(&map);
        }
        assert_eq!(map.len(), 100);
        assert_eq!(map.capacity(), 256);
        for i in 0..100 {
            assert_eq!(map[&i], i);
        }
    }

    #[test]
    fn test_index() {
        let mut map: Map<&str, i32> = HashMap::new();
        map.insert("a", 1).unwrap();
        assert_eq!(map[&"a"], 1);
    }

    #[test]
    #[should_panic(expected = "key not found in table")]
    fn test_index_missing_key_panics() {
        let map: Map<&str, i32> = HashMap::new();
        let _ = map[&"missing"];
    }

    #[test]
    fn test_contains_key() {
        let mut map: Map<i32, String> = HashMap::new();
        assert!(!map.contains_key(&1));

        map.insert(1, "value".to_string()).unwrap();
        assert!(map.contains_key(&1));
        assert!(!map.contains_key(&2));
    }

    #[test]
    fn test_erase() {
        let mut map: Map<i32, String> = HashMap::new();
        map.insert(1, "hello".to_string()).unwrap();
        map.insert(2, "world".to_string()).unwrap();

        assert!(map.erase(&1));
        assert_eq!(map.len(), 1);
        assert!(!map.contains_key(&1));
        assert!(map.contains_key(&2));

        let capacity = map.capacity();
        assert!(!map.erase(&1));
        assert!(!map.erase(&3));
        assert_eq!(map.len(), 1);
        assert_eq!(map.capacity(), capacity);
    }

    #[test]
    fn test_remove() {
        let mut map: Map<i32, String> = HashMap::new();
        map.insert(1, "hello".to_string()).unwrap();
        map.insert(2, "world".to_string()).unwrap();

        assert_eq!(map.remove(&1), Some("hello".to_string()));
        assert_eq!(map.remove(&1), None);
        assert_eq!(map.remove_entry(&2), Some((2, "world".to_string())));
        assert!(map.is_empty());
    }

    #[test]
    fn test_bucket_index_and_size() {
        let mut map: Map<u64, u64> = HashMap::new();
        for i in 0..40 {
            map.insert(i, i).unwrap();
        }

        let mut total = 0;
        let mut seen_buckets = std::collections::HashSet::new();
        for i in 0..40 {
            let index = map.bucket_index(&i).unwrap();
            assert!(index < map.capacity());
            assert_eq!(index, map.hasher().hash_one(i) as usize & (map.capacity() - 1));

            let size = map.bucket_size(&i).unwrap();
            assert!(size >= 1);
            if seen_buckets.insert(index) {
                total += size;
            }
        }
        assert_eq!(total, 40);

        assert_eq!(map.bucket_index(&1000), Err(Error::KeyNotFound));
        assert_eq!(map.bucket_size(&1000), Err(Error::KeyNotFound));
    }

    #[test]
    fn test_single_entry_grows_single_bucket() {
        let mut map: Map<u64, u64> = HashMap::with_capacity(1);
        map.insert(1, 1).unwrap();
        // A single entry in a single bucket sits exactly on the upper bound
        // of one, so the map grows to two buckets.
        assert_eq!(map.capacity(), 2);
        assert_eq!(map.bucket_size(&1), Ok(1));
    }

    #[test]
    fn test_clear() {
        let mut map: Map<i32, String> = HashMap::new();
        for i in 0..50 {
            map.insert(i, format!("value_{i}")).unwrap();
        }
        let capacity = map.capacity();

        map.clear();
        assert_eq!(map.len(), 0);
        assert!(map.is_empty());
        assert_eq!(map.capacity(), capacity);
        assert!(!map.contains_key(&1));
    }

    #[test]
    fn test_from_keys_values() {
        let map: Map<&str, i32> =
            HashMap::from_keys_values(vec!["a", "b", "a"], vec![1, 2, 3]).unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map.at(&"a"), Ok(&3));
        assert_eq!(map.at(&"b"), Ok(&2));

        let err = Map::<&str, i32>::from_keys_values(vec!["a", "b"], vec![1]).unwrap_err();
        assert_eq!(err, Error::LengthMismatch { keys: 2, values: 1 });

        let empty: Map<&str, i32> = HashMap::from_keys_values(vec![], vec![]).unwrap();
        assert!(empty.is_empty());
        assert_eq!(empty.capacity(), 16);
    }

    #[test]
    fn test_custom_load_factors() {
        let factors = LoadFactors::new(0.1, 0.5).unwrap();
        let mut map: Map<u32, u32> = HashMap::with_load_factors(factors);
        for i in 0..9 {
            map.insert(i, i).unwrap();
        }
        assert_eq!(map.load_factors(), factors);
        assert_eq!(map.capacity(), 32);
        assert!(map.load_factor() <= 0.5);
    }

    #[test]
    fn test_entry_api() {
        let mut map: Map<i32, String> = HashMap::new();

        let value = map.entry(1).or_insert("hello".to_string());
        assert_eq!(value, &"hello".to_string());
        assert_eq!(map.len(), 1);

        let value = map.entry(1).or_insert("world".to_string());
        assert_eq!(value, &"hello".to_string());
        assert_eq!(map.len(), 1);

        map.entry(2).or_insert_with(|| "computed".to_string());
        assert_eq!(map.get(&2), Some(&"computed".to_string()));

        map.entry(1)
            .and_modify(|v| v.push_str(" world"))
            .or_insert("default".to_string());
        assert_eq!(map.get(&1), Some(&"hello world".to_string()));

        assert_eq!(map.entry(3).key(), &3);
    }

    #[test]
    fn test_occupied_entry() {
        let mut map: Map<i32, String> = HashMap::new();
        map.insert(1, "hello".to_string()).unwrap();

        match map.entry(1) {
            Entry::Occupied(mut entry) => {
                assert_eq!(entry.key(), &1);
                assert_eq!(entry.get(), &"hello".to_string());

                *entry.get_mut() = "world".to_string();
                assert_eq!(entry.get(), &"world".to_string());

                let old_value = entry.insert("new".to_string());
                assert_eq!(old_value, "world".to_string());

                let (key, value) = entry.remove_entry();
                assert_eq!(key, 1);
                assert_eq!(value, "new".to_string());
            }
            Entry::Vacant(_) => panic!("Expected occupied entry"),
        }

        assert!(map.is_empty());
    }

    #[test]
    fn test_vacant_entry() {
        let mut map: Map<i32, String> = HashMap::new();

        match map.entry(1) {
            Entry::Vacant(entry) => {
                assert_eq!(entry.key(), &1);
                let value = entry.insert("hello".to_string());
                assert_eq!(value, &"hello".to_string());
            }
            Entry::Occupied(_) => panic!("Expected vacant entry"),
        }

        assert_eq!(map.len(), 1);
        assert_eq!(map.get(&1), Some(&"hello".to_string()));

        match map.entry(2) {
            Entry::Vacant(entry) => assert_eq!(entry.key(), &2),
            Entry::Occupied(_) => panic!("Expected vacant entry"),
        }
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_iterators() {
        let mut map: Map<i32, String> = HashMap::new();
        map.insert(1, "one".to_string()).unwrap();
        map.insert(2, "two".to_string()).unwrap();
        map.insert(3, "three".to_string()).unwrap();

        let pairs: std::collections::HashMap<i32, String> =
            map.iter().map(|(k, v)| (*k, v.clone())).collect();
        assert_eq!(pairs.len(), 3);
        assert_eq!(pairs.get(&1), Some(&"one".to_string()));
        assert_eq!(pairs.get(&2), Some(&"two".to_string()));
        assert_eq!(pairs.get(&3), Some(&"three".to_string()));

        let keys: std::collections::HashSet<i32> = map.keys().copied().collect();
        assert_eq!(keys, [1, 2, 3].into_iter().collect());

        let values: std::collections::HashSet<String> = map.values().cloned().collect();
        assert!(values.contains("one"));
        assert!(values.contains("two"));
        assert!(values.contains("three"));

        for value in map.values_mut() {
            value.push('!');
        }
        for (_, value) in &mut map {
            value.push('?');
        }
        assert_eq!(map.get(&2), Some(&"two!?".to_string()));

        let count = (&map).into_iter().count();
        assert_eq!(count, 3);
    }

    #[test]
    fn test_iter_cursor() {
        let mut map: Map<i32, i32> = HashMap::new();
        let iter = map.iter();
        assert!(iter.is_end());
        assert_eq!(iter.position(), (16, 0));
        assert_eq!(iter.current(), None);

        map.insert(7, 70).unwrap();
        let mut iter = map.iter();
        let bucket = map.bucket_index(&7).unwrap();
        assert_eq!(iter.position(), (bucket, 0));
        assert_eq!(iter.current(), Some((&7, &70)));
        assert_eq!(iter.len(), 1);

        let start = iter.clone();
        assert_eq!(iter.next(), Some((&7, &70)));
        assert_ne!(iter, start);
        assert!(iter.is_end());
        assert_eq!(iter.position(), (map.capacity(), 0));
        assert_eq!(iter.next(), None);
    }

    #[test]
    fn test_adapter_lengths() {
        let mut map: Map<u32, u32> = (0..25).map(|i| (i, i)).collect();

        assert_eq!(map.iter().len(), 25);
        assert_eq!(map.keys().len(), 25);
        assert_eq!(map.values().len(), 25);
        assert_eq!(map.values_mut().len(), 25);
        assert_eq!(map.iter_mut().len(), 25);

        let mut keys = map.keys();
        keys.nth(9);
        assert_eq!(keys.len(), 15);
        assert_eq!(keys.by_ref().count(), 15);
        assert_eq!(keys.next(), None);
        assert_eq!(keys.next(), None);

        let mut drain = map.drain();
        assert_eq!(drain.len(), 25);
        drain.next();
        assert_eq!(drain.len(), 24);
        assert_eq!(drain.by_ref().count(), 24);
        assert_eq!(drain.next(), None);
        drop(drain);
        assert!(map.is_empty());

        map.extend((0..7).map(|i| (i, i)));
        let mut into_iter = map.into_iter();
        assert_eq!(into_iter.len(), 7);
        assert_eq!(into_iter.by_ref().count(), 7);
        assert_eq!(into_iter.next(), None);
    }

    #[test]
    fn test_drain() {
        let mut map: Map<i32, String> = HashMap::new();
        map.insert(1, "one".to_string()).unwrap();
        map.insert(2, "two".to_string()).unwrap();
        map.insert(3, "three".to_string()).unwrap();
        let capacity = map.capacity();

        let drained: std::collections::HashMap<i32, String> = map.drain().collect();
        assert_eq!(drained.len(), 3);
        assert!(map.is_empty());
        assert_eq!(map.capacity(), capacity);

        assert_eq!(drained.get(&1), Some(&"one".to_string()));
        assert_eq!(drained.get(&3), Some(&"three".to_string()));
    }

    #[test]
    fn test_into_iter_and_from_iter() {
        let map: Map<i32, i32> = (0..100).map(|i| (i, i * i)).collect();
        assert_eq!(map.len(), 100);

        let mut pairs: Vec<(i32, i32)> = map.into_iter().collect();
        pairs.sort_unstable();
        assert_eq!(pairs, (0..100).map(|i| (i, i * i)).collect::<Vec<_>>());
    }

    #[test]
    fn test_extend_overwrites() {
        let mut map: Map<&str, i32> = HashMap::new();
        map.insert("a", 1).unwrap();
        map.extend([("a", 10), ("b", 2)]);
        assert_eq!(map.len(), 2);
        assert_eq!(map[&"a"], 10);
        assert_eq!(map[&"b"], 2);
    }

    #[test]
    fn test_equality_ignores_layout() {
        let mut a: Map<u32, u32> = HashMap::new();
        for i in 0..50 {
            a.insert(i, i * 2).unwrap();
        }

        // Same contents reached through a different history and capacity.
        let mut b: Map<u32, u32> = HashMap::with_capacity(1024);
        for i in (0..200).rev() {
            b.insert(i, i * 2).unwrap();
        }
        for i in 50..200 {
            assert!(b.erase(&i));
        }

        assert_eq!(a, b);

        b.insert_or_update(3, 0);
        assert_ne!(a, b);
        b.insert_or_update(3, 6);
        assert_eq!(a, b);

        b.erase(&3);
        assert_ne!(a, b);

        let empty: Map<u32, u32> = HashMap::new();
        assert_ne!(a, empty);
        assert_eq!(empty, HashMap::with_capacity(2));
    }

    #[test]
    fn test_clone_is_independent() {
        let mut map: Map<i32, i32> = HashMap::new();
        for i in 0..10 {
            map.insert(i, i).unwrap();
        }
        let mut cloned = map.clone();
        assert_eq!(map, cloned);

        cloned.erase(&0);
        assert_eq!(map.len(), 10);
        assert_eq!(cloned.len(), 9);
        assert_ne!(map, cloned);
    }

    #[test]
    fn test_debug_format() {
        let mut map: Map<i32, &str> = HashMap::new();
        assert_eq!(format!("{map:?}"), "{}");
        map.insert(1, "a").unwrap();
        assert_eq!(format!("{map:?}"), "{1: \"a\"}");
    }

    #[test]
    fn test_stats() {
        let mut map: Map<u64, u64> = HashMap::new();
        for i in 0..12 {
            map.insert(i, i).unwrap();
        }
        let stats = map.debug_stats();
        assert_eq!(stats.populated, 12);
        assert_eq!(stats.capacity, 16);
        assert_eq!(map.chain_histogram().iter().sum::<usize>(), 16);
    }

    #[test]
    fn test_capacity_floor_after_erasing_everything() {
        let mut map: Map<u64, u64> = HashMap::new();
        for i in 0..1000 {
            map.insert(i, i).unwrap();
        }
        for i in 0..1000 {
            assert!(map.erase(&i));
            assert!(map.capacity() >= 1);
            assert_within_bounds(&map);
        }
        assert!(map.is_empty());
        assert_eq!(map.capacity(), 1);

        map.insert(5, 5).unwrap();
        assert_eq!(map.at(&5), Ok(&5));
    }

    #[test]
    fn test_string_keys() {
        let mut map: Map<String, i32> = HashMap::new();

        map.insert("hello".to_string(), 1).unwrap();
        map.insert("world".to_string(), 2).unwrap();
        map.insert("rust".to_string(), 3).unwrap();

        assert_eq!(map.get(&"hello".to_string()), Some(&1));
        assert_eq!(map.get(&"world".to_string()), Some(&2));
        assert_eq!(map.get(&"rust".to_string()), Some(&3));
        assert_eq!(map.get(&"missing".to_string()), None);
    }

    #[test]
    fn test_default_trait() {
        let map: Map<i32, String> = HashMap::default();
        assert!(map.is_empty());
        assert_eq!(map.capacity(), 16);
    }

    #[test]
    fn test_random_operations_match_model() {
        let mut rng = SmallRng::seed_from_u64(0xb0c4e7);
        let mut map: Map<u32, u64> = HashMap::new();
        let mut model = std::collections::HashMap::new();

        for step in 0..20_000u64 {
            let key = rng.random_range(0..300u32);
            match rng.random_range(0..4u8) {
                0 => {
                    let expected = if model.contains_key(&key) {
                        Err(Error::DuplicateKey)
                    } else {
                        model.insert(key, step);
                        Ok(())
                    };
                    assert_eq!(map.insert(key, step), expected);
                }
                1 => {
                    let before = map.len();
                    let removed = map.erase(&key);
                    assert_eq!(removed, model.remove(&key).is_some());
                    assert_eq!(map.len(), if removed { before - 1 } else { before });
                    assert!(!map.contains_key(&key));
                }
                2 => {
                    *map.get_or_insert_default(key) += 1;
                    *model.entry(key).or_default() += 1;
                }
                _ => {
                    assert_eq!(map.get(&key), model.get(&key));
                }
            }

            assert_eq!(map.len(), model.len());
            assert_within_bounds(&map);
        }

        let mut seen = std::collections::HashSet::new();
        for (key, value) in map.iter() {
            assert!(seen.insert(*key), "key {key} yielded twice");
            assert_eq!(model.get(key), Some(value));
        }
        assert_eq!(seen.len(), model.len());
    }
}
