use alloc::vec::Vec;
use core::fmt::Debug;
use core::iter::FusedIterator;

use crate::error::Error;
use crate::error::Result;

/// Number of buckets a table starts with when no capacity is requested.
pub const DEFAULT_CAPACITY: usize = 16;

/// Largest bucket count a table will grow to.
const MAX_CAPACITY: usize = 1 << (usize::BITS - 1);

#[inline(always)]
fn bucket_for(hash: u64, capacity: usize) -> usize {
    debug_assert!(capacity.is_power_of_two());
    (hash as usize) & (capacity - 1)
}

#[inline(always)]
fn load(populated: usize, capacity: usize) -> f64 {
    populated as f64 / capacity as f64
}

fn new_buckets<V>(capacity: usize) -> Vec<Bucket<V>> {
    let mut buckets = Vec::with_capacity(capacity);
    buckets.resize_with(capacity, Vec::new);
    buckets
}

/// Lower and upper bounds on `len / capacity` that a table maintains after
/// every insertion and removal.
///
/// Crossing the upper bound doubles the bucket count, crossing the lower
/// bound halves it. Both comparisons are strict, so a table sitting exactly
/// on a bound does not resize.
///
/// # Examples
///
/// ```rust
/// # use bucket_hash::LoadFactors;
/// #
/// let factors = LoadFactors::new(0.2, 0.8).unwrap();
/// assert_eq!(factors.lower(), 0.2);
/// assert_eq!(factors.upper(), 0.8);
///
/// // The lower bound must be at most half the upper bound.
/// assert!(LoadFactors::new(0.5, 0.75).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoadFactors {
    lower: f64,
    upper: f64,
}

impl LoadFactors {
    /// Default lower bound.
    pub const DEFAULT_LOWER: f64 = 0.25;
    /// Default upper bound.
    pub const DEFAULT_UPPER: f64 = 0.75;
    /// Smallest accepted upper bound: at most 1024 buckets per entry.
    pub const MIN_UPPER: f64 = 1.0 / 1024.0;

    /// Creates a validated pair of bounds.
    ///
    /// Both bounds must be finite, `lower` must be non-negative, `upper` must
    /// be at least [`MIN_UPPER`](Self::MIN_UPPER) and `2 * lower <= upper`.
    /// The last condition guarantees that a single doubling or halving always
    /// lands inside the bounds.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidLoadFactors`] if any condition fails.
    pub fn new(lower: f64, upper: f64) -> Result<Self> {
        let valid = lower.is_finite()
            && upper.is_finite()
            && lower >= 0.0
            && upper >= Self::MIN_UPPER
            && lower * 2.0 <= upper;
        if !valid {
            log::trace!("rejected load factors lower={lower} upper={upper}");
            return Err(Error::InvalidLoadFactors { lower, upper });
        }
        Ok(Self { lower, upper })
    }

    /// Returns the lower bound.
    pub fn lower(&self) -> f64 {
        self.lower
    }

    /// Returns the upper bound.
    pub fn upper(&self) -> f64 {
        self.upper
    }

    /// Computes the bucket count a table holding `populated` entries in
    /// `capacity` buckets should move to.
    fn target_capacity(&self, populated: usize, capacity: usize) -> usize {
        let mut target = capacity;
        while target < MAX_CAPACITY && load(populated, target) > self.upper {
            target *= 2;
        }
        if target == capacity {
            while target > 1 && load(populated, target) < self.lower {
                target /= 2;
            }
        }
        target
    }
}

impl Default for LoadFactors {
    fn default() -> Self {
        Self {
            lower: Self::DEFAULT_LOWER,
            upper: Self::DEFAULT_UPPER,
        }
    }
}

#[derive(Clone)]
struct Slot<V> {
    hash: u64,
    value: V,
}

type Bucket<V> = Vec<Slot<V>>;

/// Debug statistics for hash table analysis.
///
/// Available with the `stats` feature.
#[cfg(any(test, feature = "stats"))]
#[derive(Debug, Clone)]
pub struct DebugStats {
    /// Number of elements currently in the table
    pub populated: usize,
    /// Number of buckets
    pub capacity: usize,
    /// Number of buckets holding no entries
    pub empty_buckets: usize,
    /// Length of the longest collision chain
    pub longest_chain: usize,
    /// Load factor (populated / capacity)
    pub load_factor: f64,
    /// Mean chain length over non-empty buckets
    pub average_chain: f64,
}

#[cfg(any(test, feature = "stats"))]
impl DebugStats {
    /// Pretty-print the debug statistics.
    #[cfg(feature = "std")]
    pub fn print(&self) {
        println!("=== Hash Table Debug Statistics ===");
        println!(
            "Population: {} entries in {} buckets ({:.2}% load factor)",
            self.populated,
            self.capacity,
            self.load_factor * 100.0
        );
        println!(
            "Empty buckets: {} ({:.2}%)",
            self.empty_buckets,
            if self.capacity == 0 {
                0.0
            } else {
                (self.empty_buckets as f64 / self.capacity as f64) * 100.0
            }
        );
        println!(
            "Chains: longest {}, average {:.2}",
            self.longest_chain, self.average_chain
        );
    }
}

/// A hash table using separate chaining.
///
/// `HashTable<V>` stores values of type `V` in a power-of-two array of
/// buckets, each bucket a chain of the values whose hash selects it. Like
/// the lower-level tables of other hashing crates it does not hash anything
/// itself: each operation takes the value's hash and an equality predicate.
/// The hash is cached next to each value, so resizing never re-hashes keys.
///
/// After every insertion and removal the table checks its load factor
/// against its [`LoadFactors`] and, if a bound is crossed, moves every value
/// into a freshly allocated bucket array of the new size.
///
/// ## Example
///
/// ```rust
/// # use core::hash::Hash;
/// # use core::hash::Hasher;
/// #
/// # use bucket_hash::hash_table::Entry;
/// # use bucket_hash::hash_table::HashTable;
/// # use siphasher::sip::SipHasher;
/// #
/// # #[derive(Debug, PartialEq)]
/// # struct Person {
/// #     id: u64,
/// #     name: String,
/// # }
/// #
/// # fn hash_id(id: u64) -> u64 {
/// #     let mut hasher = SipHasher::new();
/// #     id.hash(&mut hasher);
/// #     hasher.finish()
/// # }
///
/// let mut table = HashTable::new();
/// let hash = hash_id(123);
///
/// match table.entry(hash, |p: &Person| p.id == 123) {
///     Entry::Vacant(entry) => {
///         entry.insert(Person {
///             id: 123,
///             name: "Alice".to_string(),
///         });
///     }
///     Entry::Occupied(_) => {
///         println!("Person already exists");
///     }
/// }
/// assert_eq!(table.len(), 1);
/// ```
#[derive(Clone)]
pub struct HashTable<V> {
    buckets: Vec<Bucket<V>>,
    populated: usize,
    load_factors: LoadFactors,
}

impl<V> Debug for HashTable<V> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        if self.is_empty() {
            return f
                .debug_struct("HashTable")
                .field("chains", &"empty")
                .field("populated", &self.populated)
                .field("capacity", &self.capacity())
                .field("load_factors", &self.load_factors)
                .finish();
        }

        f.debug_struct("HashTable")
            .field(
                "chains",
                &self.buckets.iter().map(Vec::len).collect::<Vec<_>>(),
            )
            .field("populated", &self.populated)
            .field("capacity", &self.capacity())
            .field("load_factors", &self.load_factors)
            .finish()
    }
}

impl<V> Default for HashTable<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> HashTable<V> {
    /// Creates an empty table with [`DEFAULT_CAPACITY`] buckets.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Creates an empty table with at least `capacity` buckets.
    ///
    /// The bucket count is rounded up to a power of two and is never below
    /// one. Note that the first insertion already applies the load factor
    /// policy, so a large initial capacity shrinks as soon as the table is
    /// used.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use bucket_hash::hash_table::HashTable;
    /// #
    /// let table: HashTable<String> = HashTable::with_capacity(100);
    /// assert_eq!(table.capacity(), 128);
    ///
    /// let table: HashTable<String> = HashTable::with_capacity(0);
    /// assert_eq!(table.capacity(), 1);
    /// ```
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_load_factors(capacity, LoadFactors::default())
    }

    /// Creates an empty table with at least `capacity` buckets and the given
    /// resize bounds.
    pub fn with_capacity_and_load_factors(capacity: usize, load_factors: LoadFactors) -> Self {
        let capacity = capacity
            .max(1)
            .checked_next_power_of_two()
            .unwrap_or(MAX_CAPACITY);

        Self {
            buckets: new_buckets(capacity),
            populated: 0,
            load_factors,
        }
    }

    /// Returns an iterator over all values in the table.
    ///
    /// Values are visited in bucket order, then in insertion order within a
    /// bucket. This is not the order in which values were inserted.
    ///
    /// The iterator borrows the table, so the table cannot be modified (and
    /// in particular cannot be resized) while the iterator is alive.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use bucket_hash::hash_table::HashTable;
    /// #
    /// let mut table = HashTable::new();
    /// table.entry(1, |&v: &u32| v == 10).or_insert(10);
    /// table.entry(2, |&v: &u32| v == 20).or_insert(20);
    ///
    /// let mut values: Vec<u32> = table.iter().copied().collect();
    /// values.sort();
    /// assert_eq!(values, [10, 20]);
    /// ```
    pub fn iter(&self) -> Iter<'_, V> {
        Iter::new(self)
    }

    /// Returns an iterator yielding mutable references to all values.
    pub fn iter_mut(&mut self) -> IterMut<'_, V> {
        IterMut {
            remaining: self.populated,
            inner: self.buckets.iter_mut().flatten(),
        }
    }

    /// Returns an iterator that removes and yields all values from the table.
    ///
    /// After calling `drain()`, the table will be empty. Like [`clear`], the
    /// bucket count is left untouched.
    ///
    /// [`clear`]: HashTable::clear
    pub fn drain(&mut self) -> Drain<'_, V> {
        Drain {
            table: self,
            bucket_index: 0,
        }
    }

    /// Returns `true` if the table contains no elements.
    pub fn is_empty(&self) -> bool {
        self.populated == 0
    }

    /// Returns the number of elements in the table.
    pub fn len(&self) -> usize {
        self.populated
    }

    /// Returns the number of buckets. Always a power of two.
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    /// Returns `len / capacity`.
    pub fn load_factor(&self) -> f64 {
        load(self.populated, self.capacity())
    }

    /// Returns the resize bounds of this table.
    pub fn load_factors(&self) -> LoadFactors {
        self.load_factors
    }

    /// Returns the bucket a value with the given hash belongs in under the
    /// current capacity.
    pub fn bucket_index(&self, hash: u64) -> usize {
        bucket_for(hash, self.capacity())
    }

    /// Returns the number of values in bucket `index`, or zero if `index` is
    /// out of range.
    pub fn bucket_len(&self, index: usize) -> usize {
        self.buckets.get(index).map_or(0, Vec::len)
    }

    /// Removes all elements from the table, keeping the bucket count.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use bucket_hash::hash_table::HashTable;
    /// #
    /// let mut table = HashTable::new();
    /// for i in 0..20u64 {
    ///     table.entry(i, |&v: &u64| v == i).or_insert(i);
    /// }
    /// let capacity = table.capacity();
    ///
    /// table.clear();
    /// assert!(table.is_empty());
    /// assert_eq!(table.capacity(), capacity);
    /// ```
    pub fn clear(&mut self) {
        for bucket in &mut self.buckets {
            bucket.clear();
        }
        self.populated = 0;
    }

    /// Finds a value by hash and equality predicate.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use bucket_hash::hash_table::HashTable;
    /// #
    /// let mut table = HashTable::new();
    /// table.entry(7, |&v: &u64| v == 42).or_insert(42);
    ///
    /// assert_eq!(table.find(7, |&v| v == 42), Some(&42));
    /// assert_eq!(table.find(7, |&v| v == 43), None);
    /// ```
    pub fn find(&self, hash: u64, eq: impl Fn(&V) -> bool) -> Option<&V> {
        let (bucket_index, position) = self.find_position(hash, eq)?;
        Some(&self.buckets[bucket_index][position].value)
    }

    /// Finds a value by hash and equality predicate, returning a mutable
    /// reference to it.
    pub fn find_mut(&mut self, hash: u64, eq: impl Fn(&V) -> bool) -> Option<&mut V> {
        let (bucket_index, position) = self.find_position(hash, eq)?;
        Some(&mut self.buckets[bucket_index][position].value)
    }

    /// Removes and returns a value from the table.
    ///
    /// A successful removal runs the resize check, which may shrink the
    /// table.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use bucket_hash::hash_table::HashTable;
    /// #
    /// let mut table = HashTable::new();
    /// table.entry(3, |&v: &u64| v == 42).or_insert(42);
    ///
    /// assert_eq!(table.remove(3, |&v| v == 42), Some(42));
    /// assert!(table.is_empty());
    /// assert_eq!(table.remove(3, |&v| v == 42), None);
    /// ```
    pub fn remove(&mut self, hash: u64, eq: impl Fn(&V) -> bool) -> Option<V> {
        let (bucket_index, position) = self.find_position(hash, eq)?;
        Some(self.remove_at(bucket_index, position))
    }

    /// Gets the entry for the given hash and equality predicate for in-place
    /// manipulation.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use bucket_hash::hash_table::Entry;
    /// # use bucket_hash::hash_table::HashTable;
    /// #
    /// let mut table: HashTable<(u64, &str)> = HashTable::new();
    ///
    /// match table.entry(1, |(k, _)| *k == 1) {
    ///     Entry::Vacant(entry) => {
    ///         entry.insert((1, "one"));
    ///     }
    ///     Entry::Occupied(_) => unreachable!(),
    /// }
    ///
    /// match table.entry(1, |(k, _)| *k == 1) {
    ///     Entry::Occupied(entry) => assert_eq!(entry.get().1, "one"),
    ///     Entry::Vacant(_) => unreachable!(),
    /// }
    /// ```
    pub fn entry(&mut self, hash: u64, eq: impl Fn(&V) -> bool) -> Entry<'_, V> {
        match self.find_position(hash, eq) {
            Some((bucket_index, position)) => Entry::Occupied(OccupiedEntry {
                table: self,
                bucket_index,
                position,
            }),
            None => Entry::Vacant(VacantEntry { table: self, hash }),
        }
    }

    fn find_position(&self, hash: u64, eq: impl Fn(&V) -> bool) -> Option<(usize, usize)> {
        if self.populated == 0 {
            return None;
        }

        let bucket_index = self.bucket_index(hash);
        self.buckets[bucket_index]
            .iter()
            .position(|slot| slot.hash == hash && eq(&slot.value))
            .map(|position| (bucket_index, position))
    }

    /// Appends a value the caller has checked is not present.
    ///
    /// The table is sized for the new population before the value lands, so
    /// the returned reference points at its final slot.
    fn insert_unique(&mut self, hash: u64, value: V) -> &mut V {
        self.maybe_resize_rehash(self.populated + 1);
        self.populated += 1;

        let bucket_index = self.bucket_index(hash);
        let bucket = &mut self.buckets[bucket_index];
        let position = bucket.len();
        bucket.push(Slot { hash, value });
        &mut bucket[position].value
    }

    fn remove_at(&mut self, bucket_index: usize, position: usize) -> V {
        let slot = self.buckets[bucket_index].remove(position);
        self.populated -= 1;
        self.maybe_resize_rehash(self.populated);
        slot.value
    }

    #[inline]
    fn maybe_resize_rehash(&mut self, populated: usize) {
        let target = self
            .load_factors
            .target_capacity(populated, self.capacity());
        if target != self.capacity() {
            self.resize_rehash(target);
        }
    }

    #[cold]
    fn resize_rehash(&mut self, capacity: usize) {
        debug_assert!(capacity.is_power_of_two());
        log::debug!(
            "rehashing {} entries from {} to {} buckets",
            self.populated,
            self.capacity(),
            capacity
        );

        let mut buckets = new_buckets(capacity);
        for slot in self.buckets.iter_mut().flat_map(|bucket| bucket.drain(..)) {
            buckets[bucket_for(slot.hash, capacity)].push(slot);
        }

        // The old array is only released once every slot has moved.
        self.buckets = buckets;
    }

    /// Returns a histogram of chain lengths: element `n` is the number of
    /// buckets holding exactly `n` values.
    ///
    /// Available with the `stats` feature.
    #[cfg(any(test, feature = "stats"))]
    pub fn chain_histogram(&self) -> Vec<usize> {
        let longest = self.buckets.iter().map(Vec::len).max().unwrap_or(0);
        let mut hist = alloc::vec![0usize; longest + 1];
        for bucket in &self.buckets {
            hist[bucket.len()] += 1;
        }
        hist
    }

    /// Returns detailed utilization statistics for debugging.
    ///
    /// Available with the `stats` feature.
    #[cfg(any(test, feature = "stats"))]
    pub fn debug_stats(&self) -> DebugStats {
        let empty_buckets = self.buckets.iter().filter(|b| b.is_empty()).count();
        let occupied_buckets = self.capacity() - empty_buckets;

        DebugStats {
            populated: self.populated,
            capacity: self.capacity(),
            empty_buckets,
            longest_chain: self.buckets.iter().map(Vec::len).max().unwrap_or(0),
            load_factor: self.load_factor(),
            average_chain: if occupied_buckets == 0 {
                0.0
            } else {
                self.populated as f64 / occupied_buckets as f64
            },
        }
    }

    /// Pretty-prints the chain-length histogram horizontally using stdout.
    ///
    /// Requires the `stats` and `std` features.
    #[cfg(all(any(test, feature = "stats"), feature = "std"))]
    pub fn print_chain_histogram(&self) {
        let hist = self.chain_histogram();
        let max = *hist.iter().max().unwrap_or(&0);
        if max == 0 {
            println!("chain histogram: empty");
            return;
        }

        let max_bar = 60usize;
        println!(
            "chain histogram ({} entries, {} buckets):",
            self.populated,
            self.capacity()
        );
        for (len, &count) in hist.iter().enumerate() {
            let width = (count * max_bar).div_ceil(max);
            println!("{:>3} | {} ({})", len, "█".repeat(width), count);
        }
    }
}

/// A view into a single entry in the hash table, which may be vacant or
/// occupied.
///
/// This enum is constructed from the [`entry`] method on [`HashTable`].
///
/// [`entry`]: HashTable::entry
pub enum Entry<'a, V> {
    /// A vacant entry - no value matched the predicate
    Vacant(VacantEntry<'a, V>),
    /// An occupied entry - a value matched the predicate
    Occupied(OccupiedEntry<'a, V>),
}

impl<'a, V> Entry<'a, V> {
    /// Inserts `default` if the entry is vacant and returns a mutable
    /// reference to the value in the entry.
    pub fn or_insert(self, default: V) -> &'a mut V {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(default),
        }
    }

    /// Inserts the result of `default` if the entry is vacant and returns a
    /// mutable reference to the value in the entry.
    pub fn or_insert_with(self, default: impl FnOnce() -> V) -> &'a mut V {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(default()),
        }
    }

    /// Provides in-place mutable access to an occupied entry before any
    /// potential inserts.
    pub fn and_modify(self, f: impl FnOnce(&mut V)) -> Self {
        match self {
            Entry::Occupied(mut entry) => {
                f(entry.get_mut());
                Entry::Occupied(entry)
            }
            Entry::Vacant(entry) => Entry::Vacant(entry),
        }
    }

    /// Inserts the default value if the entry is vacant and returns a mutable
    /// reference to the value in the entry.
    pub fn or_default(self) -> &'a mut V
    where
        V: Default,
    {
        self.or_insert_with(V::default)
    }
}

/// A view into a vacant entry in a [`HashTable`].
pub struct VacantEntry<'a, V> {
    table: &'a mut HashTable<V>,
    hash: u64,
}

impl<'a, V> VacantEntry<'a, V> {
    /// Returns the hash this entry was looked up with.
    pub fn hash(&self) -> u64 {
        self.hash
    }

    /// Inserts a value into the table and returns a mutable reference to it.
    ///
    /// The insertion runs the resize check, which may grow or shrink the
    /// table.
    pub fn insert(self, value: V) -> &'a mut V {
        self.table.insert_unique(self.hash, value)
    }
}

/// A view into an occupied entry in a [`HashTable`].
pub struct OccupiedEntry<'a, V> {
    table: &'a mut HashTable<V>,
    bucket_index: usize,
    position: usize,
}

impl<'a, V> OccupiedEntry<'a, V> {
    /// Returns the index of the bucket holding this entry.
    pub fn bucket_index(&self) -> usize {
        self.bucket_index
    }

    /// Gets a reference to the value in the entry.
    pub fn get(&self) -> &V {
        &self.table.buckets[self.bucket_index][self.position].value
    }

    /// Gets a mutable reference to the value in the entry.
    pub fn get_mut(&mut self) -> &mut V {
        &mut self.table.buckets[self.bucket_index][self.position].value
    }

    /// Converts the entry into a mutable reference to the value, bound to
    /// the lifetime of the table borrow.
    pub fn into_mut(self) -> &'a mut V {
        &mut self.table.buckets[self.bucket_index][self.position].value
    }

    /// Removes the value from the table and returns it.
    ///
    /// The removal runs the resize check, which may shrink the table.
    pub fn remove(self) -> V {
        self.table.remove_at(self.bucket_index, self.position)
    }
}

/// An iterator over the values in a [`HashTable`].
///
/// The iterator is a cursor `(bucket_index, position)` over the bucket
/// array. It starts at the first value of the first non-empty bucket and
/// ends at the sentinel `(capacity, 0)`.
///
/// Any mutation of the table (insertion or removal, and therefore any
/// resize) invalidates the cursor. The iterator holds a shared borrow of the
/// table, so such mutations are rejected at compile time for as long as the
/// iterator is alive.
///
/// Two iterators compare equal when they walk the same table and sit at
/// the same cursor position.
pub struct Iter<'a, V> {
    table: &'a HashTable<V>,
    bucket_index: usize,
    position: usize,
    remaining: usize,
}

impl<'a, V> Iter<'a, V> {
    fn new(table: &'a HashTable<V>) -> Self {
        let mut iter = Self {
            table,
            bucket_index: 0,
            position: 0,
            remaining: table.populated,
        };
        iter.bucket_index = iter.next_occupied(0);
        iter
    }

    fn next_occupied(&self, from: usize) -> usize {
        self.table.buckets[from..]
            .iter()
            .position(|bucket| !bucket.is_empty())
            .map_or(self.table.capacity(), |offset| from + offset)
    }

    fn advance(&mut self) {
        if self.position + 1 < self.table.buckets[self.bucket_index].len() {
            self.position += 1;
        } else {
            self.position = 0;
            self.bucket_index = self.next_occupied(self.bucket_index + 1);
        }
    }

    /// Returns the cursor as `(bucket_index, position_in_bucket)`.
    ///
    /// An exhausted iterator reports `(capacity, 0)`.
    pub fn position(&self) -> (usize, usize) {
        (self.bucket_index, self.position)
    }

    /// Returns `true` once the cursor has reached the end sentinel.
    pub fn is_end(&self) -> bool {
        self.bucket_index == self.table.capacity()
    }

    /// Returns the value under the cursor without advancing.
    pub fn current(&self) -> Option<&'a V> {
        self.table
            .buckets
            .get(self.bucket_index)
            .and_then(|bucket| bucket.get(self.position))
            .map(|slot| &slot.value)
    }
}

impl<V> Clone for Iter<'_, V> {
    fn clone(&self) -> Self {
        Self {
            table: self.table,
            bucket_index: self.bucket_index,
            position: self.position,
            remaining: self.remaining,
        }
    }
}

impl<V> PartialEq for Iter<'_, V> {
    fn eq(&self, other: &Self) -> bool {
        core::ptr::eq(self.table, other.table)
            && self.bucket_index == other.bucket_index
            && self.position == other.position
    }
}

impl<V> Eq for Iter<'_, V> {}

impl<V> Debug for Iter<'_, V> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Iter")
            .field("bucket_index", &self.bucket_index)
            .field("position", &self.position)
            .field("remaining", &self.remaining)
            .finish()
    }
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        let value = self.current()?;
        self.advance();
        self.remaining -= 1;
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V> ExactSizeIterator for Iter<'_, V> {}

impl<V> FusedIterator for Iter<'_, V> {}

/// A mutable iterator over the values in a [`HashTable`].
pub struct IterMut<'a, V> {
    inner: core::iter::Flatten<core::slice::IterMut<'a, Bucket<V>>>,
    remaining: usize,
}

impl<'a, V> Iterator for IterMut<'a, V> {
    type Item = &'a mut V;

    fn next(&mut self) -> Option<Self::Item> {
        let slot = self.inner.next()?;
        self.remaining -= 1;
        Some(&mut slot.value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V> ExactSizeIterator for IterMut<'_, V> {}

impl<V> FusedIterator for IterMut<'_, V> {}

/// A draining iterator over the values in a [`HashTable`].
///
/// This struct is created by the [`drain`] method on [`HashTable`]. It
/// yields owned values; dropping it removes whatever was not yielded.
///
/// [`drain`]: HashTable::drain
pub struct Drain<'a, V> {
    table: &'a mut HashTable<V>,
    bucket_index: usize,
}

impl<V> Drop for Drain<'_, V> {
    fn drop(&mut self) {
        for _ in &mut *self {}
    }
}

impl<'a, V> Iterator for Drain<'a, V> {
    type Item = V;

    fn next(&mut self) -> Option<Self::Item> {
        while self.bucket_index < self.table.capacity() {
            if let Some(slot) = self.table.buckets[self.bucket_index].pop() {
                self.table.populated -= 1;
                return Some(slot.value);
            }
            self.bucket_index += 1;
        }

        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.table.populated, Some(self.table.populated))
    }
}

impl<V> ExactSizeIterator for Drain<'_, V> {}

impl<V> FusedIterator for Drain<'_, V> {}

/// An owning iterator over the values of a [`HashTable`].
pub struct IntoIter<V> {
    inner: core::iter::Flatten<alloc::vec::IntoIter<Bucket<V>>>,
    remaining: usize,
}

impl<V> Iterator for IntoIter<V> {
    type Item = V;

    fn next(&mut self) -> Option<Self::Item> {
        let slot = self.inner.next()?;
        self.remaining -= 1;
        Some(slot.value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V> ExactSizeIterator for IntoIter<V> {}

impl<V> FusedIterator for IntoIter<V> {}

impl<V> IntoIterator for HashTable<V> {
    type Item = V;
    type IntoIter = IntoIter<V>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            remaining: self.populated,
            inner: self.buckets.into_iter().flatten(),
        }
    }
}

impl<'a, V> IntoIterator for &'a HashTable<V> {
    type Item = &'a V;
    type IntoIter = Iter<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
