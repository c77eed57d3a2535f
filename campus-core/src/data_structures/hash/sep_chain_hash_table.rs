use std::hash::{BuildHasher, Hash};

use rustc_hash::FxBuildHasher;
use tracing::debug;

use crate::data_structures::cursor::Cursor;
use crate::data_structures::entry::Entry;
use crate::data_structures::hash::map_singly_list::{MapSinglyList, SinglyCursor};
use crate::data_structures::map::Map;

/// Bucket count used by [`SepChainHashTable::new`] is derived from this
/// expected number of entries.
///
pub const DEFAULT_CAPACITY: usize = 50;

/// Occupancy targeted when sizing the bucket array.
pub const IDEAL_LOAD_FACTOR: f32 = 0.75;

/// Occupancy at which an insertion of a new key grows the table.
pub const MAX_LOAD_FACTOR: f32 = 0.9;

/// Separate-chaining hash map.
///
/// Keys are hashed with `S` (Fx by default) and reduced modulo a prime bucket
/// count. Each bucket is a [`MapSinglyList`].
///
/// Sizing rules:
/// - `with_capacity(c)` allocates `next_prime(c / IDEAL_LOAD_FACTOR)` buckets
///   and allows `buckets * MAX_LOAD_FACTOR` entries before growing.
/// - Inserting a NEW key while the table holds that many entries rehashes
///   into `next_prime(2 * buckets)` buckets first. Replacing the value of an
///   existing key never rehashes.
/// - Removal never shrinks the table.
///
pub struct SepChainHashTable<K, V, S = FxBuildHasher> {
    table: Vec<MapSinglyList<K, V>>,
    current_size: usize,
    max_size: usize,
    hash_builder: S,
}

impl<K: Hash + Eq, V> SepChainHashTable<K, V, FxBuildHasher> {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_hasher(capacity, FxBuildHasher)
    }
}

impl<K: Hash + Eq, V, S: BuildHasher> SepChainHashTable<K, V, S> {
    pub fn with_capacity_and_hasher(capacity: usize, hash_builder: S) -> Self {
        let buckets = next_prime((capacity as f32 / IDEAL_LOAD_FACTOR) as usize);
        Self {
            table: Self::allocate(buckets),
            current_size: 0,
            max_size: (buckets as f32 * MAX_LOAD_FACTOR) as usize,
            hash_builder,
        }
    }

    /// Number of buckets.
    pub fn capacity(&self) -> usize {
        self.table.len()
    }

    /// Number of entries the table holds before the next new key rehashes it.
    pub fn max_size(&self) -> usize {
        self.max_size
    }

    pub fn load_factor(&self) -> f32 {
        self.current_size as f32 / self.table.len() as f32
    }

    fn is_full(&self) -> bool {
        self.current_size >= self.max_size
    }

    fn bucket_of(&self, key: &K) -> usize {
        (self.hash_builder.hash_one(key) % self.table.len() as u64) as usize
    }

    fn allocate(buckets: usize) -> Vec<MapSinglyList<K, V>> {
        let mut table = Vec::with_capacity(buckets);
        table.resize_with(buckets, MapSinglyList::new);
        table
    }

    /// Moves every entry into a bucket array roughly twice as large.
    fn rehash(&mut self) {
        let old_capacity = self.table.len();
        let new_capacity = next_prime(2 * old_capacity);
        let old_table = std::mem::replace(&mut self.table, Self::allocate(new_capacity));

        for mut bucket in old_table {
            while let Some(entry) = bucket.pop_front() {
                let index = self.bucket_of(&entry.key);
                self.table[index].push_absent(entry);
            }
        }
        self.max_size = (new_capacity as f32 * MAX_LOAD_FACTOR) as usize;

        debug!(
            old_capacity,
            new_capacity,
            size = self.current_size,
            "hash table rehashed"
        );
    }
}

impl<K: Hash + Eq, V> Default for SepChainHashTable<K, V, FxBuildHasher> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Hash + Eq, V, S: BuildHasher> Map<K, V> for SepChainHashTable<K, V, S> {
    type Entries<'a>
        = HashEntries<'a, K, V>
    where
        Self: 'a,
        K: 'a,
        V: 'a;

    fn get(&self, key: &K) -> Option<&V> {
        self.table[self.bucket_of(key)].get(key)
    }

    fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let index = self.bucket_of(key);
        self.table[index].get_mut(key)
    }

    fn put(&mut self, key: K, value: V) -> Option<V> {
        if self.is_full() && !self.contains_key(&key) {
            self.rehash();
        }
        let index = self.bucket_of(&key);
        let previous = self.table[index].put(key, value);
        if previous.is_none() {
            self.current_size += 1;
        }
        previous
    }

    fn remove(&mut self, key: &K) -> Option<V> {
        let index = self.bucket_of(key);
        let removed = self.table[index].remove(key);
        if removed.is_some() {
            self.current_size -= 1;
        }
        removed
    }

    fn len(&self) -> usize {
        self.current_size
    }

    fn entries(&self) -> HashEntries<'_, K, V> {
        HashEntries::new(&self.table)
    }
}

// ============================================================================
// Entry cursor
// ============================================================================

/// Cursor over every entry of a [`SepChainHashTable`], bucket by bucket.
///
/// The order depends on the hash function and the bucket count, so it changes
/// after a rehash.
///
pub struct HashEntries<'a, K, V> {
    table: &'a [MapSinglyList<K, V>],
    bucket: usize,
    current: Option<SinglyCursor<'a, K, V>>,
}

impl<'a, K, V> HashEntries<'a, K, V> {
    fn new(table: &'a [MapSinglyList<K, V>]) -> Self {
        let mut cursor = Self {
            table,
            bucket: 0,
            current: None,
        };
        cursor.seek_non_empty_bucket();
        cursor
    }

    /// Positions `current` on the first non-empty bucket at or after `bucket`.
    fn seek_non_empty_bucket(&mut self) {
        self.current = None;
        while self.bucket < self.table.len() {
            let cursor = self.table[self.bucket].cursor();
            self.bucket += 1;
            if cursor.has_next() {
                self.current = Some(cursor);
                return;
            }
        }
    }
}

impl<'a, K, V> Iterator for HashEntries<'a, K, V> {
    type Item = &'a Entry<K, V>;

    fn next(&mut self) -> Option<&'a Entry<K, V>> {
        let current = self.current.as_mut()?;
        let entry = current.next();
        if !current.has_next() {
            self.seek_non_empty_bucket();
        }
        entry
    }
}

impl<K, V> Cursor for HashEntries<'_, K, V> {
    fn has_next(&self) -> bool {
        self.current.is_some()
    }

    fn rewind(&mut self) {
        self.bucket = 0;
        self.seek_non_empty_bucket();
    }
}

// ============================================================================
// Prime sizing
// ============================================================================

/// Smallest prime greater than or equal to `n`.
///
pub fn next_prime(n: usize) -> usize {
    let mut candidate = n.max(2);
    while !is_prime(candidate) {
        candidate += 1;
    }
    candidate
}

fn is_prime(n: usize) -> bool {
    if n < 2 {
        return false;
    }
    if n % 2 == 0 {
        return n == 2;
    }
    let mut divisor = 3;
    while divisor * divisor <= n {
        if n % divisor == 0 {
            return false;
        }
        divisor += 2;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_prime() {
        assert_eq!(next_prime(0), 2);
        assert_eq!(next_prime(2), 2);
        assert_eq!(next_prime(12), 13);
        assert_eq!(next_prime(26), 29);
        assert_eq!(next_prime(66), 67);
    }

    #[test]
    fn test_with_capacity_sizing() {
        let table: SepChainHashTable<u32, u32> = SepChainHashTable::with_capacity(9);
        assert_eq!(table.capacity(), 13);
        assert_eq!(table.max_size(), 11);

        let table: SepChainHashTable<u32, u32> = SepChainHashTable::new();
        assert_eq!(table.capacity(), 67);
    }

    #[test]
    fn test_replacing_a_key_on_a_full_table_does_not_rehash() {
        let mut table = SepChainHashTable::with_capacity(9);
        for key in 0..11u32 {
            table.put(key, key);
        }
        assert_eq!(table.capacity(), 13);
        assert_eq!(table.put(3, 30), Some(3));
        assert_eq!(table.capacity(), 13);
        assert_eq!(table.len(), 11);
    }

    #[test]
    fn test_entries_skip_empty_buckets() {
        let mut table = SepChainHashTable::with_capacity(100);
        table.put("only", 1);
        let mut entries = table.entries();
        assert!(entries.has_next());
        assert_eq!(entries.next(), Some(&Entry::new("only", 1)));
        assert!(!entries.has_next());
        assert_eq!(entries.next(), None);
    }
}
