//! Map contracts shared by the hash table, the bucket list and the AVL tree.

use crate::data_structures::cursor::Cursor;
use crate::data_structures::entry::Entry;
use crate::error::Result;

// ============================================================================
// Map
// ============================================================================

/// Key/value dictionary with unique keys.
///
/// Absent keys are reported as `None`, never as errors. The traversal order of
/// [`Map::entries`] is implementation defined: the hash table walks its
/// buckets, the AVL tree walks keys in ascending order.
///
pub trait Map<K, V> {
    /// Cursor over the map entries.
    type Entries<'a>: Cursor<Item = &'a Entry<K, V>>
    where
        Self: 'a,
        K: 'a,
        V: 'a;

    fn get(&self, key: &K) -> Option<&V>;

    fn get_mut(&mut self, key: &K) -> Option<&mut V>;

    /// Associates `value` with `key`.
    ///
    /// Returns the value previously stored under `key`, or `None` if the key
    /// is new. Replacing a value never changes the size of the map.
    ///
    fn put(&mut self, key: K, value: V) -> Option<V>;

    /// Removes `key`, returning its value if it was present.
    fn remove(&mut self, key: &K) -> Option<V>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn contains_key(&self, key: &K) -> bool {
        self.get(key).is_some()
    }

    fn entries(&self) -> Self::Entries<'_>;

    fn keys(&self) -> KeysCursor<Self::Entries<'_>> {
        KeysCursor::new(self.entries())
    }

    fn values(&self) -> ValuesCursor<Self::Entries<'_>> {
        ValuesCursor::new(self.entries())
    }
}

// ============================================================================
// SortedMap
// ============================================================================

/// A [`Map`] whose keys are kept in ascending order.
///
pub trait SortedMap<K: Ord, V>: Map<K, V> {
    /// Entry with the smallest key; `EmptyStructure` on an empty map.
    fn min_entry(&self) -> Result<&Entry<K, V>>;

    /// Entry with the largest key; `EmptyStructure` on an empty map.
    fn max_entry(&self) -> Result<&Entry<K, V>>;
}

// ============================================================================
// Key / value projections
// ============================================================================

/// Projects an entry cursor onto its keys.
pub struct KeysCursor<C> {
    entries: C,
}

impl<C> KeysCursor<C> {
    pub fn new(entries: C) -> Self {
        Self { entries }
    }
}

impl<'a, K: 'a, V: 'a, C> Iterator for KeysCursor<C>
where
    C: Iterator<Item = &'a Entry<K, V>>,
{
    type Item = &'a K;

    fn next(&mut self) -> Option<&'a K> {
        self.entries.next().map(Entry::key)
    }
}

impl<'a, K: 'a, V: 'a, C> Cursor for KeysCursor<C>
where
    C: Cursor<Item = &'a Entry<K, V>>,
{
    fn has_next(&self) -> bool {
        self.entries.has_next()
    }

    fn rewind(&mut self) {
        self.entries.rewind();
    }
}

/// Projects an entry cursor onto its values.
pub struct ValuesCursor<C> {
    entries: C,
}

impl<C> ValuesCursor<C> {
    pub fn new(entries: C) -> Self {
        Self { entries }
    }
}

impl<'a, K: 'a, V: 'a, C> Iterator for ValuesCursor<C>
where
    C: Iterator<Item = &'a Entry<K, V>>,
{
    type Item = &'a V;

    fn next(&mut self) -> Option<&'a V> {
        self.entries.next().map(Entry::value)
    }
}

impl<'a, K: 'a, V: 'a, C> Cursor for ValuesCursor<C>
where
    C: Cursor<Item = &'a Entry<K, V>>,
{
    fn has_next(&self) -> bool {
        self.entries.has_next()
    }

    fn rewind(&mut self) {
        self.entries.rewind();
    }
}
