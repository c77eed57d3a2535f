use crate::data_structures::cursor::Cursor;
use crate::data_structures::entry::Entry;
use crate::data_structures::map::Map;

struct SinglyNode<K, V> {
    entry: Entry<K, V>,
    next: Option<Box<SinglyNode<K, V>>>,
}

/// Unordered map stored as a singly linked list of entries.
///
/// Used as the bucket type of [`super::SepChainHashTable`]. New keys are
/// prepended; putting an existing key replaces its value in place, so the
/// bucket never holds a key twice. Every operation is a linear scan.
///
pub struct MapSinglyList<K, V> {
    head: Option<Box<SinglyNode<K, V>>>,
    size: usize,
}

impl<K, V> MapSinglyList<K, V> {
    pub fn new() -> Self {
        Self {
            head: None,
            size: 0,
        }
    }

    /// Prepends an entry whose key is known to be absent.
    pub(crate) fn push_absent(&mut self, entry: Entry<K, V>) {
        let next = self.head.take();
        self.head = Some(Box::new(SinglyNode { entry, next }));
        self.size += 1;
    }

    pub(crate) fn cursor(&self) -> SinglyCursor<'_, K, V> {
        SinglyCursor {
            head: self.head.as_deref(),
            current: self.head.as_deref(),
        }
    }

    /// Unlinks and returns the first entry.
    pub(crate) fn pop_front(&mut self) -> Option<Entry<K, V>> {
        let node = self.head.take()?;
        self.head = node.next;
        self.size -= 1;
        Some(node.entry)
    }
}

impl<K: PartialEq, V> MapSinglyList<K, V> {
    fn find(&self, key: &K) -> Option<&SinglyNode<K, V>> {
        let mut current = self.head.as_deref();
        while let Some(node) = current {
            if node.entry.key == *key {
                return Some(node);
            }
            current = node.next.as_deref();
        }
        None
    }

    fn find_mut(&mut self, key: &K) -> Option<&mut SinglyNode<K, V>> {
        let mut current = self.head.as_deref_mut();
        while let Some(node) = current {
            if node.entry.key == *key {
                return Some(node);
            }
            current = node.next.as_deref_mut();
        }
        None
    }
}

impl<K, V> Default for MapSinglyList<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> Drop for MapSinglyList<K, V> {
    // Unlink iteratively; the default recursive drop can overflow on long buckets.
    fn drop(&mut self) {
        let mut current = self.head.take();
        while let Some(mut node) = current {
            current = node.next.take();
        }
    }
}

impl<K: PartialEq, V> Map<K, V> for MapSinglyList<K, V> {
    type Entries<'a>
        = SinglyCursor<'a, K, V>
    where
        Self: 'a,
        K: 'a,
        V: 'a;

    fn get(&self, key: &K) -> Option<&V> {
        self.find(key).map(|node| &node.entry.value)
    }

    fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        self.find_mut(key).map(|node| &mut node.entry.value)
    }

    fn put(&mut self, key: K, value: V) -> Option<V> {
        if let Some(node) = self.find_mut(&key) {
            return Some(std::mem::replace(&mut node.entry.value, value));
        }
        self.push_absent(Entry::new(key, value));
        None
    }

    fn remove(&mut self, key: &K) -> Option<V> {
        let mut link = &mut self.head;
        while link.as_ref().is_some_and(|node| node.entry.key != *key) {
            link = &mut link.as_mut()?.next;
        }
        let node = link.take()?;
        *link = node.next;
        self.size -= 1;
        Some(node.entry.value)
    }

    fn len(&self) -> usize {
        self.size
    }

    fn entries(&self) -> SinglyCursor<'_, K, V> {
        self.cursor()
    }
}

/// Cursor over the entries of a [`MapSinglyList`], most recent key first.
pub struct SinglyCursor<'a, K, V> {
    head: Option<&'a SinglyNode<K, V>>,
    current: Option<&'a SinglyNode<K, V>>,
}

impl<'a, K, V> Iterator for SinglyCursor<'a, K, V> {
    type Item = &'a Entry<K, V>;

    fn next(&mut self) -> Option<&'a Entry<K, V>> {
        let node = self.current?;
        self.current = node.next.as_deref();
        Some(&node.entry)
    }
}

impl<K, V> Cursor for SinglyCursor<'_, K, V> {
    fn has_next(&self) -> bool {
        self.current.is_some()
    }

    fn rewind(&mut self) {
        self.current = self.head;
    }
}
