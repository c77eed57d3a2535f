use std::fmt;

use slab::Slab;

use crate::data_structures::cursor::{Cursor, TwoWayCursor};
use crate::error::{CollectionError, Result};

/// Handle to an element stored in a [`TwoWayList`].
///
/// Returned by [`TwoWayList::add_first`], [`TwoWayList::add_last`] and
/// [`TwoWayList::add`]; it lets the owner unlink that element in O(1) with
/// [`TwoWayList::remove_at`].
///
/// A position stays valid until its element is removed. Passing a position
/// after its element was removed, or a position obtained from another list,
/// is a caller bug: the slot may have been reused for a different element.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListPosition(usize);

#[derive(Debug, Clone)]
struct ListNode<T> {
    element: T,
    prev: Option<usize>,
    next: Option<usize>,
}

/// Doubly linked list with O(1) insertion and removal at both ends.
///
/// Nodes live in a [`Slab`] arena and link to each other by slot index, so a
/// [`ListPosition`] is a plain index and unlinking it needs no traversal.
/// Indexed access walks from whichever end is nearer.
///
#[derive(Clone)]
pub struct TwoWayList<T> {
    nodes: Slab<ListNode<T>>,
    head: Option<usize>,
    tail: Option<usize>,
}

impl<T> TwoWayList<T> {
    pub fn new() -> Self {
        Self {
            nodes: Slab::new(),
            head: None,
            tail: None,
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    // ========================================================================
    // Insertion
    // ========================================================================

    pub fn add_first(&mut self, element: T) -> ListPosition {
        let key = self.nodes.insert(ListNode {
            element,
            prev: None,
            next: self.head,
        });
        match self.head {
            Some(head) => self.nodes[head].prev = Some(key),
            None => self.tail = Some(key),
        }
        self.head = Some(key);
        ListPosition(key)
    }

    pub fn add_last(&mut self, element: T) -> ListPosition {
        let key = self.nodes.insert(ListNode {
            element,
            prev: self.tail,
            next: None,
        });
        match self.tail {
            Some(tail) => self.nodes[tail].next = Some(key),
            None => self.head = Some(key),
        }
        self.tail = Some(key);
        ListPosition(key)
    }

    /// Inserts `element` so that it ends up at `index`.
    ///
    /// Valid indices are `0..=len`; `len` appends.
    ///
    pub fn add(&mut self, index: usize, element: T) -> Result<ListPosition> {
        let len = self.len();
        if index > len {
            return Err(CollectionError::InvalidPosition {
                position: index,
                len,
            });
        }
        if index == 0 {
            return Ok(self.add_first(element));
        }
        if index == len {
            return Ok(self.add_last(element));
        }

        let successor = self.key_at(index);
        Ok(self.link_before(successor, element))
    }

    /// Inserts `element` just ahead of the element behind `position`.
    ///
    /// Appends when `position` is vacant.
    ///
    pub fn add_before(&mut self, position: ListPosition, element: T) -> ListPosition {
        if self.nodes.contains(position.0) {
            self.link_before(position.0, element)
        } else {
            self.add_last(element)
        }
    }

    fn link_before(&mut self, successor: usize, element: T) -> ListPosition {
        let predecessor = self.nodes[successor].prev;
        let key = self.nodes.insert(ListNode {
            element,
            prev: predecessor,
            next: Some(successor),
        });
        self.nodes[successor].prev = Some(key);
        match predecessor {
            Some(predecessor) => self.nodes[predecessor].next = Some(key),
            None => self.head = Some(key),
        }
        ListPosition(key)
    }

    // ========================================================================
    // Access
    // ========================================================================

    pub fn get_first(&self) -> Result<&T> {
        self.head
            .map(|key| &self.nodes[key].element)
            .ok_or(CollectionError::EmptyStructure)
    }

    pub fn get_last(&self) -> Result<&T> {
        self.tail
            .map(|key| &self.nodes[key].element)
            .ok_or(CollectionError::EmptyStructure)
    }

    pub fn get(&self, index: usize) -> Result<&T> {
        self.check_index(index)?;
        Ok(&self.nodes[self.key_at(index)].element)
    }

    /// Element behind `position`, or `None` if that slot is vacant.
    pub fn element_at(&self, position: ListPosition) -> Option<&T> {
        self.nodes.get(position.0).map(|node| &node.element)
    }

    /// Index of the first element satisfying `predicate`.
    pub fn position_of<P>(&self, mut predicate: P) -> Option<usize>
    where
        P: FnMut(&T) -> bool,
    {
        self.iter().position(|element| predicate(element))
    }

    /// Handle of the first element satisfying `predicate`, for a later
    /// O(1) [`TwoWayList::remove_at`].
    ///
    pub fn find_position<P>(&self, mut predicate: P) -> Option<ListPosition>
    where
        P: FnMut(&T) -> bool,
    {
        let mut current = self.head;
        while let Some(key) = current {
            let node = &self.nodes[key];
            if predicate(&node.element) {
                return Some(ListPosition(key));
            }
            current = node.next;
        }
        None
    }

    // ========================================================================
    // Removal
    // ========================================================================

    pub fn remove_first(&mut self) -> Result<T> {
        let head = self.head.ok_or(CollectionError::EmptyStructure)?;
        Ok(self.unlink(head))
    }

    pub fn remove_last(&mut self) -> Result<T> {
        let tail = self.tail.ok_or(CollectionError::EmptyStructure)?;
        Ok(self.unlink(tail))
    }

    pub fn remove(&mut self, index: usize) -> Result<T> {
        self.check_index(index)?;
        let key = self.key_at(index);
        Ok(self.unlink(key))
    }

    /// Unlinks the element behind `position` in O(1).
    ///
    /// Returns `None` if the slot is vacant. See [`ListPosition`] for the
    /// validity rules.
    ///
    pub fn remove_at(&mut self, position: ListPosition) -> Option<T> {
        if !self.nodes.contains(position.0) {
            return None;
        }
        Some(self.unlink(position.0))
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.head = None;
        self.tail = None;
    }

    // ========================================================================
    // Traversal
    // ========================================================================

    pub fn iter(&self) -> ListCursor<'_, T> {
        ListCursor {
            list: Some(self),
            next: self.head,
        }
    }

    pub fn two_way_iter(&self) -> TwoWayListCursor<'_, T> {
        TwoWayListCursor {
            list: self,
            next: self.head,
            prev: None,
        }
    }

    // ========================================================================
    // Internal helpers
    // ========================================================================

    fn check_index(&self, index: usize) -> Result<()> {
        if index < self.len() {
            Ok(())
        } else {
            Err(CollectionError::InvalidPosition {
                position: index,
                len: self.len(),
            })
        }
    }

    /// Slot key of the node at `index`, walking from the nearer end.
    ///
    /// Caller guarantees `index < len`.
    ///
    fn key_at(&self, index: usize) -> usize {
        let len = self.len();
        if index <= len / 2 {
            let mut key = self.head;
            for _ in 0..index {
                key = key.and_then(|k| self.nodes[k].next);
            }
            key.unwrap_or_default()
        } else {
            let mut key = self.tail;
            for _ in index + 1..len {
                key = key.and_then(|k| self.nodes[k].prev);
            }
            key.unwrap_or_default()
        }
    }

    fn unlink(&mut self, key: usize) -> T {
        let node = self.nodes.remove(key);
        match node.prev {
            Some(prev) => self.nodes[prev].next = node.next,
            None => self.head = node.next,
        }
        match node.next {
            Some(next) => self.nodes[next].prev = node.prev,
            None => self.tail = node.prev,
        }
        node.element
    }
}

impl<T: PartialEq> TwoWayList<T> {
    /// Index of the first element equal to `element`.
    pub fn index_of(&self, element: &T) -> Option<usize> {
        self.position_of(|candidate| candidate == element)
    }
}

impl<T> Default for TwoWayList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for TwoWayList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T> FromIterator<T> for TwoWayList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut list = TwoWayList::new();
        list.extend(iter);
        list
    }
}

impl<T> Extend<T> for TwoWayList<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for element in iter {
            self.add_last(element);
        }
    }
}

impl<'a, T> IntoIterator for &'a TwoWayList<T> {
    type Item = &'a T;
    type IntoIter = ListCursor<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// ============================================================================
// Cursors
// ============================================================================

/// Forward cursor over a [`TwoWayList`], head to tail.
///
pub struct ListCursor<'a, T> {
    list: Option<&'a TwoWayList<T>>,
    next: Option<usize>,
}

impl<T> ListCursor<'_, T> {
    /// A cursor that yields nothing, for queries that match no list.
    pub fn empty() -> Self {
        ListCursor {
            list: None,
            next: None,
        }
    }
}

impl<'a, T> Iterator for ListCursor<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        let key = self.next?;
        let node = &self.list?.nodes[key];
        self.next = node.next;
        Some(&node.element)
    }
}

impl<T> Cursor for ListCursor<'_, T> {
    fn has_next(&self) -> bool {
        self.next.is_some()
    }

    fn rewind(&mut self) {
        self.next = self.list.and_then(|list| list.head);
    }
}

/// Bidirectional cursor over a [`TwoWayList`].
///
pub struct TwoWayListCursor<'a, T> {
    list: &'a TwoWayList<T>,
    next: Option<usize>,
    prev: Option<usize>,
}

impl<'a, T> Iterator for TwoWayListCursor<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        let key = self.next?;
        let node = &self.list.nodes[key];
        self.prev = Some(key);
        self.next = node.next;
        Some(&node.element)
    }
}

impl<T> Cursor for TwoWayListCursor<'_, T> {
    fn has_next(&self) -> bool {
        self.next.is_some()
    }

    fn rewind(&mut self) {
        self.next = self.list.head;
        self.prev = None;
    }
}

impl<T> TwoWayCursor for TwoWayListCursor<'_, T> {
    fn has_previous(&self) -> bool {
        self.prev.is_some()
    }

    fn previous(&mut self) -> Option<Self::Item> {
        let key = self.prev?;
        let node = &self.list.nodes[key];
        self.next = Some(key);
        self.prev = node.prev;
        Some(&node.element)
    }

    fn full_forward(&mut self) {
        self.next = None;
        self.prev = self.list.tail;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list_of(values: &[i32]) -> TwoWayList<i32> {
        values.iter().copied().collect()
    }

    fn contents(list: &TwoWayList<i32>) -> Vec<i32> {
        list.iter().copied().collect()
    }

    #[test]
    fn test_add_at_both_ends_and_middle() {
        let mut list = TwoWayList::new();
        list.add_last(2);
        list.add_first(0);
        list.add(1, 1).unwrap();
        list.add(3, 3).unwrap();
        assert_eq!(contents(&list), vec![0, 1, 2, 3]);
        assert_eq!(list.get_first(), Ok(&0));
        assert_eq!(list.get_last(), Ok(&3));
    }

    #[test]
    fn test_add_before_position() {
        let mut list = TwoWayList::new();
        let first = list.add_last(2);
        let last = list.add_last(4);
        list.add_before(first, 1);
        list.add_before(last, 3);
        assert_eq!(contents(&list), vec![1, 2, 3, 4]);
        assert_eq!(list.get_first(), Ok(&1));

        list.remove_at(last);
        list.add_before(last, 5);
        assert_eq!(contents(&list), vec![1, 2, 3, 5]);
        assert_eq!(list.get_last(), Ok(&5));

        let mut backwards = list.two_way_iter();
        backwards.full_forward();
        let reversed: Vec<i32> = std::iter::from_fn(|| backwards.previous()).copied().collect();
        assert_eq!(reversed, vec![5, 3, 2, 1]);
    }

    #[test]
    fn test_add_past_end_is_invalid_position() {
        let mut list = list_of(&[1, 2]);
        assert_eq!(
            list.add(3, 9),
            Err(CollectionError::InvalidPosition { position: 3, len: 2 })
        );
        assert_eq!(contents(&list), vec![1, 2]);
    }

    #[test]
    fn test_get_walks_from_both_ends() {
        let list = list_of(&[10, 11, 12, 13, 14, 15, 16]);
        for index in 0..list.len() {
            assert_eq!(list.get(index), Ok(&(10 + index as i32)));
        }
        assert!(list.get(7).is_err());
    }

    #[test]
    fn test_remove_by_index() {
        let mut list = list_of(&[1, 2, 3, 4, 5]);
        assert_eq!(list.remove(4), Ok(5));
        assert_eq!(list.remove(0), Ok(1));
        assert_eq!(list.remove(1), Ok(3));
        assert_eq!(contents(&list), vec![2, 4]);
        assert_eq!(list.get_last(), Ok(&4));
    }

    #[test]
    fn test_remove_from_empty_list() {
        let mut list: TwoWayList<i32> = TwoWayList::new();
        assert_eq!(list.remove_first(), Err(CollectionError::EmptyStructure));
        assert_eq!(list.remove_last(), Err(CollectionError::EmptyStructure));
        assert_eq!(list.get_first(), Err(CollectionError::EmptyStructure));
        assert!(list.remove(0).is_err());
    }

    #[test]
    fn test_remove_at_position_unlinks_in_place() {
        let mut list = TwoWayList::new();
        list.add_last("a");
        let middle = list.add_last("b");
        list.add_last("c");

        assert_eq!(list.element_at(middle), Some(&"b"));
        assert_eq!(list.remove_at(middle), Some("b"));
        assert_eq!(list.remove_at(middle), None);
        assert_eq!(list.iter().copied().collect::<Vec<_>>(), vec!["a", "c"]);

        let mut backwards = list.two_way_iter();
        backwards.full_forward();
        assert_eq!(backwards.previous(), Some(&"c"));
        assert_eq!(backwards.previous(), Some(&"a"));
        assert_eq!(backwards.previous(), None);
    }

    #[test]
    fn test_index_of_and_find_position() {
        let list = list_of(&[5, 6, 7, 6]);
        assert_eq!(list.index_of(&6), Some(1));
        assert_eq!(list.index_of(&9), None);
        assert_eq!(list.position_of(|e| *e > 6), Some(2));

        let found = list.find_position(|e| *e == 7).unwrap();
        assert_eq!(list.element_at(found), Some(&7));
    }

    #[test]
    fn test_clear_resets_ends() {
        let mut list = list_of(&[1, 2, 3]);
        list.clear();
        assert!(list.is_empty());
        assert!(list.get_first().is_err());
        list.add_last(4);
        assert_eq!(contents(&list), vec![4]);
    }

    #[test]
    fn test_cursor_rewind_restarts_traversal() {
        let list = list_of(&[1, 2, 3]);
        let mut cursor = list.iter();
        assert_eq!(cursor.next(), Some(&1));
        assert_eq!(cursor.next(), Some(&2));
        cursor.rewind();
        assert_eq!(cursor.by_ref().copied().collect::<Vec<_>>(), vec![1, 2, 3]);
        assert!(!cursor.has_next());
        assert_eq!(cursor.try_next(), Err(CollectionError::EndOfIteration));
    }

    #[test]
    fn test_empty_cursor() {
        let mut cursor: ListCursor<'_, i32> = ListCursor::empty();
        assert!(!cursor.has_next());
        cursor.rewind();
        assert_eq!(cursor.next(), None);
    }

    #[test]
    fn test_two_way_cursor_gap_semantics() {
        let list = list_of(&[1, 2, 3]);
        let mut cursor = list.two_way_iter();
        assert!(!cursor.has_previous());
        assert_eq!(cursor.next(), Some(&1));
        assert_eq!(cursor.previous(), Some(&1));
        assert_eq!(cursor.try_previous(), Err(CollectionError::EndOfIteration));

        cursor.full_forward();
        assert!(!cursor.has_next());
        let backwards: Vec<i32> = std::iter::from_fn(|| cursor.previous()).copied().collect();
        assert_eq!(backwards, vec![3, 2, 1]);
    }
}
