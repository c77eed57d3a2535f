use std::cmp::Ordering;

use thiserror::Error;

use crate::data_structures::cursor::Cursor;
use crate::data_structures::entry::Entry;
use crate::data_structures::list::{ArrayStack, ListQueue};
use crate::data_structures::map::{Map, SortedMap};
use crate::error::{CollectionError, Result};

type Link<K, V> = Option<Box<AvlNode<K, V>>>;

/// Height of an absent subtree. A leaf has height 0.
const EMPTY_HEIGHT: i32 = -1;

// ============================================================================
// AvlNode - internal tree node
// ============================================================================

struct AvlNode<K, V> {
    entry: Entry<K, V>,
    height: i32,
    left: Link<K, V>,
    right: Link<K, V>,
}

impl<K, V> AvlNode<K, V> {
    fn leaf(key: K, value: V) -> Box<Self> {
        Box::new(Self {
            entry: Entry::new(key, value),
            height: 0,
            left: None,
            right: None,
        })
    }

    fn update_height(&mut self) {
        self.height = 1 + height_of(&self.left).max(height_of(&self.right));
    }

    /// Left height minus right height.
    fn balance_factor(&self) -> i32 {
        height_of(&self.left) - height_of(&self.right)
    }
}

fn height_of<K, V>(link: &Link<K, V>) -> i32 {
    link.as_ref().map_or(EMPTY_HEIGHT, |node| node.height)
}

/// Invariant breach found by [`AvlSortedMap::validate`].
///
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum AvlViolation {
    #[error("subtree heights differ by {balance}")]
    Unbalanced { balance: i32 },

    #[error("cached height {cached} does not match computed height {computed}")]
    StaleHeight { cached: i32, computed: i32 },

    #[error("keys are not in strictly ascending order")]
    OutOfOrder,

    #[error("size counter {recorded} does not match node count {counted}")]
    SizeMismatch { recorded: usize, counted: usize },
}

// ============================================================================
// AvlSortedMap
// ============================================================================

/// Ordered map backed by an AVL tree.
///
/// Nodes cache their height and own their children through `Box`; there are
/// no parent pointers. Insertions and removals recurse down to the affected
/// node and rebalance every ancestor on the way back up, so after each
/// operation every node's subtree heights differ by at most one.
///
/// [`Map::entries`] yields entries in ascending key order.
///
pub struct AvlSortedMap<K, V> {
    root: Link<K, V>,
    current_size: usize,
}

impl<K: Ord, V> AvlSortedMap<K, V> {
    pub fn new() -> Self {
        Self {
            root: None,
            current_size: 0,
        }
    }

    /// Height of the tree in edges; -1 when empty.
    pub fn height(&self) -> i32 {
        height_of(&self.root)
    }

    /// Checks the structural invariants breadth first.
    ///
    /// Every cached height must follow from its children's cached heights
    /// (leaves up, this proves them all correct). Also verifies every node is balanced,
    /// keys ascend in order and the size counter matches the node count.
    ///
    pub fn validate(&self) -> std::result::Result<(), AvlViolation> {
        let mut queue = ListQueue::new();
        if let Some(root) = self.root.as_deref() {
            queue.enqueue(root);
        }

        let mut counted = 0;
        while let Ok(node) = queue.dequeue() {
            counted += 1;
            let computed = 1 + height_of(&node.left).max(height_of(&node.right));
            if computed != node.height {
                return Err(AvlViolation::StaleHeight {
                    cached: node.height,
                    computed,
                });
            }
            let balance = node.balance_factor();
            if balance.abs() > 1 {
                return Err(AvlViolation::Unbalanced { balance });
            }
            for child in [node.left.as_deref(), node.right.as_deref()].into_iter().flatten() {
                queue.enqueue(child);
            }
        }

        if counted != self.current_size {
            return Err(AvlViolation::SizeMismatch {
                recorded: self.current_size,
                counted,
            });
        }

        let mut entries = self.entries();
        let mut previous = entries.next();
        for entry in entries {
            if previous.is_some_and(|prev| prev.key >= entry.key) {
                return Err(AvlViolation::OutOfOrder);
            }
            previous = Some(entry);
        }
        Ok(())
    }

    // ========================================================================
    // Recursive helpers
    // ========================================================================

    fn insert_rec(link: Link<K, V>, key: K, value: V, previous: &mut Option<V>) -> Box<AvlNode<K, V>> {
        let Some(mut node) = link else {
            return AvlNode::leaf(key, value);
        };
        match key.cmp(&node.entry.key) {
            Ordering::Equal => {
                *previous = Some(std::mem::replace(&mut node.entry.value, value));
                node
            }
            Ordering::Less => {
                node.left = Some(Self::insert_rec(node.left.take(), key, value, previous));
                rebalance(node)
            }
            Ordering::Greater => {
                node.right = Some(Self::insert_rec(node.right.take(), key, value, previous));
                rebalance(node)
            }
        }
    }

    fn remove_rec(link: Link<K, V>, key: &K, removed: &mut Option<V>) -> Link<K, V> {
        let mut node = link?;
        match key.cmp(&node.entry.key) {
            Ordering::Less => {
                node.left = Self::remove_rec(node.left.take(), key, removed);
                Some(rebalance(node))
            }
            Ordering::Greater => {
                node.right = Self::remove_rec(node.right.take(), key, removed);
                Some(rebalance(node))
            }
            Ordering::Equal => {
                let AvlNode {
                    entry, left, right, ..
                } = *node;
                *removed = Some(entry.value);
                match (left, right) {
                    (None, right) => right,
                    (left, None) => left,
                    (Some(left), Some(right)) => {
                        // Two children: the in-order successor takes this slot.
                        //
                        let (mut successor, rest) = detach_min(right);
                        successor.left = Some(left);
                        successor.right = rest;
                        Some(rebalance(successor))
                    }
                }
            }
        }
    }
}

/// Removes the minimum node of `node`'s subtree.
///
/// Returns the detached node (children cleared) and the rebalanced remainder.
///
fn detach_min<K, V>(mut node: Box<AvlNode<K, V>>) -> (Box<AvlNode<K, V>>, Link<K, V>) {
    match node.left.take() {
        None => {
            let rest = node.right.take();
            (node, rest)
        }
        Some(left) => {
            let (min, rest) = detach_min(left);
            node.left = rest;
            (min, Some(rebalance(node)))
        }
    }
}

fn rotate_left<K, V>(mut node: Box<AvlNode<K, V>>) -> Box<AvlNode<K, V>> {
    let Some(mut pivot) = node.right.take() else {
        return node;
    };
    node.right = pivot.left.take();
    node.update_height();
    pivot.left = Some(node);
    pivot.update_height();
    pivot
}

fn rotate_right<K, V>(mut node: Box<AvlNode<K, V>>) -> Box<AvlNode<K, V>> {
    let Some(mut pivot) = node.left.take() else {
        return node;
    };
    node.left = pivot.right.take();
    node.update_height();
    pivot.right = Some(node);
    pivot.update_height();
    pivot
}

/// Refreshes `node`'s height and restores balance with at most two rotations.
///
fn rebalance<K, V>(mut node: Box<AvlNode<K, V>>) -> Box<AvlNode<K, V>> {
    node.update_height();
    let balance = node.balance_factor();

    if balance > 1 {
        // Left heavy; a right-leaning left child needs the double rotation.
        //
        if node.left.as_ref().is_some_and(|left| left.balance_factor() < 0) {
            node.left = node.left.take().map(rotate_left);
        }
        return rotate_right(node);
    }
    if balance < -1 {
        if node.right.as_ref().is_some_and(|right| right.balance_factor() > 0) {
            node.right = node.right.take().map(rotate_right);
        }
        return rotate_left(node);
    }
    node
}

impl<K: Ord, V> Default for AvlSortedMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord, V> Map<K, V> for AvlSortedMap<K, V> {
    type Entries<'a>
        = InOrderCursor<'a, K, V>
    where
        Self: 'a,
        K: 'a,
        V: 'a;

    fn get(&self, key: &K) -> Option<&V> {
        let mut current = self.root.as_deref();
        while let Some(node) = current {
            current = match key.cmp(&node.entry.key) {
                Ordering::Equal => return Some(&node.entry.value),
                Ordering::Less => node.left.as_deref(),
                Ordering::Greater => node.right.as_deref(),
            };
        }
        None
    }

    fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let mut current = self.root.as_deref_mut();
        while let Some(node) = current {
            current = match key.cmp(&node.entry.key) {
                Ordering::Equal => return Some(&mut node.entry.value),
                Ordering::Less => node.left.as_deref_mut(),
                Ordering::Greater => node.right.as_deref_mut(),
            };
        }
        None
    }

    fn put(&mut self, key: K, value: V) -> Option<V> {
        let mut previous = None;
        self.root = Some(Self::insert_rec(self.root.take(), key, value, &mut previous));
        if previous.is_none() {
            self.current_size += 1;
        }
        previous
    }

    fn remove(&mut self, key: &K) -> Option<V> {
        let mut removed = None;
        self.root = Self::remove_rec(self.root.take(), key, &mut removed);
        if removed.is_some() {
            self.current_size -= 1;
        }
        removed
    }

    fn len(&self) -> usize {
        self.current_size
    }

    fn entries(&self) -> InOrderCursor<'_, K, V> {
        InOrderCursor::new(self.root.as_deref(), self.height())
    }
}

impl<K: Ord, V> SortedMap<K, V> for AvlSortedMap<K, V> {
    fn min_entry(&self) -> Result<&Entry<K, V>> {
        let mut node = self.root.as_deref().ok_or(CollectionError::EmptyStructure)?;
        while let Some(left) = node.left.as_deref() {
            node = left;
        }
        Ok(&node.entry)
    }

    fn max_entry(&self) -> Result<&Entry<K, V>> {
        let mut node = self.root.as_deref().ok_or(CollectionError::EmptyStructure)?;
        while let Some(right) = node.right.as_deref() {
            node = right;
        }
        Ok(&node.entry)
    }
}

// ============================================================================
// In-order cursor
// ============================================================================

/// Ascending-key cursor over an [`AvlSortedMap`].
///
/// Keeps the pending left spine on an [`ArrayStack`] sized to the tree
/// height, which bounds the path from the root to any node.
///
pub struct InOrderCursor<'a, K, V> {
    root: Option<&'a AvlNode<K, V>>,
    stack: ArrayStack<&'a AvlNode<K, V>>,
}

impl<'a, K, V> InOrderCursor<'a, K, V> {
    fn new(root: Option<&'a AvlNode<K, V>>, height: i32) -> Self {
        let capacity = usize::try_from(height + 1).unwrap_or(0);
        let mut cursor = Self {
            root,
            stack: ArrayStack::with_capacity(capacity),
        };
        cursor.push_left_spine(root);
        cursor
    }

    /// A cursor that yields nothing.
    pub fn empty() -> Self {
        Self::new(None, EMPTY_HEIGHT)
    }

    fn push_left_spine(&mut self, mut current: Option<&'a AvlNode<K, V>>) {
        while let Some(node) = current {
            // A root-to-leaf path never exceeds height + 1 nodes.
            //
            let pushed = self.stack.push(node);
            debug_assert!(pushed.is_ok(), "in-order stack overflow");
            if pushed.is_err() {
                return;
            }
            current = node.left.as_deref();
        }
    }
}

impl<'a, K, V> Iterator for InOrderCursor<'a, K, V> {
    type Item = &'a Entry<K, V>;

    fn next(&mut self) -> Option<&'a Entry<K, V>> {
        let node = self.stack.pop().ok()?;
        self.push_left_spine(node.right.as_deref());
        Some(&node.entry)
    }
}

impl<K, V> Cursor for InOrderCursor<'_, K, V> {
    fn has_next(&self) -> bool {
        !self.stack.is_empty()
    }

    fn rewind(&mut self) {
        self.stack.clear();
        self.push_left_spine(self.root);
    }
}
