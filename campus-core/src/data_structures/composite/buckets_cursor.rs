use crate::data_structures::cursor::Cursor;
use crate::data_structures::list::{ListCursor, TwoWayList};

/// Direction in which a [`BucketsCursor`] visits its buckets.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BucketOrder {
    /// First bucket to last.
    Natural,
    /// Last bucket to first.
    Reverse,
}

/// Concatenates a fixed array of lists.
///
/// Buckets are visited in [`BucketOrder`]; within a bucket elements come in
/// list order. Empty buckets are skipped without being reported.
///
pub struct BucketsCursor<'a, T> {
    buckets: &'a [TwoWayList<T>],
    order: BucketOrder,
    visited: usize,
    current: ListCursor<'a, T>,
}

impl<'a, T> BucketsCursor<'a, T> {
    pub fn new(buckets: &'a [TwoWayList<T>], order: BucketOrder) -> Self {
        let mut cursor = Self {
            buckets,
            order,
            visited: 0,
            current: ListCursor::empty(),
        };
        cursor.seek_non_empty_bucket();
        cursor
    }

    /// A cursor over no buckets.
    pub fn empty() -> Self {
        Self::new(<&[TwoWayList<T>]>::default(), BucketOrder::Natural)
    }

    fn bucket_index(&self, step: usize) -> usize {
        match self.order {
            BucketOrder::Natural => step,
            BucketOrder::Reverse => self.buckets.len() - 1 - step,
        }
    }

    fn seek_non_empty_bucket(&mut self) {
        while !self.current.has_next() && self.visited < self.buckets.len() {
            let index = self.bucket_index(self.visited);
            self.visited += 1;
            self.current = self.buckets[index].iter();
        }
    }
}

impl<'a, T> Iterator for BucketsCursor<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        let item = self.current.next()?;
        self.seek_non_empty_bucket();
        Some(item)
    }
}

impl<T> Cursor for BucketsCursor<'_, T> {
    fn has_next(&self) -> bool {
        self.current.has_next()
    }

    fn rewind(&mut self) {
        self.visited = 0;
        self.current = ListCursor::empty();
        self.seek_non_empty_bucket();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buckets() -> [TwoWayList<&'static str>; 4] {
        [
            ["a1", "a2"].into_iter().collect(),
            TwoWayList::new(),
            ["c1"].into_iter().collect(),
            TwoWayList::new(),
        ]
    }

    #[test]
    fn test_natural_order_skips_empty_buckets() {
        let buckets = buckets();
        let cursor = BucketsCursor::new(&buckets, BucketOrder::Natural);
        assert_eq!(cursor.copied().collect::<Vec<_>>(), vec!["a1", "a2", "c1"]);
    }

    #[test]
    fn test_reverse_order_keeps_list_order_within_bucket() {
        let buckets = buckets();
        let mut cursor = BucketsCursor::new(&buckets, BucketOrder::Reverse);
        assert_eq!(cursor.by_ref().copied().collect::<Vec<_>>(), vec!["c1", "a1", "a2"]);

        cursor.rewind();
        assert!(cursor.has_next());
        assert_eq!(cursor.next(), Some(&"c1"));
    }

    #[test]
    fn test_all_empty() {
        let buckets: [TwoWayList<i32>; 3] = Default::default();
        assert!(!BucketsCursor::new(&buckets, BucketOrder::Reverse).has_next());
        assert!(!BucketsCursor::<i32>::empty().has_next());
    }
}
