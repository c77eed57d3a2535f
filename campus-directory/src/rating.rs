use std::fmt;

use campus_core::{BucketOrder, BucketsCursor, ListCursor, TwoWayList};

/// A rating on the 1..=5 star scale.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Stars(u8);

impl Stars {
    pub const MIN: Stars = Stars(1);
    pub const MAX: Stars = Stars(5);

    /// Number of distinct ratings, and of buckets in a rating index.
    pub const COUNT: usize = 5;

    /// `None` unless `value` is within 1..=5.
    pub const fn new(value: u8) -> Option<Stars> {
        if value >= Self::MIN.0 && value <= Self::MAX.0 {
            Some(Stars(value))
        } else {
            None
        }
    }

    /// Parses a typed-in star count, rejecting anything outside 1..=5.
    pub fn from_input(value: i64) -> Option<Stars> {
        u8::try_from(value).ok().and_then(Stars::new)
    }

    /// Rounded mean of `count` ratings summing to `total`, halves rounding up.
    ///
    /// The result is clamped to the scale; an empty set rates [`Stars::MIN`].
    ///
    pub fn rounded_mean(total: u64, count: u64) -> Stars {
        if count == 0 {
            return Self::MIN;
        }
        let rounded = (2 * total + count) / (2 * count);
        Stars(rounded.clamp(u64::from(Self::MIN.0), u64::from(Self::MAX.0)) as u8)
    }

    pub fn value(self) -> u8 {
        self.0
    }

    fn bucket(self) -> usize {
        usize::from(self.0 - 1)
    }
}

impl fmt::Display for Stars {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// RatingBuckets - one insertion-ordered list per star value
// ============================================================================

/// Entities partitioned by rating, each bucket in insertion order.
///
pub(crate) struct RatingBuckets<S> {
    buckets: [TwoWayList<S>; Stars::COUNT],
}

impl<S: PartialEq> RatingBuckets<S> {
    pub(crate) fn new() -> Self {
        Self {
            buckets: std::array::from_fn(|_| TwoWayList::new()),
        }
    }

    pub(crate) fn insert(&mut self, entity: S, stars: Stars) {
        self.buckets[stars.bucket()].add_last(entity);
    }

    /// Inserts `entity` ahead of the first bucket member ranked after it, so
    /// the bucket stays ordered by `rank`.
    ///
    pub(crate) fn insert_ranked<F>(&mut self, entity: S, stars: Stars, rank: F)
    where
        F: Fn(&S) -> u64,
    {
        let bucket = &mut self.buckets[stars.bucket()];
        let own = rank(&entity);
        match bucket.find_position(|member| rank(member) > own) {
            Some(successor) => bucket.add_before(successor, entity),
            None => bucket.add_last(entity),
        };
    }

    /// Removes `entity` from the `stars` bucket by a linear scan.
    pub(crate) fn remove(&mut self, entity: &S, stars: Stars) -> Option<S> {
        let bucket = &mut self.buckets[stars.bucket()];
        let position = bucket.find_position(|candidate| candidate == entity)?;
        bucket.remove_at(position)
    }

    pub(crate) fn with_stars(&self, stars: Stars) -> ListCursor<'_, S> {
        self.buckets[stars.bucket()].iter()
    }

    /// Highest rating first; insertion order within a rating.
    pub(crate) fn descending(&self) -> BucketsCursor<'_, S> {
        BucketsCursor::new(&self.buckets, BucketOrder::Reverse)
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.buckets.iter().all(TwoWayList::is_empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::exact(20, 5, 4)]
    #[case::half_rounds_up(7, 2, 4)]
    #[case::below_half_rounds_down(13, 4, 3)]
    #[case::single_review(4, 1, 4)]
    #[case::all_ones(3, 3, 1)]
    fn verify_rounded_mean(#[case] total: u64, #[case] count: u64, #[case] expected: u8) {
        assert_eq!(Stars::rounded_mean(total, count).value(), expected);
    }

    #[test]
    fn test_scale_bounds() {
        assert!(Stars::new(0).is_none());
        assert!(Stars::new(6).is_none());
        assert_eq!(Stars::from_input(-1), None);
        assert_eq!(Stars::from_input(3), Stars::new(3));
        assert_eq!(Stars::rounded_mean(0, 0), Stars::MIN);
    }

    #[test]
    fn test_buckets_descend_and_keep_insertion_order() {
        let mut buckets = RatingBuckets::new();
        buckets.insert("a", Stars::MIN);
        buckets.insert("b", Stars::MAX);
        buckets.insert("c", Stars::MIN);
        let order: Vec<_> = buckets.descending().copied().collect();
        assert_eq!(order, vec!["b", "a", "c"]);

        assert_eq!(buckets.remove(&"a", Stars::MIN), Some("a"));
        assert_eq!(buckets.remove(&"a", Stars::MIN), None);
        assert_eq!(buckets.with_stars(Stars::MIN).copied().collect::<Vec<_>>(), vec!["c"]);
        assert!(!buckets.is_empty());
    }

    #[test]
    fn test_ranked_insert_lands_between_neighbours() {
        let rank = |name: &&str| match *name {
            "a" => 0,
            "b" => 1,
            "c" => 2,
            _ => 3,
        };
        let mut buckets = RatingBuckets::new();
        buckets.insert("a", Stars::MAX);
        buckets.insert("c", Stars::MAX);
        buckets.insert_ranked("b", Stars::MAX, rank);
        buckets.insert_ranked("d", Stars::MAX, rank);
        let order: Vec<_> = buckets.with_stars(Stars::MAX).copied().collect();
        assert_eq!(order, vec!["a", "b", "c", "d"]);

        buckets.insert_ranked("a", Stars::MIN, rank);
        assert_eq!(buckets.with_stars(Stars::MIN).copied().collect::<Vec<_>>(), vec!["a"]);
    }
}
