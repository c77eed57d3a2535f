#[cfg(test)]
mod cursor_contract_tests {
    use campus_core::common_tests::cursor_contract_tests;
    use campus_core::{
        AvlSortedMap, BucketOrder, BucketsCursor, FilterCursor, Map, MappedCursor,
        SepChainHashTable, TwoWayList,
    };
    use rstest::rstest;

    fn sample_list() -> TwoWayList<i32> {
        [4, 8, 15, 16, 23, 42].into_iter().collect()
    }

    #[rstest]
    #[case::empty(vec![])]
    #[case::single(vec![7])]
    #[case::several(vec![4, 8, 15, 16, 23, 42])]
    fn verify_list_cursors(#[case] values: Vec<i32>) {
        let list: TwoWayList<i32> = values.iter().copied().collect();

        let drained = cursor_contract_tests::test_rewind_idempotent(list.iter());
        assert_eq!(drained.into_iter().copied().collect::<Vec<_>>(), values);

        cursor_contract_tests::test_rewind_idempotent(list.two_way_iter());
        cursor_contract_tests::test_two_way_symmetry(list.two_way_iter());
    }

    #[test]
    fn test_filter_cursor() {
        let list = sample_list();
        let odd = FilterCursor::new(list.iter(), |n| **n % 2 == 1);
        let drained = cursor_contract_tests::test_rewind_idempotent(odd);
        assert_eq!(drained, vec![&15, &23]);
    }

    #[test]
    fn test_buckets_cursor() {
        let buckets: [TwoWayList<i32>; 3] = [sample_list(), TwoWayList::new(), [1, 2].into_iter().collect()];
        for order in [BucketOrder::Natural, BucketOrder::Reverse] {
            let drained = cursor_contract_tests::test_rewind_idempotent(BucketsCursor::new(&buckets, order));
            assert_eq!(drained.len(), 8);
        }
    }

    #[test]
    fn test_mapped_cursor() {
        let list = sample_list();
        let doubled = MappedCursor::new(list.iter(), |n: &i32| n * 2);
        let drained = cursor_contract_tests::test_rewind_idempotent(doubled);
        assert_eq!(drained, vec![8, 16, 30, 32, 46, 84]);
    }

    #[test]
    fn test_map_cursors() {
        let mut table = SepChainHashTable::with_capacity(4);
        let mut tree = AvlSortedMap::new();
        for key in 0..40 {
            table.put(key, key * key);
            tree.put(key, key * key);
        }

        cursor_contract_tests::test_rewind_idempotent(table.entries());
        cursor_contract_tests::test_rewind_idempotent(table.keys());
        let ascending = cursor_contract_tests::test_rewind_idempotent(tree.keys());
        assert_eq!(ascending.into_iter().copied().collect::<Vec<_>>(), (0..40).collect::<Vec<_>>());
        cursor_contract_tests::test_rewind_idempotent(tree.values());
    }
}
