pub mod avl_sorted_map;

pub use avl_sorted_map::{AvlSortedMap, AvlViolation, InOrderCursor};
