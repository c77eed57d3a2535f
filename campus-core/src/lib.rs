pub mod common_tests;
pub mod data_structures;
pub mod error;

// Re-export the containers for convenience
pub use data_structures::composite::{BucketOrder, BucketsCursor, FilterCursor, MappedCursor};
pub use data_structures::cursor::{Cursor, TwoWayCursor};
pub use data_structures::entry::Entry;
pub use data_structures::hash::{MapSinglyList, SepChainHashTable};
pub use data_structures::list::{
    ArrayStack, ListCursor, ListPosition, ListQueue, TwoWayList, TwoWayListCursor,
};
pub use data_structures::map::{KeysCursor, Map, SortedMap, ValuesCursor};
pub use data_structures::sorted::{AvlSortedMap, AvlViolation, InOrderCursor};
pub use error::CollectionError;
