//! Cursors built on top of other cursors or on arrays of lists.

pub mod buckets_cursor;
pub mod filter_cursor;
pub mod mapped_cursor;

pub use buckets_cursor::{BucketOrder, BucketsCursor};
pub use filter_cursor::FilterCursor;
pub use mapped_cursor::MappedCursor;
