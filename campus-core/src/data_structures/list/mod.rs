pub mod array_stack;
pub mod list_queue;
pub mod two_way_list;

pub use array_stack::ArrayStack;
pub use list_queue::ListQueue;
pub use two_way_list::{ListCursor, ListPosition, TwoWayList, TwoWayListCursor};
