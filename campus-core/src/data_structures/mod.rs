pub mod composite;
pub mod cursor;
pub mod entry;
pub mod hash;
pub mod list;
pub mod map;
pub mod sorted;
