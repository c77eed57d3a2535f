//! Contract tests shared by every [`Map`](crate::data_structures::map::Map)
//! and [`Cursor`](crate::data_structures::cursor::Cursor) implementation.
//! Integration tests drive them once per implementation.
