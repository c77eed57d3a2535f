//! Error conditions reported by the containers.
//!
//! Absent keys are never errors: lookups return `Option`. The variants below
//! are precondition violations (a caller bug), returned so that the caller
//! decides how to fail. Nothing in this crate catches or retries them.

use thiserror::Error;

/// A violated container precondition.
///
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum CollectionError {
    /// `try_next`/`try_previous` called on an exhausted cursor.
    #[error("no more elements in the iteration")]
    EndOfIteration,

    /// Peek or removal on an empty list, stack, queue or map.
    #[error("the structure is empty")]
    EmptyStructure,

    /// Indexed access outside `0..len` (or `0..=len` for insertion).
    #[error("position {position} is out of range for length {len}")]
    InvalidPosition { position: usize, len: usize },

    /// Push onto a bounded structure that reached its capacity.
    #[error("the structure is full (capacity {capacity})")]
    FullStructure { capacity: usize },
}

pub type Result<T> = std::result::Result<T, CollectionError>;
