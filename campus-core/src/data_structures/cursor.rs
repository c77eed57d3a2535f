//! Rewindable cursor traits.
//!
//! A cursor is a std [`Iterator`] that also knows whether it has more
//! elements without consuming one, and can be reset to the position just
//! before its first element. Every cursor in this crate can therefore be used
//! with `for` loops and iterator adapters, and re-traversed with [`Cursor::rewind`].
//!
//! # Validity
//!
//! A cursor borrows the structure it walks. The borrow checker rejects any
//! mutation of that structure (including a hash table rehash) while the
//! cursor is alive, so a traversal can never observe a half-updated
//! structure.

use crate::error::{CollectionError, Result};

// ============================================================================
// Cursor - one-way traversal
// ============================================================================

/// One-way rewindable traversal.
///
pub trait Cursor: Iterator {
    /// Returns true if [`Iterator::next`] would yield an element.
    fn has_next(&self) -> bool;

    /// Restarts the traversal. After a rewind, if the traversal is not empty,
    /// `next` returns the first element again.
    ///
    fn rewind(&mut self);

    /// Like `next`, but reports exhaustion as [`CollectionError::EndOfIteration`].
    ///
    fn try_next(&mut self) -> Result<Self::Item> {
        self.next().ok_or(CollectionError::EndOfIteration)
    }
}

// ============================================================================
// TwoWayCursor - bidirectional traversal
// ============================================================================

/// Bidirectional traversal.
///
/// The cursor sits in a gap between two elements: `next` returns the element
/// after the gap and `previous` the element before it. Calling `next` and then
/// `previous` yields the same element twice.
///
pub trait TwoWayCursor: Cursor {
    /// Returns true if [`TwoWayCursor::previous`] would yield an element.
    fn has_previous(&self) -> bool;

    /// Moves the cursor one element backwards, returning that element.
    fn previous(&mut self) -> Option<Self::Item>;

    /// Moves the cursor past the last element, so that `previous` walks the
    /// whole sequence backwards.
    ///
    fn full_forward(&mut self);

    /// Like `previous`, but reports exhaustion as [`CollectionError::EndOfIteration`].
    fn try_previous(&mut self) -> Result<Self::Item> {
        self.previous().ok_or(CollectionError::EndOfIteration)
    }
}
