//! What the directories need to know about the entities they index.
//!
//! Entities are cheap shared handles (`Rc`-like). Equality must be identity:
//! two handles are equal only when they refer to the same entity. The
//! directories rely on it to find a handle in a secondary list.

use std::hash::Hash;

use crate::rating::Stars;

/// An entity addressable by a case-insensitive unique name.
pub trait Entity: Clone + PartialEq {
    /// Name as originally written.
    fn name(&self) -> String;
}

/// An entity indexed by rating, category and review tags.
///
pub trait RatedEntity: Entity {
    type Category: Hash + Eq + Clone;

    /// Current rating. A change must be reported to the directory with
    /// `reindex_rating`.
    ///
    fn stars(&self) -> Stars;

    /// Fixed for the lifetime of the entity.
    fn category(&self) -> Self::Category;

    /// Words the entity can be found by. Case and duplicates do not matter.
    fn tags(&self) -> Vec<String>;
}

/// An entity indexed by country.
pub trait ResidentEntity: Entity {
    /// Fixed for the lifetime of the entity.
    fn country(&self) -> String;
}

/// Lookup key for names and countries. Only case is folded.
pub(crate) fn lookup_key(text: &str) -> String {
    text.to_lowercase()
}

/// Lookup key for review tags, which also ignore surrounding whitespace.
pub(crate) fn tag_key(text: &str) -> String {
    text.trim().to_lowercase()
}
