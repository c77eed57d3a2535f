use campus_core::{
    AvlSortedMap, Cursor, InOrderCursor, ListCursor, ListPosition, Map, MappedCursor,
    SepChainHashTable, TwoWayList, ValuesCursor,
};
use tracing::debug;

use crate::entity::{ResidentEntity, lookup_key};
use crate::error::DirectoryError;

struct StudentSlot<S> {
    entity: S,
    country: String,
    position: ListPosition,
}

type SlotProjection<'a, S> = fn(&'a StudentSlot<S>) -> &'a S;

/// Entities in ascending order of lowercased name.
///
pub struct AlphabeticalCursor<'a, S> {
    inner: MappedCursor<ValuesCursor<InOrderCursor<'a, String, StudentSlot<S>>>, SlotProjection<'a, S>>,
}

impl<'a, S> Iterator for AlphabeticalCursor<'a, S> {
    type Item = &'a S;

    fn next(&mut self) -> Option<&'a S> {
        self.inner.next()
    }
}

impl<S> Cursor for AlphabeticalCursor<'_, S> {
    fn has_next(&self) -> bool {
        self.inner.has_next()
    }

    fn rewind(&mut self) {
        self.inner.rewind();
    }
}

/// Multi-index directory of entities grouped by country.
///
/// Indexes:
/// - `by_name`: AVL map keyed by lowercased name, giving alphabetical order
/// - `by_country`: per lowercased country, entities in insertion order; a
///   country with no entities has no list
/// - `by_registration`: every entity in insertion order
///
pub struct StudentDirectory<S: ResidentEntity> {
    by_name: AvlSortedMap<String, StudentSlot<S>>,
    by_country: SepChainHashTable<String, TwoWayList<S>>,
    by_registration: TwoWayList<S>,
}

impl<S: ResidentEntity> StudentDirectory<S> {
    pub fn new() -> Self {
        Self {
            by_name: AvlSortedMap::new(),
            by_country: SepChainHashTable::new(),
            by_registration: TwoWayList::new(),
        }
    }

    /// Rebuilds a directory by adding `entities` in order.
    pub fn from_snapshot<I>(entities: I) -> Result<Self, DirectoryError>
    where
        I: IntoIterator<Item = S>,
    {
        let mut directory = Self::new();
        for entity in entities {
            directory.add(entity)?;
        }
        Ok(directory)
    }

    /// Entities in registration order, which reproduces every per-country
    /// order when replayed through [`StudentDirectory::from_snapshot`].
    ///
    pub fn snapshot(&self) -> Vec<S> {
        self.by_registration.iter().cloned().collect()
    }

    /// Indexes a new entity; nothing is indexed if the name is taken.
    pub fn add(&mut self, entity: S) -> Result<(), DirectoryError> {
        let name = entity.name();
        let key = lookup_key(&name);
        if self.by_name.contains_key(&key) {
            return Err(DirectoryError::DuplicateName(name));
        }

        let country = lookup_key(&entity.country());
        let position = self.by_registration.add_last(entity.clone());
        if let Some(residents) = self.by_country.get_mut(&country) {
            residents.add_last(entity.clone());
        } else {
            let mut residents = TwoWayList::new();
            residents.add_last(entity.clone());
            self.by_country.put(country.clone(), residents);
        }
        self.by_name.put(
            key,
            StudentSlot {
                entity,
                country,
                position,
            },
        );

        debug!(%name, "student indexed");
        Ok(())
    }

    /// Removes the entity called `name` from every index.
    pub fn remove(&mut self, name: &str) -> Option<S> {
        let slot = self.by_name.remove(&lookup_key(name))?;

        self.by_registration.remove_at(slot.position);
        if let Some(residents) = self.by_country.get_mut(&slot.country) {
            if let Some(position) = residents.find_position(|resident| *resident == slot.entity) {
                residents.remove_at(position);
            }
            if residents.is_empty() {
                self.by_country.remove(&slot.country);
            }
        }

        debug!(name, "student removed");
        Some(slot.entity)
    }

    pub fn get(&self, name: &str) -> Option<&S> {
        self.by_name.get(&lookup_key(name)).map(|slot| &slot.entity)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(&lookup_key(name))
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    /// All entities in ascending order of lowercased name.
    pub fn iter(&self) -> AlphabeticalCursor<'_, S> {
        let project: SlotProjection<'_, S> = |slot| &slot.entity;
        AlphabeticalCursor {
            inner: MappedCursor::new(self.by_name.values(), project),
        }
    }

    /// Entities from `country` (case-insensitive), in insertion order.
    pub fn by_country(&self, country: &str) -> ListCursor<'_, S> {
        self.by_country
            .get(&lookup_key(country))
            .map_or_else(ListCursor::empty, TwoWayList::iter)
    }

    /// All entities in insertion order.
    pub fn registration_order(&self) -> ListCursor<'_, S> {
        self.by_registration.iter()
    }
}

impl<S: ResidentEntity> Default for StudentDirectory<S> {
    fn default() -> Self {
        Self::new()
    }
}
