use campus_core::{
    AvlSortedMap, BucketsCursor, FilterCursor, InOrderCursor, ListCursor, ListPosition, Map,
    SepChainHashTable, TwoWayList, ValuesCursor,
};
use tracing::debug;

use crate::entity::{RatedEntity, lookup_key, tag_key};
use crate::error::DirectoryError;
use crate::rating::{RatingBuckets, Stars};

/// Entities carrying a tag, in insertion order.
pub type TagCursor<'a, S> = ValuesCursor<InOrderCursor<'a, u64, S>>;

/// Bookkeeping kept per entity under its lowercased name.
///
/// `stars` and `tags` record what the secondary indexes currently hold, so
/// removal and reindexing find every copy even if the entity changed since.
///
struct ServiceSlot<S: RatedEntity> {
    entity: S,
    category: S::Category,
    stars: Stars,
    sequence: u64,
    position: ListPosition,
    tags: Vec<String>,
}

/// Multi-index directory of rated entities.
///
/// Every entity is reachable through:
/// - `by_insertion`: the canonical insertion order
/// - `by_name`: case-insensitive exact lookup
/// - `by_rating`: one insertion-ordered bucket per star value
/// - `by_category`: per category, the same five buckets
/// - `by_tag`: per review word, entities keyed by insertion sequence
///
/// All five agree after every public operation. A rating change must be
/// reported through [`ServiceDirectory::reindex_rating`] and a tag change
/// through [`ServiceDirectory::reindex_tags`].
///
pub struct ServiceDirectory<S: RatedEntity> {
    by_insertion: TwoWayList<S>,
    by_name: SepChainHashTable<String, ServiceSlot<S>>,
    by_rating: RatingBuckets<S>,
    by_category: SepChainHashTable<S::Category, RatingBuckets<S>>,
    by_tag: SepChainHashTable<String, AvlSortedMap<u64, S>>,
    next_sequence: u64,
}

impl<S: RatedEntity> ServiceDirectory<S> {
    pub fn new() -> Self {
        Self {
            by_insertion: TwoWayList::new(),
            by_name: SepChainHashTable::new(),
            by_rating: RatingBuckets::new(),
            by_category: SepChainHashTable::new(),
            by_tag: SepChainHashTable::new(),
            next_sequence: 0,
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

    /// Entities in insertion order; replaying them through
    /// [`ServiceDirectory::from_snapshot`] rebuilds an equivalent directory.
    ///
    pub fn snapshot(&self) -> Vec<S> {
        self.by_insertion.iter().cloned().collect()
    }

    // ========================================================================
    // Mutation
    // ========================================================================

    /// Indexes a new entity.
    ///
    /// Fails with [`DirectoryError::DuplicateName`] if the name is taken, in
    /// which case nothing is indexed.
    ///
    pub fn add(&mut self, entity: S) -> Result<(), DirectoryError> {
        let name = entity.name();
        let key = lookup_key(&name);
        if self.by_name.contains_key(&key) {
            return Err(DirectoryError::DuplicateName(name));
        }

        let stars = entity.stars();
        let category = entity.category();
        let tags = normalized_tags(&entity);
        let sequence = self.next_sequence;
        self.next_sequence += 1;

        let position = self.by_insertion.add_last(entity.clone());
        self.by_rating.insert(entity.clone(), stars);
        self.index_category(&category, entity.clone(), stars);
        for tag in &tags {
            self.index_tag(tag.clone(), sequence, entity.clone());
        }
        self.by_name.put(
            key,
            ServiceSlot {
                entity,
                category,
                stars,
                sequence,
                position,
                tags,
            },
        );

        debug!(%name, %stars, "service indexed");
        Ok(())
    }

    /// Removes the entity called `name` from every index.
    pub fn remove(&mut self, name: &str) -> Option<S> {
        let slot = self.by_name.remove(&lookup_key(name))?;

        self.by_insertion.remove_at(slot.position);
        self.by_rating.remove(&slot.entity, slot.stars);
        if let Some(buckets) = self.by_category.get_mut(&slot.category) {
            buckets.remove(&slot.entity, slot.stars);
            if buckets.is_empty() {
                self.by_category.remove(&slot.category);
            }
        }
        for tag in &slot.tags {
            self.unindex_tag(tag, slot.sequence);
        }

        debug!(name, "service removed");
        Some(slot.entity)
    }

    /// Moves `entity` from the `previous` buckets to those of its current
    /// rating.
    ///
    /// Returns `Ok(false)` without touching anything when the rating did not
    /// change. Fails with [`DirectoryError::StaleRating`] if the entity is
    /// not indexed under `previous`. A moved entity keeps its insertion
    /// order relative to the others in its new bucket.
    ///
    pub fn reindex_rating(&mut self, entity: &S, previous: Stars) -> Result<bool, DirectoryError> {
        let current = entity.stars();
        let Some(slot) = self.by_name.get_mut(&lookup_key(&entity.name())) else {
            return Err(DirectoryError::UnknownEntry(entity.name()));
        };
        if slot.stars != previous {
            return Err(DirectoryError::StaleRating {
                name: entity.name(),
                claimed: previous,
                indexed: slot.stars,
            });
        }
        if current == previous {
            return Ok(false);
        }

        slot.stars = current;
        let category = slot.category.clone();
        let handle = slot.entity.clone();

        // Linear scans of the old buckets.
        //
        let by_name = &self.by_name;
        let rank = |member: &S| insertion_sequence(by_name, member);
        if let Some(moved) = self.by_rating.remove(&handle, previous) {
            self.by_rating.insert_ranked(moved, current, rank);
        }
        if let Some(buckets) = self.by_category.get_mut(&category)
            && let Some(moved) = buckets.remove(&handle, previous)
        {
            buckets.insert_ranked(moved, current, rank);
        }

        debug!(name = %entity.name(), from = %previous, to = %current, "service rating reindexed");
        Ok(true)
    }

    /// Brings the tag index in line with the entity's current tags.
    pub fn reindex_tags(&mut self, entity: &S) -> Result<(), DirectoryError> {
        let fresh = normalized_tags(entity);
        let Some(slot) = self.by_name.get_mut(&lookup_key(&entity.name())) else {
            return Err(DirectoryError::UnknownEntry(entity.name()));
        };

        let stale: Vec<String> = slot
            .tags
            .iter()
            .filter(|tag| fresh.binary_search(*tag).is_err())
            .cloned()
            .collect();
        let added: Vec<String> = fresh
            .iter()
            .filter(|tag| slot.tags.binary_search(*tag).is_err())
            .cloned()
            .collect();
        let sequence = slot.sequence;
        let handle = slot.entity.clone();
        slot.tags = fresh;

        for tag in &stale {
            self.unindex_tag(tag, sequence);
        }
        for tag in added {
            self.index_tag(tag, sequence, handle.clone());
        }
        Ok(())
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub fn get(&self, name: &str) -> Option<&S> {
        self.by_name.get(&lookup_key(name)).map(|slot| &slot.entity)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(&lookup_key(name))
    }

    /// Rating under which the entity is currently indexed.
    pub fn indexed_stars(&self, name: &str) -> Option<Stars> {
        self.by_name.get(&lookup_key(name)).map(|slot| slot.stars)
    }

    pub fn len(&self) -> usize {
        self.by_insertion.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_insertion.is_empty()
    }

    /// All entities in insertion order.
    pub fn iter(&self) -> ListCursor<'_, S> {
        self.by_insertion.iter()
    }

    /// All entities, highest rating first, insertion order within a rating.
    pub fn by_rating(&self) -> BucketsCursor<'_, S> {
        self.by_rating.descending()
    }

    /// Entities of `category`, highest rating first.
    pub fn by_category(&self, category: &S::Category) -> BucketsCursor<'_, S> {
        match self.by_category.get(category) {
            Some(buckets) => buckets.descending(),
            None => BucketsCursor::empty(),
        }
    }

    /// Entities of `category` rated exactly `stars`, in insertion order.
    pub fn with_category_and_stars(&self, category: &S::Category, stars: Stars) -> ListCursor<'_, S> {
        self.by_category
            .get(category)
            .map_or_else(ListCursor::empty, |buckets| buckets.with_stars(stars))
    }

    pub fn has_category(&self, category: &S::Category) -> bool {
        self.by_category
            .get(category)
            .is_some_and(|buckets| !buckets.is_empty())
    }

    /// Entities with a tag equal to `term` (case-insensitive), in insertion order.
    pub fn with_tag(&self, term: &str) -> TagCursor<'_, S> {
        match self.by_tag.get(&tag_key(term)) {
            Some(tagged) => tagged.values(),
            None => ValuesCursor::new(InOrderCursor::empty()),
        }
    }

    /// Entities satisfying `predicate`, in insertion order.
    pub fn matching<P>(&self, predicate: P) -> FilterCursor<ListCursor<'_, S>, P>
    where
        P: FnMut(&&S) -> bool,
    {
        FilterCursor::new(self.by_insertion.iter(), predicate)
    }

    // ========================================================================
    // Internal helpers
    // ========================================================================

    fn index_category(&mut self, category: &S::Category, entity: S, stars: Stars) {
        if let Some(buckets) = self.by_category.get_mut(category) {
            buckets.insert(entity, stars);
        } else {
            let mut buckets = RatingBuckets::new();
            buckets.insert(entity, stars);
            self.by_category.put(category.clone(), buckets);
        }
    }

    fn index_tag(&mut self, tag: String, sequence: u64, entity: S) {
        if let Some(tagged) = self.by_tag.get_mut(&tag) {
            tagged.put(sequence, entity);
        } else {
            let mut tagged = AvlSortedMap::new();
            tagged.put(sequence, entity);
            self.by_tag.put(tag, tagged);
        }
    }

    fn unindex_tag(&mut self, tag: &String, sequence: u64) {
        if let Some(tagged) = self.by_tag.get_mut(tag) {
            tagged.remove(&sequence);
            if tagged.is_empty() {
                self.by_tag.remove(tag);
            }
        }
    }
}

impl<S: RatedEntity> Default for ServiceDirectory<S> {
    fn default() -> Self {
        Self::new()
    }
}

/// Insertion sequence of an indexed entity; unknown entities rank last.
fn insertion_sequence<S: RatedEntity>(
    by_name: &SepChainHashTable<String, ServiceSlot<S>>,
    entity: &S,
) -> u64 {
    by_name
        .get(&lookup_key(&entity.name()))
        .map_or(u64::MAX, |slot| slot.sequence)
}

/// Lowercased, trimmed, sorted and deduplicated tags of `entity`.
fn normalized_tags<S: RatedEntity>(entity: &S) -> Vec<String> {
    let mut tags: Vec<String> = entity
        .tags()
        .iter()
        .map(|tag| tag_key(tag))
        .filter(|tag| !tag.is_empty())
        .collect();
    tags.sort_unstable();
    tags.dedup();
    tags
}
